use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Whether a section syncs everything or only the listed entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    All,
    Selected,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::All => "all",
            Mode::Selected => "selected",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown selection mode: {0:?}")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Mode::All),
            "selected" => Ok(Mode::Selected),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MusicSelection {
    pub mode: Mode,
    /// Album paths relative to the music root.
    pub albums: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AudiobookSelection {
    pub mode: Mode,
    /// Entry paths relative to the audiobooks root.
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaylistSelection {
    pub ids: Vec<String>,
}

/// What the user wants on the device. The only state this service persists.
///
/// `Default` is "all music, all audiobooks, no playlists", which is also what
/// every unreadable selection file falls back to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionState {
    pub music: MusicSelection,
    pub audiobooks: AudiobookSelection,
    pub playlists: PlaylistSelection,
}

impl SelectionState {
    /// Drop list entries that carry no meaning or cannot be stored: everything
    /// under an `all` section, blank entries and ids, and anything containing a
    /// line break, which would start a new directive in the selection file.
    pub fn normalized(mut self) -> Self {
        if self.music.mode == Mode::All {
            self.music.albums.clear();
        }
        if self.audiobooks.mode == Mode::All {
            self.audiobooks.items.clear();
        }
        retain_storable(&mut self.music.albums, "album");
        retain_storable(&mut self.audiobooks.items, "audiobook");
        for id in &mut self.playlists.ids {
            *id = id.trim().to_string();
        }
        retain_storable(&mut self.playlists.ids, "playlist id");
        self
    }
}

fn retain_storable(entries: &mut Vec<String>, kind: &str) {
    entries.retain(|entry| {
        if entry.contains(['\n', '\r']) {
            tracing::warn!("Dropping {} containing a line break: {:?}", kind, entry);
            return false;
        }
        !entry.trim().is_empty()
    });
}
