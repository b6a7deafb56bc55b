//! The two request flows: assembling the picker payload, and saving a
//! selection together with everything generated from it.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::media::library::{self, MediaItem};
use crate::media::scanner::{scan_albums, scan_audiobooks};
use crate::media::size::{format_size, gigabytes_to_bytes};
use crate::playlists::{PlaylistBuilder, PlaylistSource};
use crate::script::SyncScriptGenerator;
use crate::selection::state::{AudiobookSelection, MusicSelection, PlaylistSelection};
use crate::selection::{Mode, SelectionError, SelectionState, SelectionStore};

/// Body of a selection save. Older UI builds sent `mode` / `albums`.
///
/// A missing or `null` mode means `all` for the two library sections and
/// `selected` for playlists.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveRequest {
    #[serde(default, alias = "mode")]
    pub music_mode: Option<Mode>,
    #[serde(default, alias = "albums")]
    pub music_albums: Vec<String>,
    #[serde(default)]
    pub audiobooks_mode: Option<Mode>,
    #[serde(default)]
    pub audiobooks: Vec<String>,
    /// `all` syncs every playlist the source knows; ids are then ignored.
    #[serde(default)]
    pub playlist_mode: Option<Mode>,
    #[serde(default)]
    pub playlist_ids: Vec<String>,
}

impl SaveRequest {
    pub fn to_state(&self) -> SelectionState {
        SelectionState {
            music: MusicSelection {
                mode: self.music_mode.unwrap_or_default(),
                albums: self.music_albums.clone(),
            },
            audiobooks: AudiobookSelection {
                mode: self.audiobooks_mode.unwrap_or_default(),
                items: self.audiobooks.clone(),
            },
            playlists: PlaylistSelection {
                ids: self.playlist_ids.clone(),
            },
        }
        .normalized()
    }

    pub fn playlist_mode(&self) -> Mode {
        self.playlist_mode.unwrap_or(Mode::Selected)
    }
}

/// What a save produced besides the selection file itself.
#[derive(Debug, Clone, Default)]
pub struct SaveOutcome {
    pub playlists: Vec<PathBuf>,
    pub script: Option<PathBuf>,
}

/// Persist `request`, then rebuild the playlist files, then the sync script.
///
/// Only the selection write can fail the save. Playlist and script problems
/// are logged and reflected as absent entries in the outcome.
pub fn save_selection(
    config: &Config,
    source: &dyn PlaylistSource,
    request: &SaveRequest,
) -> Result<SaveOutcome, SelectionError> {
    let state = request.to_state();
    SelectionStore::new(&config.selection_file, config.roots.clone()).write(&state)?;

    let builder = PlaylistBuilder::new(
        source,
        &config.playlists_dir,
        &config.playlist_path_prefix,
        &config.roots.music.container,
    );
    let playlists = builder
        .generate(request.playlist_mode(), &state.playlists.ids)
        .unwrap_or_else(|e| {
            tracing::error!("Playlist generation failed: {}", e);
            Vec::new()
        });

    let script = match SyncScriptGenerator::from_config(config).generate() {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::warn!("Sync script not regenerated: {}", e);
            None
        }
    };

    Ok(SaveOutcome { playlists, script })
}

/// An album or audiobook as the picker lists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemView {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub size_formatted: String,
}

impl From<&MediaItem> for ItemView {
    fn from(item: &MediaItem) -> Self {
        Self {
            name: item.name.clone(),
            path: item.relative_path.clone(),
            size: item.size_bytes,
            size_formatted: format_size(item.size_bytes),
        }
    }
}

/// Everything the picker needs in one response.
#[derive(Debug, Clone, Serialize)]
pub struct PickerPayload {
    pub albums_by_artist: BTreeMap<String, Vec<ItemView>>,
    pub albums: Vec<String>,
    pub audiobooks: Vec<ItemView>,
    pub selection: SelectionState,
    pub total_size: u64,
    pub total_size_formatted: String,
    pub audiobooks_total_size: u64,
    pub audiobooks_total_size_formatted: String,
    pub device_size_gb: u64,
    pub device_size_bytes: u64,
    pub device_size_formatted: String,
    pub subsonic_configured: bool,
}

/// Fresh scan of both trees plus the stored selection.
pub fn picker_payload(config: &Config, source: &dyn PlaylistSource) -> PickerPayload {
    let albums = scan_albums(config.music_root()).catalog;
    let audiobooks = scan_audiobooks(config.audiobooks_root()).catalog;
    let selection = SelectionStore::new(&config.selection_file, config.roots.clone()).read();

    let total_size = library::total_size(albums.values().flatten());
    let audiobooks_total_size = library::total_size(&audiobooks);
    let device_size_bytes = gigabytes_to_bytes(config.device_size_gb);

    PickerPayload {
        albums: library::album_paths(&albums),
        albums_by_artist: albums
            .iter()
            .map(|(artist, items)| (artist.clone(), items.iter().map(ItemView::from).collect()))
            .collect(),
        audiobooks: audiobooks.iter().map(ItemView::from).collect(),
        selection,
        total_size,
        total_size_formatted: format_size(total_size),
        audiobooks_total_size,
        audiobooks_total_size_formatted: format_size(audiobooks_total_size),
        device_size_gb: config.device_size_gb,
        device_size_bytes,
        device_size_formatted: format_size(device_size_bytes),
        subsonic_configured: source.is_available(),
    }
}
