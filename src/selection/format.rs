//! Every on-disk revision of the selection file, newest first.
//!
//! Each format is an independent, pure parser: it either declines the content
//! (`None`) or claims it and returns the parsed state or why it could not. The
//! store walks [`FORMATS`] in order and uses the first claim. Only
//! [`FlagFormat`] is ever written.

use serde::Deserialize;

use crate::paths::{LibraryRoots, PathRoots};
use crate::selection::state::{Mode, SelectionState};

const ALL_MUSIC: &str = "ALL_MUSIC=";
const ALL_AUDIOBOOKS: &str = "ALL_AUDIOBOOKS=";
const MUSIC_ALBUM: &str = "MUSIC_ALBUM=";
const AUDIOBOOKS: &str = "AUDIOBOOKS=";
const PLAYLIST_ID: &str = "PLAYLIST_ID=";
const MUSIC_MODE: &str = "MUSIC_MODE=";
const AUDIOBOOKS_MODE: &str = "AUDIOBOOKS_MODE=";

/// Content claimed by a format but not parseable as it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed {format} selection: {message}")]
pub struct MalformedSelection {
    pub format: &'static str,
    pub message: String,
}

pub trait SelectionFormat {
    fn name(&self) -> &'static str;

    /// `None` when the content does not look like this format.
    fn parse(
        &self,
        content: &str,
        roots: &LibraryRoots,
    ) -> Option<Result<SelectionState, MalformedSelection>>;
}

/// Detection precedence. [`PlainListFormat`] accepts anything, so the chain
/// always produces a result.
pub const FORMATS: &[&dyn SelectionFormat] =
    &[&FlagFormat, &ModeKeyedFormat, &JsonFormat, &PlainListFormat];

/// Run the chain over `content`. Returns the name of the format that claimed
/// it alongside its verdict.
pub fn parse(
    content: &str,
    roots: &LibraryRoots,
) -> (&'static str, Result<SelectionState, MalformedSelection>) {
    for format in FORMATS {
        if let Some(result) = format.parse(content, roots) {
            return (format.name(), result.map(SelectionState::normalized));
        }
    }
    ("default", Ok(SelectionState::default()))
}

/// Non-blank, non-comment lines, trimmed.
fn directives(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

fn value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    line.strip_prefix(key).map(str::trim)
}

fn push_relative(list: &mut Vec<String>, raw: &str, roots: &PathRoots) {
    if !raw.is_empty() {
        list.push(roots.to_relative(raw));
    }
}

fn push_id(ids: &mut Vec<String>, raw: &str) {
    if !raw.is_empty() {
        ids.push(raw.to_string());
    }
}

fn mode_or_all(raw: Option<&str>, key: &str) -> Mode {
    match raw.map(str::parse::<Mode>) {
        Some(Ok(mode)) => mode,
        Some(Err(e)) => {
            tracing::warn!("{key}: {e}, treating as all");
            Mode::All
        }
        None => Mode::All,
    }
}

/// Current format: `ALL_MUSIC=true` / `ALL_AUDIOBOOKS=true` flags, one
/// `MUSIC_ALBUM=` / `AUDIOBOOKS=` line per host path, `PLAYLIST_ID=` lines.
/// The writer always emits the ALL flag for an `all` section, so a section
/// without one is `selected`, possibly with no entries.
#[derive(Debug, Clone, Copy)]
pub struct FlagFormat;

impl FlagFormat {
    fn claims(content: &str) -> bool {
        let mut flagged = false;
        for line in directives(content) {
            if line.starts_with(MUSIC_MODE) || line.starts_with(AUDIOBOOKS_MODE) {
                return false;
            }
            flagged |= [ALL_MUSIC, ALL_AUDIOBOOKS, MUSIC_ALBUM, AUDIOBOOKS, PLAYLIST_ID]
                .iter()
                .any(|key| line.starts_with(key));
        }
        flagged
    }

    /// Canonical serialization. Relative paths are mapped to host paths; the
    /// result always ends with a newline. A `selected` section with no entries
    /// gets an explicit `ALL_*=false` line so the file still reads as this
    /// format.
    pub fn render(state: &SelectionState, roots: &LibraryRoots) -> String {
        let mut lines = Vec::new();

        render_section(
            &mut lines,
            state.music.mode,
            ALL_MUSIC,
            MUSIC_ALBUM,
            state
                .music
                .albums
                .iter()
                .filter(|p| !p.trim().is_empty())
                .map(|p| roots.music.to_host(p)),
        );
        render_section(
            &mut lines,
            state.audiobooks.mode,
            ALL_AUDIOBOOKS,
            AUDIOBOOKS,
            state
                .audiobooks
                .items
                .iter()
                .filter(|p| !p.trim().is_empty())
                .map(|p| roots.audiobooks.to_host(p)),
        );

        lines.extend(
            state
                .playlists
                .ids
                .iter()
                .map(|id| id.trim())
                .filter(|id| !id.is_empty())
                .map(|id| format!("{PLAYLIST_ID}{id}")),
        );

        let mut content = lines.join("\n");
        content.push('\n');
        content
    }
}

fn render_section(
    lines: &mut Vec<String>,
    mode: Mode,
    all_key: &str,
    item_key: &str,
    host_paths: impl Iterator<Item = String>,
) {
    if mode == Mode::All {
        lines.push(format!("{all_key}true"));
        return;
    }
    let before = lines.len();
    lines.extend(host_paths.map(|p| format!("{item_key}{p}")));
    if lines.len() == before {
        lines.push(format!("{all_key}false"));
    }
}

impl SelectionFormat for FlagFormat {
    fn name(&self) -> &'static str {
        "flag"
    }

    fn parse(
        &self,
        content: &str,
        roots: &LibraryRoots,
    ) -> Option<Result<SelectionState, MalformedSelection>> {
        if !Self::claims(content) {
            return None;
        }

        let mut state = SelectionState::default();
        let mut music_mode = None;
        let mut audiobooks_mode = None;

        for line in directives(content) {
            if let Some(v) = value(line, ALL_MUSIC) {
                if v.eq_ignore_ascii_case("true") {
                    music_mode = Some(Mode::All);
                }
            } else if let Some(v) = value(line, ALL_AUDIOBOOKS) {
                if v.eq_ignore_ascii_case("true") {
                    audiobooks_mode = Some(Mode::All);
                }
            } else if let Some(v) = value(line, MUSIC_ALBUM) {
                push_relative(&mut state.music.albums, v, &roots.music);
            } else if let Some(v) = value(line, AUDIOBOOKS) {
                push_relative(&mut state.audiobooks.items, v, &roots.audiobooks);
            } else if let Some(v) = value(line, PLAYLIST_ID) {
                push_id(&mut state.playlists.ids, v);
            }
        }

        state.music.mode = music_mode.unwrap_or(Mode::Selected);
        state.audiobooks.mode = audiobooks_mode.unwrap_or(Mode::Selected);
        Some(Ok(state))
    }
}

/// Earlier line format with explicit `MUSIC_MODE=` / `AUDIOBOOKS_MODE=`
/// lines. Modes are never inferred from item lines.
#[derive(Debug, Clone, Copy)]
pub struct ModeKeyedFormat;

impl SelectionFormat for ModeKeyedFormat {
    fn name(&self) -> &'static str {
        "mode-keyed"
    }

    fn parse(
        &self,
        content: &str,
        roots: &LibraryRoots,
    ) -> Option<Result<SelectionState, MalformedSelection>> {
        let claimed = directives(content)
            .any(|line| line.starts_with(MUSIC_MODE) || line.starts_with(AUDIOBOOKS_MODE));
        if !claimed {
            return None;
        }

        let mut state = SelectionState::default();
        for line in directives(content) {
            if let Some(v) = value(line, MUSIC_MODE) {
                state.music.mode = mode_or_all(Some(v), MUSIC_MODE);
            } else if let Some(v) = value(line, AUDIOBOOKS_MODE) {
                state.audiobooks.mode = mode_or_all(Some(v), AUDIOBOOKS_MODE);
            } else if let Some(v) = value(line, MUSIC_ALBUM) {
                push_relative(&mut state.music.albums, v, &roots.music);
            } else if let Some(v) = value(line, AUDIOBOOKS) {
                push_relative(&mut state.audiobooks.items, v, &roots.audiobooks);
            } else if let Some(v) = value(line, PLAYLIST_ID) {
                push_id(&mut state.playlists.ids, v);
            }
        }
        Some(Ok(state))
    }
}

#[derive(Debug, Default, Deserialize)]
struct LegacyJson {
    #[serde(default)]
    music: Option<LegacyMusic>,
    #[serde(default)]
    audiobooks: Option<LegacyAudiobooks>,
    #[serde(default)]
    playlists: Option<LegacyPlaylists>,
}

#[derive(Debug, Default, Deserialize)]
struct LegacyMusic {
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    albums: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LegacyAudiobooks {
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    audiobooks: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LegacyPlaylists {
    #[serde(default, alias = "ids")]
    playlist_ids: Vec<String>,
}

/// JSON object written by the first web UI:
/// `{"music": {"mode", "albums"}, "audiobooks": {"mode", "audiobooks"}}`.
#[derive(Debug, Clone, Copy)]
pub struct JsonFormat;

impl SelectionFormat for JsonFormat {
    fn name(&self) -> &'static str {
        "json"
    }

    fn parse(
        &self,
        content: &str,
        roots: &LibraryRoots,
    ) -> Option<Result<SelectionState, MalformedSelection>> {
        let content = content.trim();
        if !content.starts_with('{') {
            return None;
        }

        let parsed: LegacyJson = match serde_json::from_str(content) {
            Ok(parsed) => parsed,
            Err(e) => {
                return Some(Err(MalformedSelection {
                    format: self.name(),
                    message: e.to_string(),
                }))
            }
        };

        let music = parsed.music.unwrap_or_default();
        let audiobooks = parsed.audiobooks.unwrap_or_default();
        let mut state = SelectionState::default();

        state.music.mode = mode_or_all(music.mode.as_deref(), "music.mode");
        for path in &music.albums {
            push_relative(&mut state.music.albums, path.trim(), &roots.music);
        }
        state.audiobooks.mode = mode_or_all(audiobooks.mode.as_deref(), "audiobooks.mode");
        for path in &audiobooks.audiobooks {
            push_relative(&mut state.audiobooks.items, path.trim(), &roots.audiobooks);
        }
        for id in parsed.playlists.unwrap_or_default().playlist_ids {
            push_id(&mut state.playlists.ids, id.trim());
        }
        Some(Ok(state))
    }
}

/// Oldest format: `*` (or nothing) for everything, else one bare album
/// identifier per line. Audiobooks did not exist yet and default to `all`.
#[derive(Debug, Clone, Copy)]
pub struct PlainListFormat;

impl SelectionFormat for PlainListFormat {
    fn name(&self) -> &'static str {
        "plain-list"
    }

    fn parse(
        &self,
        content: &str,
        _roots: &LibraryRoots,
    ) -> Option<Result<SelectionState, MalformedSelection>> {
        let content = content.trim();
        let mut state = SelectionState::default();
        if content.is_empty() || content == "*" {
            return Some(Ok(state));
        }

        state.music.mode = Mode::Selected;
        state.music.albums = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Some(Ok(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_skip_comments_and_blank_lines() {
        let content = "# header\n\n  ALL_MUSIC=true  \n#PLAYLIST_ID=x\n";
        assert_eq!(directives(content).collect::<Vec<_>>(), vec!["ALL_MUSIC=true"]);
    }

    #[test]
    fn flag_format_declines_mode_keyed_files() {
        assert!(!FlagFormat::claims("MUSIC_MODE=selected\nMUSIC_ALBUM=/x/A"));
        assert!(FlagFormat::claims("PLAYLIST_ID=abc"));
        assert!(!FlagFormat::claims("Artist/Album"));
    }
}
