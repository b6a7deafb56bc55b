use std::path::PathBuf;

use crate::paths;
use crate::playlists::source::{PlaylistSource, PlaylistSourceError};
use crate::selection::Mode;

const PLAYLIST_EXTENSION: &str = ".m3u8";

#[derive(Debug, thiserror::Error)]
pub enum PlaylistBuildError {
    #[error("playlist source: {0}")]
    Source(#[from] PlaylistSourceError),
    #[error("failed to write playlists under {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes one `.m3u8` file per chosen playlist into a directory the sync
/// script copies to the device.
pub struct PlaylistBuilder<'a> {
    source: &'a dyn PlaylistSource,
    output_dir: PathBuf,
    /// Where the music library is mounted on the device, e.g. `/<HDD0>/music/`.
    device_prefix: String,
    /// Library root as recorded in the media server database.
    music_container_root: String,
}

impl<'a> PlaylistBuilder<'a> {
    pub fn new(
        source: &'a dyn PlaylistSource,
        output_dir: impl Into<PathBuf>,
        device_prefix: impl Into<String>,
        music_container_root: impl Into<String>,
    ) -> Self {
        Self {
            source,
            output_dir: output_dir.into(),
            device_prefix: device_prefix.into(),
            music_container_root: music_container_root.into(),
        }
    }

    /// Ids to build: every known playlist for [`Mode::All`], otherwise the
    /// request as given. Unknown ids are not filtered here.
    pub fn resolve_ids(
        &self,
        mode: Mode,
        requested_ids: &[String],
    ) -> Result<Vec<String>, PlaylistSourceError> {
        match mode {
            Mode::All => Ok(self
                .source
                .playlists()?
                .into_iter()
                .map(|playlist| playlist.id)
                .collect()),
            Mode::Selected => Ok(requested_ids.to_vec()),
        }
    }

    /// Write the playlist file for `id`. `Ok(None)` when the playlist is
    /// unknown or has no songs; nothing is written then.
    pub fn build(&self, id: &str) -> Result<Option<PathBuf>, PlaylistBuildError> {
        let Some(contents) = self.source.playlist(id)? else {
            tracing::debug!("Playlist {} not found, skipping", id);
            return Ok(None);
        };
        if contents.song_paths.is_empty() {
            tracing::debug!("Playlist {} ({}) is empty, skipping", id, contents.name);
            return Ok(None);
        }

        let mut body = String::new();
        for song in &contents.song_paths {
            body.push_str(&self.device_path(song));
            body.push('\n');
        }

        std::fs::create_dir_all(&self.output_dir).map_err(|e| self.io_err(e))?;
        let file_path = self.output_dir.join(playlist_file_name(&contents.name, id));
        std::fs::write(&file_path, body).map_err(|e| self.io_err(e))?;

        tracing::debug!(
            "Wrote playlist {} ({} songs) to {}",
            id,
            contents.song_paths.len(),
            file_path.display()
        );
        Ok(Some(file_path))
    }

    /// Remove everything under the output directory, creating it if missing.
    pub fn reset_dir(&self) -> Result<(), PlaylistBuildError> {
        if !self.output_dir.is_dir() {
            return std::fs::create_dir_all(&self.output_dir).map_err(|e| self.io_err(e));
        }
        for entry in std::fs::read_dir(&self.output_dir).map_err(|e| self.io_err(e))? {
            let path = entry.map_err(|e| self.io_err(e))?.path();
            let removed = if path.is_dir() {
                std::fs::remove_dir_all(&path)
            } else {
                std::fs::remove_file(&path)
            };
            removed.map_err(|e| self.io_err(e))?;
        }
        Ok(())
    }

    /// Reset the output directory, then build every resolved playlist.
    ///
    /// A playlist that fails to build is logged and skipped; only directory
    /// errors abort the batch. Returns the files written.
    pub fn generate(
        &self,
        mode: Mode,
        requested_ids: &[String],
    ) -> Result<Vec<PathBuf>, PlaylistBuildError> {
        let ids = match self.resolve_ids(mode, requested_ids) {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!("Cannot list playlists: {}", e);
                Vec::new()
            }
        };

        self.reset_dir()?;

        let mut written = Vec::new();
        for id in ids.iter().map(|id| id.trim()).filter(|id| !id.is_empty()) {
            match self.build(id) {
                Ok(Some(path)) => written.push(path),
                Ok(None) => {}
                Err(PlaylistBuildError::Source(e)) => {
                    tracing::warn!("Skipping playlist {}: {}", id, e);
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            "Generated {} playlist files in {}",
            written.len(),
            self.output_dir.display()
        );
        Ok(written)
    }

    /// Song path as the device sees it: the device prefix followed by the path
    /// relative to the library root.
    fn device_path(&self, song: &str) -> String {
        let relative = paths::container_remainder(song, &self.music_container_root)
            .unwrap_or_else(|| song.trim_start_matches('/'));
        format!("{}/{}", self.device_prefix.trim_end_matches('/'), relative)
    }

    fn io_err(&self, source: std::io::Error) -> PlaylistBuildError {
        PlaylistBuildError::Io {
            path: self.output_dir.clone(),
            source,
        }
    }
}

/// Filesystem-safe `.m3u8` file name for a playlist. Characters other than
/// alphanumerics, whitespace, `-`, `_` and `.` become `_`.
pub fn playlist_file_name(name: &str, id: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut file_name = match sanitized.trim() {
        "" => format!("playlist_{id}"),
        trimmed => trimmed.to_string(),
    };
    if !file_name.ends_with(PLAYLIST_EXTENSION) {
        file_name.push_str(PLAYLIST_EXTENSION);
    }
    file_name
}
