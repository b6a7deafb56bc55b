use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;

use crate::paths::LibraryRoots;
use crate::selection::format::{self, FlagFormat};
use crate::selection::state::SelectionState;

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("failed to write selection file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to replace selection file {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

/// Reads and writes the selection file shared with the external sync script.
#[derive(Debug, Clone)]
pub struct SelectionStore {
    path: PathBuf,
    roots: LibraryRoots,
}

impl SelectionStore {
    pub fn new(path: impl Into<PathBuf>, roots: LibraryRoots) -> Self {
        Self {
            path: path.into(),
            roots,
        }
    }

    /// Current selection. Never fails: a missing, unreadable or malformed
    /// file yields [`SelectionState::default`].
    pub fn read(&self) -> SelectionState {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No selection file at {}, using defaults", self.path.display());
                return SelectionState::default();
            }
            Err(e) => {
                tracing::warn!(
                    "Cannot read selection file {}: {}, using defaults",
                    self.path.display(),
                    e
                );
                return SelectionState::default();
            }
        };

        match format::parse(&content, &self.roots) {
            (name, Ok(state)) => {
                tracing::debug!("Read {} selection from {}", name, self.path.display());
                state
            }
            (_, Err(e)) => {
                tracing::warn!("{} in {}, using defaults", e, self.path.display());
                SelectionState::default()
            }
        }
    }

    /// Replace the selection file with the canonical rendering of `state`.
    ///
    /// The content goes to a temporary file in the same directory which is
    /// then renamed over the target, so readers never see a partial file.
    pub fn write(&self, state: &SelectionState) -> Result<(), SelectionError> {
        let content = FlagFormat::render(&state.clone().normalized(), &self.roots);
        let io_err = |source| SelectionError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(io_err)?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(io_err)?;
        tmp.write_all(content.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // The sync script runs as a different user on the host.
            tmp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o644))
                .map_err(io_err)?;
        }
        tmp.persist(&self.path)
            .map_err(|source| SelectionError::Persist {
                path: self.path.clone(),
                source,
            })?;

        tracing::info!(
            "Wrote selection to {} (music: {}, audiobooks: {}, playlists: {})",
            self.path.display(),
            state.music.mode,
            state.audiobooks.mode,
            state.playlists.ids.len()
        );
        Ok(())
    }
}
