#![allow(dead_code)]

use std::collections::BTreeMap;

use dapsync::playlists::{PlaylistContents, PlaylistRef, PlaylistSource, PlaylistSourceError};

/// In-memory playlist source. `None` behaves like an unconfigured backend.
#[derive(Default)]
pub struct FakePlaylists {
    pub playlists: Option<BTreeMap<String, PlaylistContents>>,
}

impl FakePlaylists {
    pub fn unconfigured() -> Self {
        Self { playlists: None }
    }

    pub fn with(entries: Vec<(&str, &str, Vec<&str>)>) -> Self {
        let playlists = entries
            .into_iter()
            .map(|(id, name, songs)| {
                (
                    id.to_string(),
                    PlaylistContents {
                        name: name.to_string(),
                        song_paths: songs.iter().map(|s| s.to_string()).collect(),
                    },
                )
            })
            .collect();
        Self {
            playlists: Some(playlists),
        }
    }
}

impl PlaylistSource for FakePlaylists {
    fn is_available(&self) -> bool {
        self.playlists.is_some()
    }

    fn playlists(&self) -> Result<Vec<PlaylistRef>, PlaylistSourceError> {
        let playlists = self.playlists.as_ref().ok_or(PlaylistSourceError::NotConfigured)?;
        Ok(playlists
            .iter()
            .map(|(id, contents)| PlaylistRef {
                id: id.clone(),
                name: contents.name.clone(),
                song_count: contents.song_paths.len() as i64,
                duration_seconds: 0,
                is_public: false,
                owner: None,
            })
            .collect())
    }

    fn playlist(&self, id: &str) -> Result<Option<PlaylistContents>, PlaylistSourceError> {
        let playlists = self.playlists.as_ref().ok_or(PlaylistSourceError::NotConfigured)?;
        Ok(playlists.get(id).cloned())
    }
}
