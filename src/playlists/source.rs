use serde::Serialize;

/// Playlist metadata as owned by the media server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistRef {
    pub id: String,
    pub name: String,
    #[serde(rename = "songCount")]
    pub song_count: i64,
    #[serde(rename = "duration")]
    pub duration_seconds: i64,
    #[serde(rename = "public")]
    pub is_public: bool,
    pub owner: Option<String>,
}

/// Name and ordered song paths of one playlist.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlaylistContents {
    pub name: String,
    pub song_paths: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PlaylistSourceError {
    /// No playlist backend is set up. Distinct from a backend with zero playlists.
    #[error("playlist source is not configured")]
    NotConfigured,
    #[error("playlist database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Read-only lookup of playlists by id. Calls block.
pub trait PlaylistSource: Send + Sync {
    /// Cheap check used to tell the UI whether playlists can be offered.
    fn is_available(&self) -> bool;

    /// Every playlist the backend knows about.
    fn playlists(&self) -> Result<Vec<PlaylistRef>, PlaylistSourceError>;

    /// `Ok(None)` when no playlist has this id.
    fn playlist(&self, id: &str) -> Result<Option<PlaylistContents>, PlaylistSourceError>;
}
