//! Playlist lookups straight from a Navidrome SQLite database, opened
//! read-only for each call.

use std::path::PathBuf;

use rusqlite::{Connection, OpenFlags, OptionalExtension};

use crate::playlists::source::{PlaylistContents, PlaylistRef, PlaylistSource, PlaylistSourceError};

const PLAYLISTS_SQL: &str = "\
    SELECT p.id, p.name, p.song_count, CAST(p.duration AS INTEGER), p.public, u.user_name \
    FROM playlist p LEFT JOIN \"user\" u ON u.id = p.owner_id \
    ORDER BY p.name COLLATE NOCASE, p.id";

const PLAYLIST_NAME_SQL: &str = "SELECT name FROM playlist WHERE id = ?1";

const PLAYLIST_SONGS_SQL: &str = "\
    SELECT mf.path FROM playlist_tracks pt \
    JOIN media_file mf ON mf.id = pt.media_file_id \
    WHERE pt.playlist_id = ?1 \
    ORDER BY pt.id";

#[derive(Debug, Clone)]
pub struct NavidromeSource {
    db_path: PathBuf,
}

impl NavidromeSource {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    fn open(&self) -> Result<Connection, PlaylistSourceError> {
        if !self.db_path.is_file() {
            return Err(PlaylistSourceError::NotConfigured);
        }
        let conn = Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(conn)
    }
}

impl PlaylistSource for NavidromeSource {
    fn is_available(&self) -> bool {
        match self.open() {
            Ok(conn) => conn
                .query_row("SELECT count(*) FROM playlist", [], |row| row.get::<_, i64>(0))
                .is_ok(),
            Err(_) => false,
        }
    }

    fn playlists(&self) -> Result<Vec<PlaylistRef>, PlaylistSourceError> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(PLAYLISTS_SQL)?;
        let rows = stmt.query_map([], |row| {
            Ok(PlaylistRef {
                id: row.get(0)?,
                name: row.get(1)?,
                song_count: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
                duration_seconds: row.get::<_, Option<i64>>(3)?.unwrap_or(0),
                is_public: row.get::<_, Option<bool>>(4)?.unwrap_or(false),
                owner: row.get(5)?,
            })
        })?;
        let playlists = rows.collect::<Result<Vec<_>, _>>()?;
        tracing::debug!("Loaded {} playlists from {}", playlists.len(), self.db_path.display());
        Ok(playlists)
    }

    fn playlist(&self, id: &str) -> Result<Option<PlaylistContents>, PlaylistSourceError> {
        let conn = self.open()?;
        let name: Option<String> = conn
            .query_row(PLAYLIST_NAME_SQL, [id], |row| row.get(0))
            .optional()?;
        let Some(name) = name else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(PLAYLIST_SONGS_SQL)?;
        let song_paths = stmt
            .query_map([id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(PlaylistContents { name, song_paths }))
    }
}
