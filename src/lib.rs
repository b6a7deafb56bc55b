//! Pick which albums, audiobooks and playlists go onto a portable player, and
//! write the selection file and sync script an external runner consumes.

pub mod cli;
pub mod config;
pub mod http;
pub mod media;
pub mod paths;
pub mod playlists;
pub mod script;
pub mod selection;
pub mod sync;
