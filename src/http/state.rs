use std::sync::Arc;

use crate::config::Config;
use crate::playlists::PlaylistSource;

/// Shared application state injected into all route handlers via axum::extract::State.
/// Both fields are immutable after startup; handlers only read through them.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub playlists: Arc<dyn PlaylistSource>,
}
