pub mod api;
pub mod state;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use crate::http::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/albums", get(api::get_albums))
        .route("/api/selection", get(api::get_selection).post(api::post_selection))
        .route("/api/playlists", get(api::get_playlists))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
