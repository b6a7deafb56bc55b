use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::http::state::AppState;
use crate::playlists::PlaylistSourceError;
use crate::selection::SelectionStore;
use crate::sync::{self, SaveRequest};

// Every handler touches the filesystem or SQLite, so the work runs on the
// blocking pool.

fn join_failed(e: tokio::task::JoinError) -> Response {
    tracing::error!("Request task failed: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal error" })),
    )
        .into_response()
}

/// GET /api/albums: fresh catalog scan, stored selection and capacity figures.
pub async fn get_albums(State(state): State<AppState>) -> Response {
    let result = tokio::task::spawn_blocking(move || {
        sync::picker_payload(&state.config, state.playlists.as_ref())
    })
    .await;
    match result {
        Ok(payload) => Json(payload).into_response(),
        Err(e) => join_failed(e),
    }
}

/// GET /api/selection: the stored selection only.
pub async fn get_selection(State(state): State<AppState>) -> Response {
    let result = tokio::task::spawn_blocking(move || {
        SelectionStore::new(&state.config.selection_file, state.config.roots.clone()).read()
    })
    .await;
    match result {
        Ok(selection) => Json(selection).into_response(),
        Err(e) => join_failed(e),
    }
}

/// POST /api/selection: persist, then regenerate playlists and the sync script.
pub async fn post_selection(
    State(state): State<AppState>,
    Json(request): Json<SaveRequest>,
) -> Response {
    let result = tokio::task::spawn_blocking(move || {
        sync::save_selection(&state.config, state.playlists.as_ref(), &request)
    })
    .await;
    match result {
        Ok(Ok(outcome)) => {
            tracing::debug!(
                "Selection saved ({} playlists, script: {:?})",
                outcome.playlists.len(),
                outcome.script
            );
            Json(json!({ "success": true, "message": "Selection saved successfully" }))
                .into_response()
        }
        Ok(Err(e)) => {
            tracing::error!("Saving selection failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "message": e.to_string() })),
            )
                .into_response()
        }
        Err(e) => join_failed(e),
    }
}

/// GET /api/playlists: 503 when no playlist source is configured.
pub async fn get_playlists(State(state): State<AppState>) -> Response {
    let result = tokio::task::spawn_blocking(move || state.playlists.playlists()).await;
    match result {
        Ok(Ok(playlists)) => Json(json!({ "playlists": playlists })).into_response(),
        Ok(Err(PlaylistSourceError::NotConfigured)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": PlaylistSourceError::NotConfigured.to_string() })),
        )
            .into_response(),
        Ok(Err(e)) => {
            tracing::error!("Listing playlists failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
        Err(e) => join_failed(e),
    }
}
