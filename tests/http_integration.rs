mod common;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use common::FakePlaylists;
use dapsync::cli::Args;
use dapsync::config::Config;
use dapsync::http::{build_router, state::AppState};
use dapsync::playlists::PlaylistSource;

struct Fixture {
    dir: TempDir,
    config: Arc<Config>,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let music = root.join("music");
        let books = root.join("audiobooks");
        write_file(&music.join("Artist1/Album1/01.mp3"), 1024);
        write_file(&music.join("Artist1/Album2/01.mp3"), 512);
        write_file(&music.join("Beatles - Abbey Road/01.flac"), 512);
        write_file(&books.join("Book1.m4b"), 2048);
        fs::write(root.join("template.sh"), "SEL={{SYNC_SELECTION_FILE}}\n").unwrap();

        let args = Args {
            music_source: Some(music.display().to_string()),
            audiobooks_source: Some(books.display().to_string()),
            music_directory: Some("/host/music/".into()),
            audiobooks_directory: Some("/host/books/".into()),
            selection_file: Some(root.join("data/sync_selection.txt")),
            playlists_dir: Some(root.join("data/Playlists")),
            script_template: Some(root.join("template.sh")),
            script_output: Some(root.join("data/dap_sync.sh")),
            device_size: Some(1),
            ..Args::default()
        };
        let config = Arc::new(Config::resolve(None, &args));
        Self { dir, config }
    }

    fn app(&self, playlists: impl PlaylistSource + 'static) -> axum::Router {
        build_router(AppState {
            config: Arc::clone(&self.config),
            playlists: Arc::new(playlists),
        })
    }

    fn data(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join("data").join(name)
    }
}

fn write_file(path: &Path, len: usize) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, vec![0u8; len]).unwrap();
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ── GET /api/albums ───────────────────────────────────────────────────────────

#[tokio::test]
async fn albums_lists_catalog_and_sizes() {
    let fx = Fixture::new();
    let response = fx.app(FakePlaylists::unconfigured()).oneshot(get("/api/albums")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(
        body["albums"],
        json!(["Artist1/Album1", "Artist1/Album2", "Beatles - Abbey Road"])
    );
    assert_eq!(body["albums_by_artist"]["Beatles"][0]["name"], "Abbey Road");
    assert_eq!(body["albums_by_artist"]["Artist1"][0]["size_formatted"], "1.0 KB");
    assert_eq!(body["audiobooks"][0]["path"], "Book1.m4b");
    assert_eq!(body["total_size"], 2048);
    assert_eq!(body["total_size_formatted"], "2.0 KB");
    assert_eq!(body["audiobooks_total_size"], 2048);
    assert_eq!(body["device_size_gb"], 1);
    assert_eq!(body["device_size_bytes"], 1_073_741_824u64);
    assert_eq!(body["device_size_formatted"], "1.0 GB");
    assert_eq!(body["subsonic_configured"], false);
    assert_eq!(body["selection"]["music"]["mode"], "all");
}

#[tokio::test]
async fn albums_reports_configured_playlist_source() {
    let fx = Fixture::new();
    let response = fx
        .app(FakePlaylists::with(vec![]))
        .oneshot(get("/api/albums"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["subsonic_configured"], true);
}

// ── /api/selection ────────────────────────────────────────────────────────────

#[tokio::test]
async fn selection_defaults_when_nothing_saved() {
    let fx = Fixture::new();
    let response = fx.app(FakePlaylists::unconfigured()).oneshot(get("/api/selection")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "music": {"mode": "all", "albums": []},
            "audiobooks": {"mode": "all", "items": []},
            "playlists": {"ids": []}
        })
    );
}

#[tokio::test]
async fn saving_writes_selection_playlists_and_script() {
    let fx = Fixture::new();
    let source = FakePlaylists::with(vec![("p1", "Road Trip", vec!["A/B/01.mp3"])]);
    let app = fx.app(source);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/selection",
            json!({
                "music_mode": "selected",
                "music_albums": ["Artist1/Album1"],
                "audiobooks_mode": "all",
                "audiobooks": [],
                "playlist_ids": ["p1"]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], true);

    let selection = fs::read_to_string(fx.data("sync_selection.txt")).unwrap();
    assert_eq!(
        selection,
        "MUSIC_ALBUM=/host/music/Artist1/Album1\nALL_AUDIOBOOKS=true\nPLAYLIST_ID=p1\n"
    );
    let playlist = fs::read_to_string(fx.data("Playlists/Road Trip.m3u8")).unwrap();
    assert_eq!(playlist, "/<HDD0>/music/A/B/01.mp3\n");
    let script = fs::read_to_string(fx.data("dap_sync.sh")).unwrap();
    assert_eq!(
        script,
        format!("SEL={}\n", fx.data("sync_selection.txt").display())
    );

    let response = app.oneshot(get("/api/selection")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["music"]["mode"], "selected");
    assert_eq!(body["music"]["albums"], json!(["Artist1/Album1"]));
    assert_eq!(body["playlists"]["ids"], json!(["p1"]));
}

#[tokio::test]
async fn saving_accepts_legacy_field_names() {
    let fx = Fixture::new();
    let response = fx
        .app(FakePlaylists::unconfigured())
        .oneshot(post_json(
            "/api/selection",
            json!({"mode": "selected", "albums": ["Beatles - Abbey Road"]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let selection = fs::read_to_string(fx.data("sync_selection.txt")).unwrap();
    assert_eq!(
        selection,
        "MUSIC_ALBUM=/host/music/Beatles - Abbey Road\nALL_AUDIOBOOKS=true\n"
    );
}

#[tokio::test]
async fn saving_treats_null_modes_as_all() {
    let fx = Fixture::new();
    let response = fx
        .app(FakePlaylists::unconfigured())
        .oneshot(post_json(
            "/api/selection",
            json!({
                "music_mode": null,
                "music_albums": ["Artist1/Album1"],
                "audiobooks_mode": null,
                "playlist_mode": null
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let selection = fs::read_to_string(fx.data("sync_selection.txt")).unwrap();
    assert_eq!(selection, "ALL_MUSIC=true\nALL_AUDIOBOOKS=true\n");
}

#[tokio::test]
async fn saving_drops_entries_with_line_breaks() {
    let fx = Fixture::new();
    let response = fx
        .app(FakePlaylists::unconfigured())
        .oneshot(post_json(
            "/api/selection",
            json!({
                "music_mode": "selected",
                "music_albums": ["Artist1/Album1\nALL_MUSIC=true", "Artist1/Album2"]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let selection = fs::read_to_string(fx.data("sync_selection.txt")).unwrap();
    assert_eq!(
        selection,
        "MUSIC_ALBUM=/host/music/Artist1/Album2\nALL_AUDIOBOOKS=true\n"
    );
}

#[tokio::test]
async fn saving_succeeds_without_template() {
    let fx = Fixture::new();
    fs::remove_file(fx.dir.path().join("template.sh")).unwrap();

    let response = fx
        .app(FakePlaylists::unconfigured())
        .oneshot(post_json("/api/selection", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(fx.data("sync_selection.txt").is_file());
    assert!(!fx.data("dap_sync.sh").exists());
}

#[tokio::test]
async fn failed_write_is_reported() {
    let fx = Fixture::new();
    // a file where the data directory should be
    fs::write(fx.dir.path().join("data"), "").unwrap();

    let response = fx
        .app(FakePlaylists::unconfigured())
        .oneshot(post_json("/api/selection", json!({"music_mode": "all"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["success"], false);
}

// ── GET /api/playlists ────────────────────────────────────────────────────────

#[tokio::test]
async fn playlists_unavailable_is_503() {
    let fx = Fixture::new();
    let response = fx.app(FakePlaylists::unconfigured()).oneshot(get("/api/playlists")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn playlists_configured_but_empty_is_200() {
    let fx = Fixture::new();
    let response = fx.app(FakePlaylists::with(vec![])).oneshot(get("/api/playlists")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"playlists": []}));
}

#[tokio::test]
async fn playlists_are_listed() {
    let fx = Fixture::new();
    let source = FakePlaylists::with(vec![("p1", "Road Trip", vec!["a.mp3", "b.mp3"])]);
    let response = fx.app(source).oneshot(get("/api/playlists")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["playlists"][0]["id"], "p1");
    assert_eq!(body["playlists"][0]["name"], "Road Trip");
    assert_eq!(body["playlists"][0]["songCount"], 2);
}
