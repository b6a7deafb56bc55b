use std::sync::Arc;

use clap::Parser;

use dapsync::playlists::{NavidromeSource, PlaylistSource};
use dapsync::{cli, config, http};

/// Resolve on the first Ctrl+C.
async fn wait_for_shutdown() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
        )
        .init();

    let args = cli::Args::parse();

    let file_config = config::find_config_file(args.config.as_deref())
        .and_then(|path| {
            match config::load_config(&path) {
                Ok(cfg) => {
                    tracing::debug!("Loaded config from {}", path.display());
                    Some(cfg)
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config file: {}", e);
                    None
                }
            }
        });

    let config = Arc::new(config::Config::resolve(file_config, &args));

    tracing::info!(
        "dapsync {} on port {}",
        env!("GIT_VERSION"),
        config.port
    );
    tracing::info!(
        "Music: {} (host {})",
        config.roots.music.container,
        config.roots.music.host
    );
    tracing::info!(
        "Audiobooks: {} (host {})",
        config.roots.audiobooks.container,
        config.roots.audiobooks.host
    );
    tracing::info!("Selection file: {}", config.selection_file.display());

    let playlists: Arc<dyn PlaylistSource> = Arc::new(NavidromeSource::new(&config.navidrome_db));
    if !playlists.is_available() {
        tracing::info!(
            "No playlist database at {}; playlists disabled",
            config.navidrome_db.display()
        );
    }

    let state = http::state::AppState {
        config: Arc::clone(&config),
        playlists,
    };
    let app = http::build_router(state);

    let addr = if config.localhost {
        format!("127.0.0.1:{}", config.port)
    } else {
        format!("0.0.0.0:{}", config.port)
    };
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            eprintln!("error: failed to bind {}: {}", addr, e);
            std::process::exit(1);
        });
    tracing::info!("Listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown())
        .await
    {
        tracing::error!("HTTP server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Goodbye.");
}
