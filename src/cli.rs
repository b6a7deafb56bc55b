use clap::Parser;
use std::path::PathBuf;

/// Every setting can also come from the environment variable named next to
/// it, which is how container deployments configure the service.
#[derive(Parser, Debug, Default, Clone)]
#[command(
    name = "dapsync",
    about = "Choose what goes onto your portable player and write the selection the sync script reads",
    long_about = None,
    version = env!("GIT_VERSION"),
)]
pub struct Args {
    /// Path to TOML config file (overrides default search: ./dapsync.toml, ~/.config/dapsync/config.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// HTTP port to listen on [default: 3000]
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Bind to localhost only (127.0.0.1) instead of all interfaces
    #[arg(long)]
    pub localhost: bool,

    /// Music library as mounted inside this service [default: /music]
    #[arg(long, env = "MUSIC_SOURCE", value_name = "DIR")]
    pub music_source: Option<String>,

    /// Audiobook library as mounted inside this service [default: /audiobooks]
    #[arg(long, env = "AUDIOBOOKS_SOURCE", value_name = "DIR")]
    pub audiobooks_source: Option<String>,

    /// Music library path on the host [default: same as --music-source]
    #[arg(long, env = "MUSIC_DIRECTORY", value_name = "DIR")]
    pub music_directory: Option<String>,

    /// Audiobook library path on the host [default: same as --audiobooks-source]
    #[arg(long, env = "AUDIOBOOKS_DIRECTORY", value_name = "DIR")]
    pub audiobooks_directory: Option<String>,

    /// Where the sync script copies music to [default: /sync/music/]
    #[arg(long, env = "MUSIC_DESTINATION", value_name = "DIR")]
    pub music_destination: Option<String>,

    /// Where the sync script copies audiobooks to [default: /sync/audiobooks/]
    #[arg(long, env = "AUDIOBOOKS_DESTINATION", value_name = "DIR")]
    pub audiobooks_destination: Option<String>,

    /// Where the sync script copies playlists to [default: /Playlists/]
    #[arg(long, env = "PLAYLIST_DESTINATION", value_name = "DIR")]
    pub playlist_destination: Option<String>,

    /// Selection file written by this service [default: /data/sync_selection.txt]
    #[arg(long, env = "SYNC_SELECTION_FILE", value_name = "FILE")]
    pub selection_file: Option<PathBuf>,

    /// Selection file path as the sync script sees it [default: same as --selection-file]
    #[arg(long, env = "HOST_SYNC_SELECTION_FILE", value_name = "FILE")]
    pub host_selection_file: Option<String>,

    /// Directory generated playlists are written to [default: /data/Playlists]
    #[arg(long, env = "PLAYLISTS_DIR", value_name = "DIR")]
    pub playlists_dir: Option<PathBuf>,

    /// Playlists directory as the sync script sees it [default: same as --playlists-dir]
    #[arg(long, env = "HOST_PLAYLISTS_DIR", value_name = "DIR")]
    pub host_playlists_dir: Option<String>,

    /// Sync script template [default: ./dap_sync.sh]
    #[arg(long, env = "DAP_SYNC_TEMPLATE", value_name = "FILE")]
    pub script_template: Option<PathBuf>,

    /// Rendered sync script [default: /data/dap_sync.sh]
    #[arg(long, env = "DAP_SYNC_OUTPUT", value_name = "FILE")]
    pub script_output: Option<PathBuf>,

    /// Device capacity in GB [default: 160]
    #[arg(long, env = "DEVICE_SIZE", value_name = "GB")]
    pub device_size: Option<u64>,

    /// Navidrome database used for playlists [default: /data/navidrome.db]
    #[arg(long, env = "NAVIDROME_DB", value_name = "FILE")]
    pub navidrome_db: Option<PathBuf>,

    /// Music library mount point on the device, prepended to playlist entries [default: /<HDD0>/music/]
    #[arg(long, env = "PLAYLIST_PATH_PREFIX", value_name = "PREFIX")]
    pub playlist_path_prefix: Option<String>,
}
