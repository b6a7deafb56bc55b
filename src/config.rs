use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::paths::{normalize_path, LibraryRoots, PathRoots};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DEVICE_SIZE_GB: u64 = 160;
const DEFAULT_MUSIC_SOURCE: &str = "/music";
const DEFAULT_AUDIOBOOKS_SOURCE: &str = "/audiobooks";
const DEFAULT_MUSIC_DESTINATION: &str = "/sync/music/";
const DEFAULT_AUDIOBOOKS_DESTINATION: &str = "/sync/audiobooks/";
const DEFAULT_PLAYLIST_DESTINATION: &str = "/Playlists/";
const DEFAULT_SELECTION_FILE: &str = "/data/sync_selection.txt";
const DEFAULT_PLAYLISTS_DIR: &str = "/data/Playlists";
const DEFAULT_SCRIPT_TEMPLATE: &str = "dap_sync.sh";
const DEFAULT_SCRIPT_OUTPUT: &str = "/data/dap_sync.sh";
const DEFAULT_NAVIDROME_DB: &str = "/data/navidrome.db";
const DEFAULT_PLAYLIST_PATH_PREFIX: &str = "/<HDD0>/music/";

/// Optional TOML config file. Keys mirror the long CLI flags.
#[derive(Deserialize, Default, Debug)]
pub struct FileConfig {
    pub port: Option<u16>,
    pub localhost: Option<bool>,
    pub music_source: Option<String>,
    pub audiobooks_source: Option<String>,
    pub music_directory: Option<String>,
    pub audiobooks_directory: Option<String>,
    pub music_destination: Option<String>,
    pub audiobooks_destination: Option<String>,
    pub playlist_destination: Option<String>,
    pub selection_file: Option<PathBuf>,
    pub host_selection_file: Option<String>,
    pub playlists_dir: Option<PathBuf>,
    pub host_playlists_dir: Option<String>,
    pub script_template: Option<PathBuf>,
    pub script_output: Option<PathBuf>,
    pub device_size: Option<u64>,
    pub navidrome_db: Option<PathBuf>,
    pub playlist_path_prefix: Option<String>,
}

/// Resolved configuration. Built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub localhost: bool,
    pub roots: LibraryRoots,
    pub music_destination: String,
    pub audiobooks_destination: String,
    pub playlist_destination: String,
    pub selection_file: PathBuf,
    pub host_selection_file: String,
    pub playlists_dir: PathBuf,
    pub host_playlists_dir: String,
    pub script_template: PathBuf,
    pub script_output: PathBuf,
    pub device_size_gb: u64,
    pub navidrome_db: PathBuf,
    pub playlist_path_prefix: String,
}

impl Config {
    /// CLI (and environment) wins over the config file, which wins over defaults.
    pub fn resolve(file: Option<FileConfig>, args: &crate::cli::Args) -> Self {
        let file = file.unwrap_or_default();

        let music_source = args
            .music_source
            .clone()
            .or(file.music_source)
            .unwrap_or_else(|| DEFAULT_MUSIC_SOURCE.to_string());
        let audiobooks_source = args
            .audiobooks_source
            .clone()
            .or(file.audiobooks_source)
            .unwrap_or_else(|| DEFAULT_AUDIOBOOKS_SOURCE.to_string());
        let music_directory = args
            .music_directory
            .clone()
            .or(file.music_directory)
            .unwrap_or_else(|| music_source.clone());
        let audiobooks_directory = args
            .audiobooks_directory
            .clone()
            .or(file.audiobooks_directory)
            .unwrap_or_else(|| audiobooks_source.clone());

        let selection_file = args
            .selection_file
            .clone()
            .or(file.selection_file)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SELECTION_FILE));
        let host_selection_file = normalize_path(
            &args
                .host_selection_file
                .clone()
                .or(file.host_selection_file)
                .unwrap_or_else(|| selection_file.display().to_string()),
        );
        let playlists_dir = args
            .playlists_dir
            .clone()
            .or(file.playlists_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PLAYLISTS_DIR));
        let host_playlists_dir = normalize_path(
            &args
                .host_playlists_dir
                .clone()
                .or(file.host_playlists_dir)
                .unwrap_or_else(|| playlists_dir.display().to_string()),
        );

        Config {
            port: args.port.or(file.port).unwrap_or(DEFAULT_PORT),
            localhost: args.localhost || file.localhost.unwrap_or(false),
            roots: LibraryRoots {
                music: PathRoots::new(music_source, music_directory),
                audiobooks: PathRoots::new(audiobooks_source, audiobooks_directory),
            },
            music_destination: args
                .music_destination
                .clone()
                .or(file.music_destination)
                .unwrap_or_else(|| DEFAULT_MUSIC_DESTINATION.to_string()),
            audiobooks_destination: args
                .audiobooks_destination
                .clone()
                .or(file.audiobooks_destination)
                .unwrap_or_else(|| DEFAULT_AUDIOBOOKS_DESTINATION.to_string()),
            playlist_destination: args
                .playlist_destination
                .clone()
                .or(file.playlist_destination)
                .unwrap_or_else(|| DEFAULT_PLAYLIST_DESTINATION.to_string()),
            selection_file,
            host_selection_file,
            playlists_dir,
            host_playlists_dir,
            script_template: args
                .script_template
                .clone()
                .or(file.script_template)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRIPT_TEMPLATE)),
            script_output: args
                .script_output
                .clone()
                .or(file.script_output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRIPT_OUTPUT)),
            device_size_gb: args
                .device_size
                .or(file.device_size)
                .unwrap_or(DEFAULT_DEVICE_SIZE_GB),
            navidrome_db: args
                .navidrome_db
                .clone()
                .or(file.navidrome_db)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_NAVIDROME_DB)),
            playlist_path_prefix: args
                .playlist_path_prefix
                .clone()
                .or(file.playlist_path_prefix)
                .unwrap_or_else(|| DEFAULT_PLAYLIST_PATH_PREFIX.to_string()),
        }
    }

    pub fn music_root(&self) -> &Path {
        Path::new(&self.roots.music.container)
    }

    pub fn audiobooks_root(&self) -> &Path {
        Path::new(&self.roots.audiobooks.container)
    }
}

pub fn find_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_owned());
    }
    let cwd_config = PathBuf::from("dapsync.toml");
    if cwd_config.exists() {
        return Some(cwd_config);
    }
    if let Some(config_dir) = dirs::config_dir() {
        let xdg_config = config_dir.join("dapsync").join("config.toml");
        if xdg_config.exists() {
            return Some(xdg_config);
        }
    }
    None
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: FileConfig = toml::from_str(&content)?;
    Ok(config)
}
