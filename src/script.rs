//! Renders the device sync shell script from its template.

use std::path::PathBuf;

use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("sync script template not found: {0}")]
    TemplateMissing(PathBuf),
    #[error("failed to render sync script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Literal `{{TOKEN}}` substitution over a shell template. The script is only
/// written, never run.
#[derive(Debug, Clone)]
pub struct SyncScriptGenerator {
    template: PathBuf,
    output: PathBuf,
    substitutions: Vec<(&'static str, String)>,
}

impl SyncScriptGenerator {
    pub fn new(
        template: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        substitutions: Vec<(&'static str, String)>,
    ) -> Self {
        Self {
            template: template.into(),
            output: output.into(),
            substitutions,
        }
    }

    /// Generator wired with every token the shipped template uses. Paths are
    /// the host-side ones, since that is where the script runs.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.script_template.clone(),
            config.script_output.clone(),
            vec![
                ("{{SYNC_SELECTION_FILE}}", config.host_selection_file.clone()),
                ("{{PLAYLISTS_DIR}}", config.host_playlists_dir.clone()),
                ("{{MUSIC_DESTINATION}}", config.music_destination.clone()),
                ("{{AUDIOBOOKS_DESTINATION}}", config.audiobooks_destination.clone()),
                ("{{MUSIC_DIRECTORY}}", config.roots.music.host.clone()),
                ("{{AUDIOBOOKS_DIRECTORY}}", config.roots.audiobooks.host.clone()),
                ("{{PLAYLIST_DESTINATION}}", config.playlist_destination.clone()),
            ],
        )
    }

    /// Substitute `template` text. Tokens without a value are left alone.
    pub fn render(&self, template: &str) -> String {
        self.substitutions
            .iter()
            .fold(template.to_string(), |text, (token, value)| {
                text.replace(token, value)
            })
    }

    /// Render the template to the output path and mark it executable.
    pub fn generate(&self) -> Result<PathBuf, ScriptError> {
        if !self.template.is_file() {
            return Err(ScriptError::TemplateMissing(self.template.clone()));
        }
        let template = std::fs::read_to_string(&self.template).map_err(|source| ScriptError::Io {
            path: self.template.clone(),
            source,
        })?;
        let io_err = |source| ScriptError::Io {
            path: self.output.clone(),
            source,
        };

        if let Some(parent) = self.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(&self.output, self.render(&template)).map_err(io_err)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.output, std::fs::Permissions::from_mode(0o755))
                .map_err(io_err)?;
        }

        tracing::info!("Generated sync script {}", self.output.display());
        Ok(self.output.clone())
    }
}
