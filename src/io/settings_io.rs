use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::model::settings::Settings;

pub const SETTINGS_FILE_NAME: &str = "todohd.toml";

/// Error type for the settings file
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Look for the settings file in `cwd`, then in `exe_dir`.
pub fn discover_settings(cwd: &Path, exe_dir: Option<&Path>) -> Option<PathBuf> {
    std::iter::once(cwd)
        .chain(exe_dir)
        .map(|dir| dir.join(SETTINGS_FILE_NAME))
        .find(|path| path.is_file())
}

pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Settings for this run. Missing file ⇒ defaults. A broken file also
/// yields defaults, plus the error for the caller to show.
pub fn load_or_default() -> (Settings, Option<SettingsError>) {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let exe = std::env::current_exe().ok();
    let exe_dir = exe.as_deref().and_then(Path::parent);

    let Some(path) = discover_settings(&cwd, exe_dir) else {
        debug!("no settings file, using defaults");
        return (Settings::default(), None);
    };
    match load_settings(&path) {
        Ok(settings) => {
            info!(path = %path.display(), "settings loaded");
            (settings, None)
        }
        Err(e) => (Settings::default(), Some(e)),
    }
}
