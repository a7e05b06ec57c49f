use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SETTINGS_ENV: &str = "SETBOX_SETTINGS";
const DEFAULT_SETTINGS_FILE: &str = "setbox-settings.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    #[serde(default = "default_version")]
    version: u32,

    #[serde(default = "default_highscore_file")]
    pub highscore_file: PathBuf,

    /// JSON endpoint of the shared sheet. No sync when unset.
    #[serde(default)]
    pub remote_url: Option<String>,

    #[serde(default = "default_remote_timeout_secs")]
    pub remote_timeout_secs: u64,

    /// How often the host should redraw a running timer.
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
}

fn default_version() -> u32 {
    1
}
fn default_highscore_file() -> PathBuf {
    PathBuf::from("highscores.json")
}
fn default_remote_timeout_secs() -> u64 {
    10
}
fn default_refresh_interval_ms() -> u64 {
    100
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: default_version(),
            highscore_file: default_highscore_file(),
            remote_url: None,
            remote_timeout_secs: default_remote_timeout_secs(),
            refresh_interval_ms: default_refresh_interval_ms(),
        }
    }
}

impl Settings {
    /// Reads the settings file (writing defaults if there is none), then
    /// applies environment overrides.
    pub fn load() -> Self {
        let mut settings = Self::load_from(&Self::settings_path());
        settings.apply_env();
        settings
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Settings>(&contents) {
                Ok(mut settings) => {
                    settings.migrate();
                    return settings;
                }
                Err(err) => warn!(target: "settings", "ignoring {}: {}", path.display(), err),
            },
            Err(err) => debug!(target: "settings", "no settings at {}: {}", path.display(), err),
        }
        let default = Settings::default();
        if !path.exists() {
            if let Err(err) = default.save_to(path) {
                debug!(target: "settings", "could not write defaults: {}", err);
            }
        }
        default
    }

    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    fn settings_path() -> PathBuf {
        std::env::var(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SETTINGS_FILE))
    }

    fn apply_env(&mut self) {
        if let Ok(path) = std::env::var("SETBOX_HIGHSCORE_FILE") {
            self.highscore_file = PathBuf::from(path);
        }
        if let Ok(url) = std::env::var("SETBOX_REMOTE_URL") {
            self.remote_url = Some(url).filter(|u| !u.trim().is_empty());
        }
        if let Some(secs) = std::env::var("SETBOX_REMOTE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.remote_timeout_secs = secs;
        }
    }

    fn migrate(&mut self) {
        match self.version {
            0 => {
                self.version = 1;
            }
            _ => (),
        }
    }

    pub fn is_debug_mode() -> bool {
        std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }
}
