// Application configuration (JSON)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const APP_DIR_NAME: &str = "ytfetch";
pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the managed yt-dlp binary
    pub tool_dir: PathBuf,
    pub links_file: PathBuf,
    /// `None` = current directory
    pub output_dir: Option<PathBuf>,
    /// Quality menu choice, 1-based
    pub quality: String,
    /// Bitrate menu choice, 0-based
    pub bitrate: String,
    pub subtitle_format: String,
    pub subtitle_languages: Vec<String>,
    pub ffmpeg_location: Option<PathBuf>,
    pub pause_between_secs: u64,
    pub title_timeout_secs: u64,
    pub history_file: PathBuf,
    pub check_updates: bool,
    pub bell: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tool_dir: PathBuf::from("bin"),
            links_file: PathBuf::from("links.txt"),
            output_dir: None,
            quality: "1".to_string(),
            bitrate: "1".to_string(),
            subtitle_format: "srt".to_string(),
            subtitle_languages: vec!["ru".to_string(), "en".to_string()],
            ffmpeg_location: None,
            pause_between_secs: 2,
            title_timeout_secs: 60,
            history_file: PathBuf::from("download_history.json"),
            check_updates: true,
            bell: true,
        }
    }
}

impl AppConfig {
    /// `<config dir>/ytfetch/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load from `path` (or the default location). A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(p) => p,
            None => return Ok(Self::default()),
        };
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed config {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let config = AppConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.output_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"quality": "2", "bell": false, "output_dir": "media"}"#).unwrap();

        let config = AppConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.quality, "2");
        assert!(!config.bell);
        assert_eq!(config.output_dir(), PathBuf::from("media"));
        assert_eq!(config.tool_dir, PathBuf::from("bin"));
        assert_eq!(config.subtitle_languages, ["ru", "en"]);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ nope").unwrap();

        let err = AppConfig::load(Some(path.as_path())).unwrap_err();
        assert!(err.to_string().contains("Malformed config"));
    }
}
