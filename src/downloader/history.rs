// Post-download observers: terminal bell and JSON download history

use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, warn};

use super::models::DownloadRequest;
use super::traits::DownloadObserver;

/// Rings the terminal bell after each finished download
#[derive(Debug, Default, Clone, Copy)]
pub struct BellSignal;

impl DownloadObserver for BellSignal {
    fn on_downloaded(&self, _request: &DownloadRequest) {
        let mut out = io::stdout();
        if let Err(e) = out.write_all(b"\x07").and_then(|_| out.flush()) {
            debug!("Bell failed: {}", e);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: String,
    pub file_name: String,
    pub download_time: String,
}

/// Appends one entry per finished download to a JSON array file
#[derive(Debug, Clone)]
pub struct JsonHistory {
    path: PathBuf,
}

impl JsonHistory {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file reads as empty history
    pub fn load(&self) -> io::Result<Vec<HistoryEntry>> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        serde_json::from_slice(&data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn append(&self, entry: HistoryEntry) -> io::Result<()> {
        let mut history = self.load()?;
        history.push(entry);
        let data = serde_json::to_vec_pretty(&history)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, data)
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| OffsetDateTime::now_utc().unix_timestamp().to_string())
}

impl DownloadObserver for JsonHistory {
    fn on_downloaded(&self, request: &DownloadRequest) {
        let entry = HistoryEntry {
            url: request.source_url().to_string(),
            file_name: request.expected_file_name(),
            download_time: now_rfc3339(),
        };
        // An unreadable history file is left alone rather than overwritten
        if let Err(e) = self.append(entry) {
            warn!("Failed to save download history to {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::models::ContentKind;
    use crate::downloader::options::{OptionResolver, UserSelection};

    fn request(url: &str, name: &str) -> DownloadRequest {
        OptionResolver::resolve(&UserSelection {
            content_kind: ContentKind::Audio,
            ..Default::default()
        })
        .request_for(url, name)
    }

    #[test]
    fn test_history_appends_entries() {
        let dir = tempfile::tempdir().unwrap();
        let history = JsonHistory::new(dir.path().join("download_history.json"));

        history.on_downloaded(&request("https://youtu.be/a", "First"));
        history.on_downloaded(&request("https://youtu.be/b", "Second"));

        let entries = history.load().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].url, "https://youtu.be/a");
        assert_eq!(entries[1].file_name, "Second.mp3");
        assert!(OffsetDateTime::parse(&entries[0].download_time, &Rfc3339).is_ok());
    }

    #[test]
    fn test_missing_history_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let history = JsonHistory::new(dir.path().join("none.json"));
        assert!(history.load().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_history_is_not_clobbered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("download_history.json");
        std::fs::write(&path, "not json").unwrap();
        let history = JsonHistory::new(path.clone());

        history.on_downloaded(&request("https://youtu.be/a", "x"));

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");
    }

    #[test]
    fn test_history_file_layout() {
        let entry = HistoryEntry {
            url: "u".into(),
            file_name: "f.mp4".into(),
            download_time: "2024-01-01T00:00:00Z".into(),
        };
        let json = serde_json::to_value(vec![entry]).unwrap();
        assert_eq!(json[0]["file_name"], "f.mp4");
        assert_eq!(json[0]["download_time"], "2024-01-01T00:00:00Z");
    }
}
