// Managed yt-dlp binary: locate, compare with the latest release, replace
//
// Runs once at startup. Every failure here is logged and swallowed; the
// batch then runs with whatever binary is on disk.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use super::errors::ToolError;
use super::models::ToolVersionState;
use super::utils::run_output_with_timeout;

pub const RELEASES_API_URL: &str = "https://api.github.com/repos/yt-dlp/yt-dlp/releases/latest";
pub const RELEASE_DOWNLOAD_BASE: &str = "https://github.com/yt-dlp/yt-dlp/releases/latest/download";

const USER_AGENT: &str = concat!("ytfetch/", env!("CARGO_PKG_VERSION"));
const VERSION_TIMEOUT_SECS: u64 = 30;

/// Per-OS binary naming
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformBinary {
    /// File name inside the tool directory
    pub executable: &'static str,
    /// Release asset to download
    pub asset: &'static str,
}

impl PlatformBinary {
    pub fn for_os(os: &str) -> Self {
        match os {
            "windows" => Self {
                executable: "yt-dlp.exe",
                asset: "yt-dlp.exe",
            },
            "macos" => Self {
                executable: "yt-dlp",
                asset: "yt-dlp_macos",
            },
            "linux" => Self {
                executable: "yt-dlp",
                asset: "yt-dlp_linux",
            },
            _ => Self {
                executable: "yt-dlp",
                asset: "yt-dlp",
            },
        }
    }

    pub fn current() -> Self {
        Self::for_os(std::env::consts::OS)
    }

    pub fn executable_path(&self, tool_dir: &Path) -> PathBuf {
        tool_dir.join(self.executable)
    }

    pub fn download_url(&self) -> String {
        format!("{}/{}", RELEASE_DOWNLOAD_BASE, self.asset)
    }
}

/// Upstream release metadata
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    async fn latest_tag(&self) -> Result<String, ToolError>;
}

/// Moves the binary from the network to disk
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BinaryFetcher: Send + Sync {
    /// Replace `dest` entirely with the content at `url`
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), ToolError>;
}

/// Reads `--version` from a local binary
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VersionProbe: Send + Sync {
    async fn local_version(&self, executable: &Path) -> Result<String, ToolError>;
}

/// What the reconciler did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Binary was missing and has been downloaded
    Installed,
    /// Local version differed from upstream and was replaced
    Updated { from: String, to: String },
    /// Local version already matches upstream
    Current(String),
    /// Upstream could not be queried; local binary kept as-is
    Unverified { local: Option<String> },
    /// Download or replace failed; whatever was on disk stays
    FetchFailed(String),
}

pub struct ToolVersionReconciler {
    executable: PathBuf,
    download_url: String,
    releases: Box<dyn ReleaseSource>,
    fetcher: Box<dyn BinaryFetcher>,
    probe: Box<dyn VersionProbe>,
}

impl ToolVersionReconciler {
    /// Platform lookup happens here, before any network call
    pub fn new(
        tool_dir: &Path,
        platform: PlatformBinary,
        releases: Box<dyn ReleaseSource>,
        fetcher: Box<dyn BinaryFetcher>,
        probe: Box<dyn VersionProbe>,
    ) -> Self {
        Self {
            executable: platform.executable_path(tool_dir),
            download_url: platform.download_url(),
            releases,
            fetcher,
            probe,
        }
    }

    /// GitHub releases + reqwest download + `--version` probe
    pub fn with_defaults(tool_dir: &Path) -> Self {
        let client = build_http_client();
        Self::new(
            tool_dir,
            PlatformBinary::current(),
            Box::new(GithubReleases::new(client.clone())),
            Box::new(HttpBinaryFetcher::new(client)),
            Box::new(CliVersionProbe),
        )
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Absent -> Fetch; Present -> local -> remote -> Match | Mismatch -> Fetch
    pub async fn reconcile(&self) -> ReconcileOutcome {
        let state = match self.current_state().await {
            Ok(state) => state,
            Err(outcome) => return outcome,
        };

        match state {
            ToolVersionState::Absent => {
                warn!(
                    target: "tool_update",
                    "{} not found, downloading latest version...",
                    self.executable.display()
                );
                match self.fetch().await {
                    Ok(()) => ReconcileOutcome::Installed,
                    Err(e) => ReconcileOutcome::FetchFailed(e.to_string()),
                }
            }
            ToolVersionState::UpToDate(version) => {
                info!(target: "tool_update", "yt-dlp is up to date: {}", version);
                ReconcileOutcome::Current(version)
            }
            ToolVersionState::Outdated { local, remote } => {
                info!(
                    target: "tool_update",
                    "New yt-dlp available: {} (current: {})",
                    remote,
                    if local.is_empty() { "unknown" } else { local.as_str() }
                );
                match self.fetch().await {
                    Ok(()) => ReconcileOutcome::Updated { from: local, to: remote },
                    Err(e) => ReconcileOutcome::FetchFailed(e.to_string()),
                }
            }
        }
    }

    /// Err carries the final outcome when upstream cannot be reached
    async fn current_state(&self) -> Result<ToolVersionState, ReconcileOutcome> {
        if !self.executable.exists() {
            return Ok(ToolVersionState::Absent);
        }

        let local = match self.probe.local_version(&self.executable).await {
            Ok(v) => Some(v.trim().to_string()),
            Err(e) => {
                warn!(target: "tool_update", "Could not read local yt-dlp version: {}", e);
                None
            }
        };

        match self.releases.latest_tag().await {
            Ok(remote) => Ok(ToolVersionState::compare(
                local.as_deref().unwrap_or_default(),
                &remote,
            )),
            Err(e) => {
                warn!(target: "tool_update", "Could not check latest yt-dlp release: {}", e);
                Err(ReconcileOutcome::Unverified { local })
            }
        }
    }

    async fn fetch(&self) -> Result<(), ToolError> {
        info!(target: "tool_update", "Downloading {}", self.download_url);
        match self.fetcher.fetch(&self.download_url, &self.executable).await {
            Ok(()) => {
                info!(target: "tool_update", "yt-dlp saved to {}", self.executable.display());
                Ok(())
            }
            Err(e) => {
                warn!(target: "tool_update", "yt-dlp download failed: {}", e);
                Err(e)
            }
        }
    }
}

fn build_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(15))
        .build()
        .unwrap_or_else(|e| {
            warn!(target: "tool_update", "Falling back to default HTTP client: {}", e);
            reqwest::Client::new()
        })
}

#[derive(Debug, Deserialize)]
struct ReleaseInfo {
    tag_name: Option<String>,
}

/// `releases/latest` on the GitHub API
pub struct GithubReleases {
    client: reqwest::Client,
    url: String,
}

impl GithubReleases {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            url: RELEASES_API_URL.to_string(),
        }
    }
}

#[async_trait]
impl ReleaseSource for GithubReleases {
    async fn latest_tag(&self) -> Result<String, ToolError> {
        let info: ReleaseInfo = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .timeout(Duration::from_secs(15))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_tag(info)
    }
}

fn parse_tag(info: ReleaseInfo) -> Result<String, ToolError> {
    info.tag_name
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(ToolError::MissingTag)
}

/// Whole-file download with atomic replace
pub struct HttpBinaryFetcher {
    client: reqwest::Client,
}

impl HttpBinaryFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BinaryFetcher for HttpBinaryFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), ToolError> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        install_binary(&bytes, dest).await?;
        Ok(())
    }
}

/// Write to `<dest>.tmp`, mark executable, rename over `dest`
pub async fn install_binary(bytes: &[u8], dest: &Path) -> std::io::Result<()> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut temp_name = dest.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    tokio::fs::write(&temp_path, bytes).await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o755)).await?;
    }

    if let Err(e) = tokio::fs::rename(&temp_path, dest).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e);
    }
    Ok(())
}

/// `<exe> --version`
pub struct CliVersionProbe;

#[async_trait]
impl VersionProbe for CliVersionProbe {
    async fn local_version(&self, executable: &Path) -> Result<String, ToolError> {
        let out =
            run_output_with_timeout(executable, &["--version".to_string()], VERSION_TIMEOUT_SECS)
                .await?;
        if !out.status.success() {
            return Err(ToolError::VersionQuery(format!(
                "{} --version exited with {}",
                executable.display(),
                out.status
            )));
        }
        Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
    }
}
