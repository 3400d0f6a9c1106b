// Error types for the download engine and the tool updater

use std::process::ExitStatus;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// Process could not be started at all
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Process ran but reported failure
    #[error("{program} exited with {status}")]
    ExitStatus { program: String, status: ExitStatus },

    /// Captured-output command exceeded its deadline
    #[error("Timed out after {0}s")]
    Timeout(u64),

    /// yt-dlp returned no usable title for the URL
    #[error("Title unavailable for {0}")]
    TitleUnavailable(String),

    /// Command execution failed after start (pipe, wait, join)
    #[error("Execution error: {0}")]
    ExecutionError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DownloadError {
    /// Exit code of the child, when the failure was a non-zero exit
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::ExitStatus { status, .. } => status.code(),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Release metadata or binary request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Release metadata had no usable `tag_name`
    #[error("Latest release has no tag_name")]
    MissingTag,

    /// `--version` could not be read from the local binary
    #[error("Version query failed: {0}")]
    VersionQuery(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<DownloadError> for ToolError {
    fn from(err: DownloadError) -> Self {
        Self::VersionQuery(err.to_string())
    }
}
