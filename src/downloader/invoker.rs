// yt-dlp process invoker
//
// stdout/stderr are inherited so yt-dlp's own progress output reaches the
// terminal untouched.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command as TokioCommand;
use tracing::debug;

use super::errors::DownloadError;
use super::models::InvocationResult;
use super::traits::ProcessInvoker;
use super::utils::{display_command, PYTHON_IO_ENCODING};

#[derive(Debug, Default, Clone, Copy)]
pub struct YtDlpInvoker;

impl YtDlpInvoker {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessInvoker for YtDlpInvoker {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn invoke(&self, executable: &Path, args: &[String]) -> InvocationResult {
        let program = executable.display().to_string();
        debug!(target: "yt-dlp", "Command: {}", display_command(executable, args));

        let spawned = TokioCommand::new(executable)
            .args(args)
            .env(PYTHON_IO_ENCODING.0, PYTHON_IO_ENCODING.1)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(source) => {
                return InvocationResult::failure(DownloadError::Spawn { program, source })
            }
        };

        match child.wait().await {
            Ok(status) if status.success() => InvocationResult::success(),
            Ok(status) => InvocationResult::failure(DownloadError::ExitStatus { program, status }),
            Err(e) => InvocationResult::failure(DownloadError::Io(e)),
        }
    }
}
