// Seams between the batch loop and the outside world

use async_trait::async_trait;
use std::path::Path;

use super::errors::DownloadError;
use super::models::{DownloadRequest, InvocationResult};

/// Runs the external fetcher
#[async_trait]
pub trait ProcessInvoker: Send + Sync {
    /// Name of the invoker (for logging)
    fn name(&self) -> &'static str;

    /// Spawn `executable` with `args`, forward its output, wait for exit.
    /// Failures come back inside the result, never as a panic.
    async fn invoke(&self, executable: &Path, args: &[String]) -> InvocationResult;
}

/// Looks up the human title of a URL
#[async_trait]
pub trait TitleResolver: Send + Sync {
    /// Raw title as reported by the source (unsanitized)
    async fn resolve_title(&self, url: &str) -> Result<String, DownloadError>;
}

/// Post-download hooks (completion signal, history log).
///
/// Implementations swallow their own errors; the batch never sees them.
pub trait DownloadObserver: Send + Sync {
    fn on_downloaded(&self, _request: &DownloadRequest) {}

    fn on_batch_finished(&self, _attempted: usize) {}
}
