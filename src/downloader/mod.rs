// Downloader module - yt-dlp driven batch engine

pub mod args;
pub mod errors;
pub mod format_selector;
pub mod history;
pub mod invoker;
pub mod links;
pub mod models;
pub mod options;
pub mod orchestrator;
pub mod subtitles;
pub mod title;
pub mod tools;
pub mod traits;
pub mod utils;

pub use args::ArgumentBuilder;
pub use errors::{DownloadError, ToolError};
pub use format_selector::QualityCatalog;
pub use models::{
    ContentKind, DownloadRequest, InvocationResult, QualityProfile, SubtitleFormat,
    SubtitleOptions,
};
pub use options::{OptionResolver, ResolvedOptions, UserSelection};
pub use orchestrator::{BatchSequencer, BatchSummary, ItemOutcome};
pub use tools::{PlatformBinary, ReconcileOutcome, ToolVersionReconciler};
pub use traits::{DownloadObserver, ProcessInvoker, TitleResolver};
