// Batch sequencer - one URL at a time, failures stay with their item

use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};

use super::args::ArgumentBuilder;
use super::errors::DownloadError;
use super::options::ResolvedOptions;
use super::title::sanitize_file_name;
use super::traits::{DownloadObserver, ProcessInvoker, TitleResolver};

/// Terminal state of one batch item
#[derive(Debug)]
pub enum ItemOutcome {
    /// yt-dlp finished successfully; holds the base file name used
    Downloaded(String),
    /// Title could not be resolved; item skipped
    TitleFailed(Option<DownloadError>),
    /// yt-dlp failed or could not start
    DownloadFailed(DownloadError),
}

/// Per-run totals. `attempted` always equals the number of input URLs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub attempted: usize,
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: &ItemOutcome) {
        self.attempted += 1;
        match outcome {
            ItemOutcome::Downloaded(_) => self.downloaded += 1,
            ItemOutcome::TitleFailed(_) => self.skipped += 1,
            ItemOutcome::DownloadFailed(_) => self.failed += 1,
        }
    }
}

pub struct BatchSequencer {
    ytdlp_path: PathBuf,
    titles: Box<dyn TitleResolver>,
    invoker: Box<dyn ProcessInvoker>,
    observers: Vec<Box<dyn DownloadObserver>>,
    pause_between: Duration,
}

impl BatchSequencer {
    pub fn new(
        ytdlp_path: PathBuf,
        titles: Box<dyn TitleResolver>,
        invoker: Box<dyn ProcessInvoker>,
    ) -> Self {
        Self {
            ytdlp_path,
            titles,
            invoker,
            observers: Vec::new(),
            pause_between: Duration::ZERO,
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn DownloadObserver>) {
        self.observers.push(observer);
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause_between = pause;
        self
    }

    /// Process every URL in order. Never returns early.
    pub async fn run(&self, urls: &[String], options: &ResolvedOptions) -> BatchSummary {
        let total = urls.len();
        let mut summary = BatchSummary::default();
        info!(target: "batch", "Found {} item(s) to download ({})", total, options.summary());

        for (idx, url) in urls.iter().enumerate() {
            info!(target: "batch", "Processing {}/{}: {}", idx + 1, total, url);

            let outcome = self.process_item(url, options).await;
            match &outcome {
                ItemOutcome::Downloaded(name) => {
                    info!(target: "batch", "Downloaded {}/{}: {}", idx + 1, total, name)
                }
                ItemOutcome::TitleFailed(Some(e)) => {
                    warn!(target: "batch", "Skipping {}: failed to get title: {}", url, e)
                }
                ItemOutcome::TitleFailed(None) => {
                    warn!(target: "batch", "Skipping {}: empty title", url)
                }
                ItemOutcome::DownloadFailed(e) => {
                    error!(target: "batch", "Download failed for {}: {}", url, e)
                }
            }
            summary.record(&outcome);

            if idx + 1 < total && !self.pause_between.is_zero() {
                info!(
                    target: "batch",
                    "Pause {}s before next item...",
                    self.pause_between.as_secs()
                );
                tokio::time::sleep(self.pause_between).await;
            }
        }

        info!(
            target: "batch",
            "Batch completed! Processed: {} (downloaded {}, skipped {}, failed {})",
            summary.attempted, summary.downloaded, summary.skipped, summary.failed
        );
        for observer in &self.observers {
            observer.on_batch_finished(summary.attempted);
        }
        summary
    }

    /// Pending -> TitleResolved | TitleFailed -> Downloaded | DownloadFailed
    pub async fn process_item(&self, url: &str, options: &ResolvedOptions) -> ItemOutcome {
        let raw_title = match self.titles.resolve_title(url).await {
            Ok(title) if !title.trim().is_empty() => title,
            Ok(_) => return ItemOutcome::TitleFailed(None),
            Err(e) => return ItemOutcome::TitleFailed(Some(e)),
        };
        let base_name = sanitize_file_name(&raw_title);

        let request = options.request_for(url, &base_name);
        let args = ArgumentBuilder::build(&request);
        info!(
            target: "batch",
            "Output file: {} -> {}",
            request.expected_file_name(),
            request.destination_folder().display()
        );

        match self.invoker.invoke(&self.ytdlp_path, &args).await.into_result() {
            Ok(()) => {
                for observer in &self.observers {
                    observer.on_downloaded(&request);
                }
                ItemOutcome::Downloaded(base_name)
            }
            Err(e) => ItemOutcome::DownloadFailed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::models::{ContentKind, DownloadRequest, InvocationResult};
    use crate::downloader::options::{OptionResolver, UserSelection};
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    /// Title = last path segment; "" and "err" URLs fail
    struct FakeTitles;

    #[async_trait]
    impl TitleResolver for FakeTitles {
        async fn resolve_title(&self, url: &str) -> Result<String, DownloadError> {
            let tail = url.rsplit('/').next().unwrap_or_default();
            match tail {
                "err" => Err(DownloadError::TitleUnavailable(url.to_string())),
                "empty" => Ok("   ".to_string()),
                other => Ok(format!("Title {}", other)),
            }
        }
    }

    struct RecordingInvoker {
        calls: Arc<Mutex<Vec<Vec<String>>>>,
        fail: bool,
    }

    #[async_trait]
    impl ProcessInvoker for RecordingInvoker {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn invoke(&self, _executable: &Path, args: &[String]) -> InvocationResult {
            self.calls.lock().unwrap().push(args.to_vec());
            if self.fail {
                InvocationResult::failure(DownloadError::ExecutionError("boom".to_string()))
            } else {
                InvocationResult::success()
            }
        }
    }

    struct CountingObserver {
        downloaded: Arc<Mutex<Vec<String>>>,
        finished: Arc<Mutex<Option<usize>>>,
    }

    impl DownloadObserver for CountingObserver {
        fn on_downloaded(&self, request: &DownloadRequest) {
            self.downloaded
                .lock()
                .unwrap()
                .push(request.output_base_name().to_string());
        }

        fn on_batch_finished(&self, attempted: usize) {
            *self.finished.lock().unwrap() = Some(attempted);
        }
    }

    fn options() -> ResolvedOptions {
        OptionResolver::resolve(&UserSelection {
            content_kind: ContentKind::Video,
            destination_folder: PathBuf::from("out"),
            ..Default::default()
        })
    }

    fn sequencer(fail: bool) -> (BatchSequencer, Arc<Mutex<Vec<Vec<String>>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let invoker = RecordingInvoker {
            calls: Arc::clone(&calls),
            fail,
        };
        let seq = BatchSequencer::new(
            PathBuf::from("bin/yt-dlp"),
            Box::new(FakeTitles),
            Box::new(invoker),
        );
        (seq, calls)
    }

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_all_failures_still_attempt_every_item() {
        let (seq, calls) = sequencer(true);
        let input = urls(&["https://youtu.be/a", "https://youtu.be/b", "https://youtu.be/c"]);

        let summary = seq.run(&input, &options()).await;

        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.failed, 3);
        assert_eq!(summary.downloaded, 0);
        assert_eq!(calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_items_processed_in_order() {
        let (seq, calls) = sequencer(false);
        let input = crate::downloader::links::parse_links(
            "https://youtu.be/a\n\n# comment\nhttps://youtu.be/b\n",
        );

        let summary = seq.run(&input, &options()).await;

        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.downloaded, 2);
        let calls = calls.lock().unwrap();
        let last_args: Vec<&str> = calls.iter().map(|c| c.last().unwrap().as_str()).collect();
        assert_eq!(last_args, ["https://youtu.be/a", "https://youtu.be/b"]);
    }

    #[tokio::test]
    async fn test_title_failures_skip_without_invoking() {
        let (seq, calls) = sequencer(false);
        let input = urls(&[
            "https://youtu.be/err",
            "https://youtu.be/empty",
            "https://youtu.be/ok",
        ]);

        let summary = seq.run(&input, &options()).await;

        assert_eq!(
            summary,
            BatchSummary {
                attempted: 3,
                downloaded: 1,
                skipped: 2,
                failed: 0
            }
        );
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sanitized_title_names_output() {
        let (seq, calls) = sequencer(false);
        let outcome = seq.process_item("https://youtu.be/x:y", &options()).await;

        assert!(matches!(outcome, ItemOutcome::Downloaded(ref name) if name == "Title x_y"));
        let calls = calls.lock().unwrap();
        let out_idx = calls[0].iter().position(|a| a == "-o").unwrap();
        assert!(calls[0][out_idx + 1].ends_with("Title x_y.%(ext)s"));
    }

    #[tokio::test]
    async fn test_observers_only_see_successes() {
        let (mut seq, _calls) = sequencer(true);
        let downloaded = Arc::new(Mutex::new(Vec::new()));
        let finished = Arc::new(Mutex::new(None));
        seq.add_observer(Box::new(CountingObserver {
            downloaded: Arc::clone(&downloaded),
            finished: Arc::clone(&finished),
        }));

        seq.run(&urls(&["https://youtu.be/a", "https://youtu.be/b"]), &options())
            .await;

        assert!(downloaded.lock().unwrap().is_empty());
        assert_eq!(*finished.lock().unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_empty_batch_completes() {
        let (seq, calls) = sequencer(false);
        let summary = seq.run(&[], &options()).await;
        assert_eq!(summary, BatchSummary::default());
        assert!(calls.lock().unwrap().is_empty());
    }
}
