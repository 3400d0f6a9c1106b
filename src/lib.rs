// ytfetch - batch audio/video downloads through a managed yt-dlp binary

pub mod cli;
pub mod config;
pub mod downloader;
pub mod logging;

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use cli::Cli;
use config::AppConfig;
use downloader::history::{BellSignal, JsonHistory};
use downloader::invoker::YtDlpInvoker;
use downloader::links::{ensure_links_file, is_valid_url, read_links};
use downloader::subtitles::{log_subtitles, SubtitleLister};
use downloader::title::YtDlpTitleResolver;
use downloader::{
    BatchSequencer, BatchSummary, ContentKind, OptionResolver, PlatformBinary, QualityCatalog,
    ResolvedOptions, ToolVersionReconciler,
};

/// Whole program after argument parsing
pub async fn run(cli: Cli) -> Result<()> {
    logging::init_tracing(cli.debug);
    let config = AppConfig::load(cli.config.as_deref())?;

    if cli.list_qualities {
        for line in QualityCatalog::menu_lines() {
            println!("{}", line);
        }
        return Ok(());
    }

    let ytdlp_path = PlatformBinary::current().executable_path(&config.tool_dir);
    if cli.check_updates(&config) || !ytdlp_path.exists() {
        ToolVersionReconciler::with_defaults(&config.tool_dir)
            .reconcile()
            .await;
    } else {
        info!(target: "tool_update", "Skipping yt-dlp update check");
    }

    if let Some(url) = &cli.list_subs {
        list_subtitles(&ytdlp_path, url, config.title_timeout_secs).await;
        return Ok(());
    }

    let options = OptionResolver::resolve(&cli.selection(&config));

    let urls = if cli.urls.is_empty() {
        let links_file = cli.links_file(&config);
        if ensure_links_file(&links_file)
            .with_context(|| format!("Failed to create {}", links_file.display()))?
        {
            return Ok(());
        }
        read_links(&links_file)
            .with_context(|| format!("Failed to read {}", links_file.display()))?
    } else {
        let (valid, invalid): (Vec<String>, Vec<String>) =
            cli.urls.iter().cloned().partition(|u| is_valid_url(u.trim()));
        for url in &invalid {
            warn!(target: "batch", "Not a URL, skipped: {}", url);
        }
        valid
    };

    if urls.is_empty() {
        warn!(target: "batch", "No URLs to download");
        return Ok(());
    }

    if previews_subtitles(&cli, &options) {
        list_subtitles(&ytdlp_path, &urls[0], config.title_timeout_secs).await;
    }

    let mut sequencer = BatchSequencer::new(
        ytdlp_path.clone(),
        Box::new(YtDlpTitleResolver::new(ytdlp_path, config.title_timeout_secs)),
        Box::new(YtDlpInvoker::new()),
    )
    .with_pause(Duration::from_secs(config.pause_between_secs));
    if config.bell {
        sequencer.add_observer(Box::new(BellSignal));
    }
    sequencer.add_observer(Box::new(JsonHistory::new(config.history_file.clone())));

    let summary: BatchSummary = sequencer.run(&urls, &options).await;
    if summary.downloaded < summary.attempted {
        warn!(
            target: "batch",
            "{} of {} item(s) did not download",
            summary.attempted - summary.downloaded,
            summary.attempted
        );
    }
    Ok(())
}

/// Single `--url` video runs with subtitles list the available tracks first.
/// Links-file batches never do, even with one line.
fn previews_subtitles(cli: &Cli, options: &ResolvedOptions) -> bool {
    cli.urls.len() == 1
        && options.content_kind() == ContentKind::Video
        && options.subtitles().enabled
}

async fn list_subtitles(ytdlp_path: &Path, url: &str, timeout_secs: u64) {
    info!(target: "subtitles", "Checking available subtitles for {}", url);
    match SubtitleLister::new(ytdlp_path.to_path_buf(), timeout_secs)
        .list(url)
        .await
    {
        Ok(subs) => log_subtitles(&subs),
        Err(e) => warn!(target: "subtitles", "Could not list subtitles: {}", e),
    }
}
