// Argument builder - DownloadRequest -> yt-dlp argv
//
// Pure and deterministic: the same request always yields the same vector,
// which is also what gets echoed to the debug log.

use super::format_selector::{upgrade_selector, QualityCatalog};
use super::models::{ContentKind, DownloadRequest, SubtitleOptions};

/// Whole-job and per-fragment retry bound
pub const STABILITY_RETRIES: u32 = 3;

/// Codec yt-dlp converts extracted audio to
pub const AUDIO_CODEC: &str = "mp3";

pub struct ArgumentBuilder;

impl ArgumentBuilder {
    /// Full argument vector, URL last
    pub fn build(req: &DownloadRequest) -> Vec<String> {
        let mut args = match req.content_kind() {
            ContentKind::Audio => Self::audio_args(req),
            ContentKind::Video => Self::video_args(req),
        };

        args.extend(Self::stability_args());
        args.push(req.source_url().to_string());
        args
    }

    /// `<folder>/<name>.%(ext)s`; yt-dlp picks the extension
    pub fn output_template(req: &DownloadRequest) -> String {
        req.destination_folder()
            .join(format!("{}.%(ext)s", req.output_base_name()))
            .to_string_lossy()
            .to_string()
    }

    fn audio_args(req: &DownloadRequest) -> Vec<String> {
        let mut args = vec![
            "-x".to_string(),
            "--audio-format".to_string(),
            AUDIO_CODEC.to_string(),
            "--audio-quality".to_string(),
            format!("{}K", req.audio_bitrate_kbps()),
            "-o".to_string(),
            Self::output_template(req),
        ];
        args.extend(Self::ffmpeg_args(req));
        args
    }

    fn video_args(req: &DownloadRequest) -> Vec<String> {
        let selector = req
            .quality()
            .map(|q| q.selector)
            .unwrap_or_else(|| QualityCatalog::default_profile().selector);

        let mut args = vec![
            "-f".to_string(),
            upgrade_selector(selector).to_string(),
            "-o".to_string(),
            Self::output_template(req),
            "--no-warnings".to_string(),
            "--console-title".to_string(),
        ];
        args.extend(Self::ffmpeg_args(req));
        args.extend(Self::subtitle_args(req.subtitles()));
        args
    }

    /// Subtitle flag group. Empty when disabled; otherwise exactly one of
    /// `--all-subs` or `--sub-langs`.
    pub fn subtitle_args(options: &SubtitleOptions) -> Vec<String> {
        if !options.enabled {
            return Vec::new();
        }

        let mut args = vec![
            "--write-subs".to_string(),
            "--sub-format".to_string(),
            options.format.as_str().to_string(),
        ];

        if options.download_all {
            args.push("--all-subs".to_string());
        } else {
            args.push("--sub-langs".to_string());
            args.push(options.languages().join(","));
        }

        args
    }

    fn ffmpeg_args(req: &DownloadRequest) -> Vec<String> {
        match req.ffmpeg_location() {
            Some(dir) => vec![
                "--ffmpeg-location".to_string(),
                dir.to_string_lossy().to_string(),
            ],
            None => Vec::new(),
        }
    }

    fn stability_args() -> Vec<String> {
        vec![
            "--retries".to_string(),
            STABILITY_RETRIES.to_string(),
            "--fragment-retries".to_string(),
            STABILITY_RETRIES.to_string(),
        ]
    }
}
