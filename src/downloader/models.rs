// Common data models for the download engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use super::errors::DownloadError;

/// What the user wants out of each URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Extract audio track only (MP3)
    Audio,
    /// Full video with optional subtitles
    #[default]
    Video,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Audio => write!(f, "audio"),
            Self::Video => write!(f, "video"),
        }
    }
}

/// One selectable quality preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityProfile {
    /// Container family (mp4, webm, any)
    pub family: &'static str,
    /// Resolution label (720p, best, ...)
    pub resolution: &'static str,
    /// Menu text
    pub description: &'static str,
    /// yt-dlp format selector, always a `/`-separated fallback chain
    pub selector: &'static str,
}

/// Subtitle container requested from yt-dlp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    #[default]
    Srt,
    Vtt,
    Ass,
}

impl SubtitleFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Vtt => "vtt",
            Self::Ass => "ass",
        }
    }

    /// Accepts a name (`vtt`) or the menu number (`2`); anything else is SRT
    pub fn parse_or_default(choice: &str) -> Self {
        match choice.trim().to_ascii_lowercase().as_str() {
            "vtt" | "2" => Self::Vtt,
            "ass" | "3" => Self::Ass,
            _ => Self::Srt,
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subtitle download settings.
///
/// `download_all` wins over `languages`: when it is set the language list is
/// never consulted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubtitleOptions {
    pub enabled: bool,
    pub format: SubtitleFormat,
    languages: Vec<String>,
    pub download_all: bool,
}

impl SubtitleOptions {
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Every language the source offers
    pub fn all_languages(format: SubtitleFormat) -> Self {
        Self {
            enabled: true,
            format,
            languages: Vec::new(),
            download_all: true,
        }
    }

    /// Explicit language list; duplicates and blanks are dropped, order kept
    pub fn with_languages<I, S>(format: SubtitleFormat, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut codes: Vec<String> = Vec::new();
        for code in languages {
            let code: String = code.as_ref().chars().filter(|c| !c.is_whitespace()).collect();
            if !code.is_empty() && !codes.contains(&code) {
                codes.push(code);
            }
        }
        Self {
            enabled: true,
            format,
            languages: codes,
            download_all: false,
        }
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }
}

/// Everything needed to fetch one URL. Built once per batch item and consumed
/// by the argument builder and the invoker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub(crate) source_url: String,
    pub(crate) output_base_name: String,
    pub(crate) destination_folder: PathBuf,
    pub(crate) content_kind: ContentKind,
    pub(crate) quality: Option<QualityProfile>,
    pub(crate) audio_bitrate_kbps: u32,
    pub(crate) subtitles: SubtitleOptions,
    pub(crate) ffmpeg_location: Option<PathBuf>,
}

impl DownloadRequest {
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn output_base_name(&self) -> &str {
        &self.output_base_name
    }

    pub fn destination_folder(&self) -> &Path {
        &self.destination_folder
    }

    pub fn content_kind(&self) -> ContentKind {
        self.content_kind
    }

    pub fn quality(&self) -> Option<&QualityProfile> {
        self.quality.as_ref()
    }

    pub fn audio_bitrate_kbps(&self) -> u32 {
        self.audio_bitrate_kbps
    }

    pub fn subtitles(&self) -> &SubtitleOptions {
        &self.subtitles
    }

    pub fn ffmpeg_location(&self) -> Option<&Path> {
        self.ffmpeg_location.as_deref()
    }

    /// File name yt-dlp is expected to produce, for reporting only
    pub fn expected_file_name(&self) -> String {
        match self.content_kind {
            ContentKind::Audio => format!("{}.mp3", self.output_base_name),
            ContentKind::Video => self.output_base_name.clone(),
        }
    }
}

/// Outcome of one yt-dlp run
#[derive(Debug)]
pub struct InvocationResult {
    pub succeeded: bool,
    pub exit_error: Option<DownloadError>,
}

impl InvocationResult {
    pub fn success() -> Self {
        Self {
            succeeded: true,
            exit_error: None,
        }
    }

    pub fn failure(error: DownloadError) -> Self {
        Self {
            succeeded: false,
            exit_error: Some(error),
        }
    }

    pub fn into_result(self) -> Result<(), DownloadError> {
        match (self.succeeded, self.exit_error) {
            (true, _) => Ok(()),
            (false, Some(err)) => Err(err),
            (false, None) => Err(DownloadError::ExecutionError(
                "yt-dlp reported failure without details".to_string(),
            )),
        }
    }
}

/// Local yt-dlp compared against the latest upstream release
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolVersionState {
    Absent,
    UpToDate(String),
    Outdated { local: String, remote: String },
}

impl ToolVersionState {
    pub fn compare(local: &str, remote: &str) -> Self {
        let (local, remote) = (local.trim(), remote.trim());
        if local == remote {
            Self::UpToDate(local.to_string())
        } else {
            Self::Outdated {
                local: local.to_string(),
                remote: remote.to_string(),
            }
        }
    }

    pub fn needs_fetch(&self) -> bool {
        !matches!(self, Self::UpToDate(_))
    }
}

/// MP3 bitrate menu: index 0..=6
pub const AUDIO_BITRATES_KBPS: [u32; 7] = [32, 64, 96, 128, 256, 320, 512];

/// Menu index 1 (64 kbps)
pub const DEFAULT_AUDIO_BITRATE_KBPS: u32 = 64;

/// Resolve a bitrate menu choice; out-of-range or non-numeric input yields 64 kbps
pub fn select_audio_bitrate(choice: &str) -> u32 {
    choice
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|idx| AUDIO_BITRATES_KBPS.get(idx).copied())
        .unwrap_or(DEFAULT_AUDIO_BITRATE_KBPS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitrate_menu() {
        assert_eq!(select_audio_bitrate("0"), 32);
        assert_eq!(select_audio_bitrate("3"), 128);
        assert_eq!(select_audio_bitrate(" 6 "), 512);
        assert_eq!(select_audio_bitrate("7"), 64);
        assert_eq!(select_audio_bitrate("abc"), 64);
        assert_eq!(select_audio_bitrate(""), 64);
    }

    #[test]
    fn test_subtitle_languages_dedup_and_trim() {
        let opts =
            SubtitleOptions::with_languages(SubtitleFormat::Vtt, ["ru", " en", "", "ru", "d e"]);
        assert_eq!(opts.languages(), ["ru", "en", "de"]);
        assert!(opts.enabled);
        assert!(!opts.download_all);
    }

    #[test]
    fn test_subtitle_format_degrades_to_srt() {
        assert_eq!(SubtitleFormat::parse_or_default("VTT"), SubtitleFormat::Vtt);
        assert_eq!(SubtitleFormat::parse_or_default("3"), SubtitleFormat::Ass);
        assert_eq!(SubtitleFormat::parse_or_default("mkv"), SubtitleFormat::Srt);
    }

    #[test]
    fn test_version_state_compare() {
        assert_eq!(
            ToolVersionState::compare("2024.08.06\n", "2024.08.06"),
            ToolVersionState::UpToDate("2024.08.06".to_string())
        );
        let outdated = ToolVersionState::compare("2024.07.01", "2024.08.06");
        assert!(outdated.needs_fetch());
        assert!(ToolVersionState::Absent.needs_fetch());
    }

    #[test]
    fn test_invocation_result_into_result() {
        assert!(InvocationResult::success().into_result().is_ok());
        let failed = InvocationResult::failure(DownloadError::Timeout(3));
        assert!(!failed.succeeded);
        assert!(matches!(failed.into_result(), Err(DownloadError::Timeout(3))));
    }
}
