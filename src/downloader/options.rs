// Option resolution - raw user choices in, one immutable request per URL out

use std::path::PathBuf;

use super::format_selector::QualityCatalog;
use super::models::{
    select_audio_bitrate, ContentKind, DownloadRequest, QualityProfile, SubtitleFormat,
    SubtitleOptions,
};

/// Languages used when subtitles are on but no list was given
pub const DEFAULT_SUBTITLE_LANGUAGES: [&str; 2] = ["ru", "en"];

/// Raw selections as typed by the user (CLI flags merged over config).
/// Menu choices stay strings so bad input can degrade instead of erroring.
#[derive(Debug, Clone, Default)]
pub struct UserSelection {
    pub content_kind: ContentKind,
    pub quality_choice: String,
    pub bitrate_choice: String,
    pub subtitles_enabled: bool,
    pub subtitle_format: String,
    pub subtitle_languages: Vec<String>,
    pub all_subtitles: bool,
    pub destination_folder: PathBuf,
    pub ffmpeg_location: Option<PathBuf>,
}

/// Selections after validation. Fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    content_kind: ContentKind,
    quality: Option<QualityProfile>,
    audio_bitrate_kbps: u32,
    subtitles: SubtitleOptions,
    destination_folder: PathBuf,
    ffmpeg_location: Option<PathBuf>,
}

pub struct OptionResolver;

impl OptionResolver {
    pub fn resolve(selection: &UserSelection) -> ResolvedOptions {
        let (quality, subtitles) = match selection.content_kind {
            ContentKind::Audio => (None, SubtitleOptions::disabled()),
            ContentKind::Video => (
                Some(QualityCatalog::select(&selection.quality_choice)),
                Self::resolve_subtitles(selection),
            ),
        };

        ResolvedOptions {
            content_kind: selection.content_kind,
            quality,
            audio_bitrate_kbps: select_audio_bitrate(&selection.bitrate_choice),
            subtitles,
            destination_folder: selection.destination_folder.clone(),
            ffmpeg_location: selection.ffmpeg_location.clone(),
        }
    }

    fn resolve_subtitles(selection: &UserSelection) -> SubtitleOptions {
        if !selection.subtitles_enabled {
            return SubtitleOptions::disabled();
        }
        let format = SubtitleFormat::parse_or_default(&selection.subtitle_format);
        if selection.all_subtitles {
            return SubtitleOptions::all_languages(format);
        }

        let explicit = SubtitleOptions::with_languages(
            format,
            selection.subtitle_languages.iter().flat_map(|s| s.split(',')),
        );
        if explicit.languages().is_empty() {
            SubtitleOptions::with_languages(format, DEFAULT_SUBTITLE_LANGUAGES)
        } else {
            explicit
        }
    }
}

impl ResolvedOptions {
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

    pub fn destination_folder(&self) -> &std::path::Path {
        &self.destination_folder
    }

    /// Build the request for one batch item
    pub fn request_for(&self, url: &str, output_base_name: &str) -> DownloadRequest {
        DownloadRequest {
            source_url: url.to_string(),
            output_base_name: output_base_name.to_string(),
            destination_folder: self.destination_folder.clone(),
            content_kind: self.content_kind,
            quality: self.quality,
            audio_bitrate_kbps: self.audio_bitrate_kbps,
            subtitles: self.subtitles.clone(),
            ffmpeg_location: self.ffmpeg_location.clone(),
        }
    }

    /// One-line description for the startup log
    pub fn summary(&self) -> String {
        match self.content_kind {
            ContentKind::Audio => format!("audio MP3 @ {} kbps", self.audio_bitrate_kbps),
            ContentKind::Video => {
                let quality = self
                    .quality
                    .map(|q| q.description)
                    .unwrap_or("default");
                if !self.subtitles.enabled {
                    format!("video {}, no subtitles", quality)
                } else if self.subtitles.download_all {
                    format!(
                        "video {}, subtitles {} (all languages)",
                        quality, self.subtitles.format
                    )
                } else {
                    format!(
                        "video {}, subtitles {} [{}]",
                        quality,
                        self.subtitles.format,
                        self.subtitles.languages().join(",")
                    )
                }
            }
        }
    }
}
