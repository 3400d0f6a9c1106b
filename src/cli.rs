// Command line; flags override config values

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::downloader::models::ContentKind;
use crate::downloader::options::UserSelection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Audio,
    Video,
}

impl From<KindArg> for ContentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Audio => ContentKind::Audio,
            KindArg::Video => ContentKind::Video,
        }
    }
}

/// Batch audio/video downloader driving a managed yt-dlp binary
#[derive(Debug, Parser)]
#[command(name = "ytfetch")]
#[command(version)]
pub struct Cli {
    /// What to download
    #[arg(long, value_enum, default_value = "video")]
    pub kind: KindArg,

    /// Quality menu number (see --list-qualities); bad values fall back to 720p MP4
    #[arg(short = 'q', long = "quality")]
    pub quality: Option<String>,

    /// Audio bitrate menu number: 0=32 1=64 2=96 3=128 4=256 5=320 6=512 kbps
    #[arg(short = 'b', long = "bitrate")]
    pub bitrate: Option<String>,

    /// Download subtitles with video
    #[arg(long)]
    pub subs: bool,

    /// Subtitle format: srt, vtt or ass
    #[arg(long = "sub-format")]
    pub sub_format: Option<String>,

    /// Comma-separated subtitle languages (default ru,en)
    #[arg(long = "sub-langs")]
    pub sub_langs: Option<String>,

    /// Download every available subtitle language
    #[arg(long = "all-subs")]
    pub all_subs: bool,

    /// Output directory
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Links file, one URL per line
    #[arg(long)]
    pub links: Option<PathBuf>,

    /// Download these URLs instead of the links file
    #[arg(long = "url")]
    pub urls: Vec<String>,

    /// Directory containing ffmpeg (default: the yt-dlp tool directory)
    #[arg(long = "ffmpeg-location")]
    pub ffmpeg_location: Option<PathBuf>,

    /// Print available subtitles for URL and exit
    #[arg(long = "list-subs", value_name = "URL")]
    pub list_subs: Option<String>,

    /// Print the quality menu and exit
    #[arg(long = "list-qualities")]
    pub list_qualities: bool,

    /// Do not check for a newer yt-dlp
    #[arg(long = "skip-update")]
    pub skip_update: bool,

    /// Config file (default: <config dir>/ytfetch/config.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Debug logging (shows full yt-dlp command lines)
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Merge flags over config into raw selections
    pub fn selection(&self, config: &AppConfig) -> UserSelection {
        UserSelection {
            content_kind: self.kind.into(),
            quality_choice: self.quality.clone().unwrap_or_else(|| config.quality.clone()),
            bitrate_choice: self.bitrate.clone().unwrap_or_else(|| config.bitrate.clone()),
            subtitles_enabled: self.subs || self.all_subs,
            subtitle_format: self
                .sub_format
                .clone()
                .unwrap_or_else(|| config.subtitle_format.clone()),
            subtitle_languages: match &self.sub_langs {
                Some(langs) => vec![langs.clone()],
                None => config.subtitle_languages.clone(),
            },
            all_subtitles: self.all_subs,
            destination_folder: self.output.clone().unwrap_or_else(|| config.output_dir()),
            // ffmpeg ships next to yt-dlp unless told otherwise
            ffmpeg_location: Some(
                self.ffmpeg_location
                    .clone()
                    .or_else(|| config.ffmpeg_location.clone())
                    .unwrap_or_else(|| config.tool_dir.clone()),
            ),
        }
    }

    pub fn links_file(&self, config: &AppConfig) -> PathBuf {
        self.links.clone().unwrap_or_else(|| config.links_file.clone())
    }

    pub fn check_updates(&self, config: &AppConfig) -> bool {
        config.check_updates && !self.skip_update
    }
}
