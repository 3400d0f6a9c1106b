// Subtitle track discovery via `yt-dlp --list-subs`

use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

use super::errors::DownloadError;
use super::utils::run_output_with_timeout;

const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("ru", "Russian"),
    ("en", "English"),
    ("uk", "Ukrainian"),
    ("de", "Deutsch"),
    ("fr", "Français"),
    ("es", "Español"),
    ("it", "Italiano"),
    ("pt", "Português"),
    ("ja", "日本語"),
    ("ko", "한국어"),
    ("zh", "中文"),
    ("ar", "العربية"),
    ("hi", "हिन्दी"),
    ("pl", "Polski"),
    ("tr", "Türkçe"),
    ("nl", "Nederlands"),
    ("sv", "Svenska"),
    ("no", "Norsk"),
    ("da", "Dansk"),
    ("fi", "Suomi"),
    ("orig", "Original"),
];

/// One manually uploaded subtitle track
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtitleInfo {
    pub language: String,
    pub name: String,
    pub ext: String,
}

/// Display name for a language code; unknown codes are upper-cased
pub fn language_name(code: &str) -> String {
    LANGUAGE_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| code.to_uppercase())
}

/// Parse the "Available subtitles" section of `--list-subs` output.
/// Automatic captions are ignored.
pub fn parse_subtitles_list(output: &str) -> Vec<SubtitleInfo> {
    let mut subtitles = Vec::new();
    let mut in_section = false;

    for line in output.lines().map(str::trim) {
        if line.contains("Available subtitles") {
            in_section = true;
            continue;
        }
        if line.contains("Available automatic captions") {
            in_section = false;
            continue;
        }
        if !in_section || line.is_empty() || line.starts_with('[') || line.starts_with("Language ")
        {
            continue;
        }

        // "ru vtt" or "ru  Russian  vtt, ttml, srv3": first listed format wins
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            continue;
        }
        let ext = parts[1..]
            .iter()
            .find(|p| p.ends_with(','))
            .or_else(|| parts.last())
            .map(|p| p.trim_end_matches(','))
            .unwrap_or_default();
        subtitles.push(SubtitleInfo {
            language: parts[0].to_string(),
            name: language_name(parts[0]),
            ext: ext.to_string(),
        });
    }
    subtitles
}

pub struct SubtitleLister {
    ytdlp_path: PathBuf,
    timeout_secs: u64,
}

impl SubtitleLister {
    pub fn new(ytdlp_path: PathBuf, timeout_secs: u64) -> Self {
        Self {
            ytdlp_path,
            timeout_secs,
        }
    }

    pub async fn list(&self, url: &str) -> Result<Vec<SubtitleInfo>, DownloadError> {
        let args = vec![
            "--list-subs".to_string(),
            "--no-warnings".to_string(),
            url.to_string(),
        ];
        let out = run_output_with_timeout(&self.ytdlp_path, &args, self.timeout_secs).await?;
        if !out.status.success() {
            return Err(DownloadError::ExitStatus {
                program: self.ytdlp_path.display().to_string(),
                status: out.status,
            });
        }

        let subtitles = parse_subtitles_list(&String::from_utf8_lossy(&out.stdout));
        debug!(target: "subtitles", "{} subtitle track(s) for {}", subtitles.len(), url);
        Ok(subtitles)
    }
}

/// Print the track list the way the batch log reads
pub fn log_subtitles(subtitles: &[SubtitleInfo]) {
    if subtitles.is_empty() {
        info!(target: "subtitles", "No subtitles available for this video");
        return;
    }
    info!(target: "subtitles", "Available subtitles:");
    for (i, sub) in subtitles.iter().enumerate() {
        info!(target: "subtitles", "  {}. {} ({}) - {}", i + 1, sub.name, sub.language, sub.ext);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_SUBS_OUTPUT: &str = "\
[youtube] Extracting URL: https://www.youtube.com/watch?v=abc
[info] Available automatic captions for abc:
Language Name                 Formats
af       Afrikaans            vtt, ttml, srv3
[info] Available subtitles for abc:
Language Name     Formats
en       English  vtt, ttml, srv3
ru       Russian  vtt, ttml
xx-YY    Unknown  vtt
";

    #[test]
    fn test_language_name_table_and_fallback() {
        assert_eq!(language_name("ru"), "Russian");
        assert_eq!(language_name("ja"), "日本語");
        assert_eq!(language_name("orig"), "Original");
        assert_eq!(language_name("pt-br"), "PT-BR");
    }

    #[test]
    fn test_parse_skips_automatic_captions() {
        let subs = parse_subtitles_list(LIST_SUBS_OUTPUT);
        let langs: Vec<&str> = subs.iter().map(|s| s.language.as_str()).collect();
        assert_eq!(langs, ["en", "ru", "xx-YY"]);
        assert_eq!(subs[0].name, "English");
        assert_eq!(subs[0].ext, "vtt");
        assert_eq!(subs[2].name, "XX-YY");
        assert_eq!(subs[2].ext, "vtt");
    }

    #[test]
    fn test_parse_legacy_two_column_rows() {
        let out = "Available subtitles for x:\nru vtt\nen srt\nAvailable automatic captions for x:\nde vtt\n";
        let subs = parse_subtitles_list(out);
        assert_eq!(
            subs,
            vec![
                SubtitleInfo {
                    language: "ru".into(),
                    name: "Russian".into(),
                    ext: "vtt".into()
                },
                SubtitleInfo {
                    language: "en".into(),
                    name: "English".into(),
                    ext: "srt".into()
                },
            ]
        );
    }

    #[test]
    fn test_parse_without_section_is_empty() {
        assert!(parse_subtitles_list("video has no subtitles\n").is_empty());
    }
}
