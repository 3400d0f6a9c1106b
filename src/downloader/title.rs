// Title lookup and filename sanitizing

use async_trait::async_trait;
use regex::Regex;
use std::path::PathBuf;
use time::OffsetDateTime;
use tracing::debug;

use super::errors::DownloadError;
use super::traits::TitleResolver;
use super::utils::run_output_with_timeout;

/// Max byte length of a sanitized name (room left for the extension)
pub const MAX_NAME_BYTES: usize = 200;

const RESERVED_NAMES: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

lazy_static::lazy_static! {
    static ref DANGEROUS_RE: Regex = Regex::new(r#"[<>:"/\\|?*]"#).unwrap();
    static ref CONTROL_RE: Regex = Regex::new(r"[\x00-\x1f\x7f]").unwrap();
    static ref SPACES_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// `yt-dlp --get-title` backed resolver
pub struct YtDlpTitleResolver {
    ytdlp_path: PathBuf,
    timeout_secs: u64,
}

impl YtDlpTitleResolver {
    pub fn new(ytdlp_path: PathBuf, timeout_secs: u64) -> Self {
        Self {
            ytdlp_path,
            timeout_secs,
        }
    }

    fn build_args(url: &str) -> Vec<String> {
        vec![
            "--quiet".to_string(),
            "--get-title".to_string(),
            "--encoding".to_string(),
            "utf-8".to_string(),
            url.to_string(),
        ]
    }
}

#[async_trait]
impl TitleResolver for YtDlpTitleResolver {
    async fn resolve_title(&self, url: &str) -> Result<String, DownloadError> {
        let out =
            run_output_with_timeout(&self.ytdlp_path, &Self::build_args(url), self.timeout_secs)
                .await?;

        if !out.status.success() {
            return Err(DownloadError::ExitStatus {
                program: self.ytdlp_path.display().to_string(),
                status: out.status,
            });
        }

        // Playlists print one title per line; the first is the one we name after
        let stdout = String::from_utf8_lossy(&out.stdout);
        let title = stdout
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .ok_or_else(|| DownloadError::TitleUnavailable(url.to_string()))?;
        debug!(target: "batch", "Title from yt-dlp: {:?}", title);
        Ok(title.to_string())
    }
}

/// `video_<unix seconds>`
pub fn fallback_title() -> String {
    format!("video_{}", OffsetDateTime::now_utc().unix_timestamp())
}

/// Turn a raw title into a safe file stem. Never returns an empty string.
///
/// Non-ASCII letters are kept; only characters that are illegal in Windows
/// file names and control characters are touched.
pub fn sanitize_file_name(raw: &str) -> String {
    let name = DANGEROUS_RE.replace_all(raw, "_");
    let name = CONTROL_RE.replace_all(&name, "");
    let name = SPACES_RE.replace_all(&name, " ");
    let mut name = name.trim().to_string();

    let upper = name.to_uppercase();
    if RESERVED_NAMES
        .iter()
        .any(|r| upper == *r || upper.starts_with(&format!("{}.", r)))
    {
        name.insert(0, '_');
    }

    // Prefix first so the byte limit covers it
    let name = truncate_utf8(&name, MAX_NAME_BYTES).trim_end();
    if name.is_empty() {
        return fallback_title();
    }
    name.to_string()
}

fn truncate_utf8(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_dangerous_chars() {
        assert_eq!(sanitize_file_name(r#"a<b>c:d"e/f\g|h?i*j"#), "a_b_c_d_e_f_g_h_i_j");
    }

    #[test]
    fn test_sanitize_keeps_cyrillic_and_collapses_spaces() {
        assert_eq!(sanitize_file_name("  Привет   мир\t\n "), "Привет мир");
    }

    #[test]
    fn test_sanitize_strips_control_chars() {
        assert_eq!(sanitize_file_name("bell\u{7}tab\u{1b}"), "belltab");
    }

    #[test]
    fn test_sanitize_reserved_names() {
        assert_eq!(sanitize_file_name("con"), "_con");
        assert_eq!(sanitize_file_name("LPT1.txt"), "_LPT1.txt");
        assert_eq!(sanitize_file_name("CONSOLE"), "CONSOLE");
    }

    #[test]
    fn test_sanitize_truncates_on_char_boundary() {
        let long = "я".repeat(150); // 300 bytes
        let out = sanitize_file_name(&long);
        assert!(out.len() <= MAX_NAME_BYTES);
        assert_eq!(out, "я".repeat(100));
    }

    #[test]
    fn test_sanitize_reserved_prefix_stays_within_limit() {
        let out = sanitize_file_name(&format!("CON.{}", "a".repeat(300)));
        assert_eq!(out.len(), MAX_NAME_BYTES);
        assert!(out.starts_with("_CON."));
    }

    #[test]
    fn test_sanitize_never_empty() {
        for raw in ["", "   ", "\u{1}\u{2}"] {
            let out = sanitize_file_name(raw);
            assert!(out.starts_with("video_"), "{:?} -> {:?}", raw, out);
        }
    }

    #[test]
    fn test_title_args() {
        let args = YtDlpTitleResolver::build_args("https://youtu.be/a");
        assert_eq!(args, ["--quiet", "--get-title", "--encoding", "utf-8", "https://youtu.be/a"]);
    }
}
