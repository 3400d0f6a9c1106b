// Quality catalog - the fixed menu of yt-dlp format selectors
//
// Every selector is a fallback chain (`merged/single-at-height/anything`) so
// yt-dlp always finds a satisfiable target.

use super::models::QualityProfile;

/// Single-stream 1080p MP4 selector that some sources fail to satisfy
pub const SINGLE_STREAM_1080P_MP4: &str = "best[height<=1080][ext=mp4]";
/// Single-stream 720p MP4 selector that some sources fail to satisfy
pub const SINGLE_STREAM_720P_MP4: &str = "best[height<=720][ext=mp4]";

const FALLBACK_1080P_MP4: &str =
    "bestvideo[height<=1080][ext=mp4]+bestaudio[ext=m4a]/best[height<=1080][ext=mp4]/best[height<=1080]";
const FALLBACK_720P_MP4: &str =
    "bestvideo[height<=720][ext=mp4]+bestaudio[ext=m4a]/best[height<=720][ext=mp4]/best[height<=720]";

const PROFILES: [QualityProfile; 10] = [
    QualityProfile {
        family: "mp4",
        resolution: "720p",
        description: "720p MP4 (recommended)",
        selector: FALLBACK_720P_MP4,
    },
    QualityProfile {
        family: "mp4",
        resolution: "1080p",
        description: "1080p MP4 (Full HD)",
        selector: FALLBACK_1080P_MP4,
    },
    QualityProfile {
        family: "mp4",
        resolution: "1440p",
        description: "1440p MP4 (2K)",
        selector: "bestvideo[height<=1440][ext=mp4]+bestaudio[ext=m4a]/best[height<=1440][ext=mp4]/best[height<=1440]",
    },
    QualityProfile {
        family: "mp4",
        resolution: "2160p",
        description: "2160p MP4 (4K)",
        selector: "bestvideo[height<=2160][ext=mp4]+bestaudio[ext=m4a]/best[height<=2160][ext=mp4]/best[height<=2160]",
    },
    QualityProfile {
        family: "mp4",
        resolution: "480p",
        description: "480p MP4",
        selector: "bestvideo[height<=480][ext=mp4]+bestaudio[ext=m4a]/best[height<=480][ext=mp4]/best[height<=480]",
    },
    QualityProfile {
        family: "mp4",
        resolution: "360p",
        description: "360p MP4",
        selector: "bestvideo[height<=360][ext=mp4]+bestaudio[ext=m4a]/best[height<=360][ext=mp4]/best[height<=360]",
    },
    QualityProfile {
        family: "webm",
        resolution: "720p",
        description: "720p WebM",
        selector: "bestvideo[height<=720][ext=webm]+bestaudio[ext=webm]/best[height<=720][ext=webm]/best[height<=720]",
    },
    QualityProfile {
        family: "webm",
        resolution: "1080p",
        description: "1080p WebM",
        selector: "bestvideo[height<=1080][ext=webm]+bestaudio[ext=webm]/best[height<=1080][ext=webm]/best[height<=1080]",
    },
    QualityProfile {
        family: "mp4",
        resolution: "best",
        description: "Best MP4",
        selector: "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best",
    },
    QualityProfile {
        family: "any",
        resolution: "best",
        description: "Best quality (any format)",
        selector: "bestvideo+bestaudio/best",
    },
];

/// Static, ordered quality menu
pub struct QualityCatalog;

impl QualityCatalog {
    /// All profiles; menu position N (1-based) is `profiles()[N - 1]`
    pub fn profiles() -> &'static [QualityProfile] {
        &PROFILES
    }

    pub fn default_profile() -> QualityProfile {
        PROFILES[0]
    }

    /// Resolve a 1-based menu choice. Never fails: anything that is not a
    /// valid position gives the default profile.
    pub fn select(choice: &str) -> QualityProfile {
        choice
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| PROFILES.get(idx).copied())
            .unwrap_or_else(Self::default_profile)
    }

    /// Menu lines for `--list-qualities`
    pub fn menu_lines() -> Vec<String> {
        PROFILES
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{} - {}", i + 1, p.description))
            .collect()
    }
}

/// Swap the single-stream 1080p/720p MP4 selectors for their three-tier
/// chain; every other selector passes through untouched.
pub fn upgrade_selector(selector: &str) -> &str {
    match selector {
        SINGLE_STREAM_1080P_MP4 => FALLBACK_1080P_MP4,
        SINGLE_STREAM_720P_MP4 => FALLBACK_720P_MP4,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_valid_positions() {
        for (i, profile) in QualityCatalog::profiles().iter().enumerate() {
            assert_eq!(QualityCatalog::select(&(i + 1).to_string()), *profile);
        }
        assert_eq!(QualityCatalog::select("2").resolution, "1080p");
        assert_eq!(QualityCatalog::select("10").family, "any");
    }

    #[test]
    fn test_select_invalid_degrades_to_default() {
        let default = QualityCatalog::default_profile();
        for bad in ["0", "11", "-1", "", "abc", "1.5", "99999999999999999999999"] {
            assert_eq!(QualityCatalog::select(bad), default, "choice {:?}", bad);
        }
        assert_eq!(default.resolution, "720p");
        assert_eq!(default.family, "mp4");
    }

    #[test]
    fn test_every_selector_is_a_fallback_chain() {
        for p in QualityCatalog::profiles() {
            assert!(!p.selector.is_empty());
            assert!(p.selector.contains('/'), "{} has no fallback", p.description);
            assert!(p.selector.split('/').all(|tier| !tier.is_empty()));
        }
    }

    #[test]
    fn test_upgrade_selector_rewrites_only_single_stream_presets() {
        assert_eq!(upgrade_selector(SINGLE_STREAM_1080P_MP4), FALLBACK_1080P_MP4);
        assert_eq!(upgrade_selector(SINGLE_STREAM_720P_MP4), FALLBACK_720P_MP4);
        assert_eq!(upgrade_selector("best[height<=480][ext=mp4]"), "best[height<=480][ext=mp4]");
        for p in QualityCatalog::profiles() {
            assert_eq!(upgrade_selector(p.selector), p.selector);
        }
    }

    #[test]
    fn test_menu_lines_are_one_based() {
        let lines = QualityCatalog::menu_lines();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "1 - 720p MP4 (recommended)");
    }
}
