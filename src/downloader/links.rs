// Links file: one URL per line, `#` or `//` comments

use std::fs;
use std::io;
use std::path::Path;
use tracing::{info, warn};

pub const LINKS_TEMPLATE: &str = "# Enter YouTube URLs here, one per line\n\
                                  # Example: https://www.youtube.com/watch?v=example\n";

/// Coarse check: known host or an http(s) scheme
pub fn is_valid_url(candidate: &str) -> bool {
    candidate.contains("youtube.com")
        || candidate.contains("youtu.be")
        || candidate.starts_with("http://")
        || candidate.starts_with("https://")
}

/// Candidate URLs in file order. Blank and comment lines are skipped; lines
/// failing the coarse URL check are logged and dropped.
pub fn parse_links(content: &str) -> Vec<String> {
    let mut urls = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }
        if !is_valid_url(line) {
            warn!(target: "batch", "Line {}: not a URL, skipped: {}", lineno + 1, line);
            continue;
        }
        urls.push(line.to_string());
    }
    urls
}

/// Create the links file with a commented template if it does not exist.
/// Returns true when a new file was written.
pub fn ensure_links_file(path: &Path) -> io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, LINKS_TEMPLATE)?;
    info!("Created {} - add one URL per line", path.display());
    Ok(true)
}

pub fn read_links(path: &Path) -> io::Result<Vec<String>> {
    Ok(parse_links(&fs::read_to_string(path)?))
}
