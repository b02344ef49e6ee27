//! Source-list file handling.
//!
//! The source list is a line-oriented text file: blank lines and `#` comments
//! are ignored, and only the first comma-delimited field of each remaining
//! line is the URL (any suffix after a comma is an operator annotation).
//! List order defines processing order.

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Read the source list. A missing file is an error: the run aborts before
/// any URL is processed.
pub fn read_sources(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Source list not found: {}", path.display()))?;
    Ok(parse_sources(&content))
}

/// Parse source-list text into URLs, in listed order.
pub fn parse_sources(content: &str) -> Vec<String> {
    let mut urls = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let url = line.split(',').next().unwrap_or(line).trim();
        if !url.is_empty() {
            urls.push(url.to_string());
        }
    }
    urls
}

/// Overwrite the source list with the given URLs, one per line.
pub fn write_sources(path: &Path, urls: &[String]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let lines: Vec<&str> = urls
        .iter()
        .map(|u| u.trim())
        .filter(|u| !u.is_empty())
        .collect();
    let mut content = lines.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write source list: {}", path.display()))
}

/// Append a URL to the source list, preserving existing lines (comments
/// included). Creates the file when absent.
pub fn add_source(path: &Path, url: &str) -> Result<()> {
    let url = url.trim();
    if url.is_empty() {
        bail!("URL must not be empty");
    }
    let mut content = std::fs::read_to_string(path).unwrap_or_default();
    if parse_sources(&content).iter().any(|u| u == url) {
        bail!("URL already listed: {}", url);
    }
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(url);
    content.push('\n');
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write source list: {}", path.display()))
}

/// Remove a URL from the source list. Lines whose first field does not match
/// (comments and blanks included) are kept as-is.
pub fn remove_source(path: &Path, url: &str) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Source list not found: {}", path.display()))?;
    let url = url.trim();

    let mut found = false;
    let kept: Vec<&str> = content
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return true;
            }
            let field = trimmed.split(',').next().unwrap_or(trimmed).trim();
            if field == url {
                found = true;
                false
            } else {
                true
            }
        })
        .collect();

    if !found {
        bail!("URL not listed: {}", url);
    }

    let mut out = kept.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    std::fs::write(path, out)
        .with_context(|| format!("Failed to write source list: {}", path.display()))
}
