use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
}

/// Filesystem layout: where the source list is read from and artifacts land.
#[derive(Debug, Deserialize, Clone)]
pub struct PathsConfig {
    #[serde(default = "default_sources")]
    pub sources: PathBuf,
    #[serde(default = "default_raw_html")]
    pub raw_html: PathBuf,
    #[serde(default = "default_raw_pdf")]
    pub raw_pdf: PathBuf,
    #[serde(default = "default_normalized")]
    pub normalized: PathBuf,
    #[serde(default = "default_changelog")]
    pub changelog: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            raw_html: default_raw_html(),
            raw_pdf: default_raw_pdf(),
            normalized: default_normalized(),
            changelog: default_changelog(),
        }
    }
}

fn default_sources() -> PathBuf {
    PathBuf::from("configs/sources.csv")
}
fn default_raw_html() -> PathBuf {
    PathBuf::from("data/raw/html")
}
fn default_raw_pdf() -> PathBuf {
    PathBuf::from("data/raw/pdf")
}
fn default_normalized() -> PathBuf {
    PathBuf::from("data/normalized")
}
fn default_changelog() -> PathBuf {
    PathBuf::from("changelog.md")
}

#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    60
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; planning-etl/1.0)".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_max_tokens() -> usize {
    700
}

#[derive(Debug, Deserialize, Clone)]
pub struct OcrConfig {
    #[serde(default = "default_ocr_enabled")]
    pub enabled: bool,
    #[serde(default = "default_ocr_command")]
    pub command: String,
    /// Extracted PDF text shorter than this triggers an OCR re-pass.
    #[serde(default = "default_min_text_chars")]
    pub min_text_chars: usize,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: default_ocr_enabled(),
            command: default_ocr_command(),
            min_text_chars: default_min_text_chars(),
        }
    }
}

fn default_ocr_enabled() -> bool {
    true
}
fn default_ocr_command() -> String {
    "ocrmypdf".to_string()
}
fn default_min_text_chars() -> usize {
    400
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.chunking.max_tokens == 0 {
        anyhow::bail!("chunking.max_tokens must be > 0");
    }

    if config.ocr.min_text_chars == 0 {
        anyhow::bail!("ocr.min_text_chars must be > 0");
    }

    if config.fetch.timeout_secs == 0 {
        anyhow::bail!("fetch.timeout_secs must be > 0");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_config(Path::new("/nonexistent/petl.toml")).is_err());
    }

    #[test]
    fn empty_config_gets_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.chunking.max_tokens, 700);
        assert_eq!(config.ocr.min_text_chars, 400);
        assert_eq!(config.fetch.timeout_secs, 60);
        assert_eq!(config.paths.sources, PathBuf::from("configs/sources.csv"));
        assert_eq!(config.paths.changelog, PathBuf::from("changelog.md"));
        assert!(config.ocr.enabled);
        assert_eq!(config.ocr.command, "ocrmypdf");
    }

    #[test]
    fn partial_sections_override_defaults() {
        let config: Config = toml::from_str(
            r#"
[chunking]
max_tokens = 100

[ocr]
enabled = false
"#,
        )
        .unwrap();
        assert_eq!(config.chunking.max_tokens, 100);
        assert!(!config.ocr.enabled);
        assert_eq!(config.ocr.command, "ocrmypdf");
    }

    #[test]
    fn zero_max_tokens_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("petl.toml");
        std::fs::write(&path, "[chunking]\nmax_tokens = 0\n").unwrap();
        assert!(load_config(&path).is_err());
    }
}
