//! Filesystem-backed stores for pipeline outputs.
//!
//! Three surfaces: the normalized-record store (JSON, one file per
//! identifier, behind the [`RecordStore`] trait so a real key-value store
//! could slot in without touching pipeline logic), the raw-artifact store
//! (verbatim fetched bytes, no history), and the append-only changelog.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::ident::now_iso;
use crate::record::NormalizedRecord;

/// Keyed access to normalized records.
pub trait RecordStore {
    /// Load the record stored under `id`. Both a missing file and an
    /// unparseable one read as absent — a corrupt prior record means "no
    /// previous hash", never an error.
    fn get(&self, id: &str) -> Result<Option<NormalizedRecord>>;

    /// Write the record under `id`, overwriting any prior one.
    fn put(&self, id: &str, record: &NormalizedRecord) -> Result<()>;
}

/// One pretty-printed JSON file per identifier under a root directory.
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }
}

impl RecordStore for JsonFileStore {
    fn get(&self, id: &str) -> Result<Option<NormalizedRecord>> {
        let path = self.path_for(id);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read record: {}", path.display()))
            }
        };
        Ok(serde_json::from_str(&content).ok())
    }

    fn put(&self, id: &str, record: &NormalizedRecord) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        let path = self.path_for(id);
        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write record: {}", path.display()))
    }
}

/// Verbatim fetched bytes, keyed by identifier. Overwrites in place; the OCR
/// re-pass writes a sibling `{id}.ocr.pdf`.
pub struct RawStore {
    html_root: PathBuf,
    pdf_root: PathBuf,
}

impl RawStore {
    pub fn new(html_root: impl Into<PathBuf>, pdf_root: impl Into<PathBuf>) -> Self {
        Self {
            html_root: html_root.into(),
            pdf_root: pdf_root.into(),
        }
    }

    pub fn save_html(&self, id: &str, bytes: &[u8]) -> Result<PathBuf> {
        save_bytes(&self.html_root, &format!("{}.html", id), bytes)
    }

    pub fn save_pdf(&self, id: &str, bytes: &[u8]) -> Result<PathBuf> {
        save_bytes(&self.pdf_root, &format!("{}.pdf", id), bytes)
    }

    pub fn ocr_pdf_path(&self, id: &str) -> PathBuf {
        self.pdf_root.join(format!("{}.ocr.pdf", id))
    }
}

fn save_bytes(root: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(root)?;
    let path = root.join(name);
    std::fs::write(&path, bytes)
        .with_context(|| format!("Failed to write raw artifact: {}", path.display()))?;
    Ok(path)
}

/// Append-only log of write events, one `- {timestamp} — {message}` line per
/// event. Never rewritten or deleted by the pipeline.
pub struct Changelog {
    path: PathBuf,
}

impl Changelog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn append(&self, message: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open changelog: {}", self.path.display()))?;
        writeln!(file, "- {} — {}", now_iso(), message)?;
        Ok(())
    }

    /// Last `n` lines, for the operator view. A missing changelog is not an
    /// error.
    pub fn tail(&self, n: usize) -> Result<Vec<String>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read changelog: {}", self.path.display()))
            }
        };
        let lines: Vec<String> = content.lines().map(|l| l.to_string()).collect();
        let start = lines.len().saturating_sub(n);
        Ok(lines[start..].to_vec())
    }
}
