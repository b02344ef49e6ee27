//! Operator-facing commands.
//!
//! Thin presentation over the core file contracts: source-list editing,
//! normalized-record browsing, and changelog tailing. No pipeline semantics
//! live here.

use anyhow::Result;

use crate::config::Config;
use crate::record::NormalizedRecord;
use crate::sources;
use crate::store::{Changelog, JsonFileStore, RecordStore};

pub fn list_sources(config: &Config) -> Result<()> {
    let urls = sources::read_sources(&config.paths.sources)?;
    if urls.is_empty() {
        println!("(no sources listed)");
        return Ok(());
    }
    for url in urls {
        println!("{}", url);
    }
    Ok(())
}

pub fn add_source(config: &Config, url: &str) -> Result<()> {
    sources::add_source(&config.paths.sources, url)?;
    println!("Added: {}", url);
    Ok(())
}

pub fn remove_source(config: &Config, url: &str) -> Result<()> {
    sources::remove_source(&config.paths.sources, url)?;
    println!("Removed: {}", url);
    Ok(())
}

/// Table of normalized records on disk, sorted by filename. Unparseable
/// files are shown as parse errors, never fatal.
pub fn list_records(config: &Config) -> Result<()> {
    let dir = &config.paths.normalized;
    let mut files: Vec<_> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect(),
        Err(_) => Vec::new(),
    };
    files.sort();

    if files.is_empty() {
        println!("No normalized records yet. Add URLs and run the pipeline.");
        return Ok(());
    }

    println!(
        "{:<40} {:<12} {:>6} {:<14} SOURCE",
        "FILE", "DATE", "CHUNKS", "HASH"
    );
    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let parsed = std::fs::read_to_string(&path)
            .ok()
            .and_then(|c| serde_json::from_str::<NormalizedRecord>(&c).ok());
        match parsed {
            Some(record) => {
                let hash12: String = record.hash.unwrap_or_default().chars().take(12).collect();
                println!(
                    "{:<40} {:<12} {:>6} {:<14} {}",
                    name,
                    record.version_date,
                    record.chunks.len(),
                    hash12,
                    record.source_url
                );
            }
            None => {
                println!("{:<40} {:<12} {:>6} {:<14} (parse error)", name, "", 0, "");
            }
        }
    }
    Ok(())
}

/// Characters of first-chunk text shown in the preview.
const PREVIEW_CHARS: usize = 4000;

pub fn show_record(config: &Config, identifier: &str) -> Result<()> {
    let store = JsonFileStore::new(&config.paths.normalized);
    let record = store
        .get(identifier)?
        .ok_or_else(|| anyhow::anyhow!("record not found: {}", identifier))?;

    println!("--- Record ---");
    println!("id:           {}", record.id.as_deref().unwrap_or("(unset)"));
    println!("source_url:   {}", record.source_url);
    println!(
        "title:        {}",
        if record.title.is_empty() {
            "(untitled)"
        } else {
            record.title.as_str()
        }
    );
    println!("clause:       {}", record.clause.as_deref().unwrap_or("-"));
    println!("section:      {}", record.section.as_deref().unwrap_or("-"));
    println!("version_date: {}", record.version_date);
    println!("extracted_at: {}", record.extracted_at);
    println!("hash:         {}", record.hash.as_deref().unwrap_or("-"));
    println!();

    println!("--- Chunks ({}) ---", record.chunks.len());
    for chunk in &record.chunks {
        println!(
            "{}  ~{} tokens, {} chars",
            chunk.chunk_id.as_deref().unwrap_or("(unset)"),
            chunk.token_estimate,
            chunk.text.chars().count()
        );
    }
    println!();

    if let Some(first) = record.chunks.first() {
        println!("--- First chunk (preview) ---");
        let preview: String = first.text.chars().take(PREVIEW_CHARS).collect();
        println!("{}", preview);
    }

    Ok(())
}

pub fn tail_changelog(config: &Config, n: usize) -> Result<()> {
    let lines = Changelog::new(&config.paths.changelog).tail(n)?;
    if lines.is_empty() {
        println!("(no changelog yet)");
        return Ok(());
    }
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}
