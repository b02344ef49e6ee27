//! Ingestion orchestration.
//!
//! Drives the per-URL pipeline: fetch → persist raw artifact → extract
//! (with an OCR re-pass for sparse PDF text) → normalize → stamp identity →
//! diff against the stored record → write-if-changed → changelog. URLs are
//! processed strictly in source-list order, one at a time; a failure on one
//! URL is logged and never stops the rest of the run.

use anyhow::Result;
use tracing::{info, warn};

use crate::config::Config;
use crate::extract;
use crate::fetch::Fetcher;
use crate::ident::{derive_identifier, now_iso};
use crate::ocr::{OcrEngine, OcrMyPdf, OcrOutcome};
use crate::record;
use crate::sources;
use crate::store::{Changelog, JsonFileStore, RawStore, RecordStore};

/// Per-run counters, reported to the operator after a full pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped_empty: usize,
    pub failed: usize,
}

enum UrlOutcome {
    Updated,
    Unchanged,
    SkippedEmpty,
}

struct RunContext {
    fetcher: Fetcher,
    records: JsonFileStore,
    raw: RawStore,
    changelog: Changelog,
    max_tokens: usize,
    min_text_chars: usize,
}

/// Run a full ingestion pass with the configured OCR tool.
pub fn run(config: &Config) -> Result<RunSummary> {
    let ocr = OcrMyPdf::from_config(&config.ocr);
    run_with(config, &ocr)
}

/// Run a full ingestion pass with the given OCR capability.
///
/// Aborts only when the source list itself is unreadable; everything else is
/// per-URL and isolated.
pub fn run_with(config: &Config, ocr: &dyn OcrEngine) -> Result<RunSummary> {
    let urls = sources::read_sources(&config.paths.sources)?;

    let mut summary = RunSummary::default();
    if urls.is_empty() {
        info!(
            "No URLs found in {}",
            config.paths.sources.display()
        );
        return Ok(summary);
    }

    let ctx = RunContext {
        fetcher: Fetcher::new(&config.fetch)?,
        records: JsonFileStore::new(&config.paths.normalized),
        raw: RawStore::new(&config.paths.raw_html, &config.paths.raw_pdf),
        changelog: Changelog::new(&config.paths.changelog),
        max_tokens: config.chunking.max_tokens,
        min_text_chars: config.ocr.min_text_chars,
    };

    for url in &urls {
        info!(url = %url, "Processing");
        summary.processed += 1;
        match process_url(&ctx, ocr, url) {
            Ok(UrlOutcome::Updated) => summary.updated += 1,
            Ok(UrlOutcome::Unchanged) => summary.unchanged += 1,
            Ok(UrlOutcome::SkippedEmpty) => summary.skipped_empty += 1,
            Err(e) => {
                warn!(url = %url, error = %e, "Skipping URL after failure");
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

fn process_url(ctx: &RunContext, ocr: &dyn OcrEngine, url: &str) -> Result<UrlOutcome> {
    let fetched_at = now_iso();
    let doc = ctx.fetcher.fetch(url)?;
    let sid = derive_identifier(url);

    // The raw artifact is persisted before extraction is attempted, so a
    // failed extraction still leaves the fetched bytes on disk.
    let (title, text) = if doc.is_pdf() {
        let raw_path = ctx.raw.save_pdf(&sid, &doc.bytes)?;
        let mut text = extract::extract_pdf(&raw_path)?;

        if text.chars().count() < ctx.min_text_chars {
            info!(url = %url, "PDF text appears short; attempting OCR pass");
            let ocr_path = ctx.raw.ocr_pdf_path(&sid);
            match ocr.re_ocr(&raw_path, &ocr_path) {
                OcrOutcome::Ocred => match extract::extract_pdf(&ocr_path) {
                    Ok(ocred) => text = ocred,
                    Err(e) => {
                        warn!(url = %url, error = %e, "OCR output unreadable; keeping pre-OCR text");
                    }
                },
                OcrOutcome::Unavailable => {
                    warn!(url = %url, "OCR not available; continuing with short text");
                }
                OcrOutcome::Failed(reason) => {
                    warn!(url = %url, reason = %reason, "OCR failed; continuing with short text");
                }
            }
        }

        (String::new(), text)
    } else {
        ctx.raw.save_html(&sid, &doc.bytes)?;
        let raw_text = doc.text();
        let text = extract::extract_html(&raw_text);
        let title = extract::extract_title(&raw_text).unwrap_or_default();
        (title, text)
    };

    if text.trim().is_empty() {
        warn!(url = %url, "Extracted empty text; no record written");
        return Ok(UrlOutcome::SkippedEmpty);
    }

    let mut record = record::normalize(url, &title, &text, &fetched_at, ctx.max_tokens);
    record.stamp_identity(&sid);

    let previous_hash = ctx.records.get(&sid)?.and_then(|prev| prev.hash);
    if previous_hash == record.hash {
        info!(url = %url, "No change detected.");
        return Ok(UrlOutcome::Unchanged);
    }

    ctx.records.put(&sid, &record)?;
    ctx.changelog.append(&format!("Updated: {}", url))?;
    info!(url = %url, id = %sid, "Record updated");
    Ok(UrlOutcome::Updated)
}
