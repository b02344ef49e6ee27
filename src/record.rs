//! The normalized record: the canonical JSON document produced per source.
//!
//! Construction is two-phase. [`normalize`] builds the structural record —
//! text, chunks, clause/section, metadata — with every identity field unset,
//! knowing nothing about identifier derivation. The pipeline then calls
//! [`NormalizedRecord::stamp_identity`] with the derived identifier to fill
//! `id`, `hash`, and the chunk IDs.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::chunk::{chunk_text, estimate_tokens};
use crate::ident::sha256_hex;

/// First two-digit-dot-two-digit token, optionally dash-suffixed
/// (e.g. "12.34" or "12.34-5"). First match wins.
static CLAUSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{2}\.\d{2})(?:-([0-9]+))?\b").expect("clause pattern compiles"));

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordChunk {
    pub chunk_id: Option<String>,
    pub text: String,
    pub token_estimate: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedRecord {
    pub id: Option<String>,
    pub doc_type: String,
    pub jurisdiction: String,
    pub scheme: String,
    pub clause: Option<String>,
    pub section: Option<String>,
    pub title: String,
    pub version_date: String,
    pub source_url: String,
    pub content_raw: String,
    pub content_clean: String,
    pub markdown: Option<String>,
    pub html: Option<String>,
    pub chunks: Vec<RecordChunk>,
    pub citations: Vec<String>,
    pub hash: Option<String>,
    pub extracted_at: String,
    pub license: String,
    pub notes: String,
}

impl NormalizedRecord {
    /// Phase two: stamp identity fields from the derived identifier.
    ///
    /// Sets `id` to `{identifier}-{date}`, `hash` to the SHA-256 of
    /// `content_clean`, and each chunk's ID to `{identifier}-{NNN}` with a
    /// three-digit sequence starting at 001.
    pub fn stamp_identity(&mut self, identifier: &str) {
        self.id = Some(format!("{}-{}", identifier, self.version_date));
        self.hash = Some(sha256_hex(&self.content_clean));
        for (i, chunk) in self.chunks.iter_mut().enumerate() {
            chunk.chunk_id = Some(format!("{}-{:03}", identifier, i + 1));
        }
    }
}

/// Phase one: build the structural record for one source.
///
/// `fetched_at` is the ISO-8601 UTC fetch timestamp; its 10-character date
/// portion becomes `version_date`. `content_raw` and `content_clean` are
/// identical — there is no cleaning stage beyond extraction.
pub fn normalize(
    url: &str,
    title: &str,
    text: &str,
    fetched_at: &str,
    max_tokens: usize,
) -> NormalizedRecord {
    let (clause, section) = extract_clause_section(text);

    let chunks = chunk_text(text, max_tokens)
        .into_iter()
        .map(|text| RecordChunk {
            chunk_id: None,
            token_estimate: estimate_tokens(&text),
            text,
        })
        .collect();

    let version_date: String = fetched_at.chars().take(10).collect();

    NormalizedRecord {
        id: None,
        doc_type: "document".to_string(),
        jurisdiction: "VIC".to_string(),
        scheme: "planning".to_string(),
        clause,
        section,
        title: title.to_string(),
        version_date,
        source_url: url.to_string(),
        content_raw: text.to_string(),
        content_clean: text.to_string(),
        markdown: None,
        html: None,
        chunks,
        citations: Vec::new(),
        hash: None,
        extracted_at: fetched_at.to_string(),
        license: String::new(),
        notes: String::new(),
    }
}

/// Best-effort clause/section capture from the full text, first match only.
/// With a dash suffix the section is `{clause}-{suffix}`; otherwise it equals
/// the clause. Both are `None` when nothing matches.
fn extract_clause_section(text: &str) -> (Option<String>, Option<String>) {
    let caps = match CLAUSE_RE.captures(text) {
        Some(c) => c,
        None => return (None, None),
    };
    let clause = caps[1].to_string();
    let section = match caps.get(2) {
        Some(suffix) => format!("{}-{}", clause, suffix.as_str()),
        None => clause.clone(),
    };
    (Some(clause), Some(section))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FETCHED_AT: &str = "2024-05-06T07:08:09Z";

    #[test]
    fn clause_with_dash_suffix_forms_section() {
        let record = normalize(
            "https://example.org/scheme/12.34-5.html",
            "",
            "Clause 12.34-5 applies",
            FETCHED_AT,
            700,
        );
        assert_eq!(record.clause.as_deref(), Some("12.34"));
        assert_eq!(record.section.as_deref(), Some("12.34-5"));
    }

    #[test]
    fn clause_without_suffix_equals_section() {
        let record = normalize("https://x", "", "See clause 21.07 overall", FETCHED_AT, 700);
        assert_eq!(record.clause.as_deref(), Some("21.07"));
        assert_eq!(record.section.as_deref(), Some("21.07"));
    }

    #[test]
    fn first_clause_match_wins() {
        let record = normalize("https://x", "", "12.34 then 56.78-9", FETCHED_AT, 700);
        assert_eq!(record.clause.as_deref(), Some("12.34"));
        assert_eq!(record.section.as_deref(), Some("12.34"));
    }

    #[test]
    fn no_clause_match_is_null() {
        let record = normalize("https://x", "", "no numbered clauses here", FETCHED_AT, 700);
        assert_eq!(record.clause, None);
        assert_eq!(record.section, None);
    }

    #[test]
    fn fixed_fields_and_dates() {
        let record = normalize("https://x", "A title", "body text", FETCHED_AT, 700);
        assert_eq!(record.doc_type, "document");
        assert_eq!(record.jurisdiction, "VIC");
        assert_eq!(record.scheme, "planning");
        assert_eq!(record.version_date, "2024-05-06");
        assert_eq!(record.extracted_at, FETCHED_AT);
        assert_eq!(record.title, "A title");
        assert_eq!(record.content_raw, record.content_clean);
        assert_eq!(record.markdown, None);
        assert_eq!(record.html, None);
        assert!(record.citations.is_empty());
        assert_eq!(record.license, "");
        assert_eq!(record.notes, "");
    }

    #[test]
    fn normalize_leaves_identity_unset() {
        let record = normalize("https://x", "", "one\n\ntwo", FETCHED_AT, 700);
        assert_eq!(record.id, None);
        assert_eq!(record.hash, None);
        assert!(record.chunks.iter().all(|c| c.chunk_id.is_none()));
    }

    #[test]
    fn stamp_identity_fills_id_hash_and_chunk_ids() {
        let mut record = normalize("https://x", "", "one\n\ntwo", FETCHED_AT, 1);
        record.stamp_identity("example_org_page");

        assert_eq!(
            record.id.as_deref(),
            Some("example_org_page-2024-05-06")
        );
        assert_eq!(
            record.hash.as_deref(),
            Some(sha256_hex("one\n\ntwo").as_str())
        );
        let ids: Vec<&str> = record
            .chunks
            .iter()
            .map(|c| c.chunk_id.as_deref().unwrap())
            .collect();
        assert_eq!(ids, vec!["example_org_page-001", "example_org_page-002"]);
    }

    #[test]
    fn hash_is_a_pure_function_of_content_clean() {
        let mut a = normalize("https://one", "Title A", "same text", "2024-01-01T00:00:00Z", 700);
        let mut b = normalize("https://two", "Title B", "same text", "2025-12-31T23:59:59Z", 700);
        a.stamp_identity("id_a");
        b.stamp_identity("id_b");
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn record_serializes_with_null_identity_and_round_trips() {
        let mut record = normalize("https://x", "", "text", FETCHED_AT, 700);
        let json = serde_json::to_string_pretty(&record).unwrap();
        assert!(json.contains("\"id\": null"));

        record.stamp_identity("sid");
        let json = serde_json::to_string_pretty(&record).unwrap();
        let back: NormalizedRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
