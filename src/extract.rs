//! Type-specific text extraction for fetched documents.
//!
//! HTML goes through a readability-style pass over block-level content
//! elements first, with a strip-tags fallback when that yields nothing;
//! malformed markup never fails, worst case is an empty string. PDFs are
//! extracted as plain text via `pdf-extract`; the OCR re-pass for sparse PDF
//! text is driven by the pipeline, not here.

use std::path::Path;

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

/// Block-level elements considered document content. Tables are deliberately
/// absent.
static BLOCK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p, h1, h2, h3, h4, h5, h6, li, blockquote, pre")
        .expect("static selector must parse")
});

/// Elements whose subtree is never document content.
const EXCLUDED_ANCESTORS: &[&str] = &[
    "script", "style", "noscript", "table", "nav", "header", "footer", "aside",
];

/// Ancestors that make a block element redundant: either excluded outright,
/// or a block element that already contributed this subtree's text.
const BLOCK_TAGS: &[&str] = &[
    "p",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "li",
    "blockquote",
    "pre",
];

/// PDF extraction failure (the only extraction that can fail; the pipeline
/// skips the URL).
#[derive(Debug)]
pub enum ExtractError {
    Pdf(String),
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::Pdf(e) => write!(f, "PDF extraction failed: {}", e),
        }
    }
}

impl std::error::Error for ExtractError {}

/// Extract plain text from HTML.
///
/// Primary pass: text of block-level content elements (paragraphs, headings,
/// list items) joined with blank lines, excluding tables and page chrome.
/// When that comes back empty, falls back to stripping script/style/noscript
/// and joining every remaining visible text node with single spaces.
pub fn extract_html(html: &str) -> String {
    let doc = Html::parse_document(html);

    let mut blocks: Vec<String> = Vec::new();
    for element in doc.select(&BLOCK_SELECTOR) {
        let mut redundant = false;
        for ancestor in element.ancestors() {
            if let Some(el) = ancestor.value().as_element() {
                let name = el.name();
                if EXCLUDED_ANCESTORS.contains(&name) || BLOCK_TAGS.contains(&name) {
                    redundant = true;
                    break;
                }
            }
        }
        if redundant {
            continue;
        }
        let text = collapse_whitespace(element.text());
        if !text.is_empty() {
            blocks.push(text);
        }
    }

    let primary = blocks.join("\n\n");
    if !primary.trim().is_empty() {
        return primary.trim().to_string();
    }

    strip_tags(&doc)
}

/// Fallback extraction: every visible text node outside
/// script/style/noscript, separated by single spaces.
fn strip_tags(doc: &Html) -> String {
    let mut pieces: Vec<&str> = Vec::new();
    for node in doc.root_element().descendants() {
        let text = match node.value().as_text() {
            Some(t) => t,
            None => continue,
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .map(|el| matches!(el.name(), "script" | "style" | "noscript"))
                .unwrap_or(false)
        });
        if hidden {
            continue;
        }
        pieces.extend(text.split_whitespace());
    }
    pieces.join(" ").trim().to_string()
}

fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    let words: Vec<&str> = parts.flat_map(|p| p.split_whitespace()).collect();
    words.join(" ")
}

/// Extract plain text from a PDF file, trimmed. Page texts arrive joined
/// with newlines in page order.
pub fn extract_pdf(path: &Path) -> Result<String, ExtractError> {
    let text = pdf_extract::extract_text(path).map_err(|e| ExtractError::Pdf(e.to_string()))?;
    Ok(text.trim().to_string())
}

/// Best-effort `<title>` capture from raw HTML.
///
/// ASCII-case-insensitive scan for the first `<title>`/`</title>` pair; the
/// trimmed text between them is the title. Returns `None` for anything that
/// does not line up — callers treat that as an empty title, never an error.
pub fn extract_title(html: &str) -> Option<String> {
    let open = find_ascii_ci(html, "<title>")?;
    let close = find_ascii_ci(html, "</title>")?;
    let start = open + "<title>".len();
    if close <= start {
        return None;
    }
    html.get(start..close).map(|s| s.trim().to_string())
}

fn find_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_paragraphs_become_blank_line_blocks() {
        let html = "<html><body><h1>Scheme</h1><p>First para.</p><p>Second para.</p></body></html>";
        assert_eq!(extract_html(html), "Scheme\n\nFirst para.\n\nSecond para.");
    }

    #[test]
    fn tables_are_excluded_from_primary_pass() {
        let html = "<body><p>Kept.</p><table><tr><td><p>Dropped.</p></td></tr></table></body>";
        assert_eq!(extract_html(html), "Kept.");
    }

    #[test]
    fn nested_blocks_are_not_duplicated() {
        let html = "<body><blockquote><p>Quoted once.</p></blockquote></body>";
        assert_eq!(extract_html(html), "Quoted once.");
    }

    #[test]
    fn fallback_strips_scripts_and_styles() {
        // No block-level content elements, so the fallback runs.
        let html = "<body><script>var x = 1;</script><style>p{}</style><div>Visible</div><div>text</div></body>";
        assert_eq!(extract_html(html), "Visible text");
    }

    #[test]
    fn malformed_markup_never_panics() {
        let html = "<p>unclosed <b>bold <table><td>broken";
        let text = extract_html(html);
        assert!(text.contains("unclosed"));
    }

    #[test]
    fn empty_document_yields_empty_string() {
        assert_eq!(extract_html(""), "");
        assert_eq!(extract_html("<html><head></head><body></body></html>"), "");
    }

    #[test]
    fn title_found_case_insensitively() {
        let html = "<HTML><HEAD><TITLE>  Planning Scheme  </TITLE></HEAD></HTML>";
        assert_eq!(extract_title(html), Some("Planning Scheme".to_string()));
    }

    #[test]
    fn title_absent_or_misordered_is_none() {
        assert_eq!(extract_title("<html><body>no title</body></html>"), None);
        assert_eq!(extract_title("</title>backwards<title>"), None);
    }

    #[test]
    fn missing_pdf_is_an_error() {
        assert!(extract_pdf(Path::new("/nonexistent/file.pdf")).is_err());
    }
}
