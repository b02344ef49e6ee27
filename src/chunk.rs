//! Paragraph-boundary text chunker.
//!
//! Splits extracted text on blank-line paragraph boundaries and greedily
//! packs paragraphs into chunks bounded by `max_tokens * 4` characters (a
//! fixed chars-per-token heuristic, no real tokenizer). A paragraph is never
//! split: one longer than the budget becomes its own oversized chunk.

/// Approximate chars-per-token ratio.
pub const CHARS_PER_TOKEN: usize = 4;

/// Token estimate for a chunk: `max(1, len / 4)` in characters.
pub fn estimate_tokens(s: &str) -> usize {
    std::cmp::max(1, s.chars().count() / CHARS_PER_TOKEN)
}

/// Split text into ordered chunks on `\n\n` paragraph boundaries.
///
/// Paragraphs accumulate until the next one would push the accumulated
/// character count past the budget, at which point the buffer is flushed
/// (paragraphs rejoined with blank lines, trimmed) and the triggering
/// paragraph starts the next chunk. The character count is the sum of
/// paragraph lengths; separator bytes are not budgeted.
pub fn chunk_text(text: &str, max_tokens: usize) -> Vec<String> {
    let max_chars = max_tokens * CHARS_PER_TOKEN;

    let mut chunks: Vec<String> = Vec::new();
    let mut buf: Vec<&str> = Vec::new();
    let mut size = 0usize;

    for para in text.split("\n\n") {
        let para_len = para.chars().count();
        if size + para_len > max_chars && !buf.is_empty() {
            chunks.push(flush(&buf));
            buf.clear();
            size = 0;
        }
        buf.push(para);
        size += para_len;
    }

    if !buf.is_empty() {
        chunks.push(flush(&buf));
    }

    chunks
}

fn flush(buf: &[&str]) -> String {
    buf.join("\n\n").trim().to_string()
}
