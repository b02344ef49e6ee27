//! Identity and hashing utilities.
//!
//! Every source URL maps to a deterministic, filesystem-safe identifier that
//! keys the raw artifact, the normalized record, and the chunk ID prefix.
//! Content hashes are SHA-256 over the cleaned text, so a record's hash is a
//! pure function of its `content_clean`.

use chrono::Utc;
use sha2::{Digest, Sha256};
use url::Url;

/// Maximum length of a fallback identifier.
const FALLBACK_MAX_LEN: usize = 50;

/// Derive the identifier for a URL: host (with port) plus path, stripped of
/// leading/trailing slashes, with `/` and `.` replaced by `_`.
///
/// Falls back to collapsing every non-alphanumeric run in the full URL to a
/// single `_` (truncated to 50 bytes) when the host+path form comes up empty
/// or the URL does not parse.
///
/// Deterministic and idempotent per URL. Note that URLs differing only by
/// scheme, query string, or trailing slash collapse to the same identifier
/// and will overwrite each other's artifacts.
pub fn derive_identifier(url: &str) -> String {
    if let Ok(parsed) = Url::parse(url) {
        let host = parsed.host_str().unwrap_or("");
        let netloc = match parsed.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let joined = format!("{}{}", netloc, parsed.path());
        let safe: String = joined
            .trim_matches('/')
            .chars()
            .map(|c| if c == '/' || c == '.' { '_' } else { c })
            .collect();
        if !safe.is_empty() {
            return safe;
        }
    }
    fallback_identifier(url)
}

fn fallback_identifier(url: &str) -> String {
    let mut out = String::new();
    let mut last_was_sep = false;
    for c in url.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
        if out.len() >= FALLBACK_MAX_LEN {
            break;
        }
    }
    out.truncate(FALLBACK_MAX_LEN);
    out
}

/// Lowercase hex SHA-256 digest of a string's UTF-8 bytes.
pub fn sha256_hex(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    hex::encode(hasher.finalize())
}

/// Current UTC time as ISO-8601 with second precision (`2024-01-02T03:04:05Z`).
/// The first 10 characters are the date portion.
pub fn now_iso() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_replaces_slashes_and_dots() {
        assert_eq!(
            derive_identifier("https://example.org/scheme/12.34-5.html"),
            "example_org_scheme_12_34-5_html"
        );
    }

    #[test]
    fn identifier_is_deterministic_and_idempotent() {
        let a = derive_identifier("https://example.org/a/b.pdf");
        let b = derive_identifier("https://example.org/a/b.pdf");
        assert_eq!(a, b);
    }

    #[test]
    fn query_strings_collapse_to_same_identifier() {
        let a = derive_identifier("https://example.org/page?rev=1");
        let b = derive_identifier("https://example.org/page?rev=2");
        assert_eq!(a, b);
        assert_eq!(a, "example_org_page");
    }

    #[test]
    fn host_port_is_kept() {
        assert_eq!(
            derive_identifier("http://example.org:8080/x"),
            "example_org:8080_x"
        );
    }

    #[test]
    fn unparseable_url_uses_fallback() {
        assert_eq!(derive_identifier("not a url at all"), "not_a_url_at_all");
    }

    #[test]
    fn fallback_truncates_to_fifty_bytes() {
        let long = format!("::{}", "a".repeat(200));
        let id = derive_identifier(&long);
        assert_eq!(id.len(), 50);
        assert!(id.starts_with("_a"));
    }

    #[test]
    fn sha256_known_vector() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn sha256_is_stable_across_calls() {
        assert_eq!(sha256_hex("planning"), sha256_hex("planning"));
        assert_ne!(sha256_hex("planning"), sha256_hex("planning "));
    }

    #[test]
    fn now_iso_has_second_precision_shape() {
        let ts = now_iso();
        assert_eq!(ts.len(), 20);
        assert!(ts.ends_with('Z'));
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], "T");
    }
}
