//! HTTP fetching and response classification.
//!
//! One blocking GET per source URL, redirects followed, no retries. A failed
//! request or non-success status surfaces as a [`FetchError`]; the caller
//! decides what to do with it (the pipeline skips the URL and moves on).

use std::time::Duration;

use crate::config::FetchConfig;

/// A fetched document: final resolved URL, content-type header, raw bytes.
#[derive(Debug, Clone)]
pub struct FetchedDoc {
    pub final_url: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FetchedDoc {
    /// PDF classification: content-type contains "pdf" OR the final URL ends
    /// with ".pdf", both case-insensitive. The suffix check is an OR with the
    /// header check, not a tiebreak.
    pub fn is_pdf(&self) -> bool {
        self.content_type.to_ascii_lowercase().contains("pdf")
            || self.final_url.to_ascii_lowercase().ends_with(".pdf")
    }

    /// Response body decoded as text (lossy), for HTML handling.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Network or HTTP-status failure for a single URL.
#[derive(Debug)]
pub enum FetchError {
    Transport(reqwest::Error),
    Status { url: String, status: u16 },
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Transport(e) => write!(f, "request failed: {}", e),
            FetchError::Status { url, status } => {
                write!(f, "HTTP {} for {}", status, url)
            }
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Transport(e) => Some(e),
            FetchError::Status { .. } => None,
        }
    }
}

pub struct Fetcher {
    client: reqwest::blocking::Client,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// GET a URL, following redirects. Errors on transport failure or any
    /// non-success status.
    pub fn fetch(&self, url: &str) -> Result<FetchedDoc, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(FetchError::Transport)?;

        let status = response.status();
        let final_url = response.url().to_string();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: final_url,
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let bytes = response.bytes().map_err(FetchError::Transport)?.to_vec();

        Ok(FetchedDoc {
            final_url,
            content_type,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn fetcher() -> Fetcher {
        Fetcher::new(&FetchConfig::default()).unwrap()
    }

    #[test]
    fn fetch_returns_body_and_content_type() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/page.html");
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body("<html><body>hi</body></html>");
        });

        let doc = fetcher().fetch(&server.url("/page.html")).unwrap();
        assert_eq!(doc.content_type, "text/html; charset=utf-8");
        assert!(doc.text().contains("hi"));
        assert!(!doc.is_pdf());
    }

    #[test]
    fn fetch_sends_user_agent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/ua")
                .header("user-agent", "Mozilla/5.0 (compatible; planning-etl/1.0)");
            then.status(200).body("ok");
        });

        fetcher().fetch(&server.url("/ua")).unwrap();
        mock.assert();
    }

    #[test]
    fn non_success_status_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/gone");
            then.status(404);
        });

        let err = fetcher().fetch(&server.url("/gone")).unwrap_err();
        match err {
            FetchError::Status { status, .. } => assert_eq!(status, 404),
            other => panic!("expected status error, got {}", other),
        }
    }

    #[test]
    fn pdf_classified_by_content_type() {
        let doc = FetchedDoc {
            final_url: "https://example.org/doc".to_string(),
            content_type: "Application/PDF".to_string(),
            bytes: Vec::new(),
        };
        assert!(doc.is_pdf());
    }

    #[test]
    fn pdf_classified_by_url_suffix_even_with_other_content_type() {
        let doc = FetchedDoc {
            final_url: "https://example.org/scheme/maps.PDF".to_string(),
            content_type: "application/octet-stream".to_string(),
            bytes: Vec::new(),
        };
        assert!(doc.is_pdf());
    }

    #[test]
    fn html_not_classified_as_pdf() {
        let doc = FetchedDoc {
            final_url: "https://example.org/page.html".to_string(),
            content_type: "text/html".to_string(),
            bytes: Vec::new(),
        };
        assert!(!doc.is_pdf());
    }
}
