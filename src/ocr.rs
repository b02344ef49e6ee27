//! OCR re-pass capability.
//!
//! Sparse PDF text triggers one external OCR pass over the raw artifact. The
//! subprocess sits behind [`OcrEngine`] so the pipeline can be exercised in
//! tests without spawning anything. Every outcome short of success is a soft
//! degrade: the pipeline keeps the pre-OCR text and moves on.

use std::path::Path;
use std::process::Command;

use crate::config::OcrConfig;

/// Result of an OCR attempt. Only `Ocred` means the output file is usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OcrOutcome {
    /// Tool exited zero and the output file exists.
    Ocred,
    /// OCR disabled by config or the tool is not on PATH.
    Unavailable,
    /// Tool ran but failed.
    Failed(String),
}

/// Capability interface for re-OCRing a PDF into a text-augmented copy.
pub trait OcrEngine {
    fn re_ocr(&self, input: &Path, output: &Path) -> OcrOutcome;
}

/// Shells out to `ocrmypdf` (or a configured substitute), skipping pages
/// that already contain text.
pub struct OcrMyPdf {
    command: String,
    enabled: bool,
}

impl OcrMyPdf {
    pub fn from_config(config: &OcrConfig) -> Self {
        Self {
            command: config.command.clone(),
            enabled: config.enabled,
        }
    }
}

impl OcrEngine for OcrMyPdf {
    fn re_ocr(&self, input: &Path, output: &Path) -> OcrOutcome {
        if !self.enabled {
            return OcrOutcome::Unavailable;
        }
        if which::which(&self.command).is_err() {
            return OcrOutcome::Unavailable;
        }

        let result = Command::new(&self.command)
            .arg("--skip-text")
            .arg(input)
            .arg(output)
            .output();

        match result {
            Ok(out) if out.status.success() && output.exists() => OcrOutcome::Ocred,
            Ok(out) => {
                let stderr = String::from_utf8_lossy(&out.stderr);
                let reason = stderr.trim();
                if reason.is_empty() {
                    OcrOutcome::Failed(format!("exit status {}", out.status))
                } else {
                    OcrOutcome::Failed(reason.to_string())
                }
            }
            Err(e) => OcrOutcome::Failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_engine_is_unavailable() {
        let engine = OcrMyPdf {
            command: "ocrmypdf".to_string(),
            enabled: false,
        };
        let outcome = engine.re_ocr(Path::new("in.pdf"), Path::new("out.pdf"));
        assert_eq!(outcome, OcrOutcome::Unavailable);
    }

    #[test]
    fn missing_tool_is_unavailable() {
        let engine = OcrMyPdf {
            command: "definitely-not-an-ocr-tool-on-path".to_string(),
            enabled: true,
        };
        let outcome = engine.re_ocr(Path::new("in.pdf"), Path::new("out.pdf"));
        assert_eq!(outcome, OcrOutcome::Unavailable);
    }

    #[test]
    fn failing_tool_reports_failed() {
        // `false` is on PATH everywhere we run tests and always exits 1.
        let engine = OcrMyPdf {
            command: "false".to_string(),
            enabled: true,
        };
        let outcome = engine.re_ocr(Path::new("in.pdf"), Path::new("out.pdf"));
        assert!(matches!(outcome, OcrOutcome::Failed(_)));
    }
}
