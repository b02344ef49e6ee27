//! # Planning ETL
//!
//! A change-aware ingestion pipeline for planning-scheme documents.
//!
//! Planning ETL fetches a configured list of URLs (HTML pages and PDFs),
//! extracts plain text, splits it into token-bounded chunks, and persists one
//! normalized JSON record per source — writing and logging only when the
//! content hash has actually changed.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌────────────┐   ┌──────────────┐
//! │ Sources  │──▶│  Fetcher  │──▶│ Extractor  │──▶│ Normalizer   │
//! │ (CSV)    │   │ HTML/PDF  │   │ (+OCR pass)│   │ chunks+ids   │
//! └──────────┘   └───────────┘   └────────────┘   └──────┬───────┘
//!                                                        │ hash diff
//!                                      ┌─────────────────┤
//!                                      ▼                 ▼
//!                                ┌──────────┐      ┌───────────┐
//!                                │ raw/     │      │normalized/│
//!                                │ artifacts│      │ + changelog│
//!                                └──────────┘      └───────────┘
//! ```
//!
//! ## Quick start
//!
//! ```bash
//! petl sources add https://example.org/scheme/12.34.html
//! petl run                      # fetch, extract, diff, write
//! petl records list             # browse outputs
//! petl changelog                # what changed & when
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`ident`] | URL identifiers, content hashing, timestamps |
//! | [`sources`] | Source-list file handling |
//! | [`fetch`] | HTTP fetching and HTML/PDF classification |
//! | [`extract`] | HTML and PDF text extraction |
//! | [`ocr`] | External OCR re-pass capability |
//! | [`chunk`] | Token-bounded paragraph chunking |
//! | [`record`] | Normalized record model and construction |
//! | [`store`] | Record, raw-artifact, and changelog stores |
//! | [`pipeline`] | Per-URL ingestion orchestration |
//! | [`admin`] | Operator commands over the stores |

pub mod admin;
pub mod chunk;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod ident;
pub mod ocr;
pub mod pipeline;
pub mod record;
pub mod sources;
pub mod store;
