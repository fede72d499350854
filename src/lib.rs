//! # pdf2img
//!
//! Convert PDF documents to numbered per-page PNG or JPEG images.
//!
//! ## Why this crate?
//!
//! Turning a PDF into one image per page sounds trivial until the details
//! bite: resolutions that need validating before touching the document,
//! long renders that must yield to a newer request instead of queueing
//! behind it, and exports that should never silently clobber the files from
//! a previous session. This crate packages those behaviours — per-page
//! rendering at a chosen density, last-request-wins re-rendering, and
//! collision-checked numbered export — behind a small library API and a
//! matching CLI.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    validate the source path (exists, readable, %PDF magic)
//!  ├─ 2. Render   rasterise each page via pdfium at the requested density
//!  ├─ 3. Store    publish the completed page set in one atomic swap
//!  └─ 4. Export   encode PNG/JPEG and write "{base} (N){ext}" files
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2img::{export_all, AlwaysOverwrite, Converter, OutputFormat, PdfiumEngine, RenderRequest};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = Converter::new(Arc::new(PdfiumEngine::new()?));
//!
//!     let request = RenderRequest::new("document.pdf", 150.0, OutputFormat::Png);
//!     converter.run(request, None).await?;
//!
//!     let pages = converter.pages();
//!     let report = export_all(
//!         &pages,
//!         "document",
//!         OutputFormat::Png,
//!         Path::new("out"),
//!         &AlwaysOverwrite,
//!         None,
//!     )
//!     .await?;
//!     eprintln!("wrote {} files", report.files.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Re-rendering
//!
//! Calling [`Converter::run`] again — new document, new density, new format
//! — supersedes any run still in flight: the stale run stops at its next
//! page boundary, publishes nothing, and reports
//! [`RunOutcome::Superseded`]. Only the latest request's pages ever reach
//! the store that [`Converter::pages`] and [`export_all`] read.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2img` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2img = { version = "0.4", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod density;
pub mod error;
pub mod export;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod store;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{OutputFormat, RenderRequest};
pub use convert::{inspect, Converter, EventStream, RunEvent, RunOutcome};
pub use error::{DensityError, Pdf2ImgError};
pub use export::{export_all, AlwaysOverwrite, ExportPlan, NeverOverwrite, OverwriteConfirm};
pub use output::{ConversionStats, DocumentInfo, ExportReport, RenderedPage};
pub use pipeline::render::{DocumentEngine, DocumentPages, PdfiumEngine};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use store::PageStore;
