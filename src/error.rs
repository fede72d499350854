//! Error types for the pdf2img library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`DensityError`] — the resolution text failed validation before the
//!   pipeline even started. Returned by [`crate::density`] and wrapped as
//!   [`Pdf2ImgError::InvalidDensity`] when it aborts a run.
//!
//! * [`Pdf2ImgError`] — the run itself failed: the document cannot be
//!   opened, a page cannot be rendered, or an export write went wrong.
//!
//! A superseded run is deliberately *not* an error — it is the
//! [`crate::convert::RunOutcome::Superseded`] variant, because a user
//! re-triggering a conversion is normal operation, not a fault.

use std::path::PathBuf;
use thiserror::Error;

/// Resolution validation failures.
///
/// The valid range is [`crate::density::MIN_DPI`] to
/// [`crate::density::MAX_DPI`], bounds inclusive.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DensityError {
    /// The input text does not parse as a real number.
    #[error("resolution '{input}' is not a number")]
    NotANumber { input: String },

    /// The value parsed but is NaN or outside the accepted range.
    #[error("resolution {value} is out of range (must be between 10 and 2000 DPI)")]
    OutOfRange { value: f64 },
}

/// All fatal errors returned by the pdf2img library.
#[derive(Debug, Error)]
pub enum Pdf2ImgError {
    // ── Validation errors ─────────────────────────────────────────────────
    /// The request's density failed validation; the document was not opened.
    #[error("invalid resolution: {0}")]
    InvalidDensity(#[from] DensityError),

    // ── Open errors ───────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// The document engine could not open the file (corrupt, encrypted, …).
    #[error("Failed to open PDF '{path}': {detail}")]
    OpenFailed { path: PathBuf, detail: String },

    /// The document opened but contains no pages.
    #[error("PDF '{path}' has no pages")]
    EmptyDocument { path: PathBuf },

    // ── Render errors ─────────────────────────────────────────────────────
    /// The engine reported an error for a specific page. Never retried or
    /// skipped: dropping a page would desynchronise page indices.
    #[error("Rendering failed for page {page}: {detail}")]
    PageRenderFailed { page: usize, detail: String },

    // ── Export errors ─────────────────────────────────────────────────────
    /// Encoding a page's pixel buffer into the output format failed.
    #[error("Failed to encode page {page} as {format}: {detail}")]
    EncodeFailed {
        page: usize,
        format: &'static str,
        detail: String,
    },

    /// Could not create or write an output image file.
    #[error("Failed to write '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The user declined to overwrite existing files; nothing was written.
    #[error("Export cancelled: existing files were not overwritten")]
    ExportCancelled,

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Set PDFIUM_LIB_PATH=/path/to/dir to use an existing copy of libpdfium,\n\
or install pdfium where the system loader can find it."
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
