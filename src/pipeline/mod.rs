//! Pipeline stages for PDF-to-image conversion.
//!
//! Each submodule implements exactly one transformation step. Keeping
//! stages separate makes each independently testable and lets us swap
//! implementations (e.g. a different rendering backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ store ──▶ export
//! (path)   (pdfium)  (publish)  (PNG/JPEG files)
//! ```
//!
//! 1. [`input`]  — validate the user-supplied source path
//! 2. [`render`] — rasterise pages via the document engine; driven from a
//!    blocking worker because pdfium is not async-safe
//! 3. [`encode`] — PNG/JPEG encode and decode `DynamicImage` buffers, used
//!    both for the render-time round-trip and for export

pub mod encode;
pub mod input;
pub mod render;
