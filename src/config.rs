//! Request types for a conversion run.
//!
//! A [`RenderRequest`] captures everything that determines a run's output:
//! the source document, the density, and the output format. Two requests
//! with equal fields are the same request; changing any field produces a new
//! request that supersedes the previous one when handed to
//! [`crate::convert::Converter::run`].

use crate::density;
use crate::error::DensityError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Raster format for rendered pages and exported files.
///
/// The format selects the intermediate encoding the renderer produces (and
/// decodes back for display) as well as the encoding written at export time.
/// It does not change what the page looks like beyond JPEG's lossy
/// compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless; keeps the alpha channel. (default)
    #[default]
    Png,
    /// Lossy, default quality; alpha is flattened to RGB.
    Jpeg,
}

impl OutputFormat {
    /// File extension used for exported files, dot included.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => ".png",
            OutputFormat::Jpeg => ".jpg",
        }
    }

    /// Human-readable format name for error messages and logs.
    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Png => "PNG",
            OutputFormat::Jpeg => "JPEG",
        }
    }

    pub(crate) fn image_format(self) -> image::ImageFormat {
        match self {
            OutputFormat::Png => image::ImageFormat::Png,
            OutputFormat::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The value object driving one conversion run.
///
/// # Example
/// ```rust
/// use pdf2img::{OutputFormat, RenderRequest};
///
/// let a = RenderRequest::new("doc.pdf", 150.0, OutputFormat::Png);
/// let b = RenderRequest::new("doc.pdf", 150.0, OutputFormat::Png);
/// assert_eq!(a, b);
/// assert_ne!(a, RenderRequest::new("doc.pdf", 300.0, OutputFormat::Png));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// Path to the source PDF.
    pub path: PathBuf,
    /// Render density in dots per inch. Validated at run start.
    pub density_dpi: f64,
    /// Raster format for rendered pages.
    pub format: OutputFormat,
}

impl RenderRequest {
    pub fn new(path: impl Into<PathBuf>, density_dpi: f64, format: OutputFormat) -> Self {
        Self {
            path: path.into(),
            density_dpi,
            format,
        }
    }

    /// Build a request from a free-text density, validating it eagerly.
    ///
    /// Useful at the UI boundary where the density arrives as a string; the
    /// orchestrator re-validates at run start either way.
    pub fn with_density_text(
        path: impl Into<PathBuf>,
        density_text: &str,
        format: OutputFormat,
    ) -> Result<Self, DensityError> {
        let density_dpi = density::validate_text(density_text)?;
        Ok(Self::new(path, density_dpi, format))
    }
}
