//! Output types: rendered pages, run statistics, document metadata, and
//! export reports.

use crate::config::OutputFormat;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One rendered page of the source document.
///
/// Immutable after creation. `index` is 1-based and always matches the
/// page's position in the document; the store never holds pages out of
/// order.
#[derive(Clone)]
pub struct RenderedPage {
    /// 1-based page number.
    pub index: usize,
    /// Decoded pixel buffer for display and export.
    pub image: DynamicImage,
    /// The intermediate format the page was rendered through.
    pub source_format: OutputFormat,
}

impl RenderedPage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

impl fmt::Debug for RenderedPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderedPage")
            .field("index", &self.index)
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .field("source_format", &self.source_format)
            .finish()
    }
}

/// Statistics for one completed conversion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Page count of the source document.
    pub total_pages: usize,
    /// Pages actually rendered (equals `total_pages` for a completed run).
    pub rendered_pages: usize,
    /// Density the run was rendered at.
    pub density_dpi: f64,
    /// Wall-clock duration of the run in milliseconds.
    pub render_duration_ms: u64,
}

/// Document metadata, available without rendering any page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub page_count: usize,
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub pdf_version: String,
}

/// Result of a completed export: the files written, in page order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportReport {
    pub files: Vec<PathBuf>,
    pub export_duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn rendered_page_debug_is_compact() {
        let page = RenderedPage {
            index: 2,
            image: DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                4,
                6,
                Rgba([0, 0, 0, 255]),
            )),
            source_format: OutputFormat::Png,
        };
        let dbg = format!("{page:?}");
        assert!(dbg.contains("index: 2"));
        assert!(dbg.contains("width: 4"));
        // The pixel buffer itself must not be dumped.
        assert!(dbg.len() < 200, "got: {dbg}");
    }

    #[test]
    fn stats_serialise_to_json() {
        let stats = ConversionStats {
            total_pages: 3,
            rendered_pages: 3,
            density_dpi: 150.0,
            render_duration_ms: 42,
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"total_pages\":3"));
        let back: ConversionStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back.rendered_pages, 3);
    }
}
