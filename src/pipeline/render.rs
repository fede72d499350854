//! Page rasterisation: render single pages to `DynamicImage` at a target
//! density.
//!
//! ## The engine boundary
//!
//! The document engine is an external capability behind two object-safe
//! traits: [`DocumentEngine`] opens a document, [`DocumentPages`] exposes
//! the page count and per-page rendering. The production implementation is
//! [`PdfiumEngine`]; tests substitute a fake. Everything above this module
//! treats rendering as opaque.
//!
//! ## Why the encode/decode round-trip?
//!
//! [`render_page`] pushes the raw raster through the requested format and
//! decodes it back, so the buffer held in [`RenderedPage`] contains exactly
//! the pixels an export of that page will contain — a JPEG run previews
//! with JPEG artefacts instead of pretending to be lossless.

use crate::config::OutputFormat;
use crate::error::Pdf2ImgError;
use crate::output::{DocumentInfo, RenderedPage};
use crate::pipeline::encode;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::debug;

/// Pixels-per-layout-unit baseline: page widths are expressed in 1/96-inch
/// units by the capability contract, so a 96 DPI render maps 1:1.
const BASE_DPI: f64 = 96.0;

/// Opens documents. `Send + Sync` because runs execute on blocking worker
/// threads.
pub trait DocumentEngine: Send + Sync {
    /// Open the document at `path` for page access.
    ///
    /// A document that opens but has zero pages is an
    /// [`Pdf2ImgError::EmptyDocument`].
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn DocumentPages + 'a>, Pdf2ImgError>;

    /// Read page count and metadata without rendering anything.
    fn info(&self, path: &Path) -> Result<DocumentInfo, Pdf2ImgError>;
}

/// Page access for one opened document. Indices are 0-based at this
/// boundary; [`RenderedPage::index`] is 1-based.
pub trait DocumentPages {
    fn page_count(&self) -> usize;

    /// Native page width in points (art box when the document defines one,
    /// page box otherwise).
    fn page_width_points(&self, index: usize) -> Result<f32, Pdf2ImgError>;

    /// Rasterise one page at the given pixel width; height follows the
    /// page's aspect ratio.
    fn render_page(&self, index: usize, width_px: u32) -> Result<DynamicImage, Pdf2ImgError>;
}

/// Target pixel width for a page: `round(width_points / 96 × density)`.
pub fn target_width_px(width_points: f32, density_dpi: f64) -> u32 {
    (width_points as f64 / BASE_DPI * density_dpi).round() as u32
}

/// Render one page into a [`RenderedPage`].
///
/// `index` is 0-based; the returned page carries the 1-based number. Fails
/// with [`Pdf2ImgError::PageRenderFailed`] on engine errors and on
/// degenerate page dimensions — a failed page is never skipped, because
/// skipping would desynchronise page numbering.
pub fn render_page(
    doc: &dyn DocumentPages,
    index: usize,
    density_dpi: f64,
    format: OutputFormat,
) -> Result<RenderedPage, Pdf2ImgError> {
    let page_num = index + 1;

    let width_points = doc.page_width_points(index)?;
    if width_points <= 0.0 {
        return Err(Pdf2ImgError::PageRenderFailed {
            page: page_num,
            detail: format!("degenerate page width: {width_points}pt"),
        });
    }

    let width_px = target_width_px(width_points, density_dpi);
    if width_px == 0 {
        return Err(Pdf2ImgError::PageRenderFailed {
            page: page_num,
            detail: format!("target width rounds to 0 px ({width_points}pt at {density_dpi} DPI)"),
        });
    }

    let raster = doc.render_page(index, width_px)?;
    debug!(
        "Rendered page {} → {}x{} px",
        page_num,
        raster.width(),
        raster.height()
    );

    let bytes = encode::encode_image(&raster, format).map_err(|e| Pdf2ImgError::PageRenderFailed {
        page: page_num,
        detail: format!("{} encoding failed: {e}", format.name()),
    })?;
    let image = encode::decode_image(&bytes).map_err(|e| Pdf2ImgError::PageRenderFailed {
        page: page_num,
        detail: format!("{} decoding failed: {e}", format.name()),
    })?;

    Ok(RenderedPage {
        index: page_num,
        image,
        source_format: format,
    })
}

// ── Pdfium implementation ────────────────────────────────────────────────

/// Production [`DocumentEngine`] backed by pdfium-render.
///
/// Binds to the library named by `PDFIUM_LIB_PATH` (a directory containing
/// the platform's libpdfium) or, failing that, to the system library. The
/// `thread_safe` crate feature serialises pdfium access, so one engine can
/// serve consecutive runs on different blocking threads.
pub struct PdfiumEngine {
    pdfium: Pdfium,
}

impl PdfiumEngine {
    pub fn new() -> Result<Self, Pdf2ImgError> {
        let bindings = match std::env::var("PDFIUM_LIB_PATH") {
            Ok(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir)),
            Err(_) => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| Pdf2ImgError::PdfiumBindingFailed(format!("{e:?}")))?;

        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    fn load<'a>(&'a self, path: &Path) -> Result<PdfDocument<'a>, Pdf2ImgError> {
        self.pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| Pdf2ImgError::OpenFailed {
                path: path.to_path_buf(),
                detail: format!("{e:?}"),
            })
    }
}

impl DocumentEngine for PdfiumEngine {
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn DocumentPages + 'a>, Pdf2ImgError> {
        let document = self.load(path)?;
        if document.pages().len() == 0 {
            return Err(Pdf2ImgError::EmptyDocument {
                path: path.to_path_buf(),
            });
        }
        Ok(Box::new(PdfiumDocument { document }))
    }

    fn info(&self, path: &Path) -> Result<DocumentInfo, Pdf2ImgError> {
        let document = self.load(path)?;
        let metadata = document.metadata();
        let pages = document.pages();

        let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
            metadata.get(tag).and_then(|t| {
                let v = t.value().to_string();
                if v.is_empty() {
                    None
                } else {
                    Some(v)
                }
            })
        };

        Ok(DocumentInfo {
            page_count: pages.len() as usize,
            title: get_meta(PdfDocumentMetadataTagType::Title),
            author: get_meta(PdfDocumentMetadataTagType::Author),
            subject: get_meta(PdfDocumentMetadataTagType::Subject),
            creator: get_meta(PdfDocumentMetadataTagType::Creator),
            producer: get_meta(PdfDocumentMetadataTagType::Producer),
            pdf_version: format!("{:?}", document.version()),
        })
    }
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl DocumentPages for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_width_points(&self, index: usize) -> Result<f32, Pdf2ImgError> {
        let pages = self.document.pages();
        let page = pages
            .get(index as u16)
            .map_err(|e| Pdf2ImgError::PageRenderFailed {
                page: index + 1,
                detail: format!("{e:?}"),
            })?;
        // Art box when the document defines one, page box otherwise.
        let width = page
            .boundaries()
            .art()
            .map(|b| b.bounds.width().value)
            .unwrap_or_else(|_| page.width().value);
        Ok(width)
    }

    fn render_page(&self, index: usize, width_px: u32) -> Result<DynamicImage, Pdf2ImgError> {
        let pages = self.document.pages();
        let page = pages
            .get(index as u16)
            .map_err(|e| Pdf2ImgError::PageRenderFailed {
                page: index + 1,
                detail: format!("{e:?}"),
            })?;
        let render_config = PdfRenderConfig::new().set_target_width(width_px as i32);
        let bitmap =
            page.render_with_config(&render_config)
                .map_err(|e| Pdf2ImgError::PageRenderFailed {
                    page: index + 1,
                    detail: format!("{e:?}"),
                })?;
        Ok(bitmap.as_image())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    /// A one-document fake: US-Letter pages of a solid colour.
    struct FakePages {
        pages: usize,
        width_points: f32,
    }

    impl DocumentPages for FakePages {
        fn page_count(&self) -> usize {
            self.pages
        }

        fn page_width_points(&self, _index: usize) -> Result<f32, Pdf2ImgError> {
            Ok(self.width_points)
        }

        fn render_page(&self, _index: usize, width_px: u32) -> Result<DynamicImage, Pdf2ImgError> {
            let height_px = ((width_px as f32) * 792.0 / 612.0).round().max(1.0) as u32;
            Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                width_px,
                height_px,
                Rgba([240, 240, 240, 255]),
            )))
        }
    }

    #[test]
    fn target_width_follows_the_density_formula() {
        // 612pt at the 96 DPI baseline maps 1:1.
        assert_eq!(target_width_px(612.0, 96.0), 612);
        // 612 / 96 * 150 = 956.25 → rounds to 956.
        assert_eq!(target_width_px(612.0, 150.0), 956);
        // 612 / 96 * 300 = 1912.5 → rounds to 1913 (round half up).
        assert_eq!(target_width_px(612.0, 300.0), 1913);
    }

    #[test]
    fn render_page_produces_one_based_indices() {
        let doc = FakePages {
            pages: 3,
            width_points: 612.0,
        };
        let page = render_page(&doc, 0, 96.0, OutputFormat::Png).unwrap();
        assert_eq!(page.index, 1);
        assert_eq!(page.width(), 612);
        assert_eq!(page.source_format, OutputFormat::Png);
    }

    #[test]
    fn render_page_round_trips_through_jpeg() {
        let doc = FakePages {
            pages: 1,
            width_points: 612.0,
        };
        let page = render_page(&doc, 0, 96.0, OutputFormat::Jpeg).unwrap();
        assert_eq!(page.width(), 612);
        assert_eq!(page.height(), 792);
        assert_eq!(page.source_format, OutputFormat::Jpeg);
    }

    #[test]
    fn degenerate_width_is_a_render_failure() {
        let doc = FakePages {
            pages: 1,
            width_points: 0.0,
        };
        let err = render_page(&doc, 0, 96.0, OutputFormat::Png).unwrap_err();
        assert!(matches!(
            err,
            Pdf2ImgError::PageRenderFailed { page: 1, .. }
        ));
    }

    #[test]
    fn zero_pixel_target_is_a_render_failure() {
        // A sub-point page at minimum density rounds to 0 px.
        let doc = FakePages {
            pages: 1,
            width_points: 0.04,
        };
        let err = render_page(&doc, 0, 10.0, OutputFormat::Png).unwrap_err();
        assert!(matches!(err, Pdf2ImgError::PageRenderFailed { .. }));
    }
}
