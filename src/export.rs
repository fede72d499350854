//! Export stage: encode stored pages and write numbered image files.
//!
//! Filenames are `"{base_name} ({i}){ext}"` with `i` being the 1-based page
//! index — never a separately incremented counter — so repeated exports of
//! the same conversion produce the same names. The collision check runs
//! once, before any file is written; a declined confirmation aborts with
//! zero files on disk. There is no rollback after the first write: a
//! mid-export failure leaves the files written so far in place.
//!
//! The check-then-write sequence is not atomic against other processes
//! creating files in the destination directory; that race is an accepted
//! limitation.

use crate::config::OutputFormat;
use crate::error::Pdf2ImgError;
use crate::output::{ExportReport, RenderedPage};
use crate::pipeline::encode;
use crate::progress::ProgressCallback;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Decides whether planned filenames that already exist may be overwritten.
///
/// Called synchronously, at most once per export, before any file is
/// written. The CLI implements this with a stderr prompt; non-interactive
/// callers use [`AlwaysOverwrite`] or [`NeverOverwrite`].
pub trait OverwriteConfirm: Send + Sync {
    fn confirm_overwrite(&self, existing: &[PathBuf]) -> bool;
}

/// Overwrite collisions without asking.
pub struct AlwaysOverwrite;

impl OverwriteConfirm for AlwaysOverwrite {
    fn confirm_overwrite(&self, _existing: &[PathBuf]) -> bool {
        true
    }
}

/// Treat any collision as a refusal.
pub struct NeverOverwrite;

impl OverwriteConfirm for NeverOverwrite {
    fn confirm_overwrite(&self, _existing: &[PathBuf]) -> bool {
        false
    }
}

/// The planned filenames for one export, derived from base name, format,
/// and page count.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPlan {
    base_name: String,
    extension: &'static str,
    count: usize,
}

impl ExportPlan {
    pub fn new(base_name: impl Into<String>, format: OutputFormat, count: usize) -> Self {
        Self {
            base_name: base_name.into(),
            extension: format.extension(),
            count,
        }
    }

    /// Filename for a 1-based page index.
    pub fn filename(&self, index: usize) -> String {
        format!("{} ({}){}", self.base_name, index, self.extension)
    }

    /// All planned filenames, in page order.
    pub fn filenames(&self) -> Vec<String> {
        (1..=self.count).map(|i| self.filename(i)).collect()
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

/// Encode every page and write it into `dest_dir`.
///
/// `pages` is expected in index order (a [`crate::store::PageStore`]
/// snapshot always is); files are written in that order.
///
/// # Errors
/// - [`Pdf2ImgError::ExportCancelled`] if planned names collide with
///   existing files and `confirm` declines; nothing is written.
/// - [`Pdf2ImgError::EncodeFailed`] / [`Pdf2ImgError::WriteFailed`] stop the
///   export at the failing page; earlier files remain on disk.
pub async fn export_all(
    pages: &[RenderedPage],
    base_name: &str,
    format: OutputFormat,
    dest_dir: &Path,
    confirm: &dyn OverwriteConfirm,
    progress: Option<ProgressCallback>,
) -> Result<ExportReport, Pdf2ImgError> {
    let started = Instant::now();
    let plan = ExportPlan::new(base_name, format, pages.len());

    let existing: Vec<PathBuf> = plan
        .filenames()
        .iter()
        .map(|name| dest_dir.join(name))
        .filter(|path| path.exists())
        .collect();
    if !existing.is_empty() {
        warn!(
            "{} of {} planned filenames already exist in {}",
            existing.len(),
            plan.count(),
            dest_dir.display()
        );
        if !confirm.confirm_overwrite(&existing) {
            return Err(Pdf2ImgError::ExportCancelled);
        }
    }

    if let Some(cb) = &progress {
        cb.on_export_start(pages.len());
    }

    let mut files = Vec::with_capacity(pages.len());
    for page in pages {
        let path = dest_dir.join(plan.filename(page.index));

        let bytes =
            encode::encode_image(&page.image, format).map_err(|e| Pdf2ImgError::EncodeFailed {
                page: page.index,
                format: format.name(),
                detail: e.to_string(),
            })?;

        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| Pdf2ImgError::WriteFailed {
                path: path.clone(),
                source: e,
            })?;
        debug!("Wrote {}", path.display());

        files.push(path);
        if let Some(cb) = &progress {
            cb.on_file_written(files.len(), pages.len());
        }
    }

    if let Some(cb) = &progress {
        cb.on_export_complete(files.len());
    }
    info!(
        "Exported {} files to {} in {}ms",
        files.len(),
        dest_dir.display(),
        started.elapsed().as_millis()
    );

    Ok(ExportReport {
        files,
        export_duration_ms: started.elapsed().as_millis() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_filenames_use_the_page_index() {
        let plan = ExportPlan::new("doc", OutputFormat::Png, 3);
        assert_eq!(
            plan.filenames(),
            vec!["doc (1).png", "doc (2).png", "doc (3).png"]
        );
    }

    #[test]
    fn plan_extension_follows_format() {
        let plan = ExportPlan::new("scan", OutputFormat::Jpeg, 2);
        assert_eq!(plan.filename(2), "scan (2).jpg");
    }

    #[test]
    fn plan_handles_base_names_with_spaces() {
        let plan = ExportPlan::new("annual report 2024", OutputFormat::Png, 1);
        assert_eq!(plan.filename(1), "annual report 2024 (1).png");
    }

    #[test]
    fn empty_plan_has_no_filenames() {
        let plan = ExportPlan::new("doc", OutputFormat::Png, 0);
        assert!(plan.filenames().is_empty());
    }
}
