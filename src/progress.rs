//! Progress-callback trait for per-page render and per-file export events.
//!
//! Pass an `Arc<dyn ConversionProgressCallback>` to
//! [`crate::convert::Converter::run`] or [`crate::export::export_all`] to
//! receive `(completed, total)` events as work proceeds.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers
//! can forward events to a channel, a progress bar, or a GUI without the
//! library knowing how the host application communicates.
//! [`crate::convert::Converter::run_stream`] does exactly that internally to
//! offer a stream-shaped API on top of the same trait. The trait is
//! `Send + Sync` because the render loop runs on a blocking worker thread.

use std::sync::Arc;

/// Called by the pipeline as it renders pages and writes export files.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. A superseded run stops emitting events; its
/// `on_conversion_complete` never fires.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once per run, after the document is opened.
    ///
    /// # Arguments
    /// * `total_pages` — page count of the document
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after each page is rendered and appended to the run's output.
    ///
    /// # Arguments
    /// * `completed`   — pages rendered so far (1-based, monotone)
    /// * `total_pages` — page count of the document
    fn on_page_rendered(&self, completed: usize, total_pages: usize) {
        let _ = (completed, total_pages);
    }

    /// Called once when a run finishes and its pages are published.
    fn on_conversion_complete(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called once per export, after the overwrite check passed.
    fn on_export_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called after each file is written.
    fn on_file_written(&self, completed: usize, total_files: usize) {
        let _ = (completed, total_files);
    }

    /// Called once when all files are written.
    fn on_export_complete(&self, written: usize) {
        let _ = written;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias for the type the pipeline actually passes around.
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        pages: AtomicUsize,
        files: AtomicUsize,
        run_total: AtomicUsize,
        export_total: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_conversion_start(&self, total_pages: usize) {
            self.run_total.store(total_pages, Ordering::SeqCst);
        }

        fn on_page_rendered(&self, _completed: usize, _total_pages: usize) {
            self.pages.fetch_add(1, Ordering::SeqCst);
        }

        fn on_export_start(&self, total_files: usize) {
            self.export_total.store(total_files, Ordering::SeqCst);
        }

        fn on_file_written(&self, _completed: usize, _total_files: usize) {
            self.files.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_conversion_start(5);
        cb.on_page_rendered(1, 5);
        cb.on_conversion_complete(5);
        cb.on_export_start(5);
        cb.on_file_written(1, 5);
        cb.on_export_complete(5);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            pages: AtomicUsize::new(0),
            files: AtomicUsize::new(0),
            run_total: AtomicUsize::new(0),
            export_total: AtomicUsize::new(0),
        };

        tracker.on_conversion_start(3);
        tracker.on_page_rendered(1, 3);
        tracker.on_page_rendered(2, 3);
        tracker.on_page_rendered(3, 3);
        tracker.on_export_start(3);
        tracker.on_file_written(1, 3);

        assert_eq!(tracker.run_total.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.pages.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.export_total.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.files.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn ConversionProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_conversion_start(10);
        cb.on_page_rendered(1, 10);
    }
}
