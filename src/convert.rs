//! Conversion orchestration: drive the per-page render loop for one
//! request, with last-request-wins supersession.
//!
//! ## Supersession
//!
//! A [`Converter`] owns a generation counter. Every [`Converter::run`] call
//! claims the next generation before doing anything else, which marks any
//! in-flight run stale. The running loop re-reads the counter around each
//! page render (the suspension points) and, when stale, stops without
//! emitting further events and without touching the store. This bounds
//! staleness to one page render: there is no explicit cancel operation —
//! starting a new run *is* the cancellation.
//!
//! ## Why spawn_blocking?
//!
//! pdfium is CPU-bound and not async-safe, so the whole open-and-render
//! loop for a run executes inside one `tokio::task::spawn_blocking` call.
//! The driving async control flow stays free to accept the superseding
//! request that stops it.

use crate::config::RenderRequest;
use crate::density;
use crate::error::Pdf2ImgError;
use crate::output::{ConversionStats, DocumentInfo, RenderedPage};
use crate::pipeline::render::DocumentEngine;
use crate::pipeline::{input, render};
use crate::progress::{ConversionProgressCallback, ProgressCallback};
use crate::store::PageStore;
use futures::Stream;
use std::path::Path;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, info};

/// Terminal state of one conversion run.
#[derive(Debug)]
pub enum RunOutcome {
    /// The run rendered every page and published them to the store.
    Completed { stats: ConversionStats },
    /// A newer request arrived mid-run; the partial output was discarded
    /// and nothing reached the store. Not an error and never user-visible.
    Superseded,
}

/// Events yielded by [`Converter::run_stream`].
///
/// `PageRendered` counters are monotone within a run. A superseded run's
/// stream ends without a terminal event.
#[derive(Debug)]
pub enum RunEvent {
    Started { total_pages: usize },
    PageRendered { completed: usize, total: usize },
    Completed { rendered_pages: usize },
    Failed { error: Pdf2ImgError },
}

/// A boxed stream of run events.
pub type EventStream = Pin<Box<dyn Stream<Item = RunEvent> + Send>>;

/// Drives conversion runs and owns the rendered-page store.
///
/// Cloning a `Converter` clones handles, not state: clones share the same
/// store and the same generation counter, so a run started on any clone
/// supersedes runs started on the others.
///
/// # Example
/// ```rust,no_run
/// use pdf2img::{Converter, OutputFormat, PdfiumEngine, RenderRequest};
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let converter = Converter::new(Arc::new(PdfiumEngine::new()?));
/// let request = RenderRequest::new("document.pdf", 150.0, OutputFormat::Png);
/// converter.run(request, None).await?;
/// println!("{} pages rendered", converter.pages().len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Converter {
    engine: Arc<dyn DocumentEngine>,
    store: PageStore,
    latest: Arc<AtomicU64>,
}

impl Converter {
    pub fn new(engine: Arc<dyn DocumentEngine>) -> Self {
        Self {
            engine,
            store: PageStore::new(),
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The store this converter publishes into.
    pub fn store(&self) -> &PageStore {
        &self.store
    }

    /// Snapshot of the last completed run's pages.
    pub fn pages(&self) -> Arc<[RenderedPage]> {
        self.store.snapshot()
    }

    /// Run one conversion for `request`.
    ///
    /// Claims a new generation immediately, superseding any in-flight run,
    /// then validates the density (the document is not opened on a bad
    /// density), resolves the source path, and renders every page in order.
    /// On success the full page set replaces the store contents in a single
    /// swap.
    ///
    /// # Errors
    /// Validation, open, and per-page render failures. A superseded run is
    /// `Ok(RunOutcome::Superseded)`, not an error.
    pub async fn run(
        &self,
        request: RenderRequest,
        progress: Option<ProgressCallback>,
    ) -> Result<RunOutcome, Pdf2ImgError> {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let started = Instant::now();

        let density_dpi = density::validate(request.density_dpi)?;
        let path = input::resolve_document(&request.path)?;
        info!(
            "Starting conversion: {} at {} DPI ({})",
            path.display(),
            density_dpi,
            request.format
        );

        let engine = Arc::clone(&self.engine);
        let latest = Arc::clone(&self.latest);
        let format = request.format;
        let worker_progress = progress.clone();

        let rendered = tokio::task::spawn_blocking(move || {
            render_run_blocking(
                engine.as_ref(),
                &path,
                density_dpi,
                format,
                generation,
                &latest,
                worker_progress,
            )
        })
        .await
        .map_err(|e| Pdf2ImgError::Internal(format!("render task panicked: {e}")))??;

        let Some(pages) = rendered else {
            debug!("Run {generation} superseded during rendering");
            return Ok(RunOutcome::Superseded);
        };

        // A newer run may have started while the final page rendered.
        if self.latest.load(Ordering::SeqCst) != generation {
            debug!("Run {generation} superseded before publish");
            return Ok(RunOutcome::Superseded);
        }

        let stats = ConversionStats {
            total_pages: pages.len(),
            rendered_pages: pages.len(),
            density_dpi,
            render_duration_ms: started.elapsed().as_millis() as u64,
        };
        self.store.publish(pages);
        info!(
            "Conversion complete: {} pages in {}ms",
            stats.rendered_pages, stats.render_duration_ms
        );
        if let Some(cb) = &progress {
            cb.on_conversion_complete(stats.rendered_pages);
        }

        Ok(RunOutcome::Completed { stats })
    }

    /// Run one conversion, yielding progress as a stream of [`RunEvent`]s.
    ///
    /// The stream terminates with `Completed` or `Failed`; a superseded
    /// run's stream simply ends.
    pub fn run_stream(&self, request: RenderRequest) -> EventStream {
        let (tx, rx) = mpsc::unbounded_channel();
        let this = self.clone();

        tokio::spawn(async move {
            let cb: ProgressCallback = Arc::new(ChannelProgress { tx: tx.clone() });
            match this.run(request, Some(cb)).await {
                Ok(RunOutcome::Completed { stats }) => {
                    let _ = tx.send(RunEvent::Completed {
                        rendered_pages: stats.rendered_pages,
                    });
                }
                Ok(RunOutcome::Superseded) => {}
                Err(error) => {
                    let _ = tx.send(RunEvent::Failed { error });
                }
            }
        });

        Box::pin(UnboundedReceiverStream::new(rx))
    }
}

/// Read page count and metadata without rendering.
pub async fn inspect(
    engine: Arc<dyn DocumentEngine>,
    path: impl AsRef<Path>,
) -> Result<DocumentInfo, Pdf2ImgError> {
    let path = input::resolve_document(path.as_ref())?;
    tokio::task::spawn_blocking(move || engine.info(&path))
        .await
        .map_err(|e| Pdf2ImgError::Internal(format!("inspect task panicked: {e}")))?
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// The blocking render loop for one run.
///
/// Returns `Ok(None)` when the run was superseded; the partially rendered
/// pages are dropped here and never merged with a newer run's output. The
/// generation is checked before *and* after each page render, so a page
/// completed after supersession is discarded without a progress event.
fn render_run_blocking(
    engine: &dyn DocumentEngine,
    path: &Path,
    density_dpi: f64,
    format: crate::config::OutputFormat,
    generation: u64,
    latest: &AtomicU64,
    progress: Option<ProgressCallback>,
) -> Result<Option<Vec<RenderedPage>>, Pdf2ImgError> {
    let is_stale = || latest.load(Ordering::SeqCst) != generation;

    let doc = engine.open(path)?;
    let total = doc.page_count();
    debug!("Document opened: {total} pages");
    if let Some(cb) = &progress {
        cb.on_conversion_start(total);
    }

    let mut pages = Vec::with_capacity(total);
    for index in 0..total {
        if is_stale() {
            return Ok(None);
        }
        let page = render::render_page(doc.as_ref(), index, density_dpi, format)?;
        if is_stale() {
            return Ok(None);
        }
        pages.push(page);
        if let Some(cb) = &progress {
            cb.on_page_rendered(index + 1, total);
        }
    }

    Ok(Some(pages))
}

/// Adapts the callback trait onto the event channel behind
/// [`Converter::run_stream`].
struct ChannelProgress {
    tx: mpsc::UnboundedSender<RunEvent>,
}

impl ConversionProgressCallback for ChannelProgress {
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = self.tx.send(RunEvent::Started { total_pages });
    }

    fn on_page_rendered(&self, completed: usize, total_pages: usize) {
        let _ = self.tx.send(RunEvent::PageRendered {
            completed,
            total: total_pages,
        });
    }
}
