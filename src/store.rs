//! The rendered-page store: what the display layer shows and what export
//! reads.
//!
//! The store holds the output of the last *completed* conversion run. A run
//! publishes its pages as a single swap of an `Arc<[RenderedPage]>`, so a
//! reader either sees the previous complete set or the new complete set —
//! never a partially filled collection. Snapshots are cheap (`Arc` clone)
//! and stay valid even if a later run publishes while the snapshot is in
//! use, which is exactly what export needs: it works on the set the user
//! saw when they asked to save.

use crate::output::RenderedPage;
use std::sync::{Arc, RwLock};

/// Shared, atomically replaced collection of rendered pages.
///
/// Cloning a `PageStore` clones the handle, not the pages.
#[derive(Clone)]
pub struct PageStore {
    inner: Arc<RwLock<Arc<[RenderedPage]>>>,
}

impl PageStore {
    pub fn new() -> Self {
        let empty: Arc<[RenderedPage]> = Arc::from(Vec::new());
        Self {
            inner: Arc::new(RwLock::new(empty)),
        }
    }

    /// Replace the entire contents in one swap.
    pub fn publish(&self, pages: Vec<RenderedPage>) {
        let pages: Arc<[RenderedPage]> = Arc::from(pages);
        *self.inner.write().expect("page store lock poisoned") = pages;
    }

    /// A point-in-time view of the current contents.
    pub fn snapshot(&self) -> Arc<[RenderedPage]> {
        Arc::clone(&self.inner.read().expect("page store lock poisoned"))
    }

    pub fn len(&self) -> usize {
        self.inner.read().expect("page store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all pages (e.g. when the source document is closed).
    pub fn clear(&self) {
        self.publish(Vec::new());
    }
}

impl Default for PageStore {
    fn default() -> Self {
        Self::new()
    }
}
