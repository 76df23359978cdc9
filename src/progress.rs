//! Progress-callback trait for per-diagram extraction events.
//!
//! Set an [`Arc<dyn ExtractProgressCallback>`] on
//! [`crate::config::ExtractConfigBuilder::progress_callback`] and the
//! pipeline reports each diagram as it compiles and converts. The library
//! stays unaware of where the events go; the `extract-tikz` binary forwards
//! them to an indicatif bar, and a build system could just as well append
//! them to a log. The trait is `Send + Sync` so configs holding a callback
//! remain shareable across threads.
//!
//! # Example
//!
//! ```rust
//! use docfigs::{ExtractProgressCallback, ExtractConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: Arc<AtomicUsize>,
//! }
//!
//! impl ExtractProgressCallback for CountingCallback {
//!     fn on_diagram_complete(&self, index: usize, total: usize, svg_bytes: u64) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Diagram {}/{} done ({} bytes)", index + 1, total, svg_bytes);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     completed: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = ExtractConfig::builder()
//!     .progress_callback(counter as Arc<dyn ExtractProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the extraction pipeline as it processes each diagram.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Diagrams are processed strictly sequentially, so
/// events for one diagram always complete before the next begins.
pub trait ExtractProgressCallback: Send + Sync {
    /// Called once after scanning, before any diagram is compiled.
    ///
    /// # Arguments
    /// * `selected` — number of diagrams that will be processed
    fn on_extract_start(&self, selected: usize) {
        let _ = selected;
    }

    /// Called just before a diagram is compiled.
    ///
    /// # Arguments
    /// * `index` — 0-indexed diagram number
    /// * `total` — diagrams selected for this run
    fn on_diagram_start(&self, index: usize, total: usize) {
        let _ = (index, total);
    }

    /// Called when a diagram's SVG has been written.
    ///
    /// # Arguments
    /// * `index`     — 0-indexed diagram number
    /// * `total`     — diagrams selected for this run
    /// * `svg_bytes` — size of the produced SVG on disk
    fn on_diagram_complete(&self, index: usize, total: usize, svg_bytes: u64) {
        let _ = (index, total, svg_bytes);
    }

    /// Called when a diagram fails to compile or convert.
    ///
    /// # Arguments
    /// * `index` — 0-indexed diagram number
    /// * `total` — diagrams selected for this run
    /// * `error` — human-readable error description
    fn on_diagram_error(&self, index: usize, total: usize, error: &str) {
        let _ = (index, total, error);
    }

    /// Called once after all diagrams have been attempted.
    ///
    /// # Arguments
    /// * `total`     — diagrams selected for this run
    /// * `converted` — diagrams that produced an SVG
    fn on_extract_complete(&self, total: usize, converted: usize) {
        let _ = (total, converted);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl ExtractProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractConfig`].
pub type ProgressCallback = Arc<dyn ExtractProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
        selected: AtomicUsize,
        converted: AtomicUsize,
    }

    impl ExtractProgressCallback for TrackingCallback {
        fn on_extract_start(&self, selected: usize) {
            self.selected.store(selected, Ordering::SeqCst);
        }

        fn on_diagram_start(&self, _index: usize, _total: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_diagram_complete(&self, _index: usize, _total: usize, _svg_bytes: u64) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_diagram_error(&self, _index: usize, _total: usize, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_extract_complete(&self, _total: usize, converted: usize) {
            self.converted.store(converted, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_extract_start(3);
        cb.on_diagram_start(0, 3);
        cb.on_diagram_complete(0, 3, 42);
        cb.on_diagram_error(1, 3, "some error");
        cb.on_extract_complete(3, 2);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            starts: AtomicUsize::new(0),
            completes: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            selected: AtomicUsize::new(0),
            converted: AtomicUsize::new(0),
        };

        tracker.on_extract_start(3);
        assert_eq!(tracker.selected.load(Ordering::SeqCst), 3);

        tracker.on_diagram_start(0, 3);
        tracker.on_diagram_complete(0, 3, 100);
        tracker.on_diagram_start(1, 3);
        tracker.on_diagram_complete(1, 3, 200);
        tracker.on_diagram_start(2, 3);
        tracker.on_diagram_error(2, 3, "pdflatex failed");

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);

        tracker.on_extract_complete(3, 2);
        assert_eq!(tracker.converted.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn ExtractProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_extract_start(10);
        cb.on_diagram_start(0, 10);
        cb.on_diagram_complete(0, 10, 512);
    }
}
