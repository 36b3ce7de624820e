//! Progress-callback trait for per-slide conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline finishes each slide. Most decks parse in
//! milliseconds; the callback matters for decks that pull many remote images,
//! where each download can block for up to the configured timeout.
//!
//! # Example
//!
//! ```rust
//! use md2slides::{ConversionProgressCallback, ConversionConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: Arc<AtomicUsize>,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_slide_complete(&self, slide_num: usize, total_slides: usize, block_count: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Slide {}/{} done ({} blocks)", slide_num, total_slides, block_count);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     completed: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::error::ImageError;
use std::sync::Arc;

/// Called by the conversion pipeline as it processes each slide.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. The trait is `Send + Sync` so a configuration can be
/// shared across threads, even though one conversion runs on a single thread.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once after segmentation, before any slide is built.
    ///
    /// # Arguments
    /// * `total_slides` — number of non-empty segments
    fn on_conversion_start(&self, total_slides: usize) {
        let _ = total_slides;
    }

    /// Called when a slide has been fully built.
    ///
    /// # Arguments
    /// * `slide_num`    — 1-indexed slide number
    /// * `total_slides` — total slides in the document
    /// * `block_count`  — content blocks on this slide
    fn on_slide_complete(&self, slide_num: usize, total_slides: usize, block_count: usize) {
        let _ = (slide_num, total_slides, block_count);
    }

    /// Called for every image reference that is dropped.
    fn on_image_skipped(&self, slide_num: usize, src: &str, reason: &ImageError) {
        let _ = (slide_num, src, reason);
    }

    /// Called once after all slides have been built.
    ///
    /// # Arguments
    /// * `total_slides`   — slides produced
    /// * `skipped_images` — image references that were dropped
    fn on_conversion_complete(&self, total_slides: usize, skipped_images: usize) {
        let _ = (total_slides, skipped_images);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{parse_document, NoImages};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        started_total: AtomicUsize,
        completes: AtomicUsize,
        skipped: AtomicUsize,
        completed_total: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_conversion_start(&self, total_slides: usize) {
            self.started_total.store(total_slides, Ordering::SeqCst);
        }

        fn on_slide_complete(&self, _slide_num: usize, _total: usize, _blocks: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_image_skipped(&self, _slide_num: usize, _src: &str, _reason: &ImageError) {
            self.skipped.fetch_add(1, Ordering::SeqCst);
        }

        fn on_conversion_complete(&self, total_slides: usize, _skipped: usize) {
            self.completed_total.store(total_slides, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_conversion_start(5);
        cb.on_slide_complete(1, 5, 3);
        cb.on_image_skipped(
            2,
            "x.png",
            &ImageError::NotFound {
                path: "x.png".into(),
            },
        );
        cb.on_conversion_complete(5, 1);
    }

    #[test]
    fn tracking_callback_receives_pipeline_events() {
        let tracker = TrackingCallback::default();
        let doc = "# A\n---\n# B\n![x](missing.png)\n---\n# C";

        parse_document(doc, &NoImages, Some(&tracker));

        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.skipped.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.completed_total.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn ConversionProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_conversion_start(10);
        cb.on_slide_complete(1, 10, 2);
    }
}
