//! Conversion output: the slide list plus a report of what happened to images.
//!
//! The parser itself only returns slides. The report exists so callers can
//! find out which image references were dropped and which temp files were
//! created on their behalf; downloaded images are never deleted by the
//! library, ownership passes to the caller together with this report.

use crate::error::ImageError;
use crate::slide::Slide;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Everything produced by one conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    pub slides: Vec<Slide>,
    pub report: ConversionReport,
}

/// Summary of a conversion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionReport {
    /// Number of slides produced (one per non-empty segment).
    pub slide_count: usize,
    /// Total content blocks across all slides.
    pub block_count: usize,
    /// Slides that got a synthetic `"Slide N"` title.
    pub fallback_titles: usize,
    /// Temp files created for remote images, in the order they were fetched.
    pub downloaded_images: Vec<PathBuf>,
    /// Image references that were dropped.
    pub skipped_images: Vec<SkippedImage>,
    /// Wall-clock time of the parse in milliseconds.
    pub duration_ms: u64,
}

/// An image reference that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedImage {
    /// 1-indexed slide number.
    pub slide: usize,
    /// The `src` exactly as written in the Markdown.
    pub src: String,
    pub reason: ImageError,
}

impl ConversionReport {
    /// Delete every downloaded temp file listed in this report.
    ///
    /// Returns the number of files removed. Files that are already gone are
    /// ignored.
    pub fn cleanup(&mut self) -> usize {
        let mut removed = 0;
        for path in self.downloaded_images.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    debug!("Removed downloaded image {}", path.display());
                    removed += 1;
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("Could not remove {}: {}", path.display(), e),
            }
        }
        removed
    }
}
