//! Pipeline stages for Markdown-to-slide conversion.
//!
//! Each submodule implements exactly one transformation step, so each is
//! testable on its own and the image resolver can be swapped without
//! touching the parsing logic.
//!
//! ## Data Flow
//!
//! ```text
//! segment ──▶ title ──▶ structure ──▶ Slide
//! (---)       (lines)   (tree + images)
//! ```
//!
//! 1. [`segment`]   — split the document on `---` lines
//! 2. [`title`]     — line-based title detection; [`clean`] strips numbering
//!    prefixes and AI-prompt annotations
//! 3. [`structure`] — Markdown tree → bullet, paragraph and image blocks;
//!    the only stage that may block, on remote images via [`images`]
//!
//! Segments are processed one after another; the 1-based position of a
//! segment is the only state shared between them (for fallback titles).

pub mod clean;
pub mod images;
pub mod segment;
pub mod structure;
pub mod title;

pub use segment::segment;

use crate::error::ImageError;
use crate::output::SkippedImage;
use crate::progress::ConversionProgressCallback;
use crate::slide::Slide;
use images::ImageResolver;
use std::path::PathBuf;
use tracing::debug;

/// Slides plus the bookkeeping the report needs.
#[derive(Debug, Default)]
pub struct ParsedDocument {
    pub slides: Vec<Slide>,
    pub fallback_titles: usize,
    pub downloaded_images: Vec<PathBuf>,
    pub skipped_images: Vec<SkippedImage>,
}

/// Parse a Markdown document into slides.
pub fn parse_slides(raw: &str, resolver: &dyn ImageResolver) -> Vec<Slide> {
    parse_document(raw, resolver, None).slides
}

/// Parse a Markdown document, reporting progress and image outcomes.
pub fn parse_document(
    raw: &str,
    resolver: &dyn ImageResolver,
    progress: Option<&dyn ConversionProgressCallback>,
) -> ParsedDocument {
    let segments = segment(raw);
    let total = segments.len();
    debug!("Document split into {} segments", total);

    if let Some(cb) = progress {
        cb.on_conversion_start(total);
    }

    let mut doc = ParsedDocument::default();

    for (idx, part) in segments.into_iter().enumerate() {
        let slide_num = idx + 1;
        let (title, body) = title::extract_title(part);
        let structured = structure::structure(body, title.is_some(), resolver);

        let title = match title.or(structured.title) {
            Some(t) => t,
            None => {
                doc.fallback_titles += 1;
                fallback_title(slide_num)
            }
        };

        for (src, reason) in structured.skipped {
            if let Some(cb) = progress {
                cb.on_image_skipped(slide_num, &src, &reason);
            }
            doc.skipped_images.push(SkippedImage {
                slide: slide_num,
                src,
                reason,
            });
        }
        doc.downloaded_images.extend(structured.downloaded);

        debug!(
            "Slide {}/{}: {:?} ({} blocks)",
            slide_num,
            total,
            title,
            structured.blocks.len()
        );
        if let Some(cb) = progress {
            cb.on_slide_complete(slide_num, total, structured.blocks.len());
        }

        doc.slides.push(Slide::new(title, structured.blocks));
    }

    if let Some(cb) = progress {
        cb.on_conversion_complete(total, doc.skipped_images.len());
    }

    doc
}

/// Synthetic title for a slide without one.
pub fn fallback_title(slide_num: usize) -> String {
    format!("Slide {slide_num}")
}

/// Resolver that refuses every image; handy for text-only parsing.
///
/// URLs are reported as [`ImageError::DownloadsDisabled`], everything else
/// as [`ImageError::NotFound`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NoImages;

impl ImageResolver for NoImages {
    fn resolve(&self, src: &str) -> Result<images::ResolvedImage, ImageError> {
        if images::is_url(src) {
            return Err(ImageError::DownloadsDisabled {
                url: src.to_string(),
            });
        }
        Err(ImageError::NotFound {
            path: PathBuf::from(src),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slide::{ContentBlock, TextBlock};

    #[test]
    fn test_no_images_reasons() {
        assert_eq!(
            NoImages.resolve("https://example.com/a.png"),
            Err(ImageError::DownloadsDisabled {
                url: "https://example.com/a.png".into()
            })
        );
        assert_eq!(
            NoImages.resolve("img/a.png"),
            Err(ImageError::NotFound {
                path: PathBuf::from("img/a.png")
            })
        );

        let doc = parse_document("# T

![x](http://host/x.png)", &NoImages, None);
        assert!(matches!(
            doc.skipped_images[0].reason,
            ImageError::DownloadsDisabled { .. }
        ));
    }

    #[test]
    fn test_end_to_end_two_slides() {
        let doc = "# Title\n\nContent here\n\n---\n\n## Second\n- a\n- b";
        let slides = parse_slides(doc, &NoImages);

        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].title, "Title");
        assert_eq!(
            slides[0].blocks,
            vec![ContentBlock::Text(TextBlock::paragraph("Content here"))]
        );
        assert_eq!(slides[1].title, "Second");
        assert_eq!(
            slides[1].blocks,
            vec![ContentBlock::Text(TextBlock::bullets(vec![
                "a".into(),
                "b".into()
            ]))]
        );
        assert!(slides.iter().all(|s| s.notes.is_none()));
    }

    #[test]
    fn test_fallback_title_uses_segment_position() {
        let doc = "# One\n---\n# Two\n---\nplain words only";
        let parsed = parse_document(doc, &NoImages, None);
        assert_eq!(parsed.slides[2].title, "Slide 3");
        assert_eq!(parsed.fallback_titles, 1);
    }

    #[test]
    fn test_fallback_index_counts_retained_segments() {
        let doc = "---\n\n---\nno title here";
        let slides = parse_slides(doc, &NoImages);
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].title, "Slide 1");
    }

    #[test]
    fn test_tree_title_used_when_line_scan_fails() {
        let doc = "one\ntwo\nthree\n\n## Late heading\n\nbody";
        let slides = parse_slides(doc, &NoImages);
        assert_eq!(slides[0].title, "Late heading");
        let texts: Vec<_> = slides[0]
            .blocks
            .iter()
            .map(|b| match b {
                ContentBlock::Text(t) => t.text.clone(),
                ContentBlock::Image(_) => String::new(),
            })
            .collect();
        assert_eq!(texts, vec!["one two three", "body"]);
    }

    #[test]
    fn test_skipped_images_reported_with_slide_number() {
        let doc = "# A\ntext\n---\n# B\n![gone](nowhere.png)";
        let parsed = parse_document(doc, &NoImages, None);
        assert_eq!(parsed.skipped_images.len(), 1);
        assert_eq!(parsed.skipped_images[0].slide, 2);
        assert_eq!(parsed.skipped_images[0].src, "nowhere.png");
        assert!(parsed.slides[1].blocks.is_empty());
    }

    #[test]
    fn test_empty_document_has_no_slides() {
        assert!(parse_slides("\n---\n", &NoImages).is_empty());
    }
}
