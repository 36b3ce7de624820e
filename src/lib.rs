//! # md2slides
//!
//! Split a Markdown document into structured slide records ready for a
//! presentation writer.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Markdown
//!  │
//!  ├─ 1. Segment    split on lines holding exactly `---`
//!  ├─ 2. Title      `#` heading / `**bold**` line / `Slide N:` in the first 3 lines
//!  ├─ 3. Clean      drop `Slide N:` prefixes, stray `*`, `(AI prompt: …)` notes
//!  ├─ 4. Structure  bullets → paragraphs → images (remote images downloaded)
//!  └─ 5. Output     Vec<Slide> + report of downloaded / skipped images
//! ```
//!
//! A slide without any title marker gets the first heading or bold element of
//! its body, or failing that `"Slide N"`.
//!
//! ## Quick Start
//!
//! ```rust
//! use md2slides::{convert_str, ConversionConfig, ContentBlock};
//!
//! let md = "# Hello\n\nWelcome!\n\n---\n\n## Agenda\n- intro\n- demo";
//! let config = ConversionConfig::builder().download_images(false).build().unwrap();
//! let output = convert_str(md, &config).unwrap();
//!
//! assert_eq!(output.slides.len(), 2);
//! assert_eq!(output.slides[1].title, "Agenda");
//! assert!(matches!(&output.slides[1].blocks[0], ContentBlock::Text(t) if t.bullets.len() == 2));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `md2slides` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod deck;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod slide;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert_file, convert_str, convert_to_file};
pub use deck::{build_deck, DeckBuilder, OutlineBuilder, Placement, SlideLayout};
pub use error::{ImageError, Md2SlidesError};
pub use output::{ConversionOutput, ConversionReport, SkippedImage};
pub use pipeline::images::{ImageResolver, ResolvedImage, StandardResolver};
pub use pipeline::{parse_slides, NoImages};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use slide::{ContentBlock, ImageBlock, Slide, TextBlock};
