//! Deck building: hand slide records to a presentation writer.
//!
//! Writing an actual presentation container is not this crate's job. What is
//! fixed is how a slide list maps onto any writer, and [`build_deck`] encodes
//! that mapping once so every [`DeckBuilder`] implementation gets the same
//! layout rules:
//!
//! * one slide per record, in list order
//! * the first slide uses [`SlideLayout::Title`], all others
//!   [`SlideLayout::TitleAndContent`]
//! * each bullet becomes its own body line at indent level 0
//! * each plain text block becomes one body line
//! * each image is placed at [`Placement::DEFAULT`]
//! * speaker notes are set only when present and non-empty
//!
//! [`OutlineBuilder`] is the bundled writer: a plain-text outline, used by the
//! CLI's `--format outline`.

use crate::slide::{ContentBlock, Slide};
use std::fmt::Write as _;
use std::path::Path;

/// English Metric Units per inch, the unit presentation formats position in.
pub const EMU_PER_INCH: i64 = 914_400;

/// Master layout of a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideLayout {
    /// Title slide; used for the first slide only.
    Title,
    /// Title plus body placeholder.
    TitleAndContent,
}

/// Position of a picture, top-left corner in EMU. Size is left to the writer
/// (native image size).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub left: i64,
    pub top: i64,
}

impl Placement {
    /// One inch from the left, two from the top.
    pub const DEFAULT: Placement = Placement {
        left: EMU_PER_INCH,
        top: 2 * EMU_PER_INCH,
    };
}

/// A presentation writer driven by [`build_deck`].
///
/// Calls always arrive as `add_slide` followed by that slide's body lines,
/// pictures and notes.
pub trait DeckBuilder {
    type Error;

    fn add_slide(&mut self, layout: SlideLayout, title: &str) -> Result<(), Self::Error>;

    /// Add one body line at the given indent level.
    fn add_paragraph(&mut self, text: &str, level: u8) -> Result<(), Self::Error>;

    fn add_picture(&mut self, src: &Path, placement: Placement) -> Result<(), Self::Error>;

    fn set_notes(&mut self, notes: &str) -> Result<(), Self::Error>;
}

/// Feed `slides` into `builder` following the layout rules above.
pub fn build_deck<B: DeckBuilder>(slides: &[Slide], builder: &mut B) -> Result<(), B::Error> {
    for (idx, slide) in slides.iter().enumerate() {
        let layout = if idx == 0 {
            SlideLayout::Title
        } else {
            SlideLayout::TitleAndContent
        };
        builder.add_slide(layout, &slide.title)?;

        for block in &slide.blocks {
            match block {
                ContentBlock::Text(text) if text.is_bullet_list() => {
                    for bullet in &text.bullets {
                        builder.add_paragraph(bullet, 0)?;
                    }
                }
                ContentBlock::Text(text) => builder.add_paragraph(&text.text, 0)?,
                ContentBlock::Image(image) => builder.add_picture(&image.src, Placement::DEFAULT)?,
            }
        }

        if let Some(notes) = slide.notes.as_deref().filter(|n| !n.is_empty()) {
            builder.set_notes(notes)?;
        }
    }
    Ok(())
}

/// Renders a deck as an indented plain-text outline.
///
/// ```text
/// 1. Intro
///    - first point
///    [image] /tmp/md2slides-x.png
/// ```
#[derive(Debug, Default)]
pub struct OutlineBuilder {
    out: String,
    slides: usize,
}

impl OutlineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the builder and return the outline text.
    pub fn finish(self) -> String {
        self.out
    }
}

impl DeckBuilder for OutlineBuilder {
    type Error = std::fmt::Error;

    fn add_slide(&mut self, _layout: SlideLayout, title: &str) -> Result<(), Self::Error> {
        if self.slides > 0 {
            self.out.push('\n');
        }
        self.slides += 1;
        writeln!(self.out, "{}. {}", self.slides, title)
    }

    fn add_paragraph(&mut self, text: &str, level: u8) -> Result<(), Self::Error> {
        let indent = "  ".repeat(usize::from(level));
        writeln!(self.out, "   {indent}- {text}")
    }

    fn add_picture(&mut self, src: &Path, _placement: Placement) -> Result<(), Self::Error> {
        writeln!(self.out, "   [image] {}", src.display())
    }

    fn set_notes(&mut self, notes: &str) -> Result<(), Self::Error> {
        writeln!(self.out, "   notes: {notes}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slide::{ImageBlock, TextBlock};
    use std::path::PathBuf;

    /// Records every call for inspection.
    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl DeckBuilder for Recorder {
        type Error = ();

        fn add_slide(&mut self, layout: SlideLayout, title: &str) -> Result<(), ()> {
            self.0.push(format!("slide {layout:?} {title}"));
            Ok(())
        }

        fn add_paragraph(&mut self, text: &str, level: u8) -> Result<(), ()> {
            self.0.push(format!("p{level} {text}"));
            Ok(())
        }

        fn add_picture(&mut self, src: &Path, placement: Placement) -> Result<(), ()> {
            self.0
                .push(format!("pic {} @{},{}", src.display(), placement.left, placement.top));
            Ok(())
        }

        fn set_notes(&mut self, notes: &str) -> Result<(), ()> {
            self.0.push(format!("notes {notes}"));
            Ok(())
        }
    }

    fn sample() -> Vec<Slide> {
        let mut second = Slide::new(
            "Details",
            vec![
                TextBlock::bullets(vec!["a".into(), "b".into()]).into(),
                TextBlock::paragraph("para").into(),
                ImageBlock {
                    src: PathBuf::from("/img/x.png"),
                    alt: "x".into(),
                }
                .into(),
            ],
        );
        second.notes = Some("say hi".into());
        vec![Slide::new("Cover", vec![]), second]
    }

    #[test]
    fn build_deck_follows_layout_rules() {
        let mut rec = Recorder::default();
        build_deck(&sample(), &mut rec).unwrap();
        assert_eq!(
            rec.0,
            vec![
                "slide Title Cover",
                "slide TitleAndContent Details",
                "p0 a",
                "p0 b",
                "p0 para",
                "pic /img/x.png @914400,1828800",
                "notes say hi",
            ]
        );
    }

    #[test]
    fn empty_notes_not_set() {
        let mut slide = Slide::new("Only", vec![]);
        slide.notes = Some(String::new());
        let mut rec = Recorder::default();
        build_deck(&[slide], &mut rec).unwrap();
        assert_eq!(rec.0, vec!["slide Title Only"]);
    }

    #[test]
    fn outline_rendering() {
        let mut outline = OutlineBuilder::new();
        build_deck(&sample(), &mut outline).unwrap();
        let text = outline.finish();
        assert_eq!(
            text,
            "1. Cover\n\n2. Details\n   - a\n   - b\n   - para\n   [image] /img/x.png\n   notes: say hi\n"
        );
    }
}
