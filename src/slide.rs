//! The slide model produced by the parser.
//!
//! A [`Slide`] is the renderer-ready form of one Markdown segment. Its body is
//! an ordered list of [`ContentBlock`]s, a closed sum type that the deck
//! builder dispatches on with `match` (see [`crate::deck::build_deck`]).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One slide: a title, its content blocks, and optional speaker notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    /// Never empty; falls back to `"Slide N"` when the segment has no title.
    pub title: String,
    /// Content in display order.
    pub blocks: Vec<ContentBlock>,
    /// Speaker notes. The parser never fills this in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Slide {
    pub fn new(title: impl Into<String>, blocks: Vec<ContentBlock>) -> Self {
        Self {
            title: title.into(),
            blocks,
            notes: None,
        }
    }

    /// Iterate over the image blocks of this slide.
    pub fn images(&self) -> impl Iterator<Item = &ImageBlock> {
        self.blocks.iter().filter_map(|b| match b {
            ContentBlock::Image(img) => Some(img),
            ContentBlock::Text(_) => None,
        })
    }
}

/// A unit of slide content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text(TextBlock),
    Image(ImageBlock),
}

/// Either a single paragraph (`text` set, `bullets` empty) or a bullet list
/// (`bullets` non-empty, `text` empty). Use the constructors to keep the two
/// modes exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bullets: Vec<String>,
}

impl TextBlock {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bullets: Vec::new(),
        }
    }

    pub fn bullets(bullets: Vec<String>) -> Self {
        Self {
            text: String::new(),
            bullets,
        }
    }

    pub fn is_bullet_list(&self) -> bool {
        !self.bullets.is_empty()
    }
}

/// An image whose `src` has already been resolved to a local file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBlock {
    pub src: PathBuf,
    #[serde(default)]
    pub alt: String,
}

impl From<TextBlock> for ContentBlock {
    fn from(b: TextBlock) -> Self {
        ContentBlock::Text(b)
    }
}

impl From<ImageBlock> for ContentBlock {
    fn from(b: ImageBlock) -> Self {
        ContentBlock::Image(b)
    }
}
