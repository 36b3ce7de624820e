//! Content structuring: Markdown body → ordered content blocks.
//!
//! The body is parsed with `pulldown-cmark` into a small arena tree whose node
//! ids follow document order. Block generation then runs in two passes over
//! that immutable tree:
//!
//! 1. locate the title element (only when the line scan found no title),
//! 2. build blocks from every node except the title element's subtree.
//!
//! Blocks are emitted by node type, not by document position: one bullet
//! block holding every list item comes first, then one block per paragraph,
//! then the images. A body that interleaves paragraph, list, paragraph is
//! therefore reordered to list, paragraph, paragraph. Paragraphs of loose
//! list items belong to their bullet rather than becoming paragraph blocks,
//! and a parent item's bullet leaves out the text of its nested list.
//!
//! Raw HTML `<img>` tags count as images just like `![alt](src)`.

use super::clean::{clean_text, clean_title};
use super::images::{ImageResolver, ResolvedImage};
use crate::error::ImageError;
use crate::slide::{ContentBlock, ImageBlock, TextBlock};
use once_cell::sync::Lazy;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag};
use regex::Regex;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Result of structuring one slide body.
#[derive(Debug, Default)]
pub struct Structured {
    /// Title recovered from the tree, if the caller had none.
    pub title: Option<String>,
    pub blocks: Vec<ContentBlock>,
    /// Temp files created while resolving remote images.
    pub downloaded: Vec<PathBuf>,
    /// Image sources that were dropped, with the reason.
    pub skipped: Vec<(String, ImageError)>,
}

/// Convert a slide body into content blocks.
///
/// When `title_found` is false the first level 1–3 heading or bold element
/// becomes the title and is left out of the blocks.
pub fn structure(remainder: &str, title_found: bool, resolver: &dyn ImageResolver) -> Structured {
    let tree = MarkdownTree::parse(remainder);
    let mut out = Structured::default();

    // ── Pass 1: title element ────────────────────────────────────────────
    let title_node = if title_found { None } else { tree.title_node() };
    if let Some(id) = title_node {
        let title = clean_title(&tree.text(id, TextScope::Full));
        debug!("Title recovered from Markdown tree: {:?}", title);
        if !title.is_empty() {
            out.title = Some(title);
        }
    }
    let visible = |id: NodeId| title_node.is_none_or(|t| !tree.is_within(id, t));

    // ── Pass 2: bullets ──────────────────────────────────────────────────
    let bullets: Vec<String> = tree
        .ids_of(|k| matches!(k, NodeKind::Item))
        .filter(|&id| visible(id))
        .map(|id| clean_text(&tree.text_excluding(id, TextScope::OwnItem, title_node)))
        .filter(|b| !b.is_empty())
        .collect();
    if !bullets.is_empty() {
        out.blocks.push(TextBlock::bullets(bullets).into());
    }

    // ── Pass 2: paragraphs ───────────────────────────────────────────────
    for id in tree.ids_of(|k| matches!(k, NodeKind::Paragraph)) {
        if !visible(id) || tree.has_ancestor(id, |k| matches!(k, NodeKind::Item)) {
            continue;
        }
        let text = clean_text(&tree.text_excluding(id, TextScope::Full, title_node));
        if !text.is_empty() {
            out.blocks.push(TextBlock::paragraph(text).into());
        }
    }

    // ── Pass 2: images ───────────────────────────────────────────────────
    for id in tree.ids_of(|k| matches!(k, NodeKind::Image { .. })) {
        if !visible(id) {
            continue;
        }
        let NodeKind::Image { src } = &tree.nodes[id].kind else {
            continue;
        };
        match resolver.resolve(src) {
            Ok(resolved) => {
                if let ResolvedImage::Downloaded(path) = &resolved {
                    out.downloaded.push(path.clone());
                }
                let alt = tree.text(id, TextScope::ImageAlt).trim().to_string();
                out.blocks.push(
                    ImageBlock {
                        src: resolved.into_path(),
                        alt,
                    }
                    .into(),
                );
            }
            Err(e) => {
                warn!("Skipping image {}: {}", src, e);
                out.skipped.push((src.clone(), e));
            }
        }
    }

    out
}

// ── Markdown tree ────────────────────────────────────────────────────────────

type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind {
    Root,
    Heading(HeadingLevel),
    Paragraph,
    List,
    Item,
    Strong,
    Image { src: String },
    /// Any other container (emphasis, link, block quote, table, …).
    Other,
}

#[derive(Debug)]
enum Child {
    Node(NodeId),
    Text(String),
}

#[derive(Debug)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<Child>,
}

/// Which descendants contribute to a node's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextScope {
    /// Everything except image alt text.
    Full,
    /// Like `Full`, but nested lists are left to their own items.
    OwnItem,
    /// Everything, alt text included (used on image nodes).
    ImageAlt,
}

/// Arena tree; node ids are assigned in document (pre-)order.
struct MarkdownTree {
    nodes: Vec<Node>,
}

impl MarkdownTree {
    fn parse(markdown: &str) -> Self {
        let mut nodes = vec![Node {
            kind: NodeKind::Root,
            parent: None,
            children: Vec::new(),
        }];
        let mut stack: Vec<NodeId> = vec![0];

        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        for event in Parser::new_ext(markdown, options) {
            let current = *stack.last().unwrap_or(&0);
            match event {
                Event::Start(tag) => {
                    let kind = match tag {
                        Tag::Heading { level, .. } => NodeKind::Heading(level),
                        Tag::Paragraph => NodeKind::Paragraph,
                        Tag::List(_) => NodeKind::List,
                        Tag::Item => NodeKind::Item,
                        Tag::Strong => NodeKind::Strong,
                        Tag::Image { dest_url, .. } => NodeKind::Image {
                            src: dest_url.into_string(),
                        },
                        _ => NodeKind::Other,
                    };
                    let id = nodes.len();
                    nodes.push(Node {
                        kind,
                        parent: Some(current),
                        children: Vec::new(),
                    });
                    nodes[current].children.push(Child::Node(id));
                    stack.push(id);
                }
                Event::End(_) => {
                    if stack.len() > 1 {
                        stack.pop();
                    }
                }
                Event::Text(t) | Event::Code(t) => {
                    nodes[current].children.push(Child::Text(t.into_string()));
                }
                Event::SoftBreak | Event::HardBreak => {
                    nodes[current].children.push(Child::Text("\n".to_string()));
                }
                Event::Html(html) | Event::InlineHtml(html) => {
                    for (src, alt) in html_images(&html) {
                        let id = nodes.len();
                        nodes.push(Node {
                            kind: NodeKind::Image { src },
                            parent: Some(current),
                            children: vec![Child::Text(alt)],
                        });
                        nodes[current].children.push(Child::Node(id));
                    }
                }
                _ => {}
            }
        }

        Self { nodes }
    }

    /// Ids of all nodes matching `pred`, in document order.
    fn ids_of<'a>(&'a self, pred: impl Fn(&NodeKind) -> bool + 'a) -> impl Iterator<Item = NodeId> + 'a {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, n)| pred(&n.kind))
            .map(|(id, _)| id)
    }

    /// First level 1–3 heading or bold element in document order.
    fn title_node(&self) -> Option<NodeId> {
        self.ids_of(|k| match k {
            NodeKind::Heading(level) => {
                matches!(level, HeadingLevel::H1 | HeadingLevel::H2 | HeadingLevel::H3)
            }
            NodeKind::Strong => true,
            _ => false,
        })
        .next()
    }

    /// True when `id` is `root` or one of its descendants.
    fn is_within(&self, id: NodeId, root: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == root {
                return true;
            }
            cur = self.nodes[c].parent;
        }
        false
    }

    fn has_ancestor(&self, id: NodeId, pred: impl Fn(&NodeKind) -> bool) -> bool {
        let mut cur = self.nodes[id].parent;
        while let Some(c) = cur {
            if pred(&self.nodes[c].kind) {
                return true;
            }
            cur = self.nodes[c].parent;
        }
        false
    }

    fn text(&self, id: NodeId, scope: TextScope) -> String {
        self.text_excluding(id, scope, None)
    }

    /// Concatenated text of `id`, leaving out the `skip` subtree.
    fn text_excluding(&self, id: NodeId, scope: TextScope, skip: Option<NodeId>) -> String {
        let mut out = String::new();
        self.collect_text(id, scope, skip, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, scope: TextScope, skip: Option<NodeId>, out: &mut String) {
        for child in &self.nodes[id].children {
            match child {
                Child::Text(t) => out.push_str(t),
                Child::Node(c) => {
                    let c = *c;
                    if skip == Some(c) {
                        continue;
                    }
                    match (&self.nodes[c].kind, scope) {
                        (NodeKind::Image { .. }, TextScope::Full | TextScope::OwnItem) => {}
                        (NodeKind::List, TextScope::OwnItem) => {}
                        (NodeKind::Paragraph, _) => {
                            // Loose list items hold several paragraphs.
                            if !out.is_empty() {
                                out.push(' ');
                            }
                            self.collect_text(c, scope, skip, out);
                        }
                        _ => self.collect_text(c, scope, skip, out),
                    }
                }
            }
        }
    }
}

// ── Raw HTML images ──────────────────────────────────────────────────────────

static RE_IMG_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<img\b[^>]*>").unwrap());
static RE_IMG_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)\b(src|alt)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#).unwrap()
});

/// `(src, alt)` of every `<img>` tag in an HTML fragment. Tags without a
/// `src` yield an empty source, which the resolver then rejects.
fn html_images(html: &str) -> Vec<(String, String)> {
    RE_IMG_TAG
        .find_iter(html)
        .map(|tag| {
            let mut src = String::new();
            let mut alt = String::new();
            for caps in RE_IMG_ATTR.captures_iter(tag.as_str()) {
                let value = caps
                    .get(2)
                    .or_else(|| caps.get(3))
                    .or_else(|| caps.get(4))
                    .map_or("", |m| m.as_str())
                    .to_string();
                if caps[1].eq_ignore_ascii_case("src") {
                    src = value;
                } else {
                    alt = value;
                }
            }
            (src, alt)
        })
        .collect()
}
