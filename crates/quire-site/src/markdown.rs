//! Markdown to HTML.
//!
//! The build treats markdown rendering as an external collaborator behind
//! [`ContentRenderer`]. [`MarkdownRenderer`] is the `pulldown-cmark` backed
//! implementation used by default.

use std::collections::HashMap;
use std::ops::RangeInclusive;

use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};

use crate::page::PageHeader;

/// Output of rendering one page body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderedContent {
    /// HTML fragment.
    pub html: String,
    /// Text of the first H1 heading.
    pub title: Option<String>,
    /// Headings within the outline level range, in document order.
    pub headers: Vec<PageHeader>,
    /// Number of top-level nodes in `html`.
    pub nodes: usize,
}

/// Converts page bodies to HTML.
pub trait ContentRenderer: Send + Sync {
    /// Render a markdown body (front matter already removed).
    fn render(&self, markdown: &str) -> RenderedContent;
}

/// `pulldown-cmark` renderer with GFM tables, task lists, strikethrough,
/// footnotes and `{#id}` heading attributes.
///
/// Every heading gets an `id` (explicit or slugified from its text); duplicate
/// slugs get `-1`, `-2`, … suffixes.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    outline: RangeInclusive<u8>,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self { outline: 2..=3 }
    }
}

impl MarkdownRenderer {
    /// Create a renderer recording `h2` and `h3` headings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Heading levels to record as page headers, `[lo, hi]`.
    #[must_use]
    pub fn with_outline(mut self, outline: [u8; 2]) -> Self {
        self.outline = outline[0]..=outline[1];
        self
    }

    fn parser_options() -> Options {
        Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_HEADING_ATTRIBUTES
    }
}

impl ContentRenderer for MarkdownRenderer {
    fn render(&self, markdown: &str) -> RenderedContent {
        let mut events: Vec<Event<'_>> = Parser::new_ext(markdown, Self::parser_options()).collect();
        let mut slugs = SlugCounter::default();
        let mut title = None;
        let mut headers = Vec::new();

        for i in 0..events.len() {
            let Event::Start(Tag::Heading { level, id, .. }) = &events[i] else {
                continue;
            };
            let level = heading_level_to_num(*level);
            let text = heading_text(&events[i + 1..]);
            let slug = match id {
                Some(id) => slugs.reserve(id),
                None => slugs.unique(&slugify(&text)),
            };
            if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
                *id = Some(CowStr::from(slug.clone()));
            }

            if level == 1 && title.is_none() {
                title = Some(text.clone());
            }
            if self.outline.contains(&level) {
                headers.push(PageHeader {
                    level,
                    title: text,
                    slug,
                });
            }
        }

        let nodes = count_top_level_nodes(&events);
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());

        RenderedContent {
            html: out,
            title,
            headers,
            nodes,
        }
    }
}

/// Plain text of the heading starting right before `events`.
fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            _ => {}
        }
    }
    text.trim().to_owned()
}

fn count_top_level_nodes(events: &[Event<'_>]) -> usize {
    let mut depth = 0usize;
    let mut nodes = 0;
    for event in events {
        match event {
            Event::Start(_) => {
                if depth == 0 {
                    nodes += 1;
                }
                depth += 1;
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            _ if depth == 0 => nodes += 1,
            _ => {}
        }
    }
    nodes
}

/// Hands out unique heading ids.
#[derive(Default)]
struct SlugCounter {
    seen: HashMap<String, usize>,
}

impl SlugCounter {
    fn unique(&mut self, base: &str) -> String {
        let count = self.seen.entry(base.to_owned()).or_default();
        let id = match *count {
            0 => base.to_owned(),
            n => format!("{base}-{n}"),
        };
        *count += 1;
        id
    }

    fn reserve(&mut self, id: &str) -> String {
        *self.seen.entry(id.to_owned()).or_default() += 1;
        id.to_owned()
    }
}

/// Convert heading text to an anchor slug.
///
/// Lowercases, keeps letters and digits of any script, and joins words with
/// single dashes.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true;

    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            result.extend(c.to_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }
    result
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
