//! Rich-text to HTML rendering.
//!
//! A single table-driven renderer serves every page; pages differ only in
//! the size inline images are resolved at.

use std::str::FromStr;

use crate::cms::ImageUrlBuilder;
use crate::model::{Block, ImageRef, ListKind, MarkDef, Span, TextBlock};

/// Block style name to element.
const BLOCK_TAGS: &[(&str, &str)] = &[
    ("normal", "p"),
    ("h1", "h1"),
    ("h2", "h2"),
    ("h3", "h3"),
    ("h4", "h4"),
    ("blockquote", "blockquote"),
];

/// Decorator mark name to element.
const DECORATOR_TAGS: &[(&str, &str)] = &[
    ("strong", "strong"),
    ("em", "em"),
    ("code", "code"),
    ("underline", "u"),
    ("strike-through", "s"),
];

const FALLBACK_BLOCK_TAG: &str = "p";

/// URL schemes a link annotation may point at.
const LINK_SCHEMES: &[&str] = &["http:", "https:", "mailto:"];

/// Renders rich-text bodies to HTML with images resolved at a fixed size.
#[derive(Debug, Clone, Copy)]
pub struct RichTextRenderer {
    pub image_width: u32,
    pub image_height: u32,
}

/// Renderer for game descriptions.
pub const GAME_BODY: RichTextRenderer = RichTextRenderer {
    image_width: 1200,
    image_height: 675,
};

/// Renderer for team member bios.
pub const MEMBER_BIO: RichTextRenderer = RichTextRenderer {
    image_width: 800,
    image_height: 600,
};

impl RichTextRenderer {
    pub fn render(&self, blocks: &[Block], images: &ImageUrlBuilder) -> String {
        let mut out = String::new();
        let mut lists: Vec<ListKind> = Vec::new();

        for block in blocks {
            match block {
                Block::Block(text) if text.list_item.is_some() => {
                    render_list_item(&mut out, &mut lists, text);
                }
                Block::Block(text) => {
                    close_lists(&mut out, &mut lists, 0);
                    let tag = lookup(BLOCK_TAGS, &text.style).unwrap_or(FALLBACK_BLOCK_TAG);
                    out.push_str(&format!("<{tag}>"));
                    render_spans(&mut out, text);
                    out.push_str(&format!("</{tag}>"));
                }
                Block::Image(image) => {
                    close_lists(&mut out, &mut lists, 0);
                    self.render_image(&mut out, image, images);
                }
                Block::Unknown => {}
            }
        }

        close_lists(&mut out, &mut lists, 0);
        out
    }

    fn render_image(&self, out: &mut String, image: &ImageRef, images: &ImageUrlBuilder) {
        let Some(url) = images.url(image, self.image_width, self.image_height) else {
            return;
        };
        let alt = image.alt.as_deref().unwrap_or("Image");
        out.push_str(&format!(
            r#"<figure><img src="{}" alt="{}" width="{}" height="{}"></figure>"#,
            escape_html(&url),
            escape_html(alt),
            self.image_width,
            self.image_height
        ));
    }
}

fn lookup(table: &[(&str, &'static str)], name: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, tag)| *tag)
}

fn list_tag(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Bullet => "ul",
        ListKind::Number => "ol",
    }
}

/// Every open list holds one open `<li>`; closing a list closes both.
fn close_lists(out: &mut String, lists: &mut Vec<ListKind>, depth: usize) {
    while lists.len() > depth {
        if let Some(kind) = lists.pop() {
            out.push_str(&format!("</li></{}>", list_tag(kind)));
        }
    }
}

fn render_list_item(out: &mut String, lists: &mut Vec<ListKind>, text: &TextBlock) {
    let kind = text
        .list_item
        .as_deref()
        .and_then(|k| ListKind::from_str(k).ok())
        .unwrap_or(ListKind::Bullet);
    let level = usize::from(text.level.unwrap_or(1).max(1));

    close_lists(out, lists, level);
    if lists.len() == level {
        if lists.last() == Some(&kind) {
            out.push_str("</li>");
        } else {
            close_lists(out, lists, level - 1);
        }
    }
    while lists.len() < level {
        out.push_str(&format!("<{}>", list_tag(kind)));
        lists.push(kind);
        if lists.len() < level {
            out.push_str("<li>");
        }
    }

    out.push_str("<li>");
    render_spans(out, text);
}

fn render_spans(out: &mut String, block: &TextBlock) {
    for span in &block.children {
        render_span(out, span, &block.mark_defs);
    }
}

fn render_span(out: &mut String, span: &Span, mark_defs: &[MarkDef]) {
    let mut closing = Vec::new();

    for mark in &span.marks {
        if let Some(tag) = lookup(DECORATOR_TAGS, mark) {
            out.push_str(&format!("<{tag}>"));
            closing.push(tag);
            continue;
        }
        let link = mark_defs
            .iter()
            .find(|def| def.key == *mark && def.kind == "link");
        let href = link
            .and_then(|def| def.href.as_deref())
            .and_then(safe_href);
        if let Some(href) = href {
            out.push_str(&format!(
                r#"<a href="{}" target="_blank" rel="noopener noreferrer">"#,
                escape_html(href)
            ));
            closing.push("a");
        }
    }

    out.push_str(&escape_html(&span.text));

    for tag in closing.iter().rev() {
        out.push_str(&format!("</{tag}>"));
    }
}

/// `href` with surrounding whitespace removed, if its scheme is allowed.
fn safe_href(href: &str) -> Option<&str> {
    let href = href.trim();
    let lower = href.to_ascii_lowercase();
    LINK_SCHEMES
        .iter()
        .any(|scheme| lower.starts_with(scheme))
        .then_some(href)
}

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
