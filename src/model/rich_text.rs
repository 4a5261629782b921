use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

use super::common::ImageRef;

/// A rich-text document body: an ordered sequence of blocks.
pub type RichText = Vec<Block>;

/// One top-level unit of a rich-text body, tagged by `_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type", rename_all = "lowercase")]
pub enum Block {
    Block(TextBlock),
    Image(ImageRef),
    #[serde(other)]
    Unknown,
}

/// A paragraph, heading, quote or list item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default, rename = "listItem", skip_serializing_if = "Option::is_none")]
    pub list_item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(default)]
    pub children: Vec<Span>,
    #[serde(default, rename = "markDefs")]
    pub mark_defs: Vec<MarkDef>,
}

/// A run of text sharing the same marks.
///
/// A mark is either a decorator name (`strong`, `em`, ...) or the key of an
/// entry in the parent block's `markDefs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub marks: Vec<String>,
}

/// An annotation referenced from span marks, e.g. a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkDef {
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(default)]
    pub href: Option<String>,
}

/// Kind of list a text block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ListKind {
    Bullet,
    Number,
}

fn default_style() -> String {
    "normal".to_string()
}

impl TextBlock {
    pub fn paragraph(text: &str) -> Self {
        Self {
            style: default_style(),
            list_item: None,
            level: None,
            children: vec![Span {
                text: text.to_string(),
                marks: vec![],
            }],
            mark_defs: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_mixed_body() {
        let raw = serde_json::json!([
            {
                "_type": "block",
                "_key": "a1",
                "style": "h2",
                "children": [{ "_type": "span", "text": "Patch notes", "marks": [] }],
                "markDefs": []
            },
            {
                "_type": "block",
                "listItem": "bullet",
                "level": 1,
                "children": [{ "_type": "span", "text": "See ", "marks": [] },
                             { "_type": "span", "text": "site", "marks": ["l1"] }],
                "markDefs": [{ "_key": "l1", "_type": "link", "href": "https://example.com" }]
            },
            {
                "_type": "image",
                "asset": { "_ref": "image-abc123-1920x1080-png", "_type": "reference" }
            },
            { "_type": "youtubeEmbed", "url": "https://youtu.be/x" }
        ]);

        let body: RichText = serde_json::from_value(raw).unwrap();
        assert_eq!(body.len(), 4);

        let Block::Block(heading) = &body[0] else {
            panic!("expected text block");
        };
        assert_eq!(heading.style, "h2");

        let Block::Block(item) = &body[1] else {
            panic!("expected text block");
        };
        assert_eq!(item.list_item.as_deref(), Some("bullet"));
        assert_eq!(item.style, "normal");
        assert_eq!(item.mark_defs[0].href.as_deref(), Some("https://example.com"));

        assert_eq!(
            body[2],
            Block::Image(ImageRef::new("image-abc123-1920x1080-png"))
        );
        assert_eq!(body[3], Block::Unknown);
    }

    #[test]
    fn test_list_kind_from_str() {
        use std::str::FromStr;
        assert_eq!(ListKind::from_str("number").unwrap(), ListKind::Number);
        assert!(ListKind::from_str("checklist").is_err());
    }
}
