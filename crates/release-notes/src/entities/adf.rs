//! Atlassian Document Format (ADF) values.
//!
//! Jira Cloud v3 stores rich-text fields as an ADF tree. Writes wrap plain
//! text in a single paragraph; reads flatten whatever tree comes back into
//! plain text for prompting.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level ADF document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdfDocument {
    pub version: u32,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub content: Vec<AdfNode>,
}

/// A node in an ADF tree. Only the shapes this tool produces are modelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AdfNode {
    Paragraph { content: Vec<AdfNode> },
    Text { text: String },
}

impl AdfDocument {
    /// Wrap `text` in a document holding one paragraph with one text node.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            version: 1,
            doc_type: "doc".to_string(),
            content: vec![AdfNode::Paragraph {
                content: vec![AdfNode::Text { text: text.into() }],
            }],
        }
    }
}

/// Node types rendered as their own line when flattened.
const BLOCK_NODES: &[&str] = &[
    "paragraph",
    "heading",
    "listItem",
    "blockquote",
    "codeBlock",
    "panel",
    "tableRow",
    "rule",
];

/// Flatten an arbitrary ADF value into plain text.
///
/// Text nodes are concatenated, block nodes end a line, `hardBreak` becomes a
/// newline. Blank lines are collapsed and the result is trimmed.
pub fn to_plain_text(value: &Value) -> String {
    let mut out = String::new();
    collect_text(value, &mut out);

    out.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(value: &Value, out: &mut String) {
    match value {
        Value::String(s) => out.push_str(s),
        Value::Array(items) => {
            for item in items {
                collect_text(item, out);
            }
        }
        Value::Object(map) => {
            let node_type = map.get("type").and_then(Value::as_str).unwrap_or_default();
            match node_type {
                "text" => {
                    if let Some(text) = map.get("text").and_then(Value::as_str) {
                        out.push_str(text);
                    }
                }
                "hardBreak" => out.push('\n'),
                "mention" | "emoji" => {
                    if let Some(text) = map
                        .get("attrs")
                        .and_then(|attrs| attrs.get("text"))
                        .and_then(Value::as_str)
                    {
                        out.push_str(text);
                    }
                }
                _ => {
                    if let Some(content) = map.get("content") {
                        collect_text(content, out);
                    }
                    if BLOCK_NODES.contains(&node_type) {
                        out.push('\n');
                    }
                }
            }
        }
        _ => {}
    }
}
