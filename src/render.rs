//! DOT rendering of a neighborhood subgraph.
//!
//! One declaration line per vertex (`[id] label`, plus payload fields in
//! verbose mode) and one line per edge, in subgraph order.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::graph::{Element, ElementId, Subgraph};

/// Drop one payload field from vertices with one label in verbose output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldExclusion {
    pub label: String,
    pub field: String,
}

impl FieldExclusion {
    pub fn new(label: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            field: field.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub graph_name: String,
    /// Include every payload field of each vertex.
    pub verbose: bool,
    pub exclusions: Vec<FieldExclusion>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            graph_name: "LSIF".to_string(),
            verbose: false,
            // Document contents are the whole source file, base64 encoded.
            exclusions: vec![FieldExclusion::new("document", "contents")],
        }
    }
}

impl RenderOptions {
    fn excludes(&self, label: Option<&str>, field: &str) -> bool {
        label.is_some_and(|label| {
            self.exclusions
                .iter()
                .any(|rule| rule.label == label && rule.field == field)
        })
    }
}

/// Render `subgraph` as a `digraph` description.
pub fn render_dot(subgraph: &Subgraph<'_>, options: &RenderOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "digraph {} {{", dot_id(&options.graph_name));

    for (id, vertex) in &subgraph.vertices {
        let _ = writeln!(
            out,
            "  {} [label=\"{}\"]",
            node_id(id),
            escape_dot(&vertex_text(id, vertex, options))
        );
    }

    for edge in subgraph.edges.values() {
        let (Some(out_v), Some(in_v)) = (edge.out_v(), edge.in_v()) else {
            continue;
        };
        let _ = writeln!(
            out,
            "  {} -> {} [label=\"{}\"]",
            node_id(out_v),
            node_id(in_v),
            escape_dot(edge.label().unwrap_or_default())
        );
    }

    out.push_str("}\n");
    out
}

fn vertex_text(id: &ElementId, vertex: &Element, options: &RenderOptions) -> String {
    let label = vertex.label();
    let mut text = format!("[{}] {}", id, label.unwrap_or_default());
    if options.verbose {
        for (key, value) in vertex.extra_fields() {
            if options.excludes(label, key) {
                continue;
            }
            let _ = write!(text, "\n{} = {}", key, value);
        }
    }
    text
}

fn node_id(id: &ElementId) -> String {
    if id.is_numeric() {
        id.to_string()
    } else {
        format!("\"{}\"", escape_dot(id.as_str()))
    }
}

fn dot_id(name: &str) -> String {
    let plain = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        name.to_string()
    } else {
        format!("\"{}\"", escape_dot(name))
    }
}

/// Escape text for a double-quoted DOT string.
pub fn escape_dot(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}
