//! Graph builder: reads an LSIF dump and builds the element graph.
//!
//! Dumps come either as one JSON object per line or as a single JSON
//! array. The whole input is loaded before any processing starts.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use super::engine::ElementGraph;
use super::types::Element;
use crate::error::{LsifError, Result};

/// Layout of the input document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    /// `json` if the document starts with `[`, `line` otherwise.
    #[default]
    Auto,
    /// One JSON object per line.
    Line,
    /// A single JSON array of objects.
    Json,
}

impl InputFormat {
    /// Resolve `Auto` against the actual text.
    pub fn detect(self, text: &str) -> InputFormat {
        match self {
            InputFormat::Auto if text.trim_start().starts_with('[') => InputFormat::Json,
            InputFormat::Auto => InputFormat::Line,
            other => other,
        }
    }
}

/// Parse a whole dump held in memory, preserving element order.
pub fn parse_elements(text: &str, format: InputFormat) -> Result<Vec<Element>> {
    let format = format.detect(text);
    debug!(?format, bytes = text.len(), "parsing input");

    let elements = match format {
        InputFormat::Json => {
            let values: Vec<Value> =
                serde_json::from_str(text).map_err(|source| LsifError::MalformedJson {
                    line: source.line(),
                    source,
                })?;
            values
                .into_iter()
                .enumerate()
                .map(|(position, value)| Element::from_value(value, position))
                .collect::<Result<Vec<_>>>()?
        }
        InputFormat::Line | InputFormat::Auto => {
            let mut elements = Vec::new();
            for (index, line) in text.lines().enumerate() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let value: Value =
                    serde_json::from_str(line).map_err(|source| LsifError::MalformedJson {
                        line: index + 1,
                        source,
                    })?;
                elements.push(Element::from_value(value, elements.len())?);
            }
            elements
        }
    };

    info!(count = elements.len(), "loaded elements");
    Ok(elements)
}

/// Read a dump from any reader (typically stdin).
pub fn read_elements(mut reader: impl Read, format: InputFormat) -> Result<Vec<Element>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_elements(&text, format)
}

/// Read a dump from a file.
pub fn load_elements(path: &Path, format: InputFormat) -> Result<Vec<Element>> {
    let text = fs::read_to_string(path).map_err(|source| LsifError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    parse_elements(&text, format)
}

/// Load a dump from a file and index it.
pub fn load_graph(path: &Path, format: InputFormat) -> Result<ElementGraph> {
    let graph = ElementGraph::new(load_elements(path, format)?);
    let stats = graph.stats();
    debug!(
        vertices = stats.vertex_count,
        edges = stats.edge_count,
        unknown = stats.unknown_count,
        "loaded graph"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ElementId;
    use std::io::Write;

    const LINES: &str = r#"{"id":1,"type":"vertex","label":"project"}
{"id":2,"type":"vertex","label":"document"}

{"id":3,"type":"edge","label":"contains","outV":1,"inV":2}
"#;

    #[test]
    fn test_parse_line_format() {
        let elements = parse_elements(LINES, InputFormat::Line).unwrap();
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[2].id(), &ElementId::from("3"));
        assert!(elements[2].is_edge());
    }

    #[test]
    fn test_parse_json_array() {
        let text = r#"[
            {"id": "a", "type": "vertex", "label": "project"},
            {"id": "b", "type": "edge", "label": "contains", "outV": "a", "inV": "a"}
        ]"#;
        let elements = parse_elements(text, InputFormat::Json).unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].label(), Some("project"));
    }

    #[test]
    fn test_auto_detects_format() {
        assert_eq!(InputFormat::Auto.detect("  [{}]"), InputFormat::Json);
        assert_eq!(InputFormat::Auto.detect(LINES), InputFormat::Line);
        assert_eq!(InputFormat::Line.detect("[1]"), InputFormat::Line);

        let elements = parse_elements(LINES, InputFormat::Auto).unwrap();
        assert_eq!(elements.len(), 3);
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let text = "{\"id\":1,\"type\":\"vertex\"}\n{\"id\":2,\n";
        let err = parse_elements(text, InputFormat::Line).unwrap_err();
        assert!(matches!(err, LsifError::MalformedJson { line: 2, .. }));
    }

    #[test]
    fn test_missing_id_aborts_load() {
        let text = "{\"id\":1,\"type\":\"vertex\"}\n{\"type\":\"vertex\"}\n";
        let err = parse_elements(text, InputFormat::Line).unwrap_err();
        assert!(matches!(err, LsifError::MissingId { position: 1 }));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_elements("", InputFormat::Auto).unwrap().is_empty());
        assert!(parse_elements("[]", InputFormat::Auto).unwrap().is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(LINES.as_bytes()).unwrap();

        let graph = load_graph(file.path(), InputFormat::Auto).unwrap();
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.stats().edge_count, 1);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_elements(Path::new("/nonexistent/lsif.json"), InputFormat::Line).unwrap_err();
        assert!(matches!(err, LsifError::ReadInput { .. }));
    }

    #[test]
    fn test_read_from_reader() {
        let elements = read_elements(LINES.as_bytes(), InputFormat::Line).unwrap();
        assert_eq!(elements.len(), 3);
    }
}
