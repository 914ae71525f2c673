//! Error types for lsif-inspect.
//!
//! Only fatal conditions live here. Structural and shape findings made by
//! the validator are plain data in [`crate::validate::ValidationIssue`].

use std::path::PathBuf;

use thiserror::Error;

use crate::graph::ElementId;

pub type Result<T> = std::result::Result<T, LsifError>;

#[derive(Error, Debug)]
pub enum LsifError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read {}: {source}", path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input that is not valid JSON. `line` is the 1-based input line.
    #[error("malformed JSON at line {line}: {source}")]
    MalformedJson {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("element #{position} is not a JSON object")]
    NotAnObject { position: usize },

    #[error("element #{position} has no id")]
    MissingId { position: usize },

    #[error("element #{position} has an id of unsupported type: {value}")]
    InvalidId { position: usize, value: String },

    #[error("invalid regex: {0}")]
    InvalidRegex(#[from] regex::Error),

    #[error("edge {edge} references vertex {vertex}, which is not in the input")]
    MissingVertex { edge: ElementId, vertex: ElementId },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("failed to encode report: {0}")]
    EncodeReport(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_encode_error_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = LsifError::EncodeReport(source);
        assert!(err.to_string().starts_with("failed to encode report: "));
        assert!(err.source().is_some());
    }
}
