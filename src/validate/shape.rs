//! Shape checking: does an element carry the fields its label requires?
//!
//! The validator only sees the [`ShapeChecker`] trait. [`JsonSchemaChecker`]
//! implements it on top of a JSON schema document holding one definition
//! per element label.

use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{LsifError, Result};
use crate::graph::Element;

/// Checks one element against the shape named by its label.
pub trait ShapeChecker {
    /// `Err` carries field-level reasons. An empty list means the element
    /// failed without detail.
    fn check_shape(&self, element: &Element, label: &str) -> std::result::Result<(), Vec<String>>;
}

/// Shapes compiled from the `definitions` (or `$defs`) of a JSON schema.
///
/// Labels are looked up exactly first, then case-insensitively, so the
/// `metaData` label finds a `MetaData` definition.
pub struct JsonSchemaChecker {
    shapes: HashMap<String, jsonschema::Validator>,
    /// Lowercased definition name -> definition name.
    folded: HashMap<String, String>,
}

impl JsonSchemaChecker {
    pub fn from_schema(schema: &Value) -> Result<Self> {
        let (section, definitions) = ["definitions", "$defs"]
            .into_iter()
            .find_map(|key| schema.get(key).and_then(Value::as_object).map(|d| (key, d)))
            .ok_or_else(|| LsifError::InvalidSchema("schema has no definitions".to_string()))?;

        let mut shapes = HashMap::with_capacity(definitions.len());
        let mut folded = HashMap::with_capacity(definitions.len());

        for name in definitions.keys() {
            let wrapper = shape_document(schema, section, definitions, name);
            let validator = jsonschema::validator_for(&wrapper)
                .map_err(|e| LsifError::InvalidSchema(format!("definition '{}': {}", name, e)))?;
            shapes.insert(name.clone(), validator);
            folded.insert(name.to_lowercase(), name.clone());
        }

        info!(shapes = shapes.len(), "compiled element shapes");
        Ok(Self { shapes, folded })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| LsifError::ReadInput {
            path: path.to_path_buf(),
            source,
        })?;
        let schema: Value = serde_json::from_str(&text)
            .map_err(|e| LsifError::InvalidSchema(format!("{}: {}", path.display(), e)))?;
        Self::from_schema(&schema)
    }

    fn shape_for(&self, label: &str) -> Option<&jsonschema::Validator> {
        self.shapes.get(label).or_else(|| {
            self.folded
                .get(&label.to_lowercase())
                .and_then(|name| self.shapes.get(name))
        })
    }
}

impl ShapeChecker for JsonSchemaChecker {
    fn check_shape(&self, element: &Element, label: &str) -> std::result::Result<(), Vec<String>> {
        let Some(shape) = self.shape_for(label) else {
            debug!(label, "no shape for label");
            return Err(vec![format!("no shape registered for label '{}'", label)]);
        };

        let reasons: Vec<String> = shape
            .iter_errors(element.as_json())
            .map(|e| {
                let path = e.instance_path.to_string();
                if path.is_empty() {
                    e.to_string()
                } else {
                    format!("{}: {}", path, e)
                }
            })
            .collect();

        if reasons.is_empty() {
            Ok(())
        } else {
            Err(reasons)
        }
    }
}

/// A standalone schema validating against one definition while keeping
/// every sibling definition reachable for `$ref`.
fn shape_document(schema: &Value, section: &str, definitions: &Map<String, Value>, name: &str) -> Value {
    let pointer = format!(
        "#/{}/{}",
        section,
        name.replace('~', "~0").replace('/', "~1")
    );
    let mut document = Map::new();
    if let Some(draft) = schema.get("$schema") {
        document.insert("$schema".to_string(), draft.clone());
    }
    document.insert(section.to_string(), Value::Object(definitions.clone()));
    document.insert("allOf".to_string(), json!([{ "$ref": pointer }]));
    Value::Object(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Value {
        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "definitions": {
                "Id": { "type": ["string", "number"] },
                "Document": {
                    "type": "object",
                    "required": ["id", "type", "label", "uri"],
                    "properties": {
                        "id": { "$ref": "#/definitions/Id" },
                        "uri": { "type": "string" }
                    }
                },
                "contains": {
                    "type": "object",
                    "required": ["outV", "inV"],
                    "properties": {
                        "outV": { "$ref": "#/definitions/Id" },
                        "inV": { "$ref": "#/definitions/Id" }
                    }
                }
            }
        })
    }

    fn element(value: Value) -> Element {
        Element::try_from(value).unwrap()
    }

    #[test]
    fn test_valid_element_passes() {
        let checker = JsonSchemaChecker::from_schema(&schema()).unwrap();
        let doc = element(json!({"id": 2, "type": "vertex", "label": "document", "uri": "file:///a.ts"}));
        assert!(checker.check_shape(&doc, "document").is_ok());
    }

    #[test]
    fn test_field_level_reasons() {
        let checker = JsonSchemaChecker::from_schema(&schema()).unwrap();
        let doc = element(json!({"id": 2, "type": "vertex", "label": "document", "uri": 5}));
        let reasons = checker.check_shape(&doc, "document").unwrap_err();
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].starts_with("/uri"), "got {:?}", reasons);
    }

    #[test]
    fn test_refs_resolve_across_definitions() {
        let checker = JsonSchemaChecker::from_schema(&schema()).unwrap();
        let edge = element(json!({"id": 3, "type": "edge", "label": "contains", "outV": 1, "inV": [2]}));
        let reasons = checker.check_shape(&edge, "contains").unwrap_err();
        assert!(reasons.iter().any(|r| r.starts_with("/inV")), "got {:?}", reasons);
    }

    #[test]
    fn test_unknown_label_has_generic_reason() {
        let checker = JsonSchemaChecker::from_schema(&schema()).unwrap();
        let range = element(json!({"id": 4, "type": "vertex", "label": "range"}));
        let reasons = checker.check_shape(&range, "range").unwrap_err();
        assert_eq!(reasons, vec!["no shape registered for label 'range'".to_string()]);
    }

    #[test]
    fn test_defs_section_is_accepted() {
        let checker = JsonSchemaChecker::from_schema(&json!({
            "$defs": { "project": { "type": "object", "required": ["kind"] } }
        }))
        .unwrap();
        let project = element(json!({"id": 1, "type": "vertex", "label": "project"}));
        let reasons = checker.check_shape(&project, "project").unwrap_err();
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("kind"), "got {:?}", reasons);
    }

    #[test]
    fn test_schema_without_definitions_is_rejected() {
        let err = JsonSchemaChecker::from_schema(&json!({"type": "object"})).err().unwrap();
        assert!(matches!(err, LsifError::InvalidSchema(_)));
    }

    #[test]
    fn test_load_from_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), schema().to_string()).unwrap();
        let checker = JsonSchemaChecker::load(file.path()).unwrap();
        let doc = element(json!({"id": 2, "type": "vertex", "label": "document", "uri": "file:///a.ts"}));
        assert!(checker.check_shape(&doc, "Document").is_ok());
        assert!(checker.check_shape(&doc, "range").is_err());
    }
}
