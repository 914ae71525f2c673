//! Core types for the LSIF element graph.
//!
//! An LSIF dump is an ordered stream of vertices and edges. Each element is
//! kept together with its original JSON object so that filters, reports and
//! the DOT renderer can see every field, while the structural fields (`id`,
//! `type`, `outV`, `inV`) are parsed once into typed values.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

use crate::error::{LsifError, Result};

/// Fields that carry graph structure rather than payload.
const STRUCTURAL_FIELDS: &[&str] = &["id", "type", "label"];
const EDGE_FIELDS: &[&str] = &["outV", "inV"];

/// Identity of an element.
///
/// LSIF emitters use either integers or strings for ids. Both are compared
/// by their textual form, so `1` and `"1"` name the same element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ElementId(String);

/// Largest float that still holds every integer below it exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Read an id out of a JSON value. Only strings and numbers are ids.
    ///
    /// Integral floats are written without the fraction, so `1.0` and `1`
    /// name the same element.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) => match n.as_f64() {
                Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_SAFE_INTEGER => {
                    Some(Self((f as i64).to_string()))
                }
                _ => Some(Self(n.to_string())),
            },
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for ids made only of ASCII digits (safe as bare DOT identifiers).
    pub fn is_numeric(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_digit())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// What an element is, decided by its `type` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// `type = "vertex"`.
    Vertex,
    /// `type = "edge"`. Endpoints are absent when the field is missing or
    /// not an id (for example the 1:N `inVs` form).
    Edge {
        out_v: Option<ElementId>,
        in_v: Option<ElementId>,
    },
    /// Any other `type` value, or none at all.
    Unknown(Option<String>),
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Vertex => write!(f, "vertex"),
            ElementKind::Edge { .. } => write!(f, "edge"),
            ElementKind::Unknown(_) => write!(f, "unknown"),
        }
    }
}

/// A single vertex or edge of the dump.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    id: ElementId,
    kind: ElementKind,
    /// The complete original object, field order preserved.
    raw: Value,
}

impl Element {
    /// Parse one JSON value. `position` is the element's index in the input
    /// and is only used for error messages.
    ///
    /// A missing or malformed `id` is fatal; an unrecognised `type` is not,
    /// it becomes [`ElementKind::Unknown`] for the validator to report.
    pub fn from_value(value: Value, position: usize) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or(LsifError::NotAnObject { position })?;

        let id = match object.get("id") {
            None | Some(Value::Null) => return Err(LsifError::MissingId { position }),
            Some(v) => ElementId::from_value(v).ok_or_else(|| LsifError::InvalidId {
                position,
                value: v.to_string(),
            })?,
        };

        let kind = match object.get("type").and_then(Value::as_str) {
            Some("vertex") => ElementKind::Vertex,
            Some("edge") => ElementKind::Edge {
                out_v: object.get("outV").and_then(ElementId::from_value),
                in_v: object.get("inV").and_then(ElementId::from_value),
            },
            _ => ElementKind::Unknown(object.get("type").and_then(scalar_text)),
        };

        Ok(Self {
            id,
            kind,
            raw: value,
        })
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn is_vertex(&self) -> bool {
        matches!(self.kind, ElementKind::Vertex)
    }

    pub fn is_edge(&self) -> bool {
        matches!(self.kind, ElementKind::Edge { .. })
    }

    /// The raw `type` field, when it is a string.
    pub fn type_name(&self) -> Option<&str> {
        self.raw.get("type").and_then(Value::as_str)
    }

    pub fn label(&self) -> Option<&str> {
        self.raw.get("label").and_then(Value::as_str)
    }

    /// The `property` field (set on `item` edges), as text.
    pub fn property(&self) -> Option<String> {
        self.field_text("property")
    }

    /// Source vertex of an edge. Always `None` for vertices.
    pub fn out_v(&self) -> Option<&ElementId> {
        match &self.kind {
            ElementKind::Edge { out_v, .. } => out_v.as_ref(),
            _ => None,
        }
    }

    /// Target vertex of an edge. Always `None` for vertices.
    pub fn in_v(&self) -> Option<&ElementId> {
        match &self.kind {
            ElementKind::Edge { in_v, .. } => in_v.as_ref(),
            _ => None,
        }
    }

    /// Any field of the original object.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.raw.get(name)
    }

    /// Textual form of a scalar field, as used for allow-list matching.
    pub fn field_text(&self, name: &str) -> Option<String> {
        self.field(name).and_then(scalar_text)
    }

    /// Payload fields: everything except id, type, label and edge endpoints,
    /// in original order.
    pub fn extra_fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        let is_edge = self.is_edge();
        self.raw
            .as_object()
            .into_iter()
            .flatten()
            .filter(move |(key, _)| {
                !STRUCTURAL_FIELDS.contains(&key.as_str())
                    && !(is_edge && EDGE_FIELDS.contains(&key.as_str()))
            })
    }

    /// The original JSON object.
    pub fn as_json(&self) -> &Value {
        &self.raw
    }

    /// Compact serialization of the original object.
    pub fn to_json_string(&self) -> String {
        self.raw.to_string()
    }
}

impl TryFrom<Value> for Element {
    type Error = LsifError;

    fn try_from(value: Value) -> Result<Self> {
        Element::from_value(value, 0)
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

/// Text of a string, number or boolean value. Composite values have none.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ─── Neighborhood Results ─────────────────────────────────────────────────────

/// The edges found by a neighborhood expansion and the vertices they touch.
///
/// Both maps iterate in first-discovery order, which makes rendering
/// deterministic for a given input.
#[derive(Debug, Clone, Default)]
pub struct Subgraph<'g> {
    pub edges: IndexMap<ElementId, &'g Element>,
    pub vertices: IndexMap<ElementId, &'g Element>,
}

impl<'g> Subgraph<'g> {
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty() && self.vertices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_and_string_ids_are_equal() {
        let a = Element::try_from(json!({"id": 7, "type": "vertex", "label": "range"})).unwrap();
        let b = Element::try_from(json!({"id": "7", "type": "vertex", "label": "range"})).unwrap();
        assert_eq!(a.id(), b.id());
        assert!(a.id().is_numeric());
    }

    #[test]
    fn test_integral_float_ids_match_integers() {
        assert_eq!(ElementId::from_value(&json!(1.0)), Some(ElementId::from("1")));
        assert_eq!(ElementId::from_value(&json!(-0.0)), Some(ElementId::from("0")));
        assert_eq!(ElementId::from_value(&json!(2.5)), Some(ElementId::from("2.5")));
        assert_eq!(ElementId::from_value(&json!(12)), Some(ElementId::from("12")));
        assert_eq!(ElementId::from_value(&json!(true)), None);
    }

    #[test]
    fn test_edge_endpoints() {
        let edge = Element::try_from(
            json!({"id": 3, "type": "edge", "label": "contains", "outV": 1, "inV": "2"}),
        )
        .unwrap();
        assert!(edge.is_edge());
        assert_eq!(edge.out_v(), Some(&ElementId::from("1")));
        assert_eq!(edge.in_v(), Some(&ElementId::from("2")));
        assert_eq!(edge.label(), Some("contains"));
    }

    #[test]
    fn test_vertex_has_no_endpoints() {
        let vertex = Element::try_from(json!({"id": 1, "type": "vertex", "label": "project", "inV": 4}))
            .unwrap();
        assert!(vertex.is_vertex());
        assert_eq!(vertex.out_v(), None);
        assert_eq!(vertex.in_v(), None);
    }

    #[test]
    fn test_multi_target_edge_has_no_in_v() {
        let edge = Element::try_from(
            json!({"id": 9, "type": "edge", "label": "item", "outV": 1, "inVs": [2, 3]}),
        )
        .unwrap();
        assert_eq!(edge.out_v(), Some(&ElementId::from("1")));
        assert_eq!(edge.in_v(), None);
    }

    #[test]
    fn test_unknown_type_is_not_an_error() {
        let element = Element::try_from(json!({"id": 1, "type": "node"})).unwrap();
        assert_eq!(element.kind(), &ElementKind::Unknown(Some("node".to_string())));

        let element = Element::try_from(json!({"id": 2})).unwrap();
        assert_eq!(element.kind(), &ElementKind::Unknown(None));
    }

    #[test]
    fn test_missing_id_is_fatal() {
        let err = Element::from_value(json!({"type": "vertex"}), 4).unwrap_err();
        assert!(matches!(err, LsifError::MissingId { position: 4 }));

        let err = Element::from_value(json!({"id": [1], "type": "vertex"}), 0).unwrap_err();
        assert!(matches!(err, LsifError::InvalidId { .. }));

        let err = Element::from_value(json!([1, 2]), 2).unwrap_err();
        assert!(matches!(err, LsifError::NotAnObject { position: 2 }));
    }

    #[test]
    fn test_extra_fields_skip_structure() {
        let vertex = Element::try_from(json!({
            "id": 2, "type": "vertex", "label": "document",
            "uri": "file:///a.ts", "languageId": "typescript"
        }))
        .unwrap();
        let keys: Vec<&str> = vertex.extra_fields().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["uri", "languageId"]);

        let edge = Element::try_from(
            json!({"id": 3, "type": "edge", "label": "contains", "outV": 1, "inV": 2}),
        )
        .unwrap();
        assert_eq!(edge.extra_fields().count(), 0);
    }

    #[test]
    fn test_serializes_as_original_object() {
        let value = json!({"id": 1, "type": "vertex", "label": "project", "kind": "ts"});
        let element = Element::try_from(value.clone()).unwrap();
        assert_eq!(serde_json::to_value(&element).unwrap(), value);
        assert_eq!(
            element.to_json_string(),
            r#"{"id":1,"type":"vertex","label":"project","kind":"ts"}"#
        );
    }
}
