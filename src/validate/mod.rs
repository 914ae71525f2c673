//! LSIF dump validation.
//!
//! Three passes over the element collection:
//!
//! 1. **Ingest** (in input order): every element has a known type, every
//!    edge has both endpoints, and every endpoint vertex was emitted before
//!    the edge.
//! 2. **Connectivity**: every vertex is used by some edge, except vertices
//!    with an exempt label (`metaData` by default).
//! 3. **Shape** (only with a [`ShapeChecker`]): every vertex and edge
//!    satisfies the shape named by its label.
//!
//! Findings never stop a pass. Each one is recorded with the element it
//! concerns and marks that element invalid; the named checks flip to
//! failed on the first finding of their kind.

pub mod report;
pub mod shape;

pub use report::{CategoryStats, Check, CheckKind, IssueKind, ValidationIssue, ValidationReport};
pub use shape::{JsonSchemaChecker, ShapeChecker};

use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::graph::{Element, ElementId, ElementKind};

/// Label whose vertices may stand alone.
pub const DEFAULT_EXEMPT_LABEL: &str = "metaData";

/// Validation settings. Each call to [`Validator::validate`] is an
/// independent run with its own state.
pub struct Validator<'a> {
    exempt_labels: Vec<String>,
    shapes: Option<&'a dyn ShapeChecker>,
    scope: Option<HashSet<ElementId>>,
}

impl<'a> Validator<'a> {
    pub fn new() -> Self {
        Self {
            exempt_labels: vec![DEFAULT_EXEMPT_LABEL.to_string()],
            shapes: None,
            scope: None,
        }
    }

    /// Labels whose vertices need no edge.
    pub fn with_exempt_labels(mut self, labels: Vec<String>) -> Self {
        self.exempt_labels = labels;
        self
    }

    pub fn with_shape_checker(mut self, checker: &'a dyn ShapeChecker) -> Self {
        self.shapes = Some(checker);
        self
    }

    /// Only report on these elements. All passes still see the whole
    /// collection, since ordering and usage depend on every element.
    pub fn with_scope(mut self, ids: impl IntoIterator<Item = ElementId>) -> Self {
        self.scope = Some(ids.into_iter().collect());
        self
    }

    pub fn validate(&self, elements: &[Element]) -> ValidationReport {
        let mut run = Run::new(elements, self.scope.as_ref());

        run.ingest();
        run.check_usage(&self.exempt_labels);
        let shapes_checked = match self.shapes {
            Some(checker) => {
                run.check_shapes(checker);
                true
            }
            None => {
                warn!("no shape checker configured, skipping shape validation");
                false
            }
        };

        let report = run.finish(shapes_checked);
        info!(
            valid = report.valid,
            errors = report.errors.len(),
            "validation finished"
        );
        report
    }
}

impl Default for Validator<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate with default settings: no scope, no shapes.
pub fn validate(elements: &[Element]) -> ValidationReport {
    Validator::new().validate(elements)
}

/// State of a single validation run.
struct Run<'e> {
    elements: &'e [Element],
    in_scope: Vec<bool>,
    valid: Vec<bool>,
    /// Ids used as an endpoint by at least one edge.
    referenced: HashSet<&'e ElementId>,
    errors: Vec<ValidationIssue>,
    vertices_before_edges: bool,
    all_vertices_used: bool,
}

impl<'e> Run<'e> {
    fn new(elements: &'e [Element], scope: Option<&HashSet<ElementId>>) -> Self {
        let in_scope = elements
            .iter()
            .map(|e| scope.is_none_or(|ids| ids.contains(e.id())))
            .collect();
        Self {
            elements,
            in_scope,
            valid: vec![true; elements.len()],
            referenced: HashSet::new(),
            errors: Vec::new(),
            vertices_before_edges: true,
            all_vertices_used: true,
        }
    }

    /// Record a finding against the element at `position`. Returns false
    /// when the element is out of scope and nothing was recorded.
    fn record(&mut self, position: usize, kind: IssueKind, message: String) -> bool {
        if !self.in_scope[position] {
            return false;
        }
        let element = &self.elements[position];
        debug!(id = %element.id(), %kind, %message, "validation error");
        self.valid[position] = false;
        self.errors.push(ValidationIssue {
            kind,
            message,
            element: element.clone(),
        });
        true
    }

    fn ingest(&mut self) {
        let elements = self.elements;
        let all_vertices: HashSet<&ElementId> = elements
            .iter()
            .filter(|e| e.is_vertex())
            .map(Element::id)
            .collect();
        let mut defined: HashSet<&ElementId> = HashSet::with_capacity(all_vertices.len());
        let mut seen: HashSet<&ElementId> = HashSet::with_capacity(elements.len());

        for (position, element) in elements.iter().enumerate() {
            if !seen.insert(element.id()) {
                self.record(
                    position,
                    IssueKind::DuplicateId,
                    format!("id {} is already used by an earlier element", element.id()),
                );
            }

            match element.kind() {
                ElementKind::Vertex => {
                    defined.insert(element.id());
                }
                ElementKind::Unknown(type_name) => {
                    let message = match type_name {
                        Some(t) => format!("unknown element type '{}'", t),
                        None => "element has no type".to_string(),
                    };
                    self.record(position, IssueKind::UnknownType, message);
                }
                ElementKind::Edge { out_v, in_v } => {
                    let (Some(out_v), Some(in_v)) = (out_v, in_v) else {
                        let missing = match (out_v, in_v) {
                            (None, None) => "outV and inV",
                            (None, Some(_)) => "outV",
                            _ => "inV",
                        };
                        self.record(
                            position,
                            IssueKind::MissingEndpoints,
                            format!("edge has no {}", missing),
                        );
                        continue;
                    };

                    self.referenced.insert(out_v);
                    self.referenced.insert(in_v);

                    let mut undefined: Vec<&ElementId> = Vec::new();
                    for endpoint in [out_v, in_v] {
                        if !defined.contains(endpoint) && !undefined.contains(&endpoint) {
                            undefined.push(endpoint);
                        }
                    }
                    if undefined.is_empty() {
                        continue;
                    }

                    let message = undefined
                        .iter()
                        .map(|id| {
                            if all_vertices.contains(id) {
                                format!("vertex {} is referenced before it is defined", id)
                            } else {
                                format!("vertex {} is referenced but never defined", id)
                            }
                        })
                        .collect::<Vec<_>>()
                        .join("; ");
                    if self.record(position, IssueKind::UndefinedVertex, message) {
                        self.vertices_before_edges = false;
                    }
                }
            }
        }
    }

    fn check_usage(&mut self, exempt_labels: &[String]) {
        let elements = self.elements;
        for (position, element) in elements.iter().enumerate() {
            if !element.is_vertex() || self.referenced.contains(element.id()) {
                continue;
            }
            let exempt = element
                .label()
                .is_some_and(|label| exempt_labels.iter().any(|l| l == label));
            if exempt {
                continue;
            }
            if self.record(
                position,
                IssueKind::UnreferencedVertex,
                "vertex is not used by any edge".to_string(),
            ) {
                self.all_vertices_used = false;
            }
        }
    }

    fn check_shapes(&mut self, checker: &dyn ShapeChecker) {
        let elements = self.elements;
        for (position, element) in elements.iter().enumerate() {
            if !self.in_scope[position] || !(element.is_vertex() || element.is_edge()) {
                continue;
            }
            let outcome = match element.label() {
                Some(label) => checker.check_shape(element, label).map_err(|reasons| {
                    if reasons.is_empty() {
                        format!("element does not match shape '{}'", label)
                    } else {
                        reasons.join("; ")
                    }
                }),
                None => Err("element has no label, shape unavailable".to_string()),
            };
            if let Err(message) = outcome {
                self.record(position, IssueKind::ShapeMismatch, message);
            }
        }
    }

    fn finish(self, shapes_checked: bool) -> ValidationReport {
        let mut vertices = CategoryStats::default();
        let mut edges = CategoryStats::default();
        for (position, element) in self.elements.iter().enumerate() {
            if !self.in_scope[position] {
                continue;
            }
            match element.kind() {
                ElementKind::Vertex => vertices.count(self.valid[position]),
                ElementKind::Edge { .. } => edges.count(self.valid[position]),
                ElementKind::Unknown(_) => {}
            }
        }

        ValidationReport {
            valid: self.errors.is_empty(),
            checks: vec![
                Check {
                    kind: CheckKind::VerticesBeforeEdges,
                    passed: self.vertices_before_edges,
                },
                Check {
                    kind: CheckKind::AllVerticesUsed,
                    passed: self.all_vertices_used,
                },
            ],
            vertices,
            edges,
            shapes_checked,
            errors: self.errors,
        }
    }
}
