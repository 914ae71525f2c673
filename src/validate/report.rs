//! Validation report types.

use serde::Serialize;
use std::fmt;

use crate::graph::{Element, ElementId};

/// Category of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// `type` is neither "vertex" nor "edge".
    UnknownType,
    /// An edge without `outV` or `inV`.
    MissingEndpoints,
    /// An edge emitted before one of its endpoint vertices.
    UndefinedVertex,
    /// An id already used by an earlier element.
    DuplicateId,
    /// A vertex no edge points to or from.
    UnreferencedVertex,
    /// The element does not satisfy the shape for its label.
    ShapeMismatch,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::UnknownType => write!(f, "unknown_type"),
            IssueKind::MissingEndpoints => write!(f, "missing_endpoints"),
            IssueKind::UndefinedVertex => write!(f, "undefined_vertex"),
            IssueKind::DuplicateId => write!(f, "duplicate_id"),
            IssueKind::UnreferencedVertex => write!(f, "unreferenced_vertex"),
            IssueKind::ShapeMismatch => write!(f, "shape_mismatch"),
        }
    }
}

/// One finding, citing the complete element it concerns.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub message: String,
    pub element: Element,
}

impl ValidationIssue {
    pub fn id(&self) -> &ElementId {
        self.element.id()
    }
}

/// The named whole-dump checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    VerticesBeforeEdges,
    AllVerticesUsed,
}

impl CheckKind {
    pub fn description(&self) -> &'static str {
        match self {
            CheckKind::VerticesBeforeEdges => "vertices are emitted before the edges that use them",
            CheckKind::AllVerticesUsed => "all vertices are used by at least one edge",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Check {
    pub kind: CheckKind,
    pub passed: bool,
}

/// Pass/fail counts for one element category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl CategoryStats {
    pub(crate) fn count(&mut self, valid: bool) {
        self.total += 1;
        if valid {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }
}

impl fmt::Display for CategoryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} passed, {} failed, {} total",
            self.passed, self.failed, self.total
        )
    }
}

/// Result of one validation run. Built once, never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub checks: Vec<Check>,
    pub vertices: CategoryStats,
    pub edges: CategoryStats,
    /// Whether the shape pass ran.
    pub shapes_checked: bool,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Outcome of a named check.
    pub fn passed(&self, kind: CheckKind) -> bool {
        self.checks
            .iter()
            .find(|c| c.kind == kind)
            .is_none_or(|c| c.passed)
    }

}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for check in &self.checks {
            let status = if check.passed { "PASS" } else { "FAIL" };
            writeln!(f, "{} {}", status, check.kind.description())?;
        }
        if !self.shapes_checked {
            writeln!(f, "SKIP elements match the shape of their label")?;
        }
        writeln!(f)?;
        writeln!(f, "vertices: {}", self.vertices)?;
        writeln!(f, "edges:    {}", self.edges)?;

        for issue in &self.errors {
            writeln!(f)?;
            writeln!(
                f,
                "[{}] {} {}: {}",
                issue.kind,
                issue.element.kind(),
                issue.element.id(),
                issue.message
            )?;
            let pretty = serde_json::to_string_pretty(issue.element.as_json())
                .unwrap_or_else(|_| issue.element.to_json_string());
            writeln!(f, "{}", pretty)?;
        }

        writeln!(f)?;
        if self.valid {
            write!(f, "Valid LSIF")
        } else {
            let count = self.errors.len();
            let noun = if count == 1 { "error" } else { "errors" };
            write!(f, "Invalid LSIF ({} {})", count, noun)
        }
    }
}
