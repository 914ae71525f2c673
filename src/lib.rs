//! # lsif-inspect
//!
//! Inspect LSIF (Language Server Index Format) dumps.
//!
//! An LSIF dump is a flat list of vertices and edges. This crate loads one,
//! selects elements with a [`FilterSpec`], checks structural well-formedness
//! with a [`Validator`], and renders the neighborhood of selected elements
//! as a DOT digraph.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lsif_inspect::{load_graph, render_dot, FilterSpec, InputFormat, RenderOptions};
//! use std::path::Path;
//!
//! let graph = load_graph(Path::new("dump.lsif"), InputFormat::Auto)?;
//!
//! // Seeds: every element labelled "project"
//! let seeds = lsif_inspect::filtered_ids(FilterSpec::default().label("project"), graph.elements())?;
//!
//! // Two undirected hops out, as DOT
//! let subgraph = graph.expand(&seeds, 2)?;
//! println!("{}", render_dot(&subgraph, &RenderOptions::default()));
//! # Ok::<(), lsif_inspect::LsifError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod graph;
pub mod render;
pub mod validate;

// Re-exports for convenience
pub use config::LsifConfig;
pub use error::{LsifError, Result};
pub use filter::{filtered_ids, Filter, FilterSpec};
pub use graph::{
    load_elements, load_graph, parse_elements, read_elements, Element, ElementGraph, ElementId,
    ElementKind, GraphStats, InputFormat, Subgraph,
};
pub use render::{render_dot, FieldExclusion, RenderOptions};
pub use validate::{
    validate, CheckKind, IssueKind, JsonSchemaChecker, ShapeChecker, ValidationIssue,
    ValidationReport, Validator,
};
