//! Element graph module: the structural backbone of lsif-inspect.
//!
//! Provides the element model, input loading, and the engine that indexes
//! a dump and expands neighborhoods around seed ids.

pub mod builder;
pub mod engine;
pub mod types;

pub use builder::{load_elements, load_graph, parse_elements, read_elements, InputFormat};
pub use engine::{ElementGraph, GraphStats};
pub use types::{scalar_text, Element, ElementId, ElementKind, Subgraph};
