//! Element filtering.
//!
//! A [`FilterSpec`] holds one allow-list per field plus an optional regex.
//! An element matches when every non-empty allow-list contains the textual
//! value of its field and, if given, the regex matches the element's JSON
//! text. Empty allow-lists place no constraint.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::graph::{Element, ElementId};

/// Allow-lists per field, plus an optional regex over the element JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterSpec {
    pub id: Vec<String>,
    pub in_v: Vec<String>,
    pub out_v: Vec<String>,
    #[serde(rename = "type")]
    pub element_type: Vec<String>,
    pub label: Vec<String>,
    pub property: Vec<String>,
    pub regex: Option<String>,
}

impl FilterSpec {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id.push(id.into());
        self
    }

    pub fn in_v(mut self, id: impl Into<String>) -> Self {
        self.in_v.push(id.into());
        self
    }

    pub fn out_v(mut self, id: impl Into<String>) -> Self {
        self.out_v.push(id.into());
        self
    }

    pub fn element_type(mut self, t: impl Into<String>) -> Self {
        self.element_type.push(t.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label.push(label.into());
        self
    }

    pub fn property(mut self, property: impl Into<String>) -> Self {
        self.property.push(property.into());
        self
    }

    pub fn regex(mut self, pattern: impl Into<String>) -> Self {
        self.regex = Some(pattern.into());
        self
    }

    /// True when nothing is constrained.
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
            && self.in_v.is_empty()
            && self.out_v.is_empty()
            && self.element_type.is_empty()
            && self.label.is_empty()
            && self.property.is_empty()
            && self.regex.is_none()
    }
}

/// A [`FilterSpec`] with its regex compiled.
#[derive(Debug, Clone)]
pub struct Filter {
    spec: FilterSpec,
    regex: Option<Regex>,
}

impl Filter {
    /// Compile the spec. A malformed regex fails here, not at first match.
    pub fn new(spec: FilterSpec) -> Result<Self> {
        let regex = spec.regex.as_deref().map(Regex::new).transpose()?;
        Ok(Self { spec, regex })
    }

    pub fn matches(&self, element: &Element) -> bool {
        let spec = &self.spec;
        allows(&spec.id, Some(element.id().as_str()))
            && allows(&spec.in_v, element.in_v().map(ElementId::as_str))
            && allows(&spec.out_v, element.out_v().map(ElementId::as_str))
            && allows(&spec.element_type, element.type_name())
            && allows(&spec.label, element.label())
            && allows(&spec.property, element.property().as_deref())
            && self
                .regex
                .as_ref()
                .is_none_or(|re| re.is_match(&element.to_json_string()))
    }

    /// Matching elements, in collection order.
    pub fn select<'a>(&self, elements: &'a [Element]) -> Vec<&'a Element> {
        let selected: Vec<&Element> = elements.iter().filter(|e| self.matches(e)).collect();
        debug!(
            matched = selected.len(),
            total = elements.len(),
            "filter applied"
        );
        selected
    }

    /// Ids of matching elements, in collection order.
    pub fn filtered_ids(&self, elements: &[Element]) -> Vec<ElementId> {
        self.select(elements)
            .into_iter()
            .map(|e| e.id().clone())
            .collect()
    }
}

/// Compile `spec` and return the ids it selects from `elements`.
pub fn filtered_ids(spec: FilterSpec, elements: &[Element]) -> Result<Vec<ElementId>> {
    Ok(Filter::new(spec)?.filtered_ids(elements))
}

/// An empty allow-list admits everything, including absent values.
fn allows(allowed: &[String], value: Option<&str>) -> bool {
    allowed.is_empty() || value.is_some_and(|v| allowed.iter().any(|a| a == v))
}
