//! Workflow definition types.
//!
//! A workflow is a named, ordered list of components. It is created exactly
//! once, with its full component list; the identifier is assigned here and
//! never supplied by callers.

use crate::component::Component;
use darkroom_core::WorkflowId;
use serde::{Deserialize, Serialize};

/// A validated workflow, ready to be stored.
///
/// Component order is significant and preserved exactly as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    /// Unique identifier for this workflow.
    pub id: WorkflowId,
    /// Human-readable name. Not unique.
    pub name: String,
    /// The ordered components. May be empty.
    pub components: Vec<Component>,
}

impl Workflow {
    /// Creates a new workflow with a freshly generated identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, components: Vec<Component>) -> Self {
        Self {
            id: WorkflowId::new(),
            name: name.into(),
            components,
        }
    }

    /// Creates a workflow with a specific ID.
    #[must_use]
    pub fn with_id(id: WorkflowId, name: impl Into<String>, components: Vec<Component>) -> Self {
        Self {
            id,
            name: name.into(),
            components,
        }
    }

    /// Returns the number of components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentType;

    #[test]
    fn workflow_creation_assigns_id() {
        let a = Workflow::new("test", Vec::new());
        let b = Workflow::new("test", Vec::new());
        assert_ne!(a.id, b.id);
        assert_eq!(a.name, "test");
        assert_eq!(a.component_count(), 0);
    }

    #[test]
    fn workflow_preserves_component_order() {
        let components = vec![
            Component::new(ComponentType::Import),
            Component::new(ComponentType::Shadow),
            Component::new(ComponentType::Crop),
            Component::new(ComponentType::Export),
        ];
        let workflow = Workflow::new("ordered", components.clone());
        assert_eq!(workflow.components, components);
    }

    #[test]
    fn workflow_serde_roundtrip() {
        let workflow = Workflow::new(
            "serde",
            vec![Component::new(ComponentType::Crop)],
        );
        let json = serde_json::to_string(&workflow).expect("serialize");
        let parsed: Workflow = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(workflow, parsed);
    }
}
