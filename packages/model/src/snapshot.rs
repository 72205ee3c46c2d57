//! Nested JSON form of a tree, used for saving and loading documents.

use crate::component::{
    AttributeMap, BuilderComponent, ComponentId, ComponentKind, SpecificAttributes, StyleMap,
};
use crate::tree::{ComponentTree, Violation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate component id: {0}")]
    DuplicateId(ComponentId),

    #[error("Malformed document: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Malformed(Vec<Violation>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    #[serde(default)]
    pub components: Vec<SnapshotNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotNode {
    pub id: ComponentId,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "StyleMap::is_empty")]
    pub styles: StyleMap,
    #[serde(default, skip_serializing_if = "AttributeMap::is_empty")]
    pub html_attributes: AttributeMap,
    #[serde(default, skip_serializing_if = "SpecificAttributes::is_empty")]
    pub specific_attributes: SpecificAttributes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SnapshotNode>,
}

impl DocumentSnapshot {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn capture(tree: &ComponentTree) -> Self {
        Self {
            components: tree
                .roots()
                .iter()
                .filter_map(|id| capture_node(tree, id))
                .collect(),
        }
    }

    /// Build an arena from the nested form. Parent ids are derived from
    /// nesting; the result is checked against every tree invariant.
    pub fn into_tree(self) -> Result<ComponentTree, SnapshotError> {
        let mut nodes = HashMap::new();
        let mut roots = Vec::new();
        for node in self.components {
            roots.push(node.id.clone());
            flatten(node, None, &mut nodes)?;
        }

        let tree = ComponentTree::from_parts(nodes, roots);
        let violations = tree.validate();
        if !violations.is_empty() {
            return Err(SnapshotError::Malformed(violations));
        }
        Ok(tree)
    }
}

fn capture_node(tree: &ComponentTree, id: &ComponentId) -> Option<SnapshotNode> {
    let node = tree.get(id)?;
    Some(SnapshotNode {
        id: node.id.clone(),
        kind: node.kind,
        label: Some(node.label.clone()),
        styles: node.styles.clone(),
        html_attributes: node.html_attributes.clone(),
        specific_attributes: node.specific_attributes.clone(),
        children: node
            .children()
            .iter()
            .filter_map(|child| capture_node(tree, child))
            .collect(),
    })
}

fn flatten(
    snapshot: SnapshotNode,
    parent: Option<&ComponentId>,
    out: &mut HashMap<ComponentId, BuilderComponent>,
) -> Result<(), SnapshotError> {
    let mut node = BuilderComponent::new(snapshot.id.clone(), snapshot.kind);
    if let Some(label) = snapshot.label {
        node.label = label;
    }
    node.styles = snapshot.styles;
    node.html_attributes = snapshot.html_attributes;
    node.specific_attributes = snapshot.specific_attributes;
    node.parent_id = parent.cloned();
    node.children = snapshot.children.iter().map(|c| c.id.clone()).collect();

    if out.contains_key(&node.id) {
        return Err(SnapshotError::DuplicateId(node.id));
    }
    let id = node.id.clone();
    out.insert(id.clone(), node);

    for child in snapshot.children {
        flatten(child, Some(&id), out)?;
    }
    Ok(())
}
