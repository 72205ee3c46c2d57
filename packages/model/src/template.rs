//! Palette templates: the "new node" drag source.

use crate::component::{AttributeMap, BuilderComponent, ComponentId, ComponentKind, SpecificAttributes, StyleMap};
use crate::error::{TreeError, TreeResult};
use crate::id_generator::IdGenerator;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Blueprint for a node (and, for containers, its initial children)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentTemplate {
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "StyleMap::is_empty")]
    pub styles: StyleMap,
    #[serde(default, skip_serializing_if = "AttributeMap::is_empty")]
    pub html_attributes: AttributeMap,
    #[serde(default, skip_serializing_if = "SpecificAttributes::is_empty")]
    pub specific_attributes: SpecificAttributes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ComponentTemplate>,
}

impl ComponentTemplate {
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            label: None,
            styles: StyleMap::new(),
            html_attributes: AttributeMap::new(),
            specific_attributes: SpecificAttributes::new(),
            children: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(property.into(), value.into());
        self
    }

    pub fn with_specific(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.specific_attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: ComponentTemplate) -> Self {
        self.children.push(child);
        self
    }

    /// Reject templates that would give a leaf kind children
    pub fn validate(&self) -> TreeResult<()> {
        if !self.kind.is_container() && !self.children.is_empty() {
            return Err(TreeError::invalid_target(format!(
                "{} template cannot carry children",
                self.kind
            )));
        }
        self.children.iter().try_for_each(ComponentTemplate::validate)
    }

    /// Build nodes with fresh ids, root first, in pre-order. Children lists
    /// and parent ids are wired inside the subtree; the root's parent is left
    /// for the tree to set on insertion.
    pub(crate) fn instantiate(&self, ids: &mut IdGenerator) -> Vec<BuilderComponent> {
        let mut out = Vec::new();
        self.instantiate_into(ids, None, &mut out);
        out
    }

    fn instantiate_into(
        &self,
        ids: &mut IdGenerator,
        parent: Option<&ComponentId>,
        out: &mut Vec<BuilderComponent>,
    ) -> ComponentId {
        let mut node = BuilderComponent::new(ids.new_id(), self.kind);
        if let Some(label) = &self.label {
            node.label = label.clone();
        }
        node.styles = self.styles.clone();
        node.html_attributes = self.html_attributes.clone();
        node.specific_attributes = self.specific_attributes.clone();
        node.drop_empty_entries();
        node.parent_id = parent.cloned();

        let id = node.id.clone();
        let slot = out.len();
        out.push(node);

        let child_ids: Vec<ComponentId> = self
            .children
            .iter()
            .map(|child| child.instantiate_into(ids, Some(&id), out))
            .collect();
        out[slot].children = child_ids;

        id
    }
}

/// The built-in palette offered to the drag source
#[derive(Debug, Clone)]
pub struct Palette {
    entries: Vec<(String, ComponentTemplate)>,
}

impl Palette {
    pub fn standard() -> Self {
        let entries = vec![
            (
                "row".to_string(),
                ComponentTemplate::new(ComponentKind::Row),
            ),
            (
                "two-columns".to_string(),
                ComponentTemplate::new(ComponentKind::Columns)
                    .with_child(ComponentTemplate::new(ComponentKind::Column))
                    .with_child(ComponentTemplate::new(ComponentKind::Column)),
            ),
            (
                "three-columns".to_string(),
                ComponentTemplate::new(ComponentKind::Columns)
                    .with_child(ComponentTemplate::new(ComponentKind::Column))
                    .with_child(ComponentTemplate::new(ComponentKind::Column))
                    .with_child(ComponentTemplate::new(ComponentKind::Column)),
            ),
            (
                "heading".to_string(),
                ComponentTemplate::new(ComponentKind::Heading)
                    .with_specific("content", "Heading")
                    .with_specific("level", 2),
            ),
            (
                "paragraph".to_string(),
                ComponentTemplate::new(ComponentKind::Paragraph)
                    .with_specific("content", "Write something here."),
            ),
            (
                "button".to_string(),
                ComponentTemplate::new(ComponentKind::Button)
                    .with_specific("text", "Click me")
                    .with_specific("href", "#"),
            ),
            ("image".to_string(), ComponentTemplate::new(ComponentKind::Image)),
            (
                "video".to_string(),
                ComponentTemplate::new(ComponentKind::Video).with_specific("controls", true),
            ),
            ("html".to_string(), ComponentTemplate::new(ComponentKind::Html)),
            ("menu".to_string(), ComponentTemplate::new(ComponentKind::Menu)),
            ("social".to_string(), ComponentTemplate::new(ComponentKind::Social)),
        ];
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&ComponentTemplate> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, template)| template)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instantiate_wires_subtree() {
        let mut ids = IdGenerator::from_seed("t");
        let template = Palette::standard().get("two-columns").unwrap().clone();
        let nodes = template.instantiate(&mut ids);

        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].kind, ComponentKind::Columns);
        assert_eq!(nodes[0].children(), &[nodes[1].id.clone(), nodes[2].id.clone()]);
        assert_eq!(nodes[1].parent_id(), Some(&nodes[0].id));
        assert!(nodes[0].parent_id().is_none());
    }

    #[test]
    fn test_leaf_template_with_children_is_invalid() {
        let template = ComponentTemplate::new(ComponentKind::Button)
            .with_child(ComponentTemplate::new(ComponentKind::Heading));
        assert!(matches!(
            template.validate(),
            Err(TreeError::InvalidTarget { .. })
        ));
    }

    #[test]
    fn test_template_drops_empty_values() {
        let mut ids = IdGenerator::from_seed("t");
        let nodes = ComponentTemplate::new(ComponentKind::Image)
            .with_style("width", "")
            .with_specific("alt", Value::Null)
            .instantiate(&mut ids);

        assert!(nodes[0].styles.is_empty());
        assert!(nodes[0].specific_attributes.is_empty());
    }
}
