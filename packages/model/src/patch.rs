//! Shallow patches for node styles and attributes.
//!
//! A `None` value (JSON `null`) deletes the key, which is how the editing UI
//! resets a property to its inherited/default value.

use crate::component::BuilderComponent;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub styles: BTreeMap<String, Option<String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub html_attributes: BTreeMap<String, Option<String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub specific_attributes: BTreeMap<String, Option<Value>>,
}

impl ComponentPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(property.into(), Some(value.into()));
        self
    }

    pub fn reset_style(mut self, property: impl Into<String>) -> Self {
        self.styles.insert(property.into(), None);
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.html_attributes.insert(name.into(), Some(value.into()));
        self
    }

    pub fn reset_attribute(mut self, name: impl Into<String>) -> Self {
        self.html_attributes.insert(name.into(), None);
        self
    }

    pub fn specific(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.specific_attributes
            .insert(key.into(), Some(value.into()));
        self
    }

    pub fn reset_specific(mut self, key: impl Into<String>) -> Self {
        self.specific_attributes.insert(key.into(), None);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none()
            && self.styles.is_empty()
            && self.html_attributes.is_empty()
            && self.specific_attributes.is_empty()
    }

    /// Merge into `node`. Empty strings and JSON `null` delete like `None`.
    pub(crate) fn apply_to(&self, node: &mut BuilderComponent) {
        if let Some(label) = &self.label {
            node.label = label.clone();
        }

        merge_strings(&mut node.styles, &self.styles);
        merge_strings(&mut node.html_attributes, &self.html_attributes);

        for (key, value) in &self.specific_attributes {
            match value {
                Some(v) if !v.is_null() => {
                    node.specific_attributes.insert(key.clone(), v.clone());
                }
                _ => {
                    node.specific_attributes.remove(key);
                }
            }
        }
    }
}

fn merge_strings(target: &mut BTreeMap<String, String>, patch: &BTreeMap<String, Option<String>>) {
    for (key, value) in patch {
        match value {
            Some(v) if !v.is_empty() => {
                target.insert(key.clone(), v.clone());
            }
            _ => {
                target.remove(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentKind;

    #[test]
    fn test_null_in_json_deletes() {
        let patch: ComponentPatch =
            serde_json::from_str(r#"{ "styles": { "color": null, "fontSize": "12px" } }"#).unwrap();

        let mut node = BuilderComponent::new("p".into(), ComponentKind::Paragraph)
            .with_style("color", "#ff0000");
        patch.apply_to(&mut node);

        assert!(!node.styles.contains_key("color"));
        assert_eq!(node.styles["fontSize"], "12px");
    }

    #[test]
    fn test_empty_string_is_not_stored() {
        let mut node = BuilderComponent::new("b".into(), ComponentKind::Button)
            .with_attribute("title", "Go");
        ComponentPatch::new()
            .attribute("title", "")
            .apply_to(&mut node);

        assert!(node.html_attributes.is_empty());
    }

    #[test]
    fn test_specific_json_null_deletes() {
        let mut node = BuilderComponent::new("v".into(), ComponentKind::Video)
            .with_specific("autoplay", true);
        ComponentPatch::new()
            .specific("autoplay", Value::Null)
            .apply_to(&mut node);

        assert!(node.specific_attributes.is_empty());
    }
}
