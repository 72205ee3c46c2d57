use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Sparse map of camelCase style property → value
pub type StyleMap = BTreeMap<String, String>;

/// Sparse map of HTML attribute name → value
pub type AttributeMap = BTreeMap<String, String>;

/// Type-specific payload (video `src`/`controls`, image `alt`, ...)
pub type SpecificAttributes = BTreeMap<String, Value>;

/// Stable node identifier. Never reused within a session.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ComponentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Closed set of component kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Row,
    Column,
    /// Columns group: a horizontal run of `Column` children
    Columns,
    Menu,
    Social,
    Button,
    Heading,
    Paragraph,
    Image,
    Html,
    Video,
}

/// Direction in which a container lays out its children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowAxis {
    Horizontal,
    Vertical,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 11] = [
        ComponentKind::Row,
        ComponentKind::Column,
        ComponentKind::Columns,
        ComponentKind::Menu,
        ComponentKind::Social,
        ComponentKind::Button,
        ComponentKind::Heading,
        ComponentKind::Paragraph,
        ComponentKind::Image,
        ComponentKind::Html,
        ComponentKind::Video,
    ];

    /// Whether nodes of this kind may hold children
    pub fn is_container(self) -> bool {
        matches!(
            self,
            ComponentKind::Row
                | ComponentKind::Column
                | ComponentKind::Columns
                | ComponentKind::Menu
                | ComponentKind::Social
        )
    }

    /// Layout direction of children. Leaves report `Vertical`.
    pub fn flow_axis(self) -> FlowAxis {
        match self {
            ComponentKind::Columns | ComponentKind::Menu | ComponentKind::Social => {
                FlowAxis::Horizontal
            }
            _ => FlowAxis::Vertical,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentKind::Row => "row",
            ComponentKind::Column => "column",
            ComponentKind::Columns => "columns",
            ComponentKind::Menu => "menu",
            ComponentKind::Social => "social",
            ComponentKind::Button => "button",
            ComponentKind::Heading => "heading",
            ComponentKind::Paragraph => "paragraph",
            ComponentKind::Image => "image",
            ComponentKind::Html => "html",
            ComponentKind::Video => "video",
        }
    }

    /// Default display label for freshly created nodes
    pub fn default_label(self) -> &'static str {
        match self {
            ComponentKind::Row => "Row",
            ComponentKind::Column => "Column",
            ComponentKind::Columns => "Columns",
            ComponentKind::Menu => "Menu",
            ComponentKind::Social => "Social Links",
            ComponentKind::Button => "Button",
            ComponentKind::Heading => "Heading",
            ComponentKind::Paragraph => "Paragraph",
            ComponentKind::Image => "Image",
            ComponentKind::Html => "HTML",
            ComponentKind::Video => "Video",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of the builder document.
///
/// `children` and `parent_id` are only ever written by [`ComponentTree`]
/// operations; the tree owns nodes by containment, `parent_id` is a
/// back-reference.
///
/// [`ComponentTree`]: crate::ComponentTree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderComponent {
    pub id: ComponentId,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub label: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub styles: StyleMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub html_attributes: AttributeMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub specific_attributes: SpecificAttributes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) children: Vec<ComponentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) parent_id: Option<ComponentId>,
}

impl BuilderComponent {
    /// Create a detached node with the kind's default label
    pub fn new(id: ComponentId, kind: ComponentKind) -> Self {
        Self {
            id,
            kind,
            label: kind.default_label().to_string(),
            styles: StyleMap::new(),
            html_attributes: AttributeMap::new(),
            specific_attributes: SpecificAttributes::new(),
            children: Vec::new(),
            parent_id: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set a style property (builder). Empty values are not stored.
    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.styles.insert(property.into(), value);
        }
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.html_attributes.insert(name.into(), value);
        }
        self
    }

    /// Set a type-specific attribute (builder). `null` is not stored.
    pub fn with_specific(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let value = value.into();
        if !value.is_null() {
            self.specific_attributes.insert(key.into(), value);
        }
        self
    }

    /// Drop empty strings and `null`s so the maps stay sparse
    pub(crate) fn drop_empty_entries(&mut self) {
        self.styles.retain(|_, v| !v.is_empty());
        self.html_attributes.retain(|_, v| !v.is_empty());
        self.specific_attributes.retain(|_, v| !v.is_null());
    }

    pub fn children(&self) -> &[ComponentId] {
        &self.children
    }

    pub fn parent_id(&self) -> Option<&ComponentId> {
        self.parent_id.as_ref()
    }

    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    /// String-valued specific attribute; empty strings read as absent
    pub fn specific_str(&self, key: &str) -> Option<&str> {
        self.specific_attributes
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Boolean specific attribute. Accepts `true`/`false` and the strings
    /// `"true"`/`"false"`.
    pub fn specific_bool(&self, key: &str) -> Option<bool> {
        match self.specific_attributes.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) if s == "true" => Some(true),
            Value::String(s) if s == "false" => Some(false),
            _ => None,
        }
    }

    /// Media URLs this node references (image/video sources, poster frames)
    pub fn media_urls(&self) -> Vec<&str> {
        match self.kind {
            ComponentKind::Image | ComponentKind::Video => ["src", "poster"]
                .iter()
                .filter_map(|key| self.specific_str(key))
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_classification() {
        let containers: Vec<_> = ComponentKind::ALL
            .iter()
            .filter(|k| k.is_container())
            .collect();
        assert_eq!(containers.len(), 5);
        assert!(!ComponentKind::Video.is_container());
        assert!(ComponentKind::Columns.is_container());
    }

    #[test]
    fn test_builders_keep_maps_sparse() {
        let node = BuilderComponent::new("n1".into(), ComponentKind::Button)
            .with_style("color", "")
            .with_style("fontSize", "14px")
            .with_specific("href", Value::Null);

        assert!(!node.styles.contains_key("color"));
        assert_eq!(node.styles.get("fontSize").map(String::as_str), Some("14px"));
        assert!(node.specific_attributes.is_empty());
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ComponentKind::Columns).unwrap();
        assert_eq!(json, "\"columns\"");
    }

    #[test]
    fn test_media_urls_only_for_media_kinds() {
        let video = BuilderComponent::new("v".into(), ComponentKind::Video)
            .with_specific("src", "movie.mp4")
            .with_specific("poster", "");
        assert_eq!(video.media_urls(), vec!["movie.mp4"]);

        let heading =
            BuilderComponent::new("h".into(), ComponentKind::Heading).with_specific("src", "x.png");
        assert!(heading.media_urls().is_empty());
    }
}
