//! # Style Resolution
//!
//! Turns a node's sparse style map into a concrete style set.
//!
//! Precedence, highest first:
//!
//! ```text
//! explicit node value → kind default → theme token → fallback constant
//! ```
//!
//! Sides and corners resolve independently. Border style and color only
//! resolve for sides whose width resolved, so unbordered nodes carry no
//! border declarations at all.

use crate::defaults::{self, SIDES};
use crate::shorthand;
use crate::theme::Theme;
use pagecraft_model::BuilderComponent;
use std::collections::{BTreeMap, BTreeSet};

/// Which layer supplied a resolved value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleSource {
    Explicit,
    KindDefault,
    Theme,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedValue {
    pub value: String,
    pub source: StyleSource,
}

/// Concrete style object, keyed by camelCase property, ordered by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedStyle {
    entries: BTreeMap<String, ResolvedValue>,
}

impl ResolvedStyle {
    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries.get(property).map(|v| v.value.as_str())
    }

    pub fn source(&self, property: &str) -> Option<StyleSource> {
        self.entries.get(property).map(|v| v.source)
    }

    pub fn contains(&self, property: &str) -> bool {
        self.entries.contains_key(property)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.value.as_str()))
    }

    fn set(&mut self, property: &str, value: &str, source: StyleSource) {
        self.entries.insert(
            property.to_string(),
            ResolvedValue {
                value: value.to_string(),
                source,
            },
        );
    }
}

/// Resolve `node`'s styles against `theme`. Pure: no I/O, no shared state.
pub fn resolve(node: &BuilderComponent, theme: &Theme) -> ResolvedStyle {
    let explicit = shorthand::expand(&node.styles);
    let kind = node.kind;

    let mut properties: BTreeSet<String> = explicit.keys().cloned().collect();
    properties.extend(defaults::kind_defaults(kind).iter().map(|(p, _)| p.to_string()));
    properties.extend(defaults::themed_properties(kind));

    let mut resolved = ResolvedStyle::default();
    for property in &properties {
        if let Some(value) = explicit.get(property).filter(|v| !v.is_empty()) {
            resolved.set(property, value, StyleSource::Explicit);
        } else if let Some(value) = defaults::kind_default(kind, property) {
            resolved.set(property, value, StyleSource::KindDefault);
        } else if let Some(value) = theme.default_for(kind, property) {
            resolved.set(property, value, StyleSource::Theme);
        } else if let Some(value) = defaults::fallback(property) {
            resolved.set(property, value, StyleSource::Fallback);
        }
    }

    // Style and color follow a resolved width; a zero-width border needs
    // neither.
    for side in SIDES {
        let width = format!("border{}Width", side);
        if resolved.get(&width).is_none() {
            continue;
        }
        for suffix in ["Style", "Color"] {
            let property = format!("border{}{}", side, suffix);
            if resolved.contains(&property) {
                continue;
            }
            if let Some(value) = theme.default_for(kind, &property) {
                resolved.set(&property, value, StyleSource::Theme);
            } else if let Some(value) = defaults::fallback(&property) {
                resolved.set(&property, value, StyleSource::Fallback);
            }
        }
    }

    resolved
}
