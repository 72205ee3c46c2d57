use pagecraft_model::ComponentKind;
use serde::{Deserialize, Serialize};

/// Named color, spacing and typography tokens. Passed explicitly into
/// resolution; never mutated by it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    pub colors: ThemeColors,
    pub spacing: ThemeSpacing,
    pub typography: ThemeTypography,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeColors {
    pub primary: String,
    pub text: String,
    pub heading: String,
    pub background: String,
    pub link: String,
    pub border: String,
    pub button_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeSpacing {
    pub small: String,
    pub medium: String,
    pub large: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeTypography {
    pub font_family: String,
    pub heading_font_family: String,
    pub font_size: String,
    pub line_height: String,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            primary: "#2563eb".to_string(),
            text: "#1f2937".to_string(),
            heading: "#111827".to_string(),
            background: "#ffffff".to_string(),
            link: "#2563eb".to_string(),
            border: "#d1d5db".to_string(),
            button_text: "#ffffff".to_string(),
        }
    }
}

impl Default for ThemeSpacing {
    fn default() -> Self {
        Self {
            small: "8px".to_string(),
            medium: "16px".to_string(),
            large: "32px".to_string(),
        }
    }
}

impl Default for ThemeTypography {
    fn default() -> Self {
        Self {
            font_family: "Helvetica, Arial, sans-serif".to_string(),
            heading_font_family: "Georgia, serif".to_string(),
            font_size: "16px".to_string(),
            line_height: "1.5".to_string(),
        }
    }
}

impl Theme {
    /// Theme-level default for `property` on a node of `kind`. Empty tokens
    /// count as unset.
    pub fn default_for(&self, kind: ComponentKind, property: &str) -> Option<&str> {
        let token = match (kind, property) {
            (ComponentKind::Button, "color") => &self.colors.button_text,
            (ComponentKind::Button, "backgroundColor") => &self.colors.primary,
            (ComponentKind::Heading, "color") => &self.colors.heading,
            (ComponentKind::Menu, "color") => &self.colors.link,
            (_, "color") => &self.colors.text,
            (ComponentKind::Heading, "fontFamily") => &self.typography.heading_font_family,
            (_, "fontFamily") => &self.typography.font_family,
            (_, "fontSize") => &self.typography.font_size,
            (_, "lineHeight") => &self.typography.line_height,
            (_, p) if p.starts_with("border") && p.ends_with("Color") => &self.colors.border,
            (ComponentKind::Row, p) if p.starts_with("padding") => &self.spacing.medium,
            (ComponentKind::Column, p) if p.starts_with("padding") => &self.spacing.small,
            (ComponentKind::Menu | ComponentKind::Social, "columnGap") => &self.spacing.medium,
            _ => return None,
        };
        Some(token.as_str()).filter(|t| !t.is_empty())
    }

    /// Page background for standalone export
    pub fn page_background(&self) -> &str {
        &self.colors.background
    }
}
