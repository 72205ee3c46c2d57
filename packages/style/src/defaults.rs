//! Per-kind defaults and hard-coded fallbacks.

use pagecraft_model::ComponentKind;

pub const SIDES: [&str; 4] = ["Top", "Right", "Bottom", "Left"];
pub const CORNERS: [&str; 4] = ["TopLeft", "TopRight", "BottomRight", "BottomLeft"];

/// Inherited typography: resolved on every kind that renders text
const TYPOGRAPHY: &[&str] = &["color", "fontFamily", "fontSize", "lineHeight"];

/// Built-in defaults owned by each component kind
pub fn kind_defaults(kind: ComponentKind) -> &'static [(&'static str, &'static str)] {
    match kind {
        ComponentKind::Row => &[("boxSizing", "border-box"), ("width", "100%")],
        ComponentKind::Column => &[("boxSizing", "border-box"), ("flex", "1 1 0"), ("minWidth", "0")],
        ComponentKind::Columns => &[("display", "flex"), ("width", "100%")],
        ComponentKind::Menu => &[("display", "flex"), ("flexWrap", "wrap"), ("listStyle", "none")],
        ComponentKind::Social => &[("display", "flex"), ("alignItems", "center")],
        ComponentKind::Button => &[
            ("display", "inline-block"),
            ("textDecoration", "none"),
            ("textAlign", "center"),
            ("paddingTop", "12px"),
            ("paddingRight", "24px"),
            ("paddingBottom", "12px"),
            ("paddingLeft", "24px"),
            ("borderTopLeftRadius", "4px"),
            ("borderTopRightRadius", "4px"),
            ("borderBottomRightRadius", "4px"),
            ("borderBottomLeftRadius", "4px"),
        ],
        ComponentKind::Heading => &[
            ("fontSize", "28px"),
            ("fontWeight", "bold"),
            ("lineHeight", "1.25"),
            ("marginTop", "0"),
            ("marginBottom", "16px"),
        ],
        ComponentKind::Paragraph => &[("marginTop", "0"), ("marginBottom", "16px")],
        ComponentKind::Image => &[("display", "block"), ("maxWidth", "100%"), ("height", "auto")],
        ComponentKind::Video => &[("display", "block"), ("width", "100%")],
        ComponentKind::Html => &[],
    }
}

pub fn kind_default(kind: ComponentKind, property: &str) -> Option<&'static str> {
    kind_defaults(kind)
        .iter()
        .find(|(p, _)| *p == property)
        .map(|(_, v)| *v)
}

/// Properties the theme contributes to a kind even when nothing else
/// mentions them
pub fn themed_properties(kind: ComponentKind) -> Vec<String> {
    let mut props: Vec<String> = Vec::new();
    if matches!(
        kind,
        ComponentKind::Heading | ComponentKind::Paragraph | ComponentKind::Button | ComponentKind::Menu
    ) {
        props.extend(TYPOGRAPHY.iter().map(|p| p.to_string()));
    }
    match kind {
        ComponentKind::Button => props.push("backgroundColor".to_string()),
        ComponentKind::Row | ComponentKind::Column => {
            props.extend(SIDES.iter().map(|side| format!("padding{}", side)));
        }
        ComponentKind::Menu | ComponentKind::Social => props.push("columnGap".to_string()),
        _ => {}
    }
    props
}

/// Last-resort constants, below the theme
pub fn fallback(property: &str) -> Option<&'static str> {
    match property {
        "color" => Some("#000000"),
        "fontFamily" => Some("sans-serif"),
        "fontSize" => Some("16px"),
        "lineHeight" => Some("normal"),
        p if is_border_side(p, "Style") => Some("solid"),
        p if is_border_side(p, "Color") => Some("currentColor"),
        _ => None,
    }
}

/// `borderTopStyle`, `borderLeftColor`, ... (not corner radii)
pub fn is_border_side(property: &str, suffix: &str) -> bool {
    SIDES
        .iter()
        .any(|side| property.strip_prefix("border").and_then(|r| r.strip_prefix(side)) == Some(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_side_detection() {
        assert!(is_border_side("borderTopStyle", "Style"));
        assert!(is_border_side("borderLeftColor", "Color"));
        assert!(!is_border_side("borderTopLeftRadius", "Style"));
        assert!(!is_border_side("borderColor", "Color"));
    }

    #[test]
    fn test_every_kind_default_is_nonempty() {
        for kind in ComponentKind::ALL {
            for (prop, value) in kind_defaults(kind) {
                assert!(!prop.is_empty() && !value.is_empty(), "{} {}", kind, prop);
            }
        }
    }
}
