//! Expansion of box-model and border shorthands into per-side longhands.

use crate::defaults::{CORNERS, SIDES};
use std::collections::BTreeMap;

const BORDER_STYLES: &[&str] = &[
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];

/// Split a CSS value on whitespace, keeping parenthesised groups
/// (`calc(1px + 2px)`, `rgb(0, 0, 0)`) intact
pub fn split_values(value: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for ch in value.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// CSS 1-4 value box expansion, in top/right/bottom/left order
fn four(value: &str) -> Option<[String; 4]> {
    let v = split_values(value);
    match v.len() {
        1 => Some([v[0].clone(), v[0].clone(), v[0].clone(), v[0].clone()]),
        2 => Some([v[0].clone(), v[1].clone(), v[0].clone(), v[1].clone()]),
        3 => Some([v[0].clone(), v[1].clone(), v[2].clone(), v[1].clone()]),
        4 => Some([v[0].clone(), v[1].clone(), v[2].clone(), v[3].clone()]),
        _ => None,
    }
}

/// Parse `1px solid #ccc` (any order) into width/style/color
fn border_parts(value: &str) -> [Option<String>; 3] {
    let mut parts: [Option<String>; 3] = [None, None, None];
    for token in split_values(value) {
        if BORDER_STYLES.contains(&token.as_str()) {
            parts[1] = Some(token);
        } else if token.starts_with(|c: char| c.is_ascii_digit() || c == '.')
            || matches!(token.as_str(), "thin" | "medium" | "thick")
        {
            parts[0] = Some(token);
        } else {
            parts[2] = Some(token);
        }
    }
    parts
}

/// Expand shorthands in an explicit style map.
///
/// Layers, lowest first: `border` → `borderWidth`/`borderStyle`/`borderColor`
/// → `border{Side}` → longhands written explicitly. Shorthand keys that
/// cannot be parsed are passed through unchanged.
pub fn expand(styles: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut out: BTreeMap<String, String> = BTreeMap::new();

    if let Some(value) = styles.get("border") {
        let [width, style, color] = border_parts(value);
        for side in SIDES {
            set_part(&mut out, &format!("border{}Width", side), &width);
            set_part(&mut out, &format!("border{}Style", side), &style);
            set_part(&mut out, &format!("border{}Color", side), &color);
        }
    }

    for (short, suffix) in [("borderWidth", "Width"), ("borderStyle", "Style"), ("borderColor", "Color")] {
        if let Some(values) = styles.get(short).and_then(|v| four(v)) {
            for (side, value) in SIDES.iter().zip(values) {
                out.insert(format!("border{}{}", side, suffix), value);
            }
        }
    }

    for side in SIDES {
        if let Some(value) = styles.get(&format!("border{}", side)) {
            let [width, style, color] = border_parts(value);
            set_part(&mut out, &format!("border{}Width", side), &width);
            set_part(&mut out, &format!("border{}Style", side), &style);
            set_part(&mut out, &format!("border{}Color", side), &color);
        }
    }

    for short in ["margin", "padding"] {
        if let Some(values) = styles.get(short).and_then(|v| four(v)) {
            for (side, value) in SIDES.iter().zip(values) {
                out.insert(format!("{}{}", short, side), value);
            }
        }
    }

    if let Some(values) = styles.get("borderRadius").and_then(|v| four(v)) {
        for (corner, value) in CORNERS.iter().zip(values) {
            out.insert(format!("border{}Radius", corner), value);
        }
    }

    for (key, value) in styles {
        if is_expanded_shorthand(key, value) {
            continue;
        }
        out.insert(key.clone(), value.clone());
    }

    out
}

fn set_part(out: &mut BTreeMap<String, String>, key: &str, part: &Option<String>) {
    if let Some(value) = part {
        out.insert(key.to_string(), value.clone());
    }
}

fn is_expanded_shorthand(key: &str, value: &str) -> bool {
    match key {
        "border" | "borderTop" | "borderRight" | "borderBottom" | "borderLeft" => true,
        "margin" | "padding" | "borderWidth" | "borderStyle" | "borderColor" | "borderRadius" => {
            four(value).is_some()
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_split_keeps_functions() {
        assert_eq!(
            split_values("calc(1px + 2px) 4px"),
            vec!["calc(1px + 2px)".to_string(), "4px".to_string()]
        );
    }

    #[test]
    fn test_padding_two_values() {
        let out = expand(&map(&[("padding", "8px 16px")]));
        assert_eq!(out["paddingTop"], "8px");
        assert_eq!(out["paddingRight"], "16px");
        assert_eq!(out["paddingBottom"], "8px");
        assert_eq!(out["paddingLeft"], "16px");
        assert!(!out.contains_key("padding"));
    }

    #[test]
    fn test_longhand_beats_shorthand() {
        let out = expand(&map(&[("margin", "10px"), ("marginLeft", "0")]));
        assert_eq!(out["marginTop"], "10px");
        assert_eq!(out["marginLeft"], "0");
    }

    #[test]
    fn test_border_shorthand_any_order() {
        let out = expand(&map(&[("border", "#ccc 2px dashed"), ("borderBottom", "4px")]));
        assert_eq!(out["borderTopWidth"], "2px");
        assert_eq!(out["borderTopStyle"], "dashed");
        assert_eq!(out["borderTopColor"], "#ccc");
        assert_eq!(out["borderBottomWidth"], "4px");
        assert_eq!(out["borderBottomStyle"], "dashed");
    }

    #[test]
    fn test_radius_corners() {
        let out = expand(&map(&[("borderRadius", "4px 8px")]));
        assert_eq!(out["borderTopLeftRadius"], "4px");
        assert_eq!(out["borderTopRightRadius"], "8px");
        assert_eq!(out["borderBottomRightRadius"], "4px");
        assert_eq!(out["borderBottomLeftRadius"], "8px");
    }

    #[test]
    fn test_unparseable_shorthand_passes_through() {
        let out = expand(&map(&[("margin", "1px 2px 3px 4px 5px")]));
        assert_eq!(out["margin"], "1px 2px 3px 4px 5px");
        assert!(!out.contains_key("marginTop"));
    }
}
