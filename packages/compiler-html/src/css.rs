use pagecraft_style::ResolvedStyle;

/// `backgroundColor` → `background-color`. Vendor-prefixed identifiers
/// (`WebkitTransition`, `msFlex`) gain a leading dash.
pub fn camel_to_kebab(property: &str) -> String {
    let mut out = String::with_capacity(property.len() + 4);
    let ms_prefixed = property
        .strip_prefix("ms")
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_uppercase()));
    if ms_prefixed {
        out.push('-');
    }
    for ch in property.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Flatten to an inline declaration string: `a: b; c: d;`. Properties are
/// emitted in name order; absent values never appear.
pub fn to_inline_style(style: &ResolvedStyle) -> String {
    let mut out = String::new();
    for (property, value) in style.iter() {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&camel_to_kebab(property));
        out.push_str(": ");
        out.push_str(value);
        out.push(';');
    }
    out
}
