//! Built-in per-kind renderers.
//!
//! Each kind has one function taking the node, its resolved style, the
//! already-rendered children and an explicit [`RenderMode`]. The two modes
//! share everything except where the export target cannot host the preview
//! markup (platform video embeds), plus the `data-builder-*` hooks the live
//! canvas uses for hit-testing.

use crate::css::to_inline_style;
use crate::video::VideoSource;
use crate::RenderMode;
use pagecraft_model::{BuilderComponent, ComponentKind};
use pagecraft_style::ResolvedStyle;
use tracing::{debug, warn};

/// Everything a renderer may look at. Renderers must not reach for any
/// other state.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub node: &'a BuilderComponent,
    pub style: &'a ResolvedStyle,
    pub mode: RenderMode,
    /// Concatenated markup of the node's children, in document order
    pub children: &'a str,
}

/// Pluggable renderer for one component kind
pub trait ComponentRenderer: Send + Sync {
    fn render(&self, input: &RenderInput<'_>) -> String;
}

impl<F> ComponentRenderer for F
where
    F: Fn(&RenderInput<'_>) -> String + Send + Sync,
{
    fn render(&self, input: &RenderInput<'_>) -> String {
        self(input)
    }
}

pub fn render_builtin(input: &RenderInput<'_>) -> String {
    match input.node.kind {
        ComponentKind::Row => render_container("div", input),
        ComponentKind::Column => render_container("div", input),
        ComponentKind::Columns => render_container("div", input),
        ComponentKind::Menu => render_container("nav", input),
        ComponentKind::Social => render_container("div", input),
        ComponentKind::Button => render_button(input),
        ComponentKind::Heading => render_heading(input),
        ComponentKind::Paragraph => render_paragraph(input),
        ComponentKind::Image => render_image(input),
        ComponentKind::Html => render_html_block(input),
        ComponentKind::Video => render_video(input),
    }
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

type Attrs = Vec<(String, String)>;

/// Preview hooks, then the node's own HTML attributes. `style` and any
/// name in `reserved` are left to the renderer.
fn base_attributes(input: &RenderInput<'_>, reserved: &[&str]) -> Attrs {
    let mut attrs = Attrs::new();
    if input.mode == RenderMode::Preview {
        attrs.push(("data-builder-id".to_string(), input.node.id.to_string()));
        attrs.push(("data-builder-kind".to_string(), input.node.kind.to_string()));
    }
    for (name, value) in &input.node.html_attributes {
        if name == "style" || reserved.contains(&name.as_str()) {
            continue;
        }
        if !is_attribute_name(name) {
            warn!(component = %input.node.id, attribute = %name, "skipping malformed attribute name");
            continue;
        }
        attrs.push((name.clone(), value.clone()));
    }
    attrs
}

/// HTML attribute names may not hold whitespace, quotes, `/`, `=` or `>`
fn is_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && !name.chars().any(|c| {
            c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '<' | '>' | '/' | '=')
        })
}

fn open_tag(name: &str, attrs: &[(String, String)], style: &str, self_closing: bool) -> String {
    let mut out = format!("<{}", name);
    for (attr, value) in attrs {
        out.push(' ');
        out.push_str(attr);
        // bare boolean attributes
        if !value.is_empty() {
            out.push_str("=\"");
            out.push_str(&escape_html(value));
            out.push('"');
        }
    }
    if !style.is_empty() {
        out.push_str(" style=\"");
        out.push_str(&escape_html(style));
        out.push('"');
    }
    out.push_str(if self_closing { " />" } else { ">" });
    out
}

fn element(name: &str, attrs: &[(String, String)], style: &str, inner: &str) -> String {
    format!("{}{}</{}>", open_tag(name, attrs, style, false), inner, name)
}

fn placeholder(input: &RenderInput<'_>, message: &str) -> String {
    debug!(component = %input.node.id, kind = %input.node.kind, "rendering placeholder");
    let mut attrs = base_attributes(input, &[]);
    attrs.push(("data-placeholder".to_string(), input.node.kind.to_string()));
    element("div", &attrs, &to_inline_style(input.style), &escape_html(message))
}

fn render_container(tag: &str, input: &RenderInput<'_>) -> String {
    let attrs = base_attributes(input, &[]);
    element(tag, &attrs, &to_inline_style(input.style), input.children)
}

fn render_button(input: &RenderInput<'_>) -> String {
    let node = input.node;
    let text = node.specific_str("text").unwrap_or(&node.label);

    let mut attrs = Attrs::new();
    match node.specific_str("href") {
        Some(href) => {
            attrs.push(("href".to_string(), href.to_string()));
            if let Some(target) = node.specific_str("target") {
                attrs.push(("target".to_string(), target.to_string()));
                if target == "_blank" {
                    attrs.push(("rel".to_string(), "noopener noreferrer".to_string()));
                }
            }
        }
        None => attrs.push(("role".to_string(), "button".to_string())),
    }
    let mut all = base_attributes(input, &["href", "target", "rel", "role"]);
    all.extend(attrs);

    element("a", &all, &to_inline_style(input.style), &escape_html(text))
}

fn render_heading(input: &RenderInput<'_>) -> String {
    let level = input
        .node
        .specific_attributes
        .get("level")
        .and_then(|v| v.as_u64().or_else(|| v.as_str().and_then(|s| s.parse().ok())))
        .unwrap_or(2)
        .clamp(1, 6);
    let content = input.node.specific_str("content").unwrap_or("");
    let attrs = base_attributes(input, &[]);
    element(
        &format!("h{}", level),
        &attrs,
        &to_inline_style(input.style),
        &escape_html(content),
    )
}

fn render_paragraph(input: &RenderInput<'_>) -> String {
    let content = input.node.specific_str("content").unwrap_or("");
    let inner = content
        .lines()
        .map(escape_html)
        .collect::<Vec<_>>()
        .join("<br />");
    let attrs = base_attributes(input, &[]);
    element("p", &attrs, &to_inline_style(input.style), &inner)
}

fn render_image(input: &RenderInput<'_>) -> String {
    let node = input.node;
    let Some(src) = node.specific_str("src") else {
        return placeholder(input, "No image selected");
    };
    let alt = node.specific_str("alt").unwrap_or("");

    match node.specific_str("href") {
        Some(href) => {
            let mut link_attrs = base_attributes(input, &["href", "src", "alt"]);
            link_attrs.push(("href".to_string(), href.to_string()));
            let img_attrs = vec![
                ("src".to_string(), src.to_string()),
                ("alt".to_string(), alt.to_string()),
            ];
            let img = open_tag("img", &img_attrs, &to_inline_style(input.style), true);
            element("a", &link_attrs, "", &img)
        }
        None => {
            let mut attrs = base_attributes(input, &["src", "alt"]);
            attrs.push(("src".to_string(), src.to_string()));
            attrs.push(("alt".to_string(), alt.to_string()));
            open_tag("img", &attrs, &to_inline_style(input.style), true)
        }
    }
}

fn render_html_block(input: &RenderInput<'_>) -> String {
    match input.node.specific_str("content") {
        // raw markup is the point of this kind
        Some(content) => {
            let attrs = base_attributes(input, &[]);
            element("div", &attrs, &to_inline_style(input.style), content)
        }
        None => placeholder(input, "Empty HTML block"),
    }
}

fn render_video(input: &RenderInput<'_>) -> String {
    let Some(src) = input.node.specific_str("src") else {
        return placeholder(input, "No video selected");
    };

    let source = VideoSource::classify(src);
    match (&source, input.mode) {
        (VideoSource::File { url }, _) => render_video_file(input, url),
        (_, RenderMode::Preview) => render_video_embed(input, &source),
        (_, RenderMode::Export) => render_video_link(input, &source),
    }
}

/// Native tag; identical in both modes apart from the preview hooks
fn render_video_file(input: &RenderInput<'_>, url: &str) -> String {
    let node = input.node;
    let reserved = [
        "src", "controls", "autoplay", "muted", "loop", "playsinline", "poster",
    ];
    let mut attrs = base_attributes(input, &reserved);
    attrs.push(("src".to_string(), url.to_string()));
    if node.specific_bool("controls").unwrap_or(true) {
        attrs.push(("controls".to_string(), String::new()));
    }
    let autoplay = node.specific_bool("autoplay").unwrap_or(false);
    if autoplay {
        attrs.push(("autoplay".to_string(), String::new()));
    }
    // browsers only honour autoplay on muted media
    if autoplay || node.specific_bool("muted").unwrap_or(false) {
        attrs.push(("muted".to_string(), String::new()));
    }
    if node.specific_bool("loop").unwrap_or(false) {
        attrs.push(("loop".to_string(), String::new()));
    }
    attrs.push(("playsinline".to_string(), String::new()));
    if let Some(poster) = node.specific_str("poster") {
        attrs.push(("poster".to_string(), poster.to_string()));
    }

    element(
        "video",
        &attrs,
        &to_inline_style(input.style),
        "Your browser does not support the video tag.",
    )
}

fn render_video_embed(input: &RenderInput<'_>, source: &VideoSource) -> String {
    let mut embed = source.embed_url().unwrap_or_else(|| source.watch_url());
    if input.node.specific_bool("autoplay").unwrap_or(false) {
        embed.push_str(match source {
            VideoSource::Vimeo { .. } => "?autoplay=1&muted=1",
            _ => "?autoplay=1&mute=1",
        });
    }

    let title = input
        .node
        .specific_str("title")
        .unwrap_or_else(|| source.platform_name().unwrap_or("Video"));
    let frame_attrs = vec![
        ("src".to_string(), embed),
        ("title".to_string(), title.to_string()),
        (
            "allow".to_string(),
            "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture"
                .to_string(),
        ),
        ("allowfullscreen".to_string(), String::new()),
    ];
    let frame = element(
        "iframe",
        &frame_attrs,
        "width: 100%; aspect-ratio: 16 / 9; border: 0;",
        "",
    );

    let attrs = base_attributes(input, &[]);
    element("div", &attrs, &to_inline_style(input.style), &frame)
}

/// Standalone files have no HTTP origin, which platform players refuse to
/// embed under. Export a clickable link instead.
fn render_video_link(input: &RenderInput<'_>, source: &VideoSource) -> String {
    let platform = source.platform_name().unwrap_or("the web");
    let mut inner = String::new();
    if let Some(thumb) = source.thumbnail_url() {
        let thumb_attrs = vec![
            ("src".to_string(), thumb),
            ("alt".to_string(), format!("{} video thumbnail", platform)),
        ];
        inner.push_str(&open_tag(
            "img",
            &thumb_attrs,
            "display: block; width: 100%; height: auto;",
            true,
        ));
    }
    inner.push_str(&element(
        "span",
        &[],
        "display: block; padding: 8px 0;",
        &format!("&#9654; Watch this video on {}", escape_html(platform)),
    ));

    let link_attrs = vec![
        ("href".to_string(), source.watch_url()),
        ("target".to_string(), "_blank".to_string()),
        ("rel".to_string(), "noopener noreferrer".to_string()),
    ];
    let link = element("a", &link_attrs, "display: block; text-decoration: none;", &inner);
    let note = element(
        "p",
        &[],
        "margin: 4px 0 0; font-size: 12px; color: #6b7280;",
        &format!(
            "This video opens on {} because embedded players need a web server.",
            escape_html(platform)
        ),
    );

    let attrs = base_attributes(input, &[]);
    element(
        "div",
        &attrs,
        &to_inline_style(input.style),
        &format!("{}{}", link, note),
    )
}
