use crate::{
    compile_to_html, render, render_tree, CompileOptions, HtmlCompiler, PreviewDevice, RenderInput,
    RenderMode,
};
use pagecraft_model::{BuilderComponent, ComponentId, ComponentKind, ComponentTree, DocumentSnapshot};
use pagecraft_style::Theme;

fn newsletter() -> ComponentTree {
    let json = r##"{
        "components": [
            {
                "id": "row",
                "type": "row",
                "styles": { "backgroundColor": "#f3f4f6" },
                "children": [
                    {
                        "id": "col",
                        "type": "column",
                        "children": [
                            { "id": "title", "type": "heading", "specificAttributes": { "content": "Hello", "level": 1 } },
                            { "id": "intro", "type": "paragraph", "specificAttributes": { "content": "Fresh news & notes" } },
                            { "id": "clip", "type": "video", "specificAttributes": { "src": "https://www.youtube.com/watch?v=dQw4w9WgXcQ" } },
                            { "id": "cta", "type": "button", "specificAttributes": { "text": "Read more", "href": "https://example.com" } }
                        ]
                    }
                ]
            }
        ]
    }"##;
    DocumentSnapshot::from_json(json).unwrap().into_tree().unwrap()
}

#[test]
fn test_export_is_deterministic() {
    let tree = newsletter();
    let theme = Theme::default();

    let first = render_tree(&tree, RenderMode::Export, &theme);
    let second = render_tree(&tree, RenderMode::Export, &theme);
    assert_eq!(first, second);

    let page = compile_to_html(&tree, &theme, CompileOptions::default());
    assert_eq!(page, compile_to_html(&tree, &theme, CompileOptions::default()));
}

#[test]
fn test_children_in_document_order() {
    let html = render_tree(&newsletter(), RenderMode::Export, &Theme::default());

    let positions: Vec<usize> = ["Hello", "Fresh news", "Watch this video", "Read more"]
        .iter()
        .map(|needle| html.find(needle).unwrap())
        .collect();
    let mut sorted = positions.clone();
    sorted.sort();
    assert_eq!(positions, sorted);
}

#[test]
fn test_platform_video_diverges_by_mode() {
    let tree = newsletter();
    let theme = Theme::default();
    let id = ComponentId::from("clip");

    let preview = render(&tree, &id, RenderMode::Preview, &theme).unwrap();
    assert!(preview.contains("<iframe src=\"https://www.youtube.com/embed/dQw4w9WgXcQ\""));

    let export = render(&tree, &id, RenderMode::Export, &theme).unwrap();
    assert!(!export.contains("<iframe"));
    assert!(export.contains("href=\"https://www.youtube.com/watch?v=dQw4w9WgXcQ\""));
    assert!(export.contains("Watch this video on YouTube"));
    assert!(export.contains("https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg"));
}

#[test]
fn test_direct_video_same_in_both_modes() {
    let mut tree = ComponentTree::new();
    tree.insert(
        BuilderComponent::new("v".into(), ComponentKind::Video)
            .with_specific("src", "media/intro.mp4")
            .with_specific("loop", true),
        None,
        0,
    )
    .unwrap();
    let theme = Theme::default();
    let id = ComponentId::from("v");

    let preview = render(&tree, &id, RenderMode::Preview, &theme).unwrap();
    let export = render(&tree, &id, RenderMode::Export, &theme).unwrap();

    assert!(export.starts_with("<video src=\"media/intro.mp4\" controls loop playsinline"));
    // only the canvas hooks differ
    assert_eq!(
        preview.replace(" data-builder-id=\"v\" data-builder-kind=\"video\"", ""),
        export
    );
}

#[test]
fn test_missing_media_degrades_to_placeholder() {
    let mut tree = ComponentTree::new();
    tree.insert(BuilderComponent::new("v".into(), ComponentKind::Video), None, 0)
        .unwrap();
    tree.insert(BuilderComponent::new("i".into(), ComponentKind::Image), None, 1)
        .unwrap();

    let html = render_tree(&tree, RenderMode::Export, &Theme::default());
    assert!(html.contains("data-placeholder=\"video\""));
    assert!(html.contains("data-placeholder=\"image\""));
    assert!(!html.contains("<video"));
}

#[test]
fn test_inline_style_omits_absent_values() {
    let tree = newsletter();
    let html = render(&tree, &"row".into(), RenderMode::Export, &Theme::default()).unwrap();
    assert!(html.starts_with("<div style=\"background-color: #f3f4f6;"));
    assert!(!html.contains(": ;"));
}

#[test]
fn test_text_is_escaped() {
    let html = render_tree(&newsletter(), RenderMode::Export, &Theme::default());
    assert!(html.contains("Fresh news &amp; notes"));
}

#[test]
fn test_render_unknown_id() {
    let err = render(&newsletter(), &"missing".into(), RenderMode::Export, &Theme::default())
        .unwrap_err();
    assert_eq!(err.kind(), "NotFound");
}

#[test]
fn test_theme_is_threaded_through() {
    let mut theme = Theme::default();
    theme.colors.heading = "#123456".to_string();
    let html = render(&newsletter(), &"title".into(), RenderMode::Export, &theme).unwrap();
    assert!(html.contains("color: #123456;"));
}

#[test]
fn test_compile_page_wrapper() {
    let options = CompileOptions {
        title: "Weekly <digest>".to_string(),
        ..CompileOptions::default()
    };
    let html = compile_to_html(&newsletter(), &Theme::default(), options);

    println!("Generated HTML:\n{}", html);

    assert!(html.starts_with("<!DOCTYPE html>\n<html>\n"));
    assert!(html.contains("<title>Weekly &lt;digest&gt;</title>"));
    assert!(html.contains("max-width: 600px"));
    assert!(!html.contains("data-builder-id"));
    assert!(!html.contains("<link"));
}

#[test]
fn test_compact_page() {
    let options = CompileOptions {
        pretty: false,
        ..CompileOptions::default()
    };
    let html = compile_to_html(&ComponentTree::new(), &Theme::default(), options);
    assert!(!html.contains('\n'));
    assert!(html.ends_with("</div></body></html>"));
}

#[test]
fn test_canvas_uses_device_width() {
    let compiler = HtmlCompiler::new(Theme::default());
    let tree = newsletter();

    let mobile = compiler.render_canvas(&tree, PreviewDevice::Mobile);
    assert!(mobile.starts_with("<div data-builder-canvas=\"mobile\" style=\"max-width: 375px;"));
    assert!(mobile.contains("data-builder-id=\"title\""));
}

#[test]
fn test_renderer_override() {
    let compiler = HtmlCompiler::new(Theme::default()).with_renderer(
        ComponentKind::Button,
        |input: &RenderInput<'_>| format!("<button data-mode=\"{:?}\"></button>", input.mode),
    );
    let html = compiler.render_tree(&newsletter(), RenderMode::Export);
    assert!(html.contains("<button data-mode=\"Export\"></button>"));
    assert!(!html.contains("Read more"));
}
