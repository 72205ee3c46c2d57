//! Integration tests for editor crate

use pagecraft_compiler_html::{CompileOptions, RenderMode};
use pagecraft_editor::{Document, EditSession, EditorError, Mutation};
use pagecraft_model::{ComponentKind, ComponentPatch, ComponentTemplate};
use pagecraft_style::Theme;

fn hero() -> ComponentTemplate {
    ComponentTemplate::new(ComponentKind::Row).with_child(
        ComponentTemplate::new(ComponentKind::Column)
            .with_child(ComponentTemplate::new(ComponentKind::Heading).with_specific("content", "Welcome"))
            .with_child(
                ComponentTemplate::new(ComponentKind::Button)
                    .with_specific("text", "Start")
                    .with_specific("href", "https://example.com/start"),
            ),
    )
}

#[test]
fn test_document_lifecycle() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("welcome.json");

    let mut doc = Document::new("welcome");
    let row = doc.insert_template(hero(), None, 0)?;
    assert_eq!(doc.version, 1);
    assert_eq!(doc.tree().len(), 4);

    doc.save_as(&path)?;
    assert!(!doc.is_dirty());

    let mut loaded = Document::load(&path)?;
    assert_eq!(loaded.tree(), doc.tree());
    assert_eq!(loaded.path.as_deref(), Some(path.as_path()));

    // new ids continue past the loaded ones
    let next = loaded.insert_kind(ComponentKind::Paragraph, Some(&row), 0)?;
    assert!(!doc.tree().contains(&next));
    loaded.save()?;

    let reloaded = Document::load(&path)?;
    assert_eq!(reloaded.tree().len(), 5);
    Ok(())
}

#[test]
fn test_save_requires_path() {
    let mut doc = Document::new("scratch");
    assert!(matches!(doc.save(), Err(EditorError::NotFileBacked)));
}

#[test]
fn test_malformed_snapshot_is_rejected() {
    let json = r#"{ "components": [ { "id": "p", "type": "paragraph", "children": [ { "id": "x", "type": "row" } ] } ] }"#;
    assert!(matches!(
        Document::from_json("bad", json),
        Err(EditorError::Snapshot(_))
    ));
}

#[test]
fn test_reset_style_exports_theme_value() -> anyhow::Result<()> {
    let mut doc = Document::new("welcome");
    let row = doc.insert_template(hero(), None, 0)?;
    let column = doc.tree().children(Some(&row))?[0].clone();
    let heading = doc.tree().children(Some(&column))?[0].clone();

    doc.apply(Mutation::update(heading.clone(), ComponentPatch::new().style("color", "#ff0000")))?;
    let session = EditSession::new(doc, Theme::default());
    assert!(session.export_html(CompileOptions::default()).contains("color: #ff0000;"));

    let mut doc = session.into_document();
    doc.update(&heading, ComponentPatch::new().reset_style("color"))?;
    let markup = pagecraft_compiler_html::render(
        doc.tree(),
        &heading,
        RenderMode::Export,
        &Theme::default(),
    )?;
    assert!(!markup.contains("#ff0000"));
    assert!(markup.contains(&format!("color: {};", Theme::default().colors.heading)));
    Ok(())
}

#[test]
fn test_export_twice_is_identical() -> anyhow::Result<()> {
    let mut doc = Document::new("welcome");
    doc.insert_template(hero(), None, 0)?;
    let session = EditSession::new(doc, Theme::default());

    let first = session.export_html(CompileOptions::default());
    let second = session.export_html(CompileOptions::default());
    assert_eq!(first, second);
    Ok(())
}
