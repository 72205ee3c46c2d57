use crate::config::{Config, ExportConfig, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_editor::Document;
use pagecraft_model::{ComponentKind, ComponentTemplate, Palette};
use pagecraft_style::Theme;
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory for document files
    #[arg(short, long, default_value = "pages")]
    pub src_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!(
        "{}",
        "📝 Initializing Pagecraft project...".bright_blue().bold()
    );

    let src_dir = cwd.join(&args.src_dir);
    if !src_dir.exists() {
        fs::create_dir_all(&src_dir)?;
        println!("  {} Created {}/", "✓".green(), args.src_dir);
    }

    let example_file = src_dir.join("welcome.json");
    if !example_file.exists() {
        let doc = welcome_document()?;
        fs::write(&example_file, doc.to_json()?)?;
        println!("  {} Created welcome.json", "✓".green());
    }

    let config = Config {
        src_dir: args.src_dir.clone(),
        theme: Theme::default(),
        export: ExportConfig {
            out_dir: Some("dist".to_string()),
            ..ExportConfig::default()
        },
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}/welcome.json", args.src_dir);
    println!("  2. Run: pagecraft export");
    println!("  3. Open dist/welcome.html in a browser");

    Ok(())
}

/// Sample page assembled from the standard palette
fn welcome_document() -> Result<Document> {
    let palette = Palette::standard();
    let mut doc = Document::new("welcome");

    let row = doc.insert_kind(ComponentKind::Row, None, 0)?;
    let column = doc.insert_kind(ComponentKind::Column, Some(&row), 0)?;
    doc.insert_template(
        ComponentTemplate::new(ComponentKind::Heading)
            .with_specific("content", "Welcome to Pagecraft")
            .with_specific("level", 1),
        Some(&column),
        0,
    )?;
    doc.insert_template(
        ComponentTemplate::new(ComponentKind::Paragraph)
            .with_specific("content", "Drag components from the palette to build your page."),
        Some(&column),
        1,
    )?;
    if let Some(button) = palette.get("button") {
        doc.insert_template(button.clone(), Some(&column), 2)?;
    }
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_config_and_sample() {
        let dir = tempfile::tempdir().unwrap();
        init(
            InitArgs {
                src_dir: "pages".to_string(),
                force: false,
            },
            dir.path(),
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.src_dir, "pages");
        assert_eq!(config.export.out_dir.as_deref(), Some("dist"));

        let sample = Document::load(dir.path().join("pages/welcome.json")).unwrap();
        assert_eq!(sample.tree().len(), 5);
        assert!(sample.tree().is_well_formed());
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{ "srcDir": "mine" }"#).unwrap();
        init(
            InitArgs {
                src_dir: "pages".to_string(),
                force: false,
            },
            dir.path(),
        )
        .unwrap();
        assert_eq!(Config::load(dir.path()).unwrap().src_dir, "mine");
        assert!(!dir.path().join("pages").exists());
    }
}
