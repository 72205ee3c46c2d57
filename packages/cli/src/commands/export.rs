use super::{collect_documents, document_name};
use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_compiler_html::{HtmlCompiler, PreviewDevice, RenderMode};
use pagecraft_editor::Document;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Document file or directory (defaults to the configured source dir)
    pub input: Option<PathBuf>,

    /// Render mode (export, preview)
    #[arg(short, long, default_value = "export")]
    pub mode: String,

    /// Canvas width for preview mode (desktop, mobile)
    #[arg(short, long, default_value = "desktop")]
    pub device: String,

    /// Emit the markup fragment without the page wrapper
    #[arg(long)]
    pub fragment: bool,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,
}

fn parse_mode(mode: &str) -> Result<RenderMode> {
    match mode {
        "export" => Ok(RenderMode::Export),
        "preview" => Ok(RenderMode::Preview),
        other => Err(anyhow!("Unknown mode: {}. Use: export or preview", other)),
    }
}

fn parse_device(device: &str) -> Result<PreviewDevice> {
    match device {
        "desktop" => Ok(PreviewDevice::Desktop),
        "mobile" => Ok(PreviewDevice::Mobile),
        other => Err(anyhow!("Unknown device: {}. Use: desktop or mobile", other)),
    }
}

pub fn export(args: ExportArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let mode = parse_mode(&args.mode)?;
    let device = parse_device(&args.device)?;
    let files = collect_documents(args.input.as_deref(), &config, cwd)?;

    if files.is_empty() {
        println!("{}", "⚠️  No documents found".yellow());
        return Ok(());
    }

    if !args.stdout {
        println!("{}", "🔨 Exporting Pagecraft documents...".bright_blue().bold());
        println!("Found {} files", files.len());
    }

    let compiler = HtmlCompiler::new(config.theme.clone());
    let out_dir = match &args.out_dir {
        Some(out) => cwd.join(out),
        None => config.get_out_dir(cwd),
    };

    let mut success_count = 0;
    let mut error_count = 0;

    for file in &files {
        let relative_path = file.strip_prefix(cwd).unwrap_or(file);
        let result = render_file(file, &compiler, &config, mode, device, args.fragment);

        match result {
            Ok(html) if args.stdout => {
                println!("{}", html);
                success_count += 1;
            }
            Ok(html) => {
                let output_file = out_dir.join(file.file_name().unwrap_or_default()).with_extension("html");
                fs::create_dir_all(&out_dir)?;
                fs::write(&output_file, html)?;
                info!(input = %file.display(), output = %output_file.display(), "exported");
                success_count += 1;
                println!(
                    "  {} {} → {}",
                    "✓".green(),
                    relative_path.display(),
                    output_file.display()
                );
            }
            Err(e) => {
                error_count += 1;
                eprintln!(
                    "  {} {} - {}",
                    "✗".red(),
                    relative_path.display(),
                    format!("{:#}", e).red()
                );
            }
        }
    }

    if !args.stdout {
        println!();
        if error_count == 0 {
            println!("{} Exported {} files successfully", "✅".green(), success_count);
        } else {
            println!(
                "{} Exported {} files, {} errors",
                "⚠️".yellow(),
                success_count,
                error_count
            );
        }
    }

    if error_count > 0 {
        return Err(anyhow!("{} documents failed to export", error_count));
    }
    Ok(())
}

fn render_file(
    file: &Path,
    compiler: &HtmlCompiler,
    config: &Config,
    mode: RenderMode,
    device: PreviewDevice,
    fragment: bool,
) -> Result<String> {
    let doc = Document::load(file).with_context(|| format!("loading {}", file.display()))?;

    let html = match (mode, fragment) {
        (RenderMode::Preview, _) => compiler.render_canvas(doc.tree(), device),
        (RenderMode::Export, true) => compiler.render_tree(doc.tree(), RenderMode::Export),
        (RenderMode::Export, false) => compiler.compile_to_html(
            doc.tree(),
            config.export.compile_options(document_name(file)),
        ),
    };
    Ok(html)
}
