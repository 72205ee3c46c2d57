use super::collect_documents;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_model::{DocumentSnapshot, SnapshotError};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Document file or directory (defaults to the configured source dir)
    pub input: Option<PathBuf>,
}

pub fn validate(args: ValidateArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let files = collect_documents(args.input.as_deref(), &config, cwd)?;

    println!("🔍 {} {} documents", "Validating".green().bold(), files.len());
    println!();

    let mut invalid = 0;
    for file in &files {
        let relative_path = file.strip_prefix(cwd).unwrap_or(file);
        let problems = check_file(file)?;

        if problems.is_empty() {
            println!("  {} {}", "✓".green(), relative_path.display());
        } else {
            invalid += 1;
            println!("  {} {}", "✗".red(), relative_path.display());
            for problem in problems {
                println!("      {}", problem.red());
            }
        }
    }

    println!();
    if invalid > 0 {
        return Err(anyhow!("{} of {} documents are invalid", invalid, files.len()));
    }
    println!("{} All documents are well-formed", "✅".green());
    Ok(())
}

/// Every problem found in one file; empty when well-formed
fn check_file(file: &Path) -> Result<Vec<String>> {
    let json = fs::read_to_string(file)?;
    let problems = match DocumentSnapshot::from_json(&json).and_then(DocumentSnapshot::into_tree) {
        Ok(_) => Vec::new(),
        Err(SnapshotError::Malformed(violations)) => {
            violations.iter().map(|v| v.to_string()).collect()
        }
        Err(other) => vec![other.to_string()],
    };
    Ok(problems)
}
