pub mod export;
pub mod init;
pub mod validate;

pub use export::{export, ExportArgs};
pub use init::{init, InitArgs};
pub use validate::{validate, ValidateArgs};

use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Document files named by `input`, or everything under the configured
/// source directory
pub(crate) fn collect_documents(input: Option<&Path>, config: &Config, cwd: &Path) -> Result<Vec<PathBuf>> {
    let root = match input {
        Some(path) => cwd.join(path),
        None => config.get_src_dir(cwd),
    };

    if root.is_file() {
        return Ok(vec![root]);
    }
    if !root.is_dir() {
        return Err(anyhow!("Input path does not exist: {}", root.display()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(&root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|path| {
            path.extension().and_then(|s| s.to_str()) == Some("json")
                && path.file_name().and_then(|s| s.to_str()) != Some(DEFAULT_CONFIG_NAME)
        })
        .collect();
    files.sort();
    Ok(files)
}

pub(crate) fn document_name(path: &Path) -> &str {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
}
