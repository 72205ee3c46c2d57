use pagecraft_compiler_html::CompileOptions;
use pagecraft_style::Theme;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "pagecraft.config.json";

/// Pagecraft configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding document JSON files
    #[serde(default = "default_src_dir")]
    pub src_dir: String,

    /// Theme tokens passed to style resolution
    #[serde(default)]
    pub theme: Theme,

    /// Export page options
    #[serde(default)]
    pub export: ExportConfig,
}

fn default_src_dir() -> String {
    "pages".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    #[serde(default = "default_pretty")]
    pub pretty: bool,

    #[serde(default = "default_indent")]
    pub indent: String,

    /// Page title; the document name when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default = "default_content_width")]
    pub content_width: String,

    /// Optional output directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<String>,
}

fn default_pretty() -> bool {
    true
}

fn default_indent() -> String {
    "  ".to_string()
}

fn default_content_width() -> String {
    "600px".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
            indent: default_indent(),
            title: None,
            content_width: default_content_width(),
            out_dir: None,
        }
    }
}

impl ExportConfig {
    pub fn compile_options(&self, document_name: &str) -> CompileOptions {
        CompileOptions {
            pretty: self.pretty,
            indent: self.indent.clone(),
            title: self
                .title
                .clone()
                .unwrap_or_else(|| document_name.to_string()),
            content_width: self.content_width.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            src_dir: default_src_dir(),
            theme: Theme::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to source directory
    pub fn get_src_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.src_dir)
    }

    pub fn get_out_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(self.export.out_dir.as_deref().unwrap_or("dist"))
    }
}
