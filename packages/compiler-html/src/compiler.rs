use crate::renderers::{self, escape_html, ComponentRenderer, RenderInput};
use pagecraft_model::{BuilderComponent, ComponentId, ComponentKind, ComponentTree, TreeResult};
use pagecraft_style::{resolve, Theme};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::instrument;

/// Target the markup is produced for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Live canvas hosted by the app; may rely on its HTTP origin
    Preview,
    /// Standalone file opened from disk
    Export,
}

/// Canvas width preset for the live preview
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewDevice {
    #[default]
    Desktop,
    Mobile,
}

impl PreviewDevice {
    pub fn width(self) -> &'static str {
        match self {
            PreviewDevice::Desktop => "600px",
            PreviewDevice::Mobile => "375px",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PreviewDevice::Desktop => "desktop",
            PreviewDevice::Mobile => "mobile",
        }
    }
}

/// Options for full-page export
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Pretty print the page wrapper
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
    /// Document `<title>`
    pub title: String,
    /// Max width of the content column
    pub content_width: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
            title: "Untitled page".to_string(),
            content_width: PreviewDevice::Desktop.width().to_string(),
        }
    }
}

struct Context {
    options: CompileOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    fn new(options: CompileOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            for _ in 0..self.depth {
                self.buffer.push_str(&self.options.indent);
            }
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Renders component trees to HTML.
///
/// Every kind has a built-in renderer; [`HtmlCompiler::with_renderer`]
/// replaces one. Rendering reads the tree and theme only and never fails
/// for a well-formed tree.
pub struct HtmlCompiler {
    theme: Theme,
    overrides: HashMap<ComponentKind, Box<dyn ComponentRenderer>>,
}

impl HtmlCompiler {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            overrides: HashMap::new(),
        }
    }

    pub fn with_renderer(
        mut self,
        kind: ComponentKind,
        renderer: impl ComponentRenderer + 'static,
    ) -> Self {
        self.overrides.insert(kind, Box::new(renderer));
        self
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Markup for `id` and its subtree
    pub fn render(&self, tree: &ComponentTree, id: &ComponentId, mode: RenderMode) -> TreeResult<String> {
        let node = tree.query(id)?;
        Ok(self.render_node(tree, node, mode))
    }

    /// Markup for every root, in document order
    #[instrument(skip(self, tree), fields(nodes = tree.len()))]
    pub fn render_tree(&self, tree: &ComponentTree, mode: RenderMode) -> String {
        tree.roots()
            .iter()
            .filter_map(|id| tree.get(id))
            .map(|node| self.render_node(tree, node, mode))
            .collect()
    }

    /// Preview fragment sized to `device`, as the live canvas hosts it
    pub fn render_canvas(&self, tree: &ComponentTree, device: PreviewDevice) -> String {
        format!(
            "<div data-builder-canvas=\"{}\" style=\"max-width: {}; margin: 0 auto; background-color: {};\">{}</div>",
            device.as_str(),
            device.width(),
            escape_html(self.theme.page_background()),
            self.render_tree(tree, RenderMode::Preview)
        )
    }

    /// Standalone page in export mode
    #[instrument(skip(self, tree, options), fields(nodes = tree.len()))]
    pub fn compile_to_html(&self, tree: &ComponentTree, options: CompileOptions) -> String {
        let body = self.render_tree(tree, RenderMode::Export);
        let background = escape_html(self.theme.page_background());
        let font_family = escape_html(&self.theme.typography.font_family);
        let content_width = escape_html(&options.content_width);
        let title = escape_html(&options.title);

        let mut ctx = Context::new(options);

        ctx.add_line("<!DOCTYPE html>");
        ctx.add_line("<html>");
        ctx.indent();

        ctx.add_line("<head>");
        ctx.indent();
        ctx.add_line("<meta charset=\"UTF-8\">");
        ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
        ctx.add_line(&format!("<title>{}</title>", title));
        ctx.dedent();
        ctx.add_line("</head>");

        ctx.add_line(&format!(
            "<body style=\"margin: 0; background-color: {}; font-family: {};\">",
            background, font_family
        ));
        ctx.indent();
        ctx.add_line(&format!(
            "<div style=\"max-width: {}; margin: 0 auto;\">",
            content_width
        ));
        ctx.indent();
        if !body.is_empty() {
            ctx.add_line(&body);
        }
        ctx.dedent();
        ctx.add_line("</div>");
        ctx.dedent();
        ctx.add_line("</body>");

        ctx.dedent();
        ctx.add_line("</html>");

        ctx.get_output()
    }

    fn render_node(&self, tree: &ComponentTree, node: &BuilderComponent, mode: RenderMode) -> String {
        let children: String = node
            .children()
            .iter()
            .filter_map(|id| tree.get(id))
            .map(|child| self.render_node(tree, child, mode))
            .collect();

        let style = resolve(node, &self.theme);
        let input = RenderInput {
            node,
            style: &style,
            mode,
            children: &children,
        };
        match self.overrides.get(&node.kind) {
            Some(renderer) => renderer.render(&input),
            None => renderers::render_builtin(&input),
        }
    }
}

/// Render `id` with the built-in renderers
pub fn render(
    tree: &ComponentTree,
    id: &ComponentId,
    mode: RenderMode,
    theme: &Theme,
) -> TreeResult<String> {
    HtmlCompiler::new(theme.clone()).render(tree, id, mode)
}

/// Render the whole forest with the built-in renderers
pub fn render_tree(tree: &ComponentTree, mode: RenderMode, theme: &Theme) -> String {
    HtmlCompiler::new(theme.clone()).render_tree(tree, mode)
}

/// Compile a tree to a standalone HTML page
pub fn compile_to_html(tree: &ComponentTree, theme: &Theme, options: CompileOptions) -> String {
    HtmlCompiler::new(theme.clone()).compile_to_html(tree, options)
}
