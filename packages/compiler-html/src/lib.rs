//! # Pagecraft HTML compiler
//!
//! Renders a component tree to markup with inline styles. The same per-kind
//! renderers serve the live canvas ([`RenderMode::Preview`]) and the
//! standalone artifact ([`RenderMode::Export`]).

mod compiler;
pub mod css;
pub mod renderers;
pub mod video;

#[cfg(test)]
mod tests;

pub use compiler::{
    compile_to_html, render, render_tree, CompileOptions, HtmlCompiler, PreviewDevice, RenderMode,
};
pub use renderers::{ComponentRenderer, RenderInput};
pub use video::VideoSource;
