//! # Pagecraft Style
//!
//! Merges a component's sparse style declarations with kind defaults and an
//! explicitly passed [`Theme`] into a [`ResolvedStyle`] shared by the live
//! canvas and the HTML export.

pub mod defaults;
pub mod resolver;
pub mod shorthand;
pub mod theme;

pub use resolver::{resolve, ResolvedStyle, ResolvedValue, StyleSource};
pub use theme::{Theme, ThemeColors, ThemeSpacing, ThemeTypography};
