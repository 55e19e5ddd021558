//! Core types and utilities for phpgen.
//!
//! This crate holds the pieces every other phpgen crate agrees on: the
//! line tree produced by renderers, the render context (indent unit,
//! layout thresholds, name scope), the error taxonomy, the supported PHP
//! versions and a few string helpers.

mod context;
mod error;
mod file;
mod indent;
mod lines;
mod scope;
mod utils;
mod version;

// Errors
pub use error::{Error, Result};
// File output
pub use file::OutputFile;
// Rendering primitives
pub use context::{DEFAULT_MAX_INLINE_PARAMS, DEFAULT_MAX_LINE_LENGTH, RenderContext};
pub use indent::Indent;
pub use lines::{Formatted, LineNode, Lines, ToLines};
pub use scope::NameScope;
// String utilities
pub use utils::{Case, to_camel_case, to_pascal_case, to_snake_case, to_upper_snake_case};
pub use version::PhpVersion;
