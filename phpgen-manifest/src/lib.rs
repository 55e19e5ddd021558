//! phpgen.toml support: parsing, validation and lowering into
//! declarations.
//!
//! ```text
//! phpgen.toml → Manifest (parse + validate) → Project (lower) → Generator
//! ```

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod lower;
mod manifest;
mod validate;

pub use error::{Error, Result, SourceContext};
pub use lower::Project;
pub use manifest::*;
pub use validate::ParseContext;
