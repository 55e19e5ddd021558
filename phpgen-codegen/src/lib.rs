//! PHP source rendering for phpgen.
//!
//! Everything here produces line trees ([`phpgen_core::Lines`]) that are
//! flattened to text as the last step, so every construct can be nested
//! inside any other without knowing its final indentation.
//!
//! # Module Organization
//!
//! - [`engine`] - Flattening, joining and terminating line trees
//! - [`format`] - Literal values (scalars, strings, array literals)
//! - [`expr`] - Expression and statement composers
//! - [`serialize`] - Choosing how a typed value becomes serializable data
//! - [`render`] - Declaration renderers and the per-version dialects
//! - [`synth`] - Generated members (getters, `jsonSerialize()`)
//!
//! # Example
//!
//! ```
//! use phpgen_codegen::Renderer;
//! use phpgen_core::PhpVersion;
//! use phpgen_ir::{Class, ClassName, PhpType, Property};
//!
//! let class = Class::new(ClassName::parse("App\\Point").unwrap())
//!     .final_()
//!     .property(Property::new("x").ty(PhpType::Int))
//!     .unwrap();
//!
//! let php = Renderer::new(PhpVersion::Php74).render(&class).unwrap();
//! assert_eq!(php, "final class Point\n{\n\tprivate int $x;\n}\n");
//! ```

pub mod engine;
pub mod expr;
pub mod format;
mod generator;
mod imports;
pub mod render;
pub mod serialize;
pub mod synth;

pub use generator::{GenerateResult, Generator};
pub use imports::UseCollector;
pub use render::{Dialect, Owner, OwnerKind, Renderable, Renderer, dialect_for};
