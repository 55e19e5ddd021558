//! Declaration model for phpgen.
//!
//! These types hold what a PHP program declares: classes and their
//! members, type descriptors, doc-comments and literal values. They do not
//! know how to print themselves; `phpgen-codegen` renders them.
//!
//! # Architecture
//!
//! ```text
//! phpgen.toml → phpgen-manifest (parsing) → phpgen-ir (declarations) → phpgen-codegen
//! ```

mod decl;
mod doc;
mod file;
mod members;
mod name;
mod registry;
mod ser;
mod types;
mod value;

pub use decl::{
    Class, Declaration, Enum, EnumBacking, EnumCase, Interface, Members, Trait,
};
pub use doc::{DocComment, DocTag};
pub use file::PhpFile;
pub use members::{Constant, Function, Method, Param, Property, Visibility};
pub use name::{ClassName, is_identifier};
pub use registry::TypeRegistry;
pub use ser::to_value;
pub use types::{Capabilities, ClassRef, HintPosition, PhpType, TypeFeatures};
pub use value::{ArrayKey, PhpArray, Value};
