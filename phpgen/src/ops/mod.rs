//! Core operations.
//!
//! The work behind each command, separated from argument parsing and
//! output rendering.

pub mod check;
pub mod render;

pub use check::check;
pub use render::render;
