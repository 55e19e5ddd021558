//! Array literals as composable fragments.

use phpgen_core::{Lines, RenderContext, Result, ToLines};
use phpgen_ir::{ArrayKey, PhpArray, Value};

use crate::format::array_literal;

/// An array literal built entry by entry.
///
/// Values may be other composers, so a literal can hold calls, nested
/// literals or ternaries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayLiteral {
    entries: PhpArray,
}

impl ArrayLiteral {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value with the next integer key.
    pub fn item(mut self, value: impl Into<Value>) -> Self {
        self.entries.push(value);
        self
    }

    /// Set `key => value`.
    pub fn entry(mut self, key: impl Into<ArrayKey>, value: impl Into<Value>) -> Self {
        self.entries.insert(key, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<PhpArray> for ArrayLiteral {
    fn from(entries: PhpArray) -> Self {
        Self { entries }
    }
}

impl ToLines for ArrayLiteral {
    fn to_lines(&self, ctx: &RenderContext) -> Result<Lines> {
        array_literal(ctx, &self.entries)
    }
}
