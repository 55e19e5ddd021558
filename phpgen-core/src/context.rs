//! Render configuration shared by every render call.

use crate::{Indent, NameScope};

/// Lines at or beyond this many characters are wrapped.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 100;

/// Signatures with more parameters than this are wrapped one per line.
pub const DEFAULT_MAX_INLINE_PARAMS: usize = 2;

/// Layout settings and the active name scope.
///
/// Built once before rendering and passed by reference; nothing in the
/// render path can change it. Per-file scopes are derived with
/// [`RenderContext::with_scope`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    indent: Indent,
    max_line_length: usize,
    max_inline_params: usize,
    scope: NameScope,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            indent: Indent::default(),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            max_inline_params: DEFAULT_MAX_INLINE_PARAMS,
            scope: NameScope::detached(),
        }
    }
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indent unit.
    pub fn indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    /// Set the wrap threshold for argument lists and signatures.
    pub fn max_line_length(mut self, max: usize) -> Self {
        self.max_line_length = max;
        self
    }

    /// Set the parameter count above which signatures wrap.
    pub fn max_inline_params(mut self, max: usize) -> Self {
        self.max_inline_params = max;
        self
    }

    /// A copy of this context resolving names through `scope`.
    pub fn with_scope(&self, scope: NameScope) -> Self {
        Self {
            scope,
            ..self.clone()
        }
    }

    pub fn indent_unit(&self) -> &Indent {
        &self.indent
    }

    pub fn line_limit(&self) -> usize {
        self.max_line_length
    }

    pub fn inline_params(&self) -> usize {
        self.max_inline_params
    }

    pub fn scope(&self) -> &NameScope {
        &self.scope
    }

    /// Spell a fully qualified class name for the active scope.
    pub fn class_name(&self, fqcn: &str) -> String {
        self.scope.resolve(fqcn)
    }

    /// Whether `line` is short enough to stay on one line.
    pub fn fits(&self, line: &str) -> bool {
        line.chars().count() < self.max_line_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let ctx = RenderContext::default();
        assert_eq!(ctx.indent_unit(), &Indent::TAB);
        assert_eq!(ctx.line_limit(), 100);
        assert_eq!(ctx.inline_params(), 2);
        assert!(!ctx.scope().is_file_scoped());
    }

    #[test]
    fn test_fits_is_strict() {
        let ctx = RenderContext::new().max_line_length(5);
        assert!(ctx.fits("abcd"));
        assert!(!ctx.fits("abcde"));
    }

    #[test]
    fn test_with_scope_keeps_layout() {
        let ctx = RenderContext::new().indent(Indent::PSR12).max_inline_params(4);
        let scoped = ctx.with_scope(NameScope::file(Some("App")));
        assert_eq!(scoped.indent_unit(), &Indent::PSR12);
        assert_eq!(scoped.inline_params(), 4);
        assert_eq!(scoped.class_name("Vendor\\X"), "\\Vendor\\X");
        assert_eq!(ctx.class_name("Vendor\\X"), "X");
    }
}
