//! The line tree that every renderer produces.
//!
//! A rendered construct is a sequence of [`LineNode`]s. A [`LineNode::Line`]
//! is exactly one physical line; a [`LineNode::Block`] is a group rendered
//! one indentation level deeper than its siblings. Nothing here knows
//! about indentation text: the indent unit is applied only when the tree
//! is flattened.

use std::{fmt, rc::Rc};

use crate::{RenderContext, Result};

/// Rendered output that has not yet been flattened to text.
pub type Lines = Vec<LineNode>;

/// Anything that can produce a line tree on its own.
///
/// Expression and statement composers implement this so they can be nested
/// inside values, array literals and method bodies. The context supplies
/// layout thresholds and the name scope; it is read, never changed.
pub trait ToLines: fmt::Debug {
    /// Produce the line tree for this fragment.
    fn to_lines(&self, ctx: &RenderContext) -> Result<Lines>;
}

impl<T: ToLines + ?Sized> ToLines for &T {
    fn to_lines(&self, ctx: &RenderContext) -> Result<Lines> {
        (*self).to_lines(ctx)
    }
}

impl<T: ToLines + ?Sized> ToLines for Box<T> {
    fn to_lines(&self, ctx: &RenderContext) -> Result<Lines> {
        self.as_ref().to_lines(ctx)
    }
}

impl<T: ToLines + ?Sized> ToLines for Rc<T> {
    fn to_lines(&self, ctx: &RenderContext) -> Result<Lines> {
        self.as_ref().to_lines(ctx)
    }
}

impl ToLines for Lines {
    fn to_lines(&self, _ctx: &RenderContext) -> Result<Lines> {
        Ok(self.clone())
    }
}

/// One node of a line tree.
#[derive(Clone)]
pub enum LineNode {
    /// A single physical line without a trailing newline.
    Line(String),
    /// A nested group, indented one level deeper when flattened.
    Block(Lines),
    /// A pre-rendered fragment expanded when the tree is flattened.
    Fragment(Rc<dyn ToLines>),
}

impl LineNode {
    /// Create a line node.
    pub fn line(s: impl Into<String>) -> Self {
        Self::Line(s.into())
    }

    /// Create an empty line (flattened as a bare newline).
    pub fn blank() -> Self {
        Self::Line(String::new())
    }

    /// Create a nested block.
    pub fn block(lines: impl IntoIterator<Item = LineNode>) -> Self {
        Self::Block(lines.into_iter().collect())
    }

    /// Wrap a fragment so it is expanded at flatten time.
    pub fn fragment(fragment: impl ToLines + 'static) -> Self {
        Self::Fragment(Rc::new(fragment))
    }

    /// The text of a `Line`, `None` for blocks and fragments.
    pub fn as_line(&self) -> Option<&str> {
        match self {
            Self::Line(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this node is a `Block`.
    pub fn is_block(&self) -> bool {
        matches!(self, Self::Block(_))
    }
}

impl fmt::Debug for LineNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(s) => f.debug_tuple("Line").field(s).finish(),
            Self::Block(lines) => f.debug_tuple("Block").field(lines).finish(),
            Self::Fragment(fragment) => f.debug_tuple("Fragment").field(fragment).finish(),
        }
    }
}

impl PartialEq for LineNode {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Line(a), Self::Line(b)) => a == b,
            (Self::Block(a), Self::Block(b)) => a == b,
            (Self::Fragment(a), Self::Fragment(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for LineNode {
    fn from(s: &str) -> Self {
        Self::line(s)
    }
}

impl From<String> for LineNode {
    fn from(s: String) -> Self {
        Self::Line(s)
    }
}

/// The result of formatting a value: one inline string, or a line tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Formatted {
    /// Fits on a single line.
    Inline(String),
    /// Spans several lines (array literals, nested calls).
    Lines(Lines),
}

impl Formatted {
    /// Convert into a line tree; an inline value becomes one `Line`.
    pub fn into_lines(self) -> Lines {
        match self {
            Self::Inline(s) => vec![LineNode::Line(s)],
            Self::Lines(lines) => lines,
        }
    }

    /// The inline text, if the value fits on one line.
    pub fn as_inline(&self) -> Option<&str> {
        match self {
            Self::Inline(s) => Some(s),
            Self::Lines(lines) => match lines.as_slice() {
                [LineNode::Line(s)] => Some(s),
                _ => None,
            },
        }
    }
}

impl From<String> for Formatted {
    fn from(s: String) -> Self {
        Self::Inline(s)
    }
}

impl From<&str> for Formatted {
    fn from(s: &str) -> Self {
        Self::Inline(s.to_string())
    }
}

impl From<Lines> for Formatted {
    fn from(lines: Lines) -> Self {
        Self::Lines(lines)
    }
}

/// Build a line tree from string literals and nested vectors.
///
/// ```
/// use phpgen_core::{LineNode, lines};
///
/// let tree = lines!["if ($ready) {", ["go();"], "}"];
/// assert_eq!(
///     tree,
///     vec![
///         LineNode::line("if ($ready) {"),
///         LineNode::block(vec![LineNode::line("go();")]),
///         LineNode::line("}"),
///     ]
/// );
/// ```
#[macro_export]
macro_rules! lines {
    () => { ::std::vec::Vec::<$crate::LineNode>::new() };
    ($($item:tt),+ $(,)?) => {
        ::std::vec![$($crate::lines!(@node $item)),+]
    };
    (@node [$($inner:tt),* $(,)?]) => {
        $crate::LineNode::Block($crate::lines![$($inner),*])
    };
    (@node $line:expr) => {
        $crate::LineNode::from($line)
    };
}
