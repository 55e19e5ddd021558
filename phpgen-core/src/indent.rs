//! Indentation configuration for generated PHP.

use std::borrow::Cow;

use crate::{Error, Result};

/// The literal text emitted once per nesting level.
///
/// Any string is accepted, including the empty string (which produces
/// unindented output).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indent {
    unit: Cow<'static, str>,
}

impl Indent {
    /// One tab per level (the default).
    pub const TAB: Self = Self {
        unit: Cow::Borrowed("\t"),
    };

    /// Four spaces per level (PSR-12).
    pub const PSR12: Self = Self {
        unit: Cow::Borrowed("    "),
    };

    /// Use an arbitrary unit string.
    pub fn new(unit: impl Into<Cow<'static, str>>) -> Self {
        Self { unit: unit.into() }
    }

    /// `width` spaces per level.
    pub fn spaces(width: usize) -> Self {
        Self::new(" ".repeat(width))
    }

    /// The unit string for a single level.
    pub fn as_str(&self) -> &str {
        &self.unit
    }

    /// The prefix for `level`; negative levels are rejected.
    pub fn prefix(&self, level: isize) -> Result<String> {
        let level = usize::try_from(level).map_err(|_| {
            Error::invalid_argument(format!("indent level must be >= 0, got {}", level))
        })?;
        Ok(self.repeat(level))
    }

    /// The prefix for `level`.
    pub fn repeat(&self, level: usize) -> String {
        self.unit.repeat(level)
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::TAB
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_as_str() {
        assert_eq!(Indent::TAB.as_str(), "\t");
        assert_eq!(Indent::PSR12.as_str(), "    ");
        assert_eq!(Indent::spaces(2).as_str(), "  ");
        assert_eq!(Indent::new("--").as_str(), "--");
    }

    #[test]
    fn test_default() {
        assert_eq!(Indent::default(), Indent::TAB);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(Indent::TAB.prefix(0).unwrap(), "");
        assert_eq!(Indent::TAB.prefix(3).unwrap(), "\t\t\t");
        assert_eq!(Indent::new("").prefix(5).unwrap(), "");
    }

    #[test]
    fn test_negative_level_rejected() {
        let err = Indent::TAB.prefix(-1).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
