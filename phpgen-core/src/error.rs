//! Error taxonomy shared by every render call.

use thiserror::Error;

/// Result type for rendering and model construction.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or rendering PHP source.
///
/// None of these are recoverable: a code generator that hits one aborts
/// instead of emitting partially-correct source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The value formatter was handed something it cannot express as a
    /// PHP literal (structs, enum payloads, byte buffers, ...).
    #[error("cannot format {kind} as a PHP literal")]
    UnsupportedValueKind { kind: String },

    /// Two line fragments were joined in a shape the composer does not
    /// support, e.g. suffixing onto a nested block.
    #[error("invalid code in {composer}: {message}")]
    InvalidCode {
        composer: &'static str,
        message: String,
    },

    /// A structurally invalid request such as a negative indent level or
    /// an unknown case transform.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A member with the same name was already added to its owner.
    #[error("duplicate {kind} '{name}' in {owner}")]
    DuplicateDeclaration {
        kind: &'static str,
        name: String,
        owner: String,
    },
}

impl Error {
    /// Create an [`Error::UnsupportedValueKind`].
    pub fn unsupported(kind: impl Into<String>) -> Self {
        Self::UnsupportedValueKind { kind: kind.into() }
    }

    /// Create an [`Error::InvalidCode`] attributed to `composer`.
    pub fn invalid_code(composer: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidCode {
            composer,
            message: message.into(),
        }
    }

    /// Create an [`Error::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an [`Error::DuplicateDeclaration`].
    pub fn duplicate(kind: &'static str, name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self::DuplicateDeclaration {
            kind,
            name: name.into(),
            owner: owner.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::unsupported("struct `Point`").to_string(),
            "cannot format struct `Point` as a PHP literal"
        );
        assert_eq!(
            Error::invalid_code("return", "cannot prefix a nested block").to_string(),
            "invalid code in return: cannot prefix a nested block"
        );
        assert_eq!(
            Error::duplicate("property", "id", "App\\User").to_string(),
            "duplicate property 'id' in App\\User"
        );
    }
}
