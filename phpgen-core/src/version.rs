use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize, Serializer};

use crate::Error;

/// A PHP language version that output can target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum PhpVersion {
    /// PHP 7.3: doc-comment typed properties, emulated enums.
    Php73,
    /// PHP 7.4: typed properties.
    Php74,
    /// PHP 8.0: union types, constructor promotion, nullsafe operator.
    Php80,
    /// PHP 8.1: readonly properties, native enums.
    #[default]
    Php81,
    /// PHP 8.2: readonly classes.
    Php82,
}

impl PhpVersion {
    /// All supported versions, oldest first.
    pub const ALL: [PhpVersion; 5] = [
        Self::Php73,
        Self::Php74,
        Self::Php80,
        Self::Php81,
        Self::Php82,
    ];

    /// The oldest supported version.
    pub fn oldest() -> Self {
        Self::Php73
    }

    /// The newest supported version.
    pub fn latest() -> Self {
        Self::Php82
    }

    /// `major.minor` text, e.g. `8.1`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Php73 => "7.3",
            Self::Php74 => "7.4",
            Self::Php80 => "8.0",
            Self::Php81 => "8.1",
            Self::Php82 => "8.2",
        }
    }
}

impl TryFrom<String> for PhpVersion {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Serialize for PhpVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for PhpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PHP {}", self.as_str())
    }
}

impl FromStr for PhpVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed
            .strip_prefix("php")
            .or_else(|| trimmed.strip_prefix("PHP"))
            .unwrap_or(trimmed)
            .trim();
        // Accept "8.1", "8.1.12" and "81".
        let mut parts = trimmed.split('.');
        let (major, minor) = match (parts.next(), parts.next()) {
            (Some(major), Some(minor)) => (major, minor),
            (Some(short), None) if short.len() == 2 => short.split_at(1),
            _ => return Err(unknown_version(s)),
        };
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == format!("{}.{}", major, minor))
            .ok_or_else(|| unknown_version(s))
    }
}

fn unknown_version(s: &str) -> Error {
    Error::invalid_argument(format!(
        "unsupported PHP version '{}', expected one of 7.3, 7.4, 8.0, 8.1, 8.2",
        s
    ))
}
