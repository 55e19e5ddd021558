//! Namespaced names.

use std::fmt;

use phpgen_core::{Error, Result};

/// A fully qualified PHP name such as `App\Models\User`.
///
/// Stored without the leading backslash. Equality is plain key comparison,
/// so two `ClassName`s built from the same text are interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassName {
    fqcn: String,
}

impl ClassName {
    /// Parse and validate a name. A leading `\` is accepted and dropped.
    pub fn parse(name: &str) -> Result<Self> {
        let trimmed = name.trim().trim_start_matches('\\');
        if trimmed.is_empty() {
            return Err(Error::invalid_argument("class name must not be empty"));
        }
        if let Some(segment) = trimmed.split('\\').find(|s| !is_identifier(s)) {
            return Err(Error::invalid_argument(format!(
                "'{}' is not a valid name ('{}' is not an identifier)",
                name, segment
            )));
        }
        Ok(Self {
            fqcn: trimmed.to_string(),
        })
    }

    /// Join a namespace and a short name.
    pub fn in_namespace(namespace: Option<&str>, short: &str) -> Result<Self> {
        match namespace.map(|ns| ns.trim_matches('\\')).filter(|ns| !ns.is_empty()) {
            Some(ns) => Self::parse(&format!("{}\\{}", ns, short)),
            None => Self::parse(short),
        }
    }

    /// The name without namespace: `User`.
    pub fn short(&self) -> &str {
        self.fqcn.rsplit('\\').next().unwrap_or(&self.fqcn)
    }

    /// The namespace part: `App\Models`, or `None` for global names.
    pub fn namespace(&self) -> Option<&str> {
        self.fqcn.rsplit_once('\\').map(|(ns, _)| ns)
    }

    /// The fully qualified name without leading backslash.
    pub fn fqcn(&self) -> &str {
        &self.fqcn
    }

    /// The fully qualified name with leading backslash: `\App\Models\User`.
    pub fn absolute(&self) -> String {
        format!("\\{}", self.fqcn)
    }

    /// Whether this name lives in `namespace` (global when `None`).
    pub fn is_in(&self, namespace: Option<&str>) -> bool {
        self.namespace() == namespace.map(|ns| ns.trim_matches('\\')).filter(|ns| !ns.is_empty())
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fqcn)
    }
}

/// Whether `s` is a valid PHP label (`[a-zA-Z_\x80-\xff][a-zA-Z0-9_\x80-\xff]*`).
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() || !c.is_ascii() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric() || !c.is_ascii())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_parts() {
        let name = ClassName::parse("\\App\\Models\\User").unwrap();
        assert_eq!(name.fqcn(), "App\\Models\\User");
        assert_eq!(name.short(), "User");
        assert_eq!(name.namespace(), Some("App\\Models"));
        assert_eq!(name.absolute(), "\\App\\Models\\User");
    }

    #[test]
    fn test_global_name() {
        let name = ClassName::parse("JsonSerializable").unwrap();
        assert_eq!(name.short(), "JsonSerializable");
        assert_eq!(name.namespace(), None);
        assert!(name.is_in(None));
        assert!(!name.is_in(Some("App")));
    }

    #[test]
    fn test_in_namespace() {
        let name = ClassName::in_namespace(Some("App\\"), "User").unwrap();
        assert_eq!(name.fqcn(), "App\\User");
        assert!(name.is_in(Some("\\App")));
        assert_eq!(ClassName::in_namespace(Some(""), "User").unwrap().fqcn(), "User");
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!(matches!(ClassName::parse(""), Err(Error::InvalidArgument(_))));
        assert!(ClassName::parse("App\\\\User").is_err());
        assert!(ClassName::parse("9Lives").is_err());
        assert!(ClassName::parse("Foo-Bar").is_err());
    }

    #[test]
    fn test_equality_is_by_key() {
        let a = ClassName::parse("App\\User").unwrap();
        let b = ClassName::parse("\\App\\User").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("_private"));
        assert!(is_identifier("café"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("$var"));
    }
}
