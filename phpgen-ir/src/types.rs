//! Type descriptors.
//!
//! A [`PhpType`] is what a property, parameter or return value is declared
//! as. It knows how to print itself as a native hint (when the target
//! supports it) and as a doc-comment hint (always). Class types carry a
//! [`Capabilities`] descriptor used by the serialization resolver.

use std::{fmt, str::FromStr};

use phpgen_core::{Error, Result};

use crate::ClassName;

/// What the serialization resolver may assume about a class.
///
/// Computed once when the type is registered, never probed at render time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Implements `JsonSerializable`.
    pub json_serializable: bool,
    /// Implements `Stringable` / defines `__toString`.
    pub stringable: bool,
    /// Name of a `toString`-like method.
    pub to_string: Option<String>,
    /// Name of a `toArray`-like method.
    pub to_array: Option<String>,
    /// Implements `Traversable`.
    pub traversable: bool,
}

impl Capabilities {
    pub fn with_json_serialize(mut self) -> Self {
        self.json_serializable = true;
        self
    }

    pub fn with_stringable(mut self) -> Self {
        self.stringable = true;
        self
    }

    pub fn with_to_string(mut self, method: impl Into<String>) -> Self {
        self.to_string = Some(method.into());
        self
    }

    pub fn with_to_array(mut self, method: impl Into<String>) -> Self {
        self.to_array = Some(method.into());
        self
    }

    pub fn with_traversable(mut self) -> Self {
        self.traversable = true;
        self
    }

    /// No capability set at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Add every capability of `other` to `self`.
    pub fn merge(&mut self, other: &Capabilities) {
        self.json_serializable |= other.json_serializable;
        self.stringable |= other.stringable;
        self.traversable |= other.traversable;
        if other.to_string.is_some() {
            self.to_string.clone_from(&other.to_string);
        }
        if other.to_array.is_some() {
            self.to_array.clone_from(&other.to_array);
        }
    }
}

/// A class type together with its capability descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRef {
    pub name: ClassName,
    pub capabilities: Capabilities,
}

/// Where a native hint is going to be printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintPosition {
    Param,
    Return,
    Property,
}

/// Native type syntax available in a target dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeFeatures {
    /// `private int $id;`
    pub property_types: bool,
    /// `int|string`
    pub union_types: bool,
    /// `mixed`
    pub mixed: bool,
    /// `static` return type
    pub static_return: bool,
}

/// A declared PHP type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhpType {
    Int,
    Float,
    String,
    Bool,
    Null,
    Mixed,
    Void,
    Callable,
    Iterable,
    Object,
    SelfType,
    Static,
    /// `array`, optionally with a known element type (`int[]`).
    Array(Option<Box<PhpType>>),
    Class(ClassRef),
    Nullable(Box<PhpType>),
    /// Two or more non-null members. Nulls are folded into [`PhpType::Nullable`].
    Union(Vec<PhpType>),
}

impl PhpType {
    /// A class type without capabilities.
    pub fn class(name: ClassName) -> Self {
        Self::Class(ClassRef {
            name,
            capabilities: Capabilities::default(),
        })
    }

    /// `T[]`
    pub fn array_of(element: PhpType) -> Self {
        Self::Array(Some(Box::new(element)))
    }

    /// `?T`; already-nullable types are returned unchanged.
    pub fn nullable(inner: PhpType) -> Self {
        match inner {
            Self::Nullable(_) | Self::Null | Self::Mixed => inner,
            other => Self::Nullable(Box::new(other)),
        }
    }

    /// Build a union, flattening nested unions and folding `null` into a
    /// nullable wrapper.
    pub fn union(members: impl IntoIterator<Item = PhpType>) -> Self {
        let mut flat: Vec<PhpType> = Vec::new();
        let mut has_null = false;
        let mut stack: Vec<PhpType> = members.into_iter().collect();
        stack.reverse();
        while let Some(member) = stack.pop() {
            match member {
                Self::Null => has_null = true,
                Self::Nullable(inner) => {
                    has_null = true;
                    stack.push(*inner);
                }
                Self::Union(inner) => stack.extend(inner.into_iter().rev()),
                other if flat.contains(&other) => {}
                other => flat.push(other),
            }
        }
        let base = match flat.len() {
            0 => return Self::Null,
            1 => flat.remove(0),
            _ => Self::Union(flat),
        };
        if has_null { Self::nullable(base) } else { base }
    }

    /// Parse a type expression, resolving class names through `class`.
    pub fn parse_with(s: &str, class: &dyn Fn(ClassName) -> PhpType) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::invalid_argument("type must not be empty"));
        }
        if let Some(rest) = s.strip_prefix('?') {
            if rest.contains('|') {
                return Err(Error::invalid_argument(format!(
                    "'{}' mixes '?' with a union",
                    s
                )));
            }
            return Ok(Self::nullable(Self::parse_with(rest, class)?));
        }
        let parts = split_union(s)?;
        if parts.len() > 1 {
            let members = parts
                .into_iter()
                .map(|p| Self::parse_with(p, class))
                .collect::<Result<Vec<_>>>()?;
            return Ok(Self::union(members));
        }
        if let Some(element) = s.strip_suffix("[]") {
            return Ok(Self::array_of(Self::parse_with(element, class)?));
        }
        if let Some(inner) = s.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
            return Self::parse_with(inner, class);
        }
        let ty = match s.to_ascii_lowercase().as_str() {
            "int" => Self::Int,
            "float" => Self::Float,
            "string" => Self::String,
            "bool" => Self::Bool,
            "null" => Self::Null,
            "mixed" => Self::Mixed,
            "void" => Self::Void,
            "callable" => Self::Callable,
            "iterable" => Self::Iterable,
            "object" => Self::Object,
            "self" => Self::SelfType,
            "static" => Self::Static,
            "array" => Self::Array(None),
            _ => class(ClassName::parse(s)?),
        };
        Ok(ty)
    }

    /// Whether `null` is an accepted value.
    pub fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable(_) | Self::Null | Self::Mixed)
    }

    /// Whether an array element type appears anywhere in the type.
    pub fn has_element_type(&self) -> bool {
        match self {
            Self::Array(element) => element.is_some(),
            Self::Nullable(inner) => inner.has_element_type(),
            Self::Union(members) => members.iter().any(Self::has_element_type),
            _ => false,
        }
    }

    /// Render as a native type hint, or `None` when the dialect cannot
    /// express this type at `position`.
    pub fn native_hint(
        &self,
        features: TypeFeatures,
        position: HintPosition,
        resolve: &dyn Fn(&ClassName) -> String,
    ) -> Option<String> {
        if position == HintPosition::Property && !features.property_types {
            return None;
        }
        let hint = match self {
            Self::Int => "int".to_string(),
            Self::Float => "float".to_string(),
            Self::String => "string".to_string(),
            Self::Bool => "bool".to_string(),
            Self::Iterable => "iterable".to_string(),
            Self::Object => "object".to_string(),
            Self::SelfType => "self".to_string(),
            Self::Array(_) => "array".to_string(),
            Self::Class(class) => resolve(&class.name),
            Self::Null => return None,
            Self::Callable if position == HintPosition::Property => return None,
            Self::Callable => "callable".to_string(),
            Self::Void if position == HintPosition::Return => "void".to_string(),
            Self::Void => return None,
            Self::Mixed if features.mixed => "mixed".to_string(),
            Self::Mixed => return None,
            Self::Static if position == HintPosition::Return && features.static_return => {
                "static".to_string()
            }
            Self::Static => return None,
            Self::Nullable(inner) => match inner.as_ref() {
                Self::Void => return None,
                Self::Union(_) if !features.union_types => return None,
                Self::Union(_) => format!("{}|null", inner.native_hint(features, position, resolve)?),
                other => format!("?{}", other.native_hint(features, position, resolve)?),
            },
            Self::Union(members) => {
                if !features.union_types {
                    return None;
                }
                let hints = members
                    .iter()
                    .map(|m| match m {
                        Self::Void | Self::Mixed => None,
                        other => other.native_hint(features, position, resolve),
                    })
                    .collect::<Option<Vec<_>>>()?;
                hints.join("|")
            }
        };
        Some(hint)
    }

    /// Render as a doc-comment hint (`int[]`, `string|null`, ...).
    pub fn doc_hint(&self, resolve: &dyn Fn(&ClassName) -> String) -> String {
        match self {
            Self::Array(Some(element)) => match element.as_ref() {
                Self::Nullable(_) | Self::Union(_) => format!("({})[]", element.doc_hint(resolve)),
                other => format!("{}[]", other.doc_hint(resolve)),
            },
            Self::Class(class) => resolve(&class.name),
            Self::Nullable(inner) => format!("{}|null", inner.doc_hint(resolve)),
            Self::Union(members) => members
                .iter()
                .map(|m| m.doc_hint(resolve))
                .collect::<Vec<_>>()
                .join("|"),
            other => other.keyword().unwrap_or("mixed").to_string(),
        }
    }

    /// Whether the type needs a doc-comment because the native hint (if
    /// any) does not carry everything the type says.
    pub fn needs_doc(&self, features: TypeFeatures, position: HintPosition) -> bool {
        self.has_element_type()
            || self
                .native_hint(features, position, &|name| name.fqcn().to_string())
                .is_none()
    }

    fn keyword(&self) -> Option<&'static str> {
        let kw = match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Bool => "bool",
            Self::Null => "null",
            Self::Mixed => "mixed",
            Self::Void => "void",
            Self::Callable => "callable",
            Self::Iterable => "iterable",
            Self::Object => "object",
            Self::SelfType => "self",
            Self::Static => "static",
            Self::Array(None) => "array",
            _ => return None,
        };
        Some(kw)
    }
}

impl FromStr for PhpType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_with(s, &PhpType::class)
    }
}

impl fmt::Display for PhpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.doc_hint(&|name| name.absolute()))
    }
}

/// Split `s` on `|` outside parentheses.
fn split_union(s: &str) -> Result<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::invalid_argument(format!("unbalanced ')' in '{}'", s)))?;
            }
            '|' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(Error::invalid_argument(format!("unbalanced '(' in '{}'", s)));
    }
    parts.push(&s[start..]);
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODERN: TypeFeatures = TypeFeatures {
        property_types: true,
        union_types: true,
        mixed: true,
        static_return: true,
    };

    fn short(name: &ClassName) -> String {
        name.short().to_string()
    }

    fn parse(s: &str) -> PhpType {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_scalars() {
        assert_eq!(parse("int"), PhpType::Int);
        assert_eq!(parse("?string"), PhpType::nullable(PhpType::String));
        assert_eq!(parse("array"), PhpType::Array(None));
        assert_eq!(parse("int[]"), PhpType::array_of(PhpType::Int));
        assert_eq!(parse("Self"), PhpType::SelfType);
    }

    #[test]
    fn test_parse_union_folds_null() {
        assert_eq!(parse("int|null"), PhpType::nullable(PhpType::Int));
        assert_eq!(
            parse("int|string"),
            PhpType::Union(vec![PhpType::Int, PhpType::String])
        );
        assert_eq!(
            parse("(int|string)[]"),
            PhpType::array_of(PhpType::Union(vec![PhpType::Int, PhpType::String]))
        );
    }

    #[test]
    fn test_parse_class() {
        let ty = parse("\\App\\User");
        assert_eq!(ty, PhpType::class(ClassName::parse("App\\User").unwrap()));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "?int|string", "int|", "(int", "int)", "4ever", "$x"] {
            assert!(
                matches!(bad.parse::<PhpType>(), Err(Error::InvalidArgument(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_native_hint_by_features() {
        let base = TypeFeatures::default();
        assert_eq!(
            parse("?int").native_hint(base, HintPosition::Param, &short),
            Some("?int".to_string())
        );
        assert_eq!(parse("int").native_hint(base, HintPosition::Property, &short), None);
        assert_eq!(parse("mixed").native_hint(base, HintPosition::Param, &short), None);
        assert_eq!(
            parse("mixed").native_hint(MODERN, HintPosition::Param, &short),
            Some("mixed".to_string())
        );
        assert_eq!(parse("int|string").native_hint(base, HintPosition::Param, &short), None);
        assert_eq!(
            parse("int|string|null").native_hint(MODERN, HintPosition::Param, &short),
            Some("int|string|null".to_string())
        );
    }

    #[test]
    fn test_native_hint_positions() {
        assert_eq!(
            parse("void").native_hint(MODERN, HintPosition::Return, &short),
            Some("void".to_string())
        );
        assert_eq!(parse("void").native_hint(MODERN, HintPosition::Param, &short), None);
        assert_eq!(parse("callable").native_hint(MODERN, HintPosition::Property, &short), None);
        assert_eq!(parse("static").native_hint(MODERN, HintPosition::Param, &short), None);
        assert_eq!(
            parse("?App\\User").native_hint(MODERN, HintPosition::Property, &short),
            Some("?User".to_string())
        );
    }

    #[test]
    fn test_doc_hint() {
        assert_eq!(parse("int[]").doc_hint(&short), "int[]");
        assert_eq!(parse("?App\\User").doc_hint(&short), "User|null");
        assert_eq!(parse("(int|null)[]").doc_hint(&short), "(int|null)[]");
        assert_eq!(parse("array").doc_hint(&short), "array");
    }

    #[test]
    fn test_needs_doc() {
        assert!(parse("int[]").needs_doc(MODERN, HintPosition::Property));
        assert!(!parse("int").needs_doc(MODERN, HintPosition::Property));
        assert!(parse("int").needs_doc(TypeFeatures::default(), HintPosition::Property));
        assert!(parse("int|string").needs_doc(TypeFeatures::default(), HintPosition::Param));
    }

    #[test]
    fn test_capabilities_merge() {
        let mut caps = Capabilities::default().with_stringable();
        caps.merge(&Capabilities::default().with_to_array("toArray"));
        assert!(caps.stringable);
        assert_eq!(caps.to_array.as_deref(), Some("toArray"));
        assert!(!caps.is_empty());
        assert!(Capabilities::default().is_empty());
    }
}
