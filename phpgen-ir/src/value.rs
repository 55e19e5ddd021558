//! Runtime values that can be printed as PHP literals.

use std::{fmt, rc::Rc};

use indexmap::IndexMap;
use phpgen_core::ToLines;

use crate::ClassName;

/// A value the formatter knows how to print.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(PhpArray),
    /// `Name::class`
    ClassRef(ClassName),
    /// `Name::CONSTANT`
    ClassConstant { class: ClassName, name: String },
    /// An expression printed verbatim, e.g. `PHP_EOL` or `new \DateTime()`.
    Raw(String),
    /// A composer that renders itself.
    Fragment(Rc<dyn ToLines>),
}

impl Value {
    pub fn class_ref(class: ClassName) -> Self {
        Self::ClassRef(class)
    }

    pub fn constant(class: ClassName, name: impl Into<String>) -> Self {
        Self::ClassConstant {
            class,
            name: name.into(),
        }
    }

    pub fn raw(expr: impl Into<String>) -> Self {
        Self::Raw(expr.into())
    }

    pub fn fragment(fragment: impl ToLines + 'static) -> Self {
        Self::Fragment(Rc::new(fragment))
    }

    /// A list built from anything convertible to values.
    pub fn list<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Self::Array(items.into_iter().map(Into::<Value>::into).collect())
    }

    /// Kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::ClassRef(_) => "class reference",
            Self::ClassConstant { .. } => "class constant",
            Self::Raw(_) => "raw expression",
            Self::Fragment(_) => "fragment",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Self::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Self::String(s) => f.debug_tuple("String").field(s).finish(),
            Self::Array(a) => f.debug_tuple("Array").field(a).finish(),
            Self::ClassRef(c) => f.debug_tuple("ClassRef").field(c).finish(),
            Self::ClassConstant { class, name } => f
                .debug_struct("ClassConstant")
                .field("class", class)
                .field("name", name)
                .finish(),
            Self::Raw(s) => f.debug_tuple("Raw").field(s).finish(),
            Self::Fragment(fragment) => f.debug_tuple("Fragment").field(fragment).finish(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::ClassRef(a), Self::ClassRef(b)) => a == b,
            (
                Self::ClassConstant { class, name },
                Self::ClassConstant {
                    class: other_class,
                    name: other_name,
                },
            ) => class == other_class && name == other_name,
            (Self::Raw(a), Self::Raw(b)) => a == b,
            (Self::Fragment(a), Self::Fragment(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<PhpArray> for Value {
    fn from(array: PhpArray) -> Self {
        Self::Array(array)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// An array key. PHP arrays only have integer and string keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrayKey {
    Int(i64),
    String(String),
}

impl ArrayKey {
    /// Normalise a string key the way PHP does: canonical decimal
    /// integers (`"7"`, `"-3"`, not `"07"`) become integer keys.
    pub fn normalized(key: impl Into<String>) -> Self {
        let key = key.into();
        match key.parse::<i64>() {
            Ok(i) if i.to_string() == key => Self::Int(i),
            _ => Self::String(key),
        }
    }
}

impl From<i64> for ArrayKey {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for ArrayKey {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<&str> for ArrayKey {
    fn from(s: &str) -> Self {
        Self::normalized(s)
    }
}

impl From<String> for ArrayKey {
    fn from(s: String) -> Self {
        Self::normalized(s)
    }
}

/// An ordered PHP array: a list, a map, or a mix of both.
#[derive(Debug, Clone, Default)]
pub struct PhpArray {
    entries: IndexMap<ArrayKey, Value>,
    next_index: i64,
}

impl PhpArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append with the next integer key (`$a[] = $value`).
    pub fn push(&mut self, value: impl Into<Value>) {
        let key = self.next_index;
        self.insert(ArrayKey::Int(key), value);
    }

    /// Set `key`, replacing an existing value in place.
    pub fn insert(&mut self, key: impl Into<ArrayKey>, value: impl Into<Value>) {
        let key = key.into();
        if let ArrayKey::Int(i) = key {
            self.next_index = self.next_index.max(i.saturating_add(1));
        }
        self.entries.insert(key, value.into());
    }

    /// Builder form of [`PhpArray::insert`].
    pub fn with(mut self, key: impl Into<ArrayKey>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &ArrayKey) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Whether any key is a string. Scans up to the first one.
    pub fn is_associative(&self) -> bool {
        self.entries.keys().any(|k| matches!(k, ArrayKey::String(_)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ArrayKey, &Value)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for PhpArray {
    fn eq(&self, other: &Self) -> bool {
        // Order is significant for PHP arrays.
        self.entries.len() == other.entries.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl FromIterator<Value> for PhpArray {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut array = Self::new();
        for value in iter {
            array.push(value);
        }
        array
    }
}

impl FromIterator<(ArrayKey, Value)> for PhpArray {
    fn from_iter<I: IntoIterator<Item = (ArrayKey, Value)>>(iter: I) -> Self {
        let mut array = Self::new();
        for (key, value) in iter {
            array.insert(key, value);
        }
        array
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_uses_next_index() {
        let mut array = PhpArray::new();
        array.push("a");
        array.insert(5, "b");
        array.push("c");

        let keys: Vec<_> = array.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec![ArrayKey::Int(0), ArrayKey::Int(5), ArrayKey::Int(6)]);
        assert!(!array.is_associative());
    }

    #[test]
    fn test_string_keys_make_associative() {
        let array = PhpArray::new().with(0, 1).with("name", "x");
        assert!(array.is_associative());
    }

    #[test]
    fn test_numeric_string_keys_normalize() {
        assert_eq!(ArrayKey::from("7"), ArrayKey::Int(7));
        assert_eq!(ArrayKey::from("-3"), ArrayKey::Int(-3));
        assert_eq!(ArrayKey::from("07"), ArrayKey::String("07".to_string()));
        assert_eq!(ArrayKey::from("1.5"), ArrayKey::String("1.5".to_string()));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut array = PhpArray::new().with("a", 1).with("b", 2);
        array.insert("a", 3);
        let values: Vec<_> = array.iter().map(|(_, v)| v.clone()).collect();
        assert_eq!(values, vec![Value::Int(3), Value::Int(2)]);
    }

    #[test]
    fn test_array_equality_is_ordered() {
        let ab = PhpArray::new().with("a", 1).with("b", 2);
        let ba = PhpArray::new().with("b", 2).with("a", 1);
        assert_ne!(ab, ba);
        assert_eq!(ab, ab.clone());
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(Option::<i64>::None), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::String("x".to_string()));
        assert_eq!(Value::list([1, 2]).kind(), "array");
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    }
}
