//! Explicit registry of known classes and their capabilities.

use indexmap::IndexMap;
use phpgen_core::Result;
use tracing::debug;

use crate::{Capabilities, Class, ClassName, ClassRef, PhpType};

const JSON_SERIALIZABLE: &str = "JsonSerializable";
const STRINGABLE: &str = "Stringable";
const TRAVERSABLE: [&str; 3] = ["Traversable", "Iterator", "IteratorAggregate"];

/// Maps class names to the capability descriptors the serialization
/// resolver relies on.
///
/// Types parsed through the registry carry the descriptor of their class
/// at the time of parsing, so register classes before parsing types that
/// mention them.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    entries: IndexMap<ClassName, Capabilities>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or extend) the capabilities of `name`.
    pub fn register(&mut self, name: ClassName, capabilities: Capabilities) {
        debug!(class = %name, ?capabilities, "registering type");
        self.entries.entry(name).or_default().merge(&capabilities);
    }

    /// Register a declared class, deriving its capabilities from the
    /// interfaces it implements and the methods it defines.
    pub fn register_class(&mut self, class: &Class) {
        self.register(class.name.clone(), capabilities_of(class));
    }

    /// Capabilities of `name`, if registered.
    pub fn capabilities(&self, name: &ClassName) -> Option<&Capabilities> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &ClassName) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A class type with the registered capabilities (empty if unknown).
    pub fn class(&self, name: ClassName) -> PhpType {
        let capabilities = self.entries.get(&name).cloned().unwrap_or_default();
        PhpType::Class(ClassRef { name, capabilities })
    }

    /// Parse a type expression, attaching capabilities to class members.
    pub fn parse_type(&self, s: &str) -> Result<PhpType> {
        PhpType::parse_with(s, &|name| self.class(name))
    }
}

fn capabilities_of(class: &Class) -> Capabilities {
    let implements = |short: &str| class.implements.iter().any(|i| i.short() == short);
    let members = &class.members;

    Capabilities {
        json_serializable: implements(JSON_SERIALIZABLE),
        stringable: implements(STRINGABLE) || members.method("__toString").is_some(),
        to_string: members.method("toString").map(|m| m.name.clone()),
        to_array: members.method("toArray").map(|m| m.name.clone()),
        traversable: TRAVERSABLE.iter().any(|t| implements(t)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Method;

    fn name(s: &str) -> ClassName {
        ClassName::parse(s).unwrap()
    }

    #[test]
    fn test_register_merges() {
        let mut registry = TypeRegistry::new();
        registry.register(name("Money"), Capabilities::default().with_stringable());
        registry.register(name("\\Money"), Capabilities::default().with_to_array("toArray"));

        assert_eq!(registry.len(), 1);
        let caps = registry.capabilities(&name("Money")).unwrap();
        assert!(caps.stringable);
        assert_eq!(caps.to_array.as_deref(), Some("toArray"));
    }

    #[test]
    fn test_parse_type_attaches_capabilities() {
        let mut registry = TypeRegistry::new();
        registry.register(name("App\\Tag"), Capabilities::default().with_json_serialize());

        let ty = registry.parse_type("?App\\Tag[]").unwrap();
        let PhpType::Nullable(inner) = ty else {
            panic!("expected nullable");
        };
        let PhpType::Array(Some(element)) = *inner else {
            panic!("expected typed array");
        };
        let PhpType::Class(class) = *element else {
            panic!("expected class");
        };
        assert!(class.capabilities.json_serializable);
    }

    #[test]
    fn test_unknown_class_has_no_capabilities() {
        let registry = TypeRegistry::new();
        let PhpType::Class(class) = registry.parse_type("Vendor\\Thing").unwrap() else {
            panic!("expected class");
        };
        assert!(class.capabilities.is_empty());
        assert!(!registry.contains(&name("Vendor\\Thing")));
    }

    #[test]
    fn test_register_class_derives_capabilities() {
        let class = Class::new(name("App\\Money"))
            .implements(name("JsonSerializable"))
            .implements(name("IteratorAggregate"))
            .method(Method::new("__toString"))
            .unwrap()
            .method(Method::new("toArray"))
            .unwrap();

        let mut registry = TypeRegistry::new();
        registry.register_class(&class);
        let caps = registry.capabilities(&class.name).unwrap();

        assert!(caps.json_serializable);
        assert!(caps.stringable);
        assert!(caps.traversable);
        assert_eq!(caps.to_array.as_deref(), Some("toArray"));
        assert_eq!(caps.to_string, None);
    }
}
