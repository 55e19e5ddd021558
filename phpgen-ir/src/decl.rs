//! Top-level declarations: classes, interfaces, traits, enums.

use indexmap::IndexMap;
use phpgen_core::{Error, Result};

use crate::{ClassName, Constant, DocComment, Function, Method, Property, Value};

/// The member lists shared by every class-like declaration, kept in
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Members {
    pub traits: Vec<ClassName>,
    pub constants: IndexMap<String, Constant>,
    pub properties: IndexMap<String, Property>,
    /// Keyed by lowercased name: PHP method names are case-insensitive.
    pub methods: IndexMap<String, Method>,
}

impl Members {
    pub fn use_trait(&mut self, name: ClassName) {
        if !self.traits.contains(&name) {
            self.traits.push(name);
        }
    }

    pub fn add_constant(&mut self, constant: Constant, owner: &ClassName) -> Result<()> {
        if self.constants.contains_key(&constant.name) {
            return Err(Error::duplicate("constant", constant.name, owner.fqcn()));
        }
        self.constants.insert(constant.name.clone(), constant);
        Ok(())
    }

    pub fn add_property(&mut self, property: Property, owner: &ClassName) -> Result<()> {
        if self.properties.contains_key(&property.name) {
            return Err(Error::duplicate("property", property.name, owner.fqcn()));
        }
        self.properties.insert(property.name.clone(), property);
        Ok(())
    }

    pub fn add_method(&mut self, method: Method, owner: &ClassName) -> Result<()> {
        let key = method.name.to_ascii_lowercase();
        if self.methods.contains_key(&key) {
            return Err(Error::duplicate("method", method.name, owner.fqcn()));
        }
        self.methods.insert(key, method);
        Ok(())
    }

    /// Look a method up by (case-insensitive) name.
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.get(&name.to_ascii_lowercase())
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub fn constructor(&self) -> Option<&Method> {
        self.method("__construct")
    }

    /// Methods in render order: the constructor first, then the rest in
    /// insertion order.
    pub fn ordered_methods(&self) -> impl Iterator<Item = &Method> {
        let constructor = self.constructor();
        constructor
            .into_iter()
            .chain(self.methods.values().filter(|m| !m.is_constructor()))
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
            && self.constants.is_empty()
            && self.properties.is_empty()
            && self.methods.is_empty()
    }
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: ClassName,
    pub doc: Option<DocComment>,
    pub is_abstract: bool,
    pub is_final: bool,
    /// Every property is readonly (`readonly class` on 8.2).
    pub readonly: bool,
    pub extends: Option<ClassName>,
    pub implements: Vec<ClassName>,
    pub members: Members,
}

impl Class {
    pub fn new(name: ClassName) -> Self {
        Self {
            name,
            doc: None,
            is_abstract: false,
            is_final: false,
            readonly: false,
            extends: None,
            implements: Vec::new(),
            members: Members::default(),
        }
    }

    pub fn doc(mut self, doc: DocComment) -> Self {
        self.doc = Some(doc);
        self
    }

    pub fn abstract_(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn final_(mut self) -> Self {
        self.is_final = true;
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn extends(mut self, parent: ClassName) -> Self {
        self.extends = Some(parent);
        self
    }

    pub fn implements(mut self, interface: ClassName) -> Self {
        if !self.implements.contains(&interface) {
            self.implements.push(interface);
        }
        self
    }

    pub fn uses(mut self, name: ClassName) -> Self {
        self.members.use_trait(name);
        self
    }

    pub fn constant(mut self, constant: Constant) -> Result<Self> {
        self.members.add_constant(constant, &self.name)?;
        Ok(self)
    }

    pub fn property(mut self, property: Property) -> Result<Self> {
        self.members.add_property(property, &self.name)?;
        Ok(self)
    }

    pub fn method(mut self, method: Method) -> Result<Self> {
        self.members.add_method(method, &self.name)?;
        Ok(self)
    }

    /// Whether `property` ends up readonly, either by itself or through
    /// the class-wide flag.
    pub fn is_readonly(&self, property: &Property) -> bool {
        self.readonly || property.readonly
    }
}

/// An interface declaration. Methods are rendered as signatures.
#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    pub name: ClassName,
    pub doc: Option<DocComment>,
    pub extends: Vec<ClassName>,
    pub members: Members,
}

impl Interface {
    pub fn new(name: ClassName) -> Self {
        Self {
            name,
            doc: None,
            extends: Vec::new(),
            members: Members::default(),
        }
    }

    pub fn doc(mut self, doc: DocComment) -> Self {
        self.doc = Some(doc);
        self
    }

    pub fn extends(mut self, parent: ClassName) -> Self {
        if !self.extends.contains(&parent) {
            self.extends.push(parent);
        }
        self
    }

    pub fn constant(mut self, constant: Constant) -> Result<Self> {
        self.members.add_constant(constant, &self.name)?;
        Ok(self)
    }

    pub fn method(mut self, method: Method) -> Result<Self> {
        self.members.add_method(method, &self.name)?;
        Ok(self)
    }
}

/// A trait declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Trait {
    pub name: ClassName,
    pub doc: Option<DocComment>,
    pub members: Members,
}

impl Trait {
    pub fn new(name: ClassName) -> Self {
        Self {
            name,
            doc: None,
            members: Members::default(),
        }
    }

    pub fn doc(mut self, doc: DocComment) -> Self {
        self.doc = Some(doc);
        self
    }

    pub fn uses(mut self, name: ClassName) -> Self {
        self.members.use_trait(name);
        self
    }

    pub fn property(mut self, property: Property) -> Result<Self> {
        self.members.add_property(property, &self.name)?;
        Ok(self)
    }

    pub fn method(mut self, method: Method) -> Result<Self> {
        self.members.add_method(method, &self.name)?;
        Ok(self)
    }
}

/// Scalar type backing an enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumBacking {
    Int,
    String,
}

impl EnumBacking {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::String => "string",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::Int, Value::Int(_)) | (Self::String, Value::String(_))
        )
    }
}

/// One enum case.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumCase {
    pub name: String,
    pub value: Option<Value>,
    pub doc: Option<DocComment>,
}

impl EnumCase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            doc: None,
        }
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn doc(mut self, doc: DocComment) -> Self {
        self.doc = Some(doc);
        self
    }
}

/// An enumeration. Rendered natively on 8.1+, emulated with a final
/// class before that.
#[derive(Debug, Clone, PartialEq)]
pub struct Enum {
    pub name: ClassName,
    pub doc: Option<DocComment>,
    pub backing: Option<EnumBacking>,
    pub cases: IndexMap<String, EnumCase>,
    pub implements: Vec<ClassName>,
    pub members: Members,
}

impl Enum {
    /// A pure (unbacked) enum.
    pub fn new(name: ClassName) -> Self {
        Self {
            name,
            doc: None,
            backing: None,
            cases: IndexMap::new(),
            implements: Vec::new(),
            members: Members::default(),
        }
    }

    /// A backed enum; every case must carry a value of `backing` type.
    pub fn backed(name: ClassName, backing: EnumBacking) -> Self {
        Self {
            backing: Some(backing),
            ..Self::new(name)
        }
    }

    pub fn doc(mut self, doc: DocComment) -> Self {
        self.doc = Some(doc);
        self
    }

    pub fn implements(mut self, interface: ClassName) -> Self {
        if !self.implements.contains(&interface) {
            self.implements.push(interface);
        }
        self
    }

    pub fn case(mut self, case: EnumCase) -> Result<Self> {
        match (&self.backing, &case.value) {
            (None, None) => {}
            (Some(backing), Some(value)) if backing.accepts(value) => {}
            (None, Some(_)) => {
                return Err(Error::invalid_argument(format!(
                    "case {}::{} has a value but the enum is not backed",
                    self.name, case.name
                )));
            }
            (Some(backing), _) => {
                return Err(Error::invalid_argument(format!(
                    "case {}::{} needs a {} value",
                    self.name,
                    case.name,
                    backing.as_str()
                )));
            }
        }
        if self.cases.contains_key(&case.name) {
            return Err(Error::duplicate("case", case.name, self.name.fqcn()));
        }
        self.cases.insert(case.name.clone(), case);
        Ok(self)
    }

    pub fn constant(mut self, constant: Constant) -> Result<Self> {
        self.members.add_constant(constant, &self.name)?;
        Ok(self)
    }

    pub fn method(mut self, method: Method) -> Result<Self> {
        self.members.add_method(method, &self.name)?;
        Ok(self)
    }
}

/// Anything that can appear at the top level of a file.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Class(Class),
    Interface(Interface),
    Trait(Trait),
    Enum(Enum),
    Function(Function),
}

impl Declaration {
    pub fn name(&self) -> &ClassName {
        match self {
            Self::Class(c) => &c.name,
            Self::Interface(i) => &i.name,
            Self::Trait(t) => &t.name,
            Self::Enum(e) => &e.name,
            Self::Function(f) => &f.name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Class(_) => "class",
            Self::Interface(_) => "interface",
            Self::Trait(_) => "trait",
            Self::Enum(_) => "enum",
            Self::Function(_) => "function",
        }
    }
}

impl From<Class> for Declaration {
    fn from(c: Class) -> Self {
        Self::Class(c)
    }
}

impl From<Interface> for Declaration {
    fn from(i: Interface) -> Self {
        Self::Interface(i)
    }
}

impl From<Trait> for Declaration {
    fn from(t: Trait) -> Self {
        Self::Trait(t)
    }
}

impl From<Enum> for Declaration {
    fn from(e: Enum) -> Self {
        Self::Enum(e)
    }
}

impl From<Function> for Declaration {
    fn from(f: Function) -> Self {
        Self::Function(f)
    }
}
