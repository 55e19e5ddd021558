//! Class members: constants, properties, parameters, methods, functions.

use std::{
    cell::{Cell, RefCell},
    str::FromStr,
};

use indexmap::IndexMap;
use phpgen_core::{Error, LineNode, Lines, Result, ToLines};

use crate::{ClassName, DocComment, PhpType, Value};

/// Member visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
        }
    }
}

impl FromStr for Visibility {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "public" => Ok(Self::Public),
            "protected" => Ok(Self::Protected),
            "private" => Ok(Self::Private),
            other => Err(Error::invalid_argument(format!(
                "unknown visibility '{}', expected public, protected or private",
                other
            ))),
        }
    }
}

/// A class constant.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub name: String,
    pub value: Value,
    pub visibility: Visibility,
    pub doc: Option<DocComment>,
}

impl Constant {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            visibility: Visibility::Public,
            doc: None,
        }
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn doc(mut self, doc: DocComment) -> Self {
        self.doc = Some(doc);
        self
    }
}

/// A property declaration.
///
/// Two pieces of state change while rendering: a default doc-comment may be
/// attached the first time the property is rendered, and the constructor
/// renderer marks the property as promoted so the property list skips it.
/// Both are idempotent.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub ty: Option<PhpType>,
    pub visibility: Visibility,
    pub is_static: bool,
    pub readonly: bool,
    /// `None` means "no default", distinct from a `null` default.
    pub default: Option<Value>,
    doc: RefCell<Option<DocComment>>,
    promoted: Cell<bool>,
}

impl Property {
    /// A private, untyped property.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            visibility: Visibility::Private,
            is_static: false,
            readonly: false,
            default: None,
            doc: RefCell::new(None),
            promoted: Cell::new(false),
        }
    }

    pub fn ty(mut self, ty: PhpType) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn public(self) -> Self {
        self.visibility(Visibility::Public)
    }

    pub fn protected(self) -> Self {
        self.visibility(Visibility::Protected)
    }

    pub fn static_(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn doc(self, doc: DocComment) -> Self {
        self.doc.replace(Some(doc));
        self
    }

    /// The doc-comment currently attached.
    pub fn doc_comment(&self) -> Option<DocComment> {
        self.doc.borrow().clone()
    }

    /// The attached doc-comment, attaching `make()` first if there is none.
    pub fn doc_or_attach(&self, make: impl FnOnce() -> DocComment) -> DocComment {
        self.doc.borrow_mut().get_or_insert_with(make).clone()
    }

    /// Whether a constructor parameter has taken over this declaration.
    pub fn is_promoted(&self) -> bool {
        self.promoted.get()
    }

    pub fn mark_promoted(&self, promoted: bool) {
        self.promoted.set(promoted);
    }
}

/// A function or method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Option<PhpType>,
    /// `None` means "no default", distinct from a `null` default.
    pub default: Option<Value>,
    pub variadic: bool,
    pub by_ref: bool,
    /// On a constructor: declare the property of the same name here.
    pub promote: bool,
    pub description: Option<String>,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            default: None,
            variadic: false,
            by_ref: false,
            promote: false,
            description: None,
        }
    }

    pub fn ty(mut self, ty: PhpType) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub fn by_ref(mut self) -> Self {
        self.by_ref = true;
        self
    }

    pub fn promote(mut self) -> Self {
        self.promote = true;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

fn add_param(params: &mut IndexMap<String, Param>, param: Param, owner: &str) -> Result<()> {
    if params.contains_key(&param.name) {
        return Err(Error::duplicate("parameter", param.name, owner));
    }
    params.insert(param.name.clone(), param);
    Ok(())
}

/// A method declaration. The body is a line tree rendered one level
/// inside the braces.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_final: bool,
    pub params: IndexMap<String, Param>,
    pub returns: Option<PhpType>,
    pub doc: Option<DocComment>,
    pub body: Lines,
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            is_static: false,
            is_abstract: false,
            is_final: false,
            params: IndexMap::new(),
            returns: None,
            doc: None,
            body: Lines::new(),
        }
    }

    /// `public function __construct(...)`
    pub fn constructor() -> Self {
        Self::new("__construct")
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn protected(self) -> Self {
        self.visibility(Visibility::Protected)
    }

    pub fn private(self) -> Self {
        self.visibility(Visibility::Private)
    }

    pub fn static_(mut self) -> Self {
        self.is_static = true;
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

    /// Add a parameter; names must be unique.
    pub fn param(mut self, param: Param) -> Result<Self> {
        add_param(&mut self.params, param, &self.name)?;
        Ok(self)
    }

    pub fn returns(mut self, ty: PhpType) -> Self {
        self.returns = Some(ty);
        self
    }

    pub fn doc(mut self, doc: DocComment) -> Self {
        self.doc = Some(doc);
        self
    }

    /// Replace the body.
    pub fn body(mut self, body: Lines) -> Self {
        self.body = body;
        self
    }

    /// Append one raw line to the body.
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.body.push(LineNode::line(line));
        self
    }

    /// Append a composer to the body.
    pub fn statement(mut self, statement: impl ToLines + 'static) -> Self {
        self.body.push(LineNode::fragment(statement));
        self
    }

    pub fn is_constructor(&self) -> bool {
        self.name.eq_ignore_ascii_case("__construct")
    }

    /// Promoted parameters, in declaration order.
    pub fn promoted_params(&self) -> impl Iterator<Item = &Param> {
        self.params.values().filter(|p| p.promote)
    }
}

/// A namespaced free function.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: ClassName,
    pub params: IndexMap<String, Param>,
    pub returns: Option<PhpType>,
    pub doc: Option<DocComment>,
    pub body: Lines,
}

impl Function {
    pub fn new(name: ClassName) -> Self {
        Self {
            name,
            params: IndexMap::new(),
            returns: None,
            doc: None,
            body: Lines::new(),
        }
    }

    pub fn param(mut self, param: Param) -> Result<Self> {
        add_param(&mut self.params, param, self.name.fqcn())?;
        Ok(self)
    }

    pub fn returns(mut self, ty: PhpType) -> Self {
        self.returns = Some(ty);
        self
    }

    pub fn doc(mut self, doc: DocComment) -> Self {
        self.doc = Some(doc);
        self
    }

    pub fn body(mut self, body: Lines) -> Self {
        self.body = body;
        self
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.body.push(LineNode::line(line));
        self
    }
}
