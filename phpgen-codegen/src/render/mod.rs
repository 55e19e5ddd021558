//! Declaration renderers.
//!
//! A [`Renderer`] pairs a [`RenderContext`] with a [`Dialect`]. Every
//! `render_*` method returns an unflattened line tree so callers can keep
//! composing; [`Renderer::render`] flattens at the end.
//!
//! Dialects are layered: each PHP version wraps the previous one and only
//! overrides the hooks whose output changes. Hooks receive the dispatching
//! renderer, so shared code always goes back through the outermost layer.

mod base;
mod dialect;
mod enums;
mod file;

use std::rc::Rc;

pub use dialect::{Dialect, Php73, Php74, Php80, Php81, Php82, dialect_for};
pub use enums::emulated_method_clash;
use phpgen_core::{Lines, NameScope, PhpVersion, RenderContext, Result};
use phpgen_ir::{
    Class, ClassName, Constant, Declaration, DocComment, Enum, Function, HintPosition, Interface,
    Members, Method, Param, PhpFile, PhpType, Property, Trait, TypeFeatures,
};
use tracing::debug;

use crate::engine::flatten;

/// What kind of declaration a member belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerKind {
    Class,
    Interface,
    Trait,
    Enum,
}

/// The declaration whose body is being rendered.
#[derive(Debug, Clone, Copy)]
pub struct Owner<'a> {
    pub name: &'a ClassName,
    pub kind: OwnerKind,
    pub members: &'a Members,
    /// Class-wide `readonly` flag.
    pub readonly: bool,
}

impl<'a> Owner<'a> {
    pub fn class(class: &'a Class) -> Self {
        Self {
            name: &class.name,
            kind: OwnerKind::Class,
            members: &class.members,
            readonly: class.readonly,
        }
    }

    pub fn interface(interface: &'a Interface) -> Self {
        Self {
            name: &interface.name,
            kind: OwnerKind::Interface,
            members: &interface.members,
            readonly: false,
        }
    }

    pub fn trait_(t: &'a Trait) -> Self {
        Self {
            name: &t.name,
            kind: OwnerKind::Trait,
            members: &t.members,
            readonly: false,
        }
    }

    pub fn enum_(e: &'a Enum) -> Self {
        Self {
            name: &e.name,
            kind: OwnerKind::Enum,
            members: &e.members,
            readonly: false,
        }
    }

    /// Whether method bodies are omitted.
    pub fn is_interface(&self) -> bool {
        self.kind == OwnerKind::Interface
    }
}

/// A constructor parameter that declares its property.
#[derive(Debug, Clone, Copy)]
pub struct Promotion<'a> {
    pub property: &'a Property,
    pub class_readonly: bool,
}

/// Renders declarations for one target version.
#[derive(Debug, Clone)]
pub struct Renderer {
    ctx: RenderContext,
    dialect: Rc<dyn Dialect>,
}

impl Renderer {
    /// A renderer for `version` with the default context.
    pub fn new(version: PhpVersion) -> Self {
        Self::with_context(version, RenderContext::default())
    }

    pub fn with_context(version: PhpVersion, ctx: RenderContext) -> Self {
        debug!(%version, "selecting dialect");
        Self {
            ctx,
            dialect: dialect_for(version),
        }
    }

    /// Use a custom dialect stack.
    pub fn with_dialect(dialect: Rc<dyn Dialect>, ctx: RenderContext) -> Self {
        Self { ctx, dialect }
    }

    /// The same renderer resolving class names through `scope`.
    pub fn scoped(&self, scope: NameScope) -> Self {
        Self {
            ctx: self.ctx.with_scope(scope),
            dialect: Rc::clone(&self.dialect),
        }
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn version(&self) -> PhpVersion {
        self.dialect.version()
    }

    pub fn features(&self) -> TypeFeatures {
        self.dialect.features()
    }

    /// Spell a class name in the active scope.
    pub fn class_name(&self, name: &ClassName) -> String {
        self.ctx.class_name(name.fqcn())
    }

    /// Native hint for `ty` at `position`, if the dialect can express it.
    pub fn hint(&self, ty: &PhpType, position: HintPosition) -> Option<String> {
        ty.native_hint(self.features(), position, &|name| self.class_name(name))
    }

    /// Doc-comment hint for `ty`.
    pub fn doc_hint(&self, ty: &PhpType) -> String {
        ty.doc_hint(&|name| self.class_name(name))
    }

    pub fn render_file(&self, file: &PhpFile) -> Result<Lines> {
        file::render_file(self, file)
    }

    pub fn render_declaration(&self, declaration: &Declaration) -> Result<Lines> {
        match declaration {
            Declaration::Class(class) => self.render_class(class),
            Declaration::Interface(interface) => self.render_interface(interface),
            Declaration::Trait(t) => self.render_trait(t),
            Declaration::Enum(e) => self.render_enum(e),
            Declaration::Function(function) => self.render_function(function),
        }
    }

    pub fn render_class(&self, class: &Class) -> Result<Lines> {
        self.dialect.render_class(self, class)
    }

    pub fn render_interface(&self, interface: &Interface) -> Result<Lines> {
        self.dialect.render_interface(self, interface)
    }

    pub fn render_trait(&self, t: &Trait) -> Result<Lines> {
        self.dialect.render_trait(self, t)
    }

    pub fn render_enum(&self, e: &Enum) -> Result<Lines> {
        self.dialect.render_enum(self, e)
    }

    pub fn render_function(&self, function: &Function) -> Result<Lines> {
        self.dialect.render_function(self, function)
    }

    /// Render a method of `owner`; constructors go through the
    /// constructor hook.
    pub fn render_method(&self, method: &Method, owner: &Owner<'_>) -> Result<Lines> {
        if method.is_constructor() && !owner.is_interface() {
            self.dialect.render_constructor(self, method, owner)
        } else {
            self.dialect.render_method(self, method, owner)
        }
    }

    pub fn render_property(&self, property: &Property, owner: &Owner<'_>) -> Result<Lines> {
        self.dialect.render_property(self, property, owner)
    }

    pub fn render_param(&self, param: &Param) -> Result<Lines> {
        self.dialect.render_param(self, param, None)
    }

    pub fn render_constant(&self, constant: &Constant) -> Result<Lines> {
        self.dialect.render_constant(self, constant)
    }

    /// Render `doc`, spelling a typed `@var` for the active scope.
    pub fn render_doc(&self, doc: &DocComment) -> Lines {
        let doc = doc.spelled(|ty| self.doc_hint(ty));
        self.dialect.render_doc(self, &doc)
    }

    /// Render and flatten anything renderable.
    pub fn render<T: Renderable + ?Sized>(&self, item: &T) -> Result<String> {
        let lines = item.render_lines(self)?;
        flatten(&self.ctx, &lines, 0)
    }
}

/// Anything a [`Renderer`] can turn into lines.
pub trait Renderable {
    fn render_lines(&self, renderer: &Renderer) -> Result<Lines>;
}

impl<T: Renderable + ?Sized> Renderable for &T {
    fn render_lines(&self, renderer: &Renderer) -> Result<Lines> {
        (*self).render_lines(renderer)
    }
}

impl Renderable for Lines {
    fn render_lines(&self, renderer: &Renderer) -> Result<Lines> {
        crate::engine::expand(renderer.context(), self.clone())
    }
}

macro_rules! impl_renderable {
    ($($ty:ty => $method:ident),+ $(,)?) => {
        $(
            impl Renderable for $ty {
                fn render_lines(&self, renderer: &Renderer) -> Result<Lines> {
                    renderer.$method(self)
                }
            }
        )+
    };
}

impl_renderable!(
    PhpFile => render_file,
    Declaration => render_declaration,
    Class => render_class,
    Interface => render_interface,
    Trait => render_trait,
    Enum => render_enum,
    Function => render_function,
    Constant => render_constant,
    Param => render_param,
);
