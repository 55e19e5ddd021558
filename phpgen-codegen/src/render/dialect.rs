//! Version dialects.
//!
//! [`Php73`] is the root and renders everything through the base
//! functions. Each newer layer owns its predecessor, returns it from
//! [`Dialect::parent`] and overrides only what its version changes. Hooks
//! that are not overridden fall through to the parent.

use std::{fmt, rc::Rc};

use phpgen_core::{Lines, PhpVersion, Result};
use phpgen_ir::{
    Class, Constant, DocComment, Enum, Function, HintPosition, Interface, Method, Param, Property,
    Trait, TypeFeatures,
};
use tracing::debug;

use super::{Owner, Promotion, Renderer, base, enums};
use crate::engine::prefix_first;

/// The overridable rendering contract.
pub trait Dialect: fmt::Debug {
    fn version(&self) -> PhpVersion;

    /// The layer this one refines; `None` for the root.
    fn parent(&self) -> Option<&dyn Dialect>;

    fn features(&self) -> TypeFeatures {
        self.parent().map(|p| p.features()).unwrap_or_default()
    }

    /// Whether `?->` is available.
    fn supports_nullsafe(&self) -> bool {
        self.parent().is_some_and(|p| p.supports_nullsafe())
    }

    fn render_class(&self, r: &Renderer, class: &Class) -> Result<Lines> {
        match self.parent() {
            Some(parent) => parent.render_class(r, class),
            None => base::render_class(r, class),
        }
    }

    /// `abstract`, `final`, `readonly` in front of `class`.
    fn class_modifiers(&self, r: &Renderer, class: &Class) -> Vec<&'static str> {
        match self.parent() {
            Some(parent) => parent.class_modifiers(r, class),
            None => base::class_modifiers(class),
        }
    }

    fn render_interface(&self, r: &Renderer, interface: &Interface) -> Result<Lines> {
        match self.parent() {
            Some(parent) => parent.render_interface(r, interface),
            None => base::render_interface(r, interface),
        }
    }

    fn render_trait(&self, r: &Renderer, t: &Trait) -> Result<Lines> {
        match self.parent() {
            Some(parent) => parent.render_trait(r, t),
            None => base::render_trait(r, t),
        }
    }

    fn render_enum(&self, r: &Renderer, e: &Enum) -> Result<Lines> {
        match self.parent() {
            Some(parent) => parent.render_enum(r, e),
            None => enums::render_emulated(r, e),
        }
    }

    fn render_function(&self, r: &Renderer, function: &Function) -> Result<Lines> {
        match self.parent() {
            Some(parent) => parent.render_function(r, function),
            None => base::render_function(r, function),
        }
    }

    fn render_method(&self, r: &Renderer, method: &Method, owner: &Owner<'_>) -> Result<Lines> {
        match self.parent() {
            Some(parent) => parent.render_method(r, method, owner),
            None => base::render_method(r, method, owner),
        }
    }

    fn render_constructor(
        &self,
        r: &Renderer,
        method: &Method,
        owner: &Owner<'_>,
    ) -> Result<Lines> {
        match self.parent() {
            Some(parent) => parent.render_constructor(r, method, owner),
            None => base::render_constructor(r, method, owner),
        }
    }

    fn render_param(
        &self,
        r: &Renderer,
        param: &Param,
        promotion: Option<&Promotion<'_>>,
    ) -> Result<Lines> {
        match self.parent() {
            Some(parent) => parent.render_param(r, param, promotion),
            None => base::render_param(r, param),
        }
    }

    fn render_property(
        &self,
        r: &Renderer,
        property: &Property,
        owner: &Owner<'_>,
    ) -> Result<Lines> {
        match self.parent() {
            Some(parent) => parent.render_property(r, property, owner),
            None => base::render_property(r, property, owner),
        }
    }

    /// Visibility, `static` and `readonly` for a property or promoted
    /// parameter.
    fn property_modifiers(
        &self,
        r: &Renderer,
        property: &Property,
        class_readonly: bool,
    ) -> Vec<&'static str> {
        match self.parent() {
            Some(parent) => parent.property_modifiers(r, property, class_readonly),
            None => base::property_modifiers(property),
        }
    }

    /// The doc-comment printed above a property.
    fn property_doc(&self, r: &Renderer, property: &Property) -> Option<DocComment> {
        match self.parent() {
            Some(parent) => parent.property_doc(r, property),
            None => base::property_doc(r, property),
        }
    }

    fn render_constant(&self, r: &Renderer, constant: &Constant) -> Result<Lines> {
        match self.parent() {
            Some(parent) => parent.render_constant(r, constant),
            None => base::render_constant(r, constant),
        }
    }

    fn render_doc(&self, r: &Renderer, doc: &DocComment) -> Lines {
        match self.parent() {
            Some(parent) => parent.render_doc(r, doc),
            None => base::render_doc(doc),
        }
    }
}

/// The dialect stack for `version`.
pub fn dialect_for(version: PhpVersion) -> Rc<dyn Dialect> {
    match version {
        PhpVersion::Php73 => Rc::new(Php73),
        PhpVersion::Php74 => Rc::new(Php74::default()),
        PhpVersion::Php80 => Rc::new(Php80::default()),
        PhpVersion::Php81 => Rc::new(Php81::default()),
        PhpVersion::Php82 => Rc::new(Php82::default()),
    }
}

/// PHP 7.3: property types live in doc-comments, promoted parameters are
/// assigned in the constructor body, enums are emulated.
#[derive(Debug, Clone, Copy, Default)]
pub struct Php73;

impl Dialect for Php73 {
    fn version(&self) -> PhpVersion {
        PhpVersion::Php73
    }

    fn parent(&self) -> Option<&dyn Dialect> {
        None
    }
}

/// PHP 7.4: typed properties.
#[derive(Debug, Clone, Copy, Default)]
pub struct Php74 {
    parent: Php73,
}

impl Dialect for Php74 {
    fn version(&self) -> PhpVersion {
        PhpVersion::Php74
    }

    fn parent(&self) -> Option<&dyn Dialect> {
        Some(&self.parent)
    }

    fn features(&self) -> TypeFeatures {
        TypeFeatures {
            property_types: true,
            ..self.parent.features()
        }
    }

    /// Drops `@var` once the native hint says everything.
    fn property_doc(&self, r: &Renderer, property: &Property) -> Option<DocComment> {
        let doc = self.parent.property_doc(r, property)?;
        let native = property
            .ty
            .as_ref()
            .is_some_and(|ty| !ty.needs_doc(r.features(), HintPosition::Property));
        if !native {
            return Some(doc);
        }
        let doc = doc.without_tag("var");
        (!doc.is_empty()).then_some(doc)
    }
}

/// PHP 8.0: unions, `mixed`, `static`, constructor promotion and the
/// nullsafe operator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Php80 {
    parent: Php74,
}

impl Dialect for Php80 {
    fn version(&self) -> PhpVersion {
        PhpVersion::Php80
    }

    fn parent(&self) -> Option<&dyn Dialect> {
        Some(&self.parent)
    }

    fn features(&self) -> TypeFeatures {
        TypeFeatures {
            union_types: true,
            mixed: true,
            static_return: true,
            ..self.parent.features()
        }
    }

    fn supports_nullsafe(&self) -> bool {
        true
    }

    fn render_constructor(
        &self,
        r: &Renderer,
        method: &Method,
        owner: &Owner<'_>,
    ) -> Result<Lines> {
        let mut params = Vec::with_capacity(method.params.len());
        let mut rendered = Vec::with_capacity(method.params.len());
        for param in method.params.values() {
            let Some(property) = base::promoted_property(param, owner) else {
                rendered.push(r.dialect().render_param(r, param, None)?);
                params.push(param.clone());
                continue;
            };
            debug!(class = %owner.name, property = %property.name, "promoting constructor parameter");
            property.mark_promoted(true);
            let param = base::promoted_param(param, property);
            let promotion = Promotion {
                property,
                class_readonly: owner.readonly,
            };
            rendered.push(r.dialect().render_param(r, &param, Some(&promotion))?);
            params.push(param);
        }
        base::render_callable(r, method, owner, &params, rendered, &method.body)
    }

    fn render_param(
        &self,
        r: &Renderer,
        param: &Param,
        promotion: Option<&Promotion<'_>>,
    ) -> Result<Lines> {
        let lines = self.parent.render_param(r, param, None)?;
        let Some(promotion) = promotion else {
            return Ok(lines);
        };
        let modifiers = r
            .dialect()
            .property_modifiers(r, promotion.property, promotion.class_readonly)
            .join(" ");
        prefix_first("promotion", &format!("{} ", modifiers), lines)
    }

    fn render_property(
        &self,
        r: &Renderer,
        property: &Property,
        owner: &Owner<'_>,
    ) -> Result<Lines> {
        if property.is_promoted() {
            return Ok(Lines::new());
        }
        self.parent.render_property(r, property, owner)
    }
}

/// PHP 8.1: readonly properties and native enums.
#[derive(Debug, Clone, Copy, Default)]
pub struct Php81 {
    parent: Php80,
}

impl Dialect for Php81 {
    fn version(&self) -> PhpVersion {
        PhpVersion::Php81
    }

    fn parent(&self) -> Option<&dyn Dialect> {
        Some(&self.parent)
    }

    fn property_modifiers(
        &self,
        r: &Renderer,
        property: &Property,
        class_readonly: bool,
    ) -> Vec<&'static str> {
        let mut modifiers = self.parent.property_modifiers(r, property, class_readonly);
        let typed = property
            .ty
            .as_ref()
            .is_some_and(|ty| r.hint(ty, HintPosition::Property).is_some());
        if (property.readonly || class_readonly) && typed && !property.is_static {
            modifiers.push("readonly");
        }
        modifiers
    }

    fn render_enum(&self, r: &Renderer, e: &Enum) -> Result<Lines> {
        enums::render_native(r, e)
    }
}

/// PHP 8.2: `readonly class`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Php82 {
    parent: Php81,
}

impl Dialect for Php82 {
    fn version(&self) -> PhpVersion {
        PhpVersion::Php82
    }

    fn parent(&self) -> Option<&dyn Dialect> {
        Some(&self.parent)
    }

    fn class_modifiers(&self, r: &Renderer, class: &Class) -> Vec<&'static str> {
        let mut modifiers = self.parent.class_modifiers(r, class);
        if class.readonly {
            modifiers.push("readonly");
        }
        modifiers
    }

    /// Members of a readonly class inherit the flag from the class line.
    fn property_modifiers(
        &self,
        r: &Renderer,
        property: &Property,
        class_readonly: bool,
    ) -> Vec<&'static str> {
        let mut modifiers = self.parent.property_modifiers(r, property, false);
        if class_readonly {
            modifiers.retain(|m| *m != "readonly");
        }
        modifiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_chain() {
        for version in PhpVersion::ALL {
            let dialect = dialect_for(version);
            assert_eq!(dialect.version(), version);
            let mut depth = 0;
            let mut current: &dyn Dialect = dialect.as_ref();
            while let Some(parent) = current.parent() {
                assert!(parent.version() < current.version());
                current = parent;
                depth += 1;
            }
            assert_eq!(current.version(), PhpVersion::Php73);
            assert_eq!(depth, PhpVersion::ALL.iter().position(|v| *v == version).unwrap());
        }
    }

    #[test]
    fn test_features_accumulate() {
        assert_eq!(Php73.features(), TypeFeatures::default());
        assert!(Php74::default().features().property_types);
        assert!(!Php74::default().features().union_types);
        let php81 = Php81::default().features();
        assert!(php81.property_types && php81.union_types && php81.mixed && php81.static_return);
    }

    #[test]
    fn test_nullsafe_support() {
        assert!(!Php73.supports_nullsafe());
        assert!(!Php74::default().supports_nullsafe());
        assert!(Php80::default().supports_nullsafe());
        assert!(Php82::default().supports_nullsafe());
    }
}
