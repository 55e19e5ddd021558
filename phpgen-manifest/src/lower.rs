//! Lowering a validated manifest into declarations.
//!
//! Lowering runs in two passes. The first registers the capabilities of
//! every class the manifest knows about (declared or listed under
//! `[types]`), the second builds the declarations, parsing every type
//! through the registry so the serialization resolver sees those
//! capabilities.

use std::{collections::HashMap, path::PathBuf};

use phpgen_codegen::{Generator, Renderer, synth};
use phpgen_core::{PhpVersion, RenderContext};
use phpgen_ir::{
    Capabilities, Class, ClassName, Constant, Declaration, DocComment, Enum, EnumBacking,
    EnumCase, Interface, Method, Param, PhpType, Property, Trait, TypeRegistry, to_value,
};
use tracing::{debug, info};

use crate::{
    ClassConfig, ConstantConfig, EnumConfig, Error, InterfaceConfig, Manifest, MethodConfig,
    ParamConfig, PropertyConfig, Result, TraitConfig, TypeConfig,
};

type CoreResult<T> = phpgen_core::Result<T>;

/// A manifest turned into declarations for one target version.
#[derive(Debug, Clone)]
pub struct Project {
    pub target: PhpVersion,
    pub namespace: Option<String>,
    pub source_dir: PathBuf,
    pub strict_types: bool,
    pub context: RenderContext,
    pub registry: TypeRegistry,
    pub declarations: Vec<Declaration>,
}

impl Project {
    /// A generator that writes every declaration of the project.
    pub fn generator(&self) -> Generator {
        let renderer = Renderer::with_context(self.target, self.context.clone());
        let mut generator = Generator::new(renderer).strict_types(self.strict_types);
        if let Some(namespace) = &self.namespace {
            generator = generator.root_namespace(namespace.clone());
        }
        self.declarations
            .iter()
            .cloned()
            .fold(generator, Generator::declare)
    }
}

impl Manifest {
    /// Lower every declaration for `target`.
    pub fn lower(&self, target: PhpVersion) -> Result<Project> {
        let names = Names::new(self).map_err(|e| Error::lowering("namespace", "project", e))?;
        let registry = self.registry(&names, target)?;
        let lowering = Lowering {
            names: &names,
            registry: &registry,
            target,
        };

        let mut declarations = Vec::with_capacity(self.declaration_count());
        for (key, config) in &self.classes {
            let class = lowering
                .class(key, config)
                .map_err(|e| Error::lowering("class", key, e))?;
            declarations.push(Declaration::Class(class));
        }
        for (key, config) in &self.interfaces {
            let interface = lowering
                .interface(key, config)
                .map_err(|e| Error::lowering("interface", key, e))?;
            declarations.push(Declaration::Interface(interface));
        }
        for (key, config) in &self.traits {
            let t = lowering
                .trait_(key, config)
                .map_err(|e| Error::lowering("trait", key, e))?;
            declarations.push(Declaration::Trait(t));
        }
        for (key, config) in &self.enums {
            let e = lowering
                .enum_(key, config)
                .map_err(|e| Error::lowering("enum", key, e))?;
            declarations.push(Declaration::Enum(e));
        }

        info!(
            declarations = declarations.len(),
            types = registry.len(),
            %target,
            "lowered manifest"
        );
        Ok(Project {
            target,
            namespace: names.namespace.clone(),
            source_dir: self.project.source_dir.clone(),
            strict_types: self.project.strict_types,
            context: self.context(),
            registry,
            declarations,
        })
    }

    /// First pass: what every known class can do.
    fn registry(&self, names: &Names, target: PhpVersion) -> Result<TypeRegistry> {
        let mut registry = TypeRegistry::new();
        for (key, config) in &self.types {
            let name = names
                .resolve(key)
                .map_err(|e| Error::lowering("type", key, e))?;
            registry.register(name, capabilities(config));
        }
        for (key, config) in &self.classes {
            let skeleton = names
                .class_skeleton(key, config)
                .map_err(|e| Error::lowering("class", key, e))?;
            registry.register_class(&skeleton);
        }
        for (key, config) in &self.enums {
            let name = names
                .declared(key)
                .map_err(|e| Error::lowering("enum", key, e))?;
            // Native enums serialize to their value on their own.
            let emulated = config.backing.is_some() && target < PhpVersion::Php81;
            let mut caps = Capabilities::default();
            if emulated {
                caps = caps.with_json_serialize();
            }
            registry.register(name, caps);
        }
        debug!(types = registry.len(), "built type registry");
        Ok(registry)
    }
}

fn capabilities(config: &TypeConfig) -> Capabilities {
    let mut caps = Capabilities::default();
    if config.json_serializable {
        caps = caps.with_json_serialize();
    }
    if config.stringable {
        caps = caps.with_stringable();
    }
    if let Some(method) = &config.to_string {
        caps = caps.with_to_string(method);
    }
    if let Some(method) = &config.to_array {
        caps = caps.with_to_array(method);
    }
    if config.traversable {
        caps = caps.with_traversable();
    }
    caps
}

/// Name resolution: declaration keys are relative to the project
/// namespace, and a reference that matches a key means that declaration.
/// Anything else is taken as fully qualified.
#[derive(Debug)]
struct Names {
    namespace: Option<String>,
    declared: HashMap<String, ClassName>,
}

impl Names {
    fn new(manifest: &Manifest) -> CoreResult<Self> {
        let namespace = manifest
            .project
            .namespace
            .as_deref()
            .map(|ns| ns.trim_matches('\\'))
            .filter(|ns| !ns.is_empty())
            .map(str::to_string);
        let mut declared = HashMap::new();
        for (_, key) in manifest.declaration_keys() {
            let name = ClassName::in_namespace(namespace.as_deref(), key.trim_start_matches('\\'))?;
            declared.insert(lookup_key(key), name);
        }
        Ok(Self {
            namespace,
            declared,
        })
    }

    fn declared(&self, key: &str) -> CoreResult<ClassName> {
        match self.declared.get(&lookup_key(key)) {
            Some(name) => Ok(name.clone()),
            None => ClassName::in_namespace(self.namespace.as_deref(), key),
        }
    }

    fn resolve(&self, reference: &str) -> CoreResult<ClassName> {
        match self.declared.get(&lookup_key(reference)) {
            Some(name) => Ok(name.clone()),
            None => ClassName::parse(reference),
        }
    }

    fn resolve_class(&self, name: ClassName) -> ClassName {
        self.declared.get(&lookup_key(name.fqcn())).cloned().unwrap_or(name)
    }

    /// Just enough of a class for the registry to derive its
    /// capabilities.
    fn class_skeleton(&self, key: &str, config: &ClassConfig) -> CoreResult<Class> {
        let mut class = Class::new(self.declared(key)?);
        for interface in &config.implements {
            class = class.implements(self.resolve(interface)?);
        }
        if config.json_serialize {
            class = class.implements(ClassName::parse("JsonSerializable")?);
        }
        for name in config.methods.keys() {
            class = class.method(Method::new(name.as_str()))?;
        }
        Ok(class)
    }
}

fn lookup_key(name: &str) -> String {
    name.trim().trim_start_matches('\\').to_string()
}

/// Second pass.
struct Lowering<'a> {
    names: &'a Names,
    registry: &'a TypeRegistry,
    target: PhpVersion,
}

impl Lowering<'_> {
    fn ty(&self, s: &str) -> CoreResult<PhpType> {
        PhpType::parse_with(s, &|name| self.registry.class(self.names.resolve_class(name)))
    }

    fn class(&self, key: &str, config: &ClassConfig) -> CoreResult<Class> {
        let mut class = Class::new(self.names.declared(key)?);
        if let Some(doc) = &config.doc {
            class = class.doc(DocComment::text(doc));
        }
        if config.is_abstract {
            class = class.abstract_();
        }
        if config.is_final {
            class = class.final_();
        }
        if config.readonly {
            class = class.readonly();
        }
        if let Some(parent) = &config.extends {
            class = class.extends(self.names.resolve(parent)?);
        }
        for interface in &config.implements {
            class = class.implements(self.names.resolve(interface)?);
        }
        for name in &config.uses {
            class = class.uses(self.names.resolve(name)?);
        }
        for (name, constant) in &config.constants {
            class = class.constant(self.constant(name, constant)?)?;
        }
        for (name, property) in &config.properties {
            class = class.property(self.property(name, property)?)?;
        }

        let promoted: Vec<&str> = config
            .properties
            .iter()
            .filter(|(_, p)| p.promote)
            .map(|(name, _)| name.as_str())
            .collect();
        let constructor = config
            .methods
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("__construct"));
        if !promoted.is_empty() {
            let declared = constructor.map(|(_, m)| m);
            class = class.method(self.constructor(&promoted, declared)?)?;
        }
        for (name, method) in &config.methods {
            if !promoted.is_empty() && name.eq_ignore_ascii_case("__construct") {
                continue;
            }
            class = class.method(self.method(name, method)?)?;
        }

        if config.getters {
            synth::add_getters(&mut class)?;
        }
        if config.json_serialize {
            synth::add_json_serialize(&mut class, self.target)?;
        }
        debug!(class = %class.name, "lowered class");
        Ok(class)
    }

    /// Promoted parameters first, then whatever the manifest declares on
    /// `__construct` itself.
    fn constructor(&self, promoted: &[&str], declared: Option<&MethodConfig>) -> CoreResult<Method> {
        let mut method = Method::constructor();
        for name in promoted {
            method = method.param(Param::new(*name).promote())?;
        }
        let Some(config) = declared else {
            return Ok(method);
        };
        if let Some(visibility) = &config.visibility {
            method = method.visibility(visibility.parse()?);
        }
        if let Some(doc) = &config.doc {
            method = method.doc(DocComment::text(doc));
        }
        for param in &config.params {
            method = method.param(self.param(param)?)?;
        }
        Ok(config
            .body
            .iter()
            .fold(method, |method, line| method.line(line.as_str())))
    }

    fn interface(&self, key: &str, config: &InterfaceConfig) -> CoreResult<Interface> {
        let mut interface = Interface::new(self.names.declared(key)?);
        if let Some(doc) = &config.doc {
            interface = interface.doc(DocComment::text(doc));
        }
        for parent in &config.extends {
            interface = interface.extends(self.names.resolve(parent)?);
        }
        for (name, constant) in &config.constants {
            interface = interface.constant(self.constant(name, constant)?)?;
        }
        for (name, method) in &config.methods {
            interface = interface.method(self.method(name, method)?)?;
        }
        Ok(interface)
    }

    fn trait_(&self, key: &str, config: &TraitConfig) -> CoreResult<Trait> {
        let mut t = Trait::new(self.names.declared(key)?);
        if let Some(doc) = &config.doc {
            t = t.doc(DocComment::text(doc));
        }
        for name in &config.uses {
            t = t.uses(self.names.resolve(name)?);
        }
        for (name, property) in &config.properties {
            t = t.property(self.property(name, property)?)?;
        }
        for (name, method) in &config.methods {
            t = t.method(self.method(name, method)?)?;
        }
        Ok(t)
    }

    fn enum_(&self, key: &str, config: &EnumConfig) -> CoreResult<Enum> {
        let name = self.names.declared(key)?;
        let mut e = match config.backing.as_deref() {
            Some("int") => Enum::backed(name, EnumBacking::Int),
            Some("string") => Enum::backed(name, EnumBacking::String),
            Some(other) => {
                return Err(phpgen_core::Error::invalid_argument(format!(
                    "unknown enum backing '{}'",
                    other
                )));
            }
            None => Enum::new(name),
        };
        if let Some(doc) = &config.doc {
            e = e.doc(DocComment::text(doc));
        }
        for interface in &config.implements {
            e = e.implements(self.names.resolve(interface)?);
        }
        for (name, value) in config.cases.iter() {
            let mut case = EnumCase::new(name);
            if let Some(value) = value {
                case = case.value(to_value(value)?);
            }
            e = e.case(case)?;
        }
        for (name, constant) in &config.constants {
            e = e.constant(self.constant(name, constant)?)?;
        }
        for (name, method) in &config.methods {
            e = e.method(self.method(name, method)?)?;
        }
        Ok(e)
    }

    fn constant(&self, name: &str, config: &ConstantConfig) -> CoreResult<Constant> {
        let mut constant = Constant::new(name, to_value(config.value())?);
        if let Some(visibility) = config.visibility() {
            constant = constant.visibility(visibility.parse()?);
        }
        if let Some(doc) = config.doc() {
            constant = constant.doc(DocComment::text(doc));
        }
        Ok(constant)
    }

    fn property(&self, name: &str, config: &PropertyConfig) -> CoreResult<Property> {
        let mut property = Property::new(name);
        if let Some(ty) = &config.ty {
            property = property.ty(self.ty(ty)?);
        }
        if let Some(visibility) = &config.visibility {
            property = property.visibility(visibility.parse()?);
        }
        if config.is_static {
            property = property.static_();
        }
        if config.readonly {
            property = property.readonly();
        }
        if let Some(default) = &config.default {
            property = property.default(to_value(default)?);
        }
        if let Some(doc) = &config.doc {
            property = property.doc(DocComment::text(doc));
        }
        Ok(property)
    }

    fn param(&self, config: &ParamConfig) -> CoreResult<Param> {
        let mut param = Param::new(config.name.as_str());
        if let Some(ty) = &config.ty {
            param = param.ty(self.ty(ty)?);
        }
        if let Some(default) = &config.default {
            param = param.default(to_value(default)?);
        }
        if config.variadic {
            param = param.variadic();
        }
        if config.by_ref {
            param = param.by_ref();
        }
        if let Some(description) = &config.description {
            param = param.description(description.as_str());
        }
        Ok(param)
    }

    fn method(&self, name: &str, config: &MethodConfig) -> CoreResult<Method> {
        let mut method = Method::new(name);
        if let Some(visibility) = &config.visibility {
            method = method.visibility(visibility.parse()?);
        }
        if config.is_static {
            method = method.static_();
        }
        if config.is_abstract {
            method = method.abstract_();
        }
        if config.is_final {
            method = method.final_();
        }
        for param in &config.params {
            method = method.param(self.param(param)?)?;
        }
        if let Some(returns) = &config.returns {
            method = method.returns(self.ty(returns)?);
        }
        if let Some(doc) = &config.doc {
            method = method.doc(DocComment::text(doc));
        }
        Ok(config
            .body
            .iter()
            .fold(method, |method, line| method.line(line.as_str())))
    }
}
