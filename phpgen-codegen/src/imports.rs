//! Collecting the classes a file refers to.

use indexmap::IndexSet;
use phpgen_core::NameScope;
use phpgen_ir::{
    ClassName, Declaration, Members, Param, PhpFile, PhpType, Value,
};

/// Gathers every class name referenced by declarations, in the order they
/// are first seen.
///
/// Names come from `extends`/`implements`, trait uses, type hints and
/// class references inside default values. Method bodies are opaque and
/// spell their own names.
///
/// # Example
///
/// ```
/// use phpgen_codegen::UseCollector;
/// use phpgen_core::NameScope;
/// use phpgen_ir::{Class, ClassName, PhpFile};
///
/// let class = Class::new(ClassName::parse("App\\Models\\User").unwrap())
///     .extends(ClassName::parse("Illuminate\\Database\\Eloquent\\Model").unwrap());
/// let file = PhpFile::for_declaration(class);
///
/// let mut uses = UseCollector::new();
/// uses.collect_file(&file);
///
/// let mut scope = NameScope::file(Some("App\\Models"));
/// uses.import_into(&mut scope);
/// assert_eq!(scope.imports(), vec!["Illuminate\\Database\\Eloquent\\Model"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct UseCollector {
    names: IndexSet<ClassName>,
}

impl UseCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &ClassName) {
        if !self.names.contains(name) {
            self.names.insert(name.clone());
        }
    }

    pub fn collect_file(&mut self, file: &PhpFile) {
        for declaration in &file.declarations {
            self.collect_declaration(declaration);
        }
    }

    pub fn collect_declaration(&mut self, declaration: &Declaration) {
        match declaration {
            Declaration::Class(class) => {
                if let Some(parent) = &class.extends {
                    self.add(parent);
                }
                class.implements.iter().for_each(|name| self.add(name));
                self.collect_members(&class.members);
            }
            Declaration::Interface(interface) => {
                interface.extends.iter().for_each(|name| self.add(name));
                self.collect_members(&interface.members);
            }
            Declaration::Trait(t) => self.collect_members(&t.members),
            Declaration::Enum(e) => {
                e.implements.iter().for_each(|name| self.add(name));
                for case in e.cases.values() {
                    if let Some(value) = &case.value {
                        self.collect_value(value);
                    }
                }
                self.collect_members(&e.members);
            }
            Declaration::Function(function) => {
                function.params.values().for_each(|param| self.collect_param(param));
                if let Some(ty) = &function.returns {
                    self.collect_type(ty);
                }
            }
        }
    }

    fn collect_members(&mut self, members: &Members) {
        members.traits.iter().for_each(|name| self.add(name));
        for constant in members.constants.values() {
            self.collect_value(&constant.value);
        }
        for property in members.properties.values() {
            if let Some(ty) = &property.ty {
                self.collect_type(ty);
            }
            if let Some(default) = &property.default {
                self.collect_value(default);
            }
        }
        for method in members.methods.values() {
            method.params.values().for_each(|param| self.collect_param(param));
            if let Some(ty) = &method.returns {
                self.collect_type(ty);
            }
        }
    }

    fn collect_param(&mut self, param: &Param) {
        if let Some(ty) = &param.ty {
            self.collect_type(ty);
        }
        if let Some(default) = &param.default {
            self.collect_value(default);
        }
    }

    fn collect_type(&mut self, ty: &PhpType) {
        match ty {
            PhpType::Class(class) => self.add(&class.name),
            PhpType::Array(Some(element)) => self.collect_type(element),
            PhpType::Nullable(inner) => self.collect_type(inner),
            PhpType::Union(members) => members.iter().for_each(|m| self.collect_type(m)),
            _ => {}
        }
    }

    fn collect_value(&mut self, value: &Value) {
        match value {
            Value::ClassRef(name) => self.add(name),
            Value::ClassConstant { class, .. } => self.add(class),
            Value::Array(array) => array.iter().for_each(|(_, v)| self.collect_value(v)),
            _ => {}
        }
    }

    /// Import every collected name into `scope`. Names that would collide
    /// with a declared or already-imported short name stay fully
    /// qualified. Returns how many were imported.
    pub fn import_into(&self, scope: &mut NameScope) -> usize {
        self.names
            .iter()
            .filter(|name| scope.import(name.fqcn()))
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassName> {
        self.names.iter()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
