//! Manifest types and parsing for phpgen.toml files.

mod declaration;
mod file;
mod parse;
mod project;

use indexmap::IndexMap;
use phpgen_core::RenderContext;
use serde::Deserialize;

pub use declaration::{
    CasesConfig, ClassConfig, ConstantConfig, ConstantDetail, EnumConfig, InterfaceConfig,
    MethodConfig, ParamConfig, PropertyConfig, TraitConfig, TypeConfig,
};
pub use file::PhpgenToml;
pub use parse::parse_manifest;
pub use project::{FormatConfig, IndentConfig, ProjectConfig};

/// Root manifest for phpgen.toml
///
/// Declaration keys are names relative to `project.namespace`
/// (`"Models\\User"` becomes `App\Models\User`).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub project: ProjectConfig,

    #[serde(default)]
    pub format: FormatConfig,

    /// Capability descriptors of classes declared elsewhere
    #[serde(default)]
    pub types: IndexMap<String, TypeConfig>,

    #[serde(default)]
    pub classes: IndexMap<String, ClassConfig>,

    #[serde(default)]
    pub interfaces: IndexMap<String, InterfaceConfig>,

    #[serde(default)]
    pub traits: IndexMap<String, TraitConfig>,

    #[serde(default)]
    pub enums: IndexMap<String, EnumConfig>,
}

impl Manifest {
    /// The render context described by `[format]`.
    pub fn context(&self) -> RenderContext {
        self.format.context()
    }

    /// Every declaration key with its kind, in manifest order.
    pub fn declaration_keys(&self) -> impl Iterator<Item = (&'static str, &str)> {
        let classes = self.classes.keys().map(|k| ("class", k.as_str()));
        let interfaces = self.interfaces.keys().map(|k| ("interface", k.as_str()));
        let traits = self.traits.keys().map(|k| ("trait", k.as_str()));
        let enums = self.enums.keys().map(|k| ("enum", k.as_str()));
        classes.chain(interfaces).chain(traits).chain(enums)
    }

    /// Number of declarations in the manifest.
    pub fn declaration_count(&self) -> usize {
        self.classes.len() + self.interfaces.len() + self.traits.len() + self.enums.len()
    }
}
