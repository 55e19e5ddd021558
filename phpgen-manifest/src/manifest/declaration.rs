use indexmap::IndexMap;
use serde::Deserialize;

/// `[types."Vendor\\Class"]`: what an external class can do, so values of
/// that type serialize correctly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeConfig {
    #[serde(default)]
    pub json_serializable: bool,
    #[serde(default)]
    pub stringable: bool,
    /// Name of a `toString`-like method
    pub to_string: Option<String>,
    /// Name of a `toArray`-like method
    pub to_array: Option<String>,
    #[serde(default)]
    pub traversable: bool,
}

/// A constant: a bare value, or a table with `value` and extras.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ConstantConfig {
    Detailed(ConstantDetail),
    Value(toml::Value),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstantDetail {
    pub value: toml::Value,
    pub visibility: Option<String>,
    pub doc: Option<String>,
}

impl ConstantConfig {
    pub fn value(&self) -> &toml::Value {
        match self {
            Self::Detailed(detail) => &detail.value,
            Self::Value(value) => value,
        }
    }

    pub fn visibility(&self) -> Option<&str> {
        match self {
            Self::Detailed(detail) => detail.visibility.as_deref(),
            Self::Value(_) => None,
        }
    }

    pub fn doc(&self) -> Option<&str> {
        match self {
            Self::Detailed(detail) => detail.doc.as_deref(),
            Self::Value(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyConfig {
    #[serde(rename = "type")]
    pub ty: Option<String>,
    pub visibility: Option<String>,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default)]
    pub readonly: bool,
    pub default: Option<toml::Value>,
    pub doc: Option<String>,
    /// Declare the property through a constructor parameter.
    #[serde(default)]
    pub promote: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Option<String>,
    pub default: Option<toml::Value>,
    #[serde(default)]
    pub variadic: bool,
    #[serde(default)]
    pub by_ref: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodConfig {
    pub doc: Option<String>,
    pub visibility: Option<String>,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default, rename = "final")]
    pub is_final: bool,
    #[serde(default)]
    pub params: Vec<ParamConfig>,
    pub returns: Option<String>,
    /// Body lines, emitted verbatim one level inside the braces.
    #[serde(default)]
    pub body: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassConfig {
    pub doc: Option<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default, rename = "final")]
    pub is_final: bool,
    #[serde(default)]
    pub readonly: bool,
    pub extends: Option<String>,
    #[serde(default)]
    pub implements: Vec<String>,
    #[serde(default)]
    pub uses: Vec<String>,
    #[serde(default)]
    pub constants: IndexMap<String, ConstantConfig>,
    #[serde(default)]
    pub properties: IndexMap<String, PropertyConfig>,
    #[serde(default)]
    pub methods: IndexMap<String, MethodConfig>,
    /// Generate a getter per property.
    #[serde(default)]
    pub getters: bool,
    /// Implement `JsonSerializable` with a generated `jsonSerialize()`.
    #[serde(default)]
    pub json_serialize: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfaceConfig {
    pub doc: Option<String>,
    #[serde(default)]
    pub extends: Vec<String>,
    #[serde(default)]
    pub constants: IndexMap<String, ConstantConfig>,
    #[serde(default)]
    pub methods: IndexMap<String, MethodConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TraitConfig {
    pub doc: Option<String>,
    #[serde(default)]
    pub uses: Vec<String>,
    #[serde(default)]
    pub properties: IndexMap<String, PropertyConfig>,
    #[serde(default)]
    pub methods: IndexMap<String, MethodConfig>,
}

/// Enum cases: a list of names for pure enums, a table of values for
/// backed ones.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CasesConfig {
    Names(Vec<String>),
    Values(IndexMap<String, toml::Value>),
}

impl Default for CasesConfig {
    fn default() -> Self {
        Self::Names(Vec::new())
    }
}

impl CasesConfig {
    /// `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = (&str, Option<&toml::Value>)> + '_> {
        match self {
            Self::Names(names) => Box::new(names.iter().map(|name| (name.as_str(), None))),
            Self::Values(values) => {
                Box::new(values.iter().map(|(name, value)| (name.as_str(), Some(value))))
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumConfig {
    pub doc: Option<String>,
    /// `"int"` or `"string"`; omitted for pure enums.
    pub backing: Option<String>,
    #[serde(default)]
    pub cases: CasesConfig,
    #[serde(default)]
    pub implements: Vec<String>,
    #[serde(default)]
    pub constants: IndexMap<String, ConstantConfig>,
    #[serde(default)]
    pub methods: IndexMap<String, MethodConfig>,
}
