//! Validation of a parsed manifest against PHP naming and typing rules.

use std::collections::HashSet;

use indexmap::IndexMap;
use miette::SourceSpan;
use phpgen_codegen::render::emulated_method_clash;
use phpgen_ir::{PhpType, Visibility};

use crate::{
    ClassConfig, ConstantConfig, EnumConfig, Error, IndentConfig, InterfaceConfig, Manifest,
    MethodConfig, PropertyConfig, Result, TraitConfig,
};

/// Parsing and validation context that carries source information.
///
/// Holds the source text, the filename and the path through the manifest
/// hierarchy (`["classes", "User", "properties"]`), so nested checks can
/// say where they failed.
#[derive(Debug, Clone)]
pub struct ParseContext<'a> {
    src: &'a str,
    filename: &'a str,
    path: Vec<&'a str>,
}

impl<'a> ParseContext<'a> {
    pub fn new(src: &'a str, filename: &'a str) -> Self {
        Self {
            src,
            filename,
            path: Vec::new(),
        }
    }

    pub fn src(&self) -> &'a str {
        self.src
    }

    pub fn filename(&self) -> &'a str {
        self.filename
    }

    /// Push a path segment and return a new context.
    pub fn push(&self, segment: &'a str) -> Self {
        let mut path = self.path.clone();
        path.push(segment);
        Self {
            src: self.src,
            filename: self.filename,
            path,
        }
    }

    /// The current path as a dot-separated string.
    pub fn path_string(&self) -> String {
        self.path.join(".")
    }

    /// `"property in 'classes.User'"`, or just the kind at the root.
    pub fn context_for(&self, kind: &str) -> String {
        if self.path.is_empty() {
            kind.to_string()
        } else {
            format!("{} in '{}'", kind, self.path_string())
        }
    }

    pub fn find_span(&self, name: &str) -> Option<SourceSpan> {
        find_name_span(self.src, name)
    }

    pub fn validation_error(&self, message: impl Into<String>, near: &str) -> Box<Error> {
        Error::validation(message, self.src, self.filename, self.find_span(near))
    }

    fn invalid_name(&self, name: &str, kind: &str, reason: &str) -> Box<Error> {
        Error::invalid_name(
            name,
            self.context_for(kind),
            reason,
            self.src,
            self.filename,
            self.find_span(name),
        )
    }

    /// A member, parameter or case name.
    pub fn validate_identifier(&self, name: &str, kind: &str) -> Result<()> {
        match identifier_problem(name) {
            Some(reason) => Err(self.invalid_name(name, kind, reason)),
            None => Ok(()),
        }
    }

    /// A (possibly namespaced) class-like name. Reserved words are
    /// rejected in every segment.
    pub fn validate_class_name(&self, name: &str, kind: &str) -> Result<()> {
        let trimmed = name.trim_start_matches('\\');
        if trimmed.is_empty() {
            return Err(self.invalid_name(name, kind, "name cannot be empty"));
        }
        for segment in trimmed.split('\\') {
            if let Some(reason) = identifier_problem(segment) {
                return Err(self.invalid_name(name, kind, reason));
            }
            if is_reserved_word(segment) {
                return Err(self.invalid_name(name, kind, "name uses a reserved word"));
            }
        }
        Ok(())
    }

    pub fn validate_type(&self, ty: &str, kind: &str) -> Result<()> {
        if let Err(error) = ty.parse::<PhpType>() {
            return Err(Error::invalid_type(
                ty,
                self.context_for(kind),
                error.to_string(),
                self.src,
                self.filename,
                find_value_span(self.src, ty),
            ));
        }
        Ok(())
    }

    pub fn validate_visibility(&self, visibility: Option<&str>) -> Result<()> {
        match visibility {
            Some(visibility) => visibility
                .parse::<Visibility>()
                .map(|_| ())
                .map_err(|e| self.validation_error(e.to_string(), visibility)),
            None => Ok(()),
        }
    }

    /// Validate the whole manifest.
    pub fn validate_manifest(&self, manifest: &Manifest) -> Result<()> {
        if let Some(namespace) = manifest.project.namespace.as_deref()
            && !namespace.trim_matches('\\').is_empty()
        {
            self.push("project")
                .validate_class_name(namespace, "namespace")?;
        }
        self.validate_format(manifest)?;

        let types = self.push("types");
        for (name, ty) in &manifest.types {
            types.validate_class_name(name, "type")?;
            let ctx = types.push(name);
            for method in ty.to_string.iter().chain(ty.to_array.iter()) {
                ctx.validate_identifier(method, "method")?;
            }
        }

        let mut seen = HashSet::new();
        for (kind, key) in manifest.declaration_keys() {
            if !seen.insert(key.trim_start_matches('\\').to_ascii_lowercase()) {
                return Err(self.validation_error(
                    format!("'{}' is declared more than once", key),
                    key,
                ));
            }
            self.validate_class_name(key, kind)?;
        }

        let classes = self.push("classes");
        for (name, class) in &manifest.classes {
            classes.push(name).validate_class(class)?;
        }
        let interfaces = self.push("interfaces");
        for (name, interface) in &manifest.interfaces {
            interfaces.push(name).validate_interface(interface)?;
        }
        let traits = self.push("traits");
        for (name, t) in &manifest.traits {
            traits.push(name).validate_trait(t)?;
        }
        let enums = self.push("enums");
        for (name, e) in &manifest.enums {
            enums.push(name).validate_enum(e)?;
        }
        Ok(())
    }

    fn validate_format(&self, manifest: &Manifest) -> Result<()> {
        let format = &manifest.format;
        if format.max_line_length == 0 {
            return Err(self.validation_error("max_line_length must be at least 1", "max_line_length"));
        }
        if let IndentConfig::Text(text) = &format.indent
            && !text.chars().all(|c| c == ' ' || c == '\t')
        {
            return Err(self.validation_error("indent may only contain spaces and tabs", "indent"));
        }
        Ok(())
    }

    fn validate_class(&self, class: &ClassConfig) -> Result<()> {
        if class.is_abstract && class.is_final {
            return Err(self.validation_error(
                format!("class '{}' cannot be both abstract and final", self.path_string()),
                "abstract",
            ));
        }
        for name in class.extends.iter() {
            self.validate_class_name(name, "parent class")?;
        }
        for name in &class.implements {
            self.validate_class_name(name, "interface")?;
        }
        for name in &class.uses {
            self.validate_class_name(name, "trait")?;
        }
        self.validate_constants(&class.constants)?;
        self.validate_properties(&class.properties)?;
        self.validate_methods(&class.methods, false)?;

        let promoted = class.properties.values().any(|p| p.promote);
        if promoted
            && let Some(constructor) = class
                .methods
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case("__construct"))
                .map(|(_, m)| m)
            && let Some(clash) = constructor
                .params
                .iter()
                .find(|param| class.properties.get(&param.name).is_some_and(|p| p.promote))
        {
            return Err(self.validation_error(
                format!(
                    "constructor parameter '{}' is already declared by a promoted property",
                    clash.name
                ),
                &clash.name,
            ));
        }
        Ok(())
    }

    fn validate_interface(&self, interface: &InterfaceConfig) -> Result<()> {
        for name in &interface.extends {
            self.validate_class_name(name, "interface")?;
        }
        self.validate_constants(&interface.constants)?;
        self.validate_methods(&interface.methods, true)
    }

    fn validate_trait(&self, t: &TraitConfig) -> Result<()> {
        for name in &t.uses {
            self.validate_class_name(name, "trait")?;
        }
        self.validate_properties(&t.properties)?;
        self.validate_methods(&t.methods, false)
    }

    fn validate_enum(&self, e: &EnumConfig) -> Result<()> {
        let backing = match e.backing.as_deref() {
            None => None,
            Some(backing @ ("int" | "string")) => Some(backing),
            Some(other) => {
                return Err(self.validation_error(
                    format!("enum backing must be 'int' or 'string', not '{}'", other),
                    other,
                ));
            }
        };
        if e.cases.iter().next().is_none() {
            return Err(self.validation_error(
                format!("enum '{}' has no cases", self.path_string()),
                "cases",
            ));
        }
        let mut seen = HashSet::new();
        for (name, value) in e.cases.iter() {
            self.validate_identifier(name, "case")?;
            if let Some(helper) = emulated_method_clash(name, backing.is_some()) {
                return Err(self.validation_error(
                    format!(
                        "case '{}' clashes with the generated '{}()' method used before PHP 8.1",
                        name, helper
                    ),
                    name,
                ));
            }
            if let Some(method) = e.methods.keys().find(|m| m.eq_ignore_ascii_case(name)) {
                return Err(self.validation_error(
                    format!("case '{}' clashes with method '{}' before PHP 8.1", name, method),
                    name,
                ));
            }
            if !seen.insert(name.to_ascii_lowercase()) {
                return Err(self.validation_error(
                    format!("case '{}' differs from another case only in letter case", name),
                    name,
                ));
            }
            let matches = match (backing, value) {
                (None, None) => true,
                (Some("int"), Some(toml::Value::Integer(_))) => true,
                (Some("string"), Some(toml::Value::String(_))) => true,
                _ => false,
            };
            if !matches {
                let message = match backing {
                    Some(backing) => format!("case '{}' needs a {} value", name, backing),
                    None => format!(
                        "case '{}' has a value but the enum has no backing type",
                        name
                    ),
                };
                return Err(self.validation_error(message, name));
            }
        }
        for name in &e.implements {
            self.validate_class_name(name, "interface")?;
        }
        self.validate_constants(&e.constants)?;
        self.validate_methods(&e.methods, false)
    }

    fn validate_constants(
        &self,
        constants: &IndexMap<String, ConstantConfig>,
    ) -> Result<()> {
        for (name, constant) in constants {
            self.validate_identifier(name, "constant")?;
            self.validate_visibility(constant.visibility())?;
        }
        Ok(())
    }

    fn validate_properties(
        &self,
        properties: &IndexMap<String, PropertyConfig>,
    ) -> Result<()> {
        for (name, property) in properties {
            self.validate_identifier(name, "property")?;
            let ctx = self.push(name);
            if let Some(ty) = &property.ty {
                ctx.validate_type(ty, "property")?;
            }
            ctx.validate_visibility(property.visibility.as_deref())?;
            if property.promote && property.is_static {
                return Err(self.validation_error(
                    format!("static property '{}' cannot be promoted", name),
                    name,
                ));
            }
            if property.readonly && property.is_static {
                return Err(self.validation_error(
                    format!("static property '{}' cannot be readonly", name),
                    name,
                ));
            }
        }
        Ok(())
    }

    fn validate_methods(
        &self,
        methods: &IndexMap<String, MethodConfig>,
        interface: bool,
    ) -> Result<()> {
        let mut seen = HashSet::new();
        for (name, method) in methods {
            self.validate_identifier(name, "method")?;
            if !seen.insert(name.to_ascii_lowercase()) {
                return Err(self.validation_error(
                    format!("method '{}' is declared more than once", name),
                    name,
                ));
            }
            let ctx = self.push(name);
            ctx.validate_visibility(method.visibility.as_deref())?;
            if let Some(returns) = &method.returns {
                ctx.validate_type(returns, "return type")?;
            }
            let mut params = HashSet::new();
            for param in &method.params {
                ctx.validate_identifier(&param.name, "parameter")?;
                if !params.insert(param.name.as_str()) {
                    return Err(ctx.validation_error(
                        format!("parameter '{}' is declared more than once", param.name),
                        &param.name,
                    ));
                }
                if let Some(ty) = &param.ty {
                    ctx.validate_type(ty, "parameter")?;
                }
            }
            if (interface || method.is_abstract) && !method.body.is_empty() {
                return Err(self.validation_error(
                    format!("method '{}' cannot have a body", name),
                    name,
                ));
            }
        }
        Ok(())
    }
}

/// Words PHP does not accept as class, interface, trait or namespace
/// names.
pub(crate) const PHP_RESERVED: &[&str] = &[
    "abstract", "and", "array", "as", "bool", "break", "callable", "case", "catch", "class",
    "clone", "const", "continue", "declare", "default", "do", "echo", "else", "elseif", "empty",
    "enddeclare", "endfor", "endforeach", "endif", "endswitch", "endwhile", "eval", "exit",
    "extends", "false", "final", "finally", "float", "fn", "for", "foreach", "function", "global",
    "goto", "if", "implements", "include", "include_once", "instanceof", "insteadof", "int",
    "interface", "isset", "iterable", "list", "match", "mixed", "namespace", "never", "new",
    "null", "object", "or", "parent", "print", "private", "protected", "public", "readonly",
    "require", "require_once", "return", "self", "static", "string", "switch", "throw", "trait",
    "true", "try", "unset", "use", "var", "void", "while", "xor", "yield",
];

/// Case-insensitive, like PHP itself.
pub(crate) fn is_reserved_word(name: &str) -> bool {
    PHP_RESERVED.iter().any(|word| word.eq_ignore_ascii_case(name))
}

/// Why `name` is not a PHP identifier, or `None` if it is one.
pub(crate) fn identifier_problem(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();
    match chars.next() {
        None => return Some("name cannot be empty"),
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        Some(_) => return Some("name must start with a letter or underscore"),
    }
    if chars.any(|c| !(c.is_ascii_alphanumeric() || c == '_')) {
        return Some("name must contain only letters, numbers and underscores");
    }
    None
}

/// Find the span of a key in the TOML source.
/// Searches for patterns like `.name]`, `.name.`, `name =` or `"name"`.
pub(crate) fn find_name_span(src: &str, name: &str) -> Option<SourceSpan> {
    if name.is_empty() {
        return None;
    }
    let patterns = [
        (format!(".{}]", name), 1),
        (format!(".{}.", name), 1),
        (format!("\n{} =", name), 1),
        (format!("\n{}=", name), 1),
        (format!("{{ {} =", name), 2),
        (format!("\"{}\"", name), 1),
    ];

    for (pattern, skip) in &patterns {
        if let Some(pos) = src.find(pattern.as_str()) {
            return Some(SourceSpan::from((pos + skip, name.len())));
        }
    }

    src.find(name)
        .map(|pos| SourceSpan::from((pos, name.len())))
}

/// Find a quoted value, trying the TOML-escaped spelling of backslashes
/// too.
pub(crate) fn find_value_span(src: &str, value: &str) -> Option<SourceSpan> {
    let escaped = value.replace('\\', "\\\\");
    for candidate in [value.to_string(), escaped] {
        for quote in ['"', '\''] {
            let pattern = format!("{quote}{candidate}{quote}");
            if let Some(pos) = src.find(&pattern) {
                return Some(SourceSpan::from((pos + 1, candidate.len())));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers() {
        assert!(identifier_problem("id").is_none());
        assert!(identifier_problem("_private").is_none());
        assert!(identifier_problem("createdAt2").is_none());
        assert_eq!(identifier_problem(""), Some("name cannot be empty"));
        assert!(identifier_problem("2fa").is_some());
        assert!(identifier_problem("first-name").is_some());
        assert!(identifier_problem("a b").is_some());
    }

    #[test]
    fn test_reserved_words() {
        assert!(is_reserved_word("class"));
        assert!(is_reserved_word("List"));
        assert!(is_reserved_word("READONLY"));
        assert!(!is_reserved_word("User"));
    }

    #[test]
    fn test_find_name_span() {
        let src = "[classes.User]\nfinal = true";
        let span = find_name_span(src, "User").unwrap();
        assert_eq!(span.offset(), 9);
        assert_eq!(span.len(), 4);
    }

    #[test]
    fn test_find_name_span_nested() {
        let src = "[classes.User.properties.email]\ntype = \"string\"";
        let span = find_name_span(src, "email").unwrap();
        assert_eq!(span.offset(), 25);
        assert_eq!(span.len(), 5);
    }

    #[test]
    fn test_find_value_span_escaped() {
        let src = "type = \"?App\\\\Tag[]\"";
        let span = find_value_span(src, "?App\\Tag[]").unwrap();
        assert_eq!(span.offset(), 8);
        assert_eq!(span.len(), "?App\\\\Tag[]".len());
    }

    #[test]
    fn test_context_path() {
        let ctx = ParseContext::new("", "phpgen.toml");
        assert_eq!(ctx.context_for("class"), "class");
        let nested = ctx.push("classes").push("User");
        assert_eq!(nested.context_for("property"), "property in 'classes.User'");
    }

    #[test]
    fn test_class_names() {
        let ctx = ParseContext::new("", "phpgen.toml");
        assert!(ctx.validate_class_name("Models\\User", "class").is_ok());
        assert!(ctx.validate_class_name("\\Carbon\\Carbon", "type").is_ok());
        let err = ctx.validate_class_name("Models\\List", "class").unwrap_err();
        assert!(err.to_string().contains("invalid class name"));
        assert!(ctx.validate_class_name("Bad-Name", "class").is_err());
    }

    #[test]
    fn test_type_errors_point_at_value() {
        let src = "[classes.User.properties.id]\ntype = \"int||\"";
        let ctx = ParseContext::new(src, "phpgen.toml");
        let err = ctx.validate_type("int||", "property").unwrap_err();
        let Error::InvalidType { span, .. } = *err else {
            panic!("expected an invalid type error");
        };
        assert_eq!(span.map(|s| s.offset()), Some(37));
    }
}
