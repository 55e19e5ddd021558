//! A PHP source file.

use phpgen_core::{Error, Result};

use crate::{Declaration, DocComment};

/// One `.php` file: an optional namespace and the declarations in it.
///
/// `use` statements are not stored; the renderer collects them from the
/// declarations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhpFile {
    pub namespace: Option<String>,
    pub strict_types: bool,
    pub doc: Option<DocComment>,
    pub declarations: Vec<Declaration>,
}

impl PhpFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// A file holding `declaration`, in the declaration's namespace.
    pub fn for_declaration(declaration: impl Into<Declaration>) -> Self {
        let declaration = declaration.into();
        Self {
            namespace: declaration.name().namespace().map(str::to_string),
            declarations: vec![declaration],
            ..Self::default()
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let namespace = namespace.trim_matches('\\');
        self.namespace = (!namespace.is_empty()).then(|| namespace.to_string());
        self
    }

    pub fn strict_types(mut self, strict: bool) -> Self {
        self.strict_types = strict;
        self
    }

    pub fn doc(mut self, doc: DocComment) -> Self {
        self.doc = Some(doc);
        self
    }

    /// Add a declaration. It must live in the file's namespace.
    pub fn declare(mut self, declaration: impl Into<Declaration>) -> Result<Self> {
        let declaration = declaration.into();
        let name = declaration.name();
        if !name.is_in(self.namespace.as_deref()) {
            return Err(Error::invalid_argument(format!(
                "{} {} does not belong in namespace '{}'",
                declaration.kind(),
                name,
                self.namespace.as_deref().unwrap_or("")
            )));
        }
        if self.declarations.iter().any(|d| d.name() == name) {
            return Err(Error::duplicate(
                declaration.kind(),
                name.fqcn(),
                "file",
            ));
        }
        self.declarations.push(declaration);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Class, ClassName, Interface};

    fn name(s: &str) -> ClassName {
        ClassName::parse(s).unwrap()
    }

    #[test]
    fn test_for_declaration_takes_namespace() {
        let file = PhpFile::for_declaration(Class::new(name("App\\Models\\User")));
        assert_eq!(file.namespace.as_deref(), Some("App\\Models"));
        assert_eq!(file.declarations.len(), 1);
        assert!(!file.strict_types);
    }

    #[test]
    fn test_declare_checks_namespace() {
        let file = PhpFile::new().namespace("\\App\\");
        assert_eq!(file.namespace.as_deref(), Some("App"));

        let file = file.declare(Class::new(name("App\\User"))).unwrap();
        assert!(matches!(
            file.clone().declare(Class::new(name("Other\\User"))),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            file.declare(Interface::new(name("App\\User"))),
            Err(Error::DuplicateDeclaration { .. })
        ));
    }
}
