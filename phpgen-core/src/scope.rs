//! Class-name resolution for one output file.

use std::collections::BTreeMap;

/// Decides how a fully qualified class name is spelled in the current
/// file.
///
/// Inside a file scope a name is printed short when it lives in the
/// file's namespace or was imported, and fully qualified (`\Vendor\Thing`)
/// otherwise. Outside any file (rendering a lone declaration) every name
/// is printed short.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameScope {
    file: Option<FileScope>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct FileScope {
    namespace: Option<String>,
    /// short name -> fully qualified name
    imports: BTreeMap<String, String>,
    /// Short names declared by the file itself.
    declared: Vec<String>,
}

fn normalize(fqcn: &str) -> &str {
    fqcn.trim_start_matches('\\')
}

fn split(fqcn: &str) -> (Option<&str>, &str) {
    match normalize(fqcn).rsplit_once('\\') {
        Some((ns, short)) => (Some(ns), short),
        None => (None, normalize(fqcn)),
    }
}

impl NameScope {
    /// Short names everywhere.
    pub fn detached() -> Self {
        Self::default()
    }

    /// The scope of a file in `namespace` (global when `None`).
    pub fn file(namespace: Option<&str>) -> Self {
        Self {
            file: Some(FileScope {
                namespace: namespace
                    .map(|ns| ns.trim_matches('\\').to_string())
                    .filter(|ns| !ns.is_empty()),
                ..FileScope::default()
            }),
        }
    }

    /// Record a class declared in this file so imports cannot shadow it.
    pub fn declare(&mut self, fqcn: &str) {
        if let Some(file) = &mut self.file {
            let (_, short) = split(fqcn);
            file.declared.push(short.to_string());
        }
    }

    /// Import `fqcn`. Returns `false` (and changes nothing) when it would
    /// collide with a declared or already-imported short name, or when no
    /// import is needed.
    pub fn import(&mut self, fqcn: &str) -> bool {
        let Some(file) = &mut self.file else {
            return false;
        };
        let (namespace, short) = split(fqcn);
        if namespace.is_none() && file.namespace.is_none() {
            return false;
        }
        if namespace == file.namespace.as_deref() {
            return false;
        }
        if file.declared.iter().any(|d| d.eq_ignore_ascii_case(short)) {
            return false;
        }
        if let Some(existing) = file
            .imports
            .iter()
            .find(|(s, _)| s.eq_ignore_ascii_case(short))
            .map(|(_, f)| f)
        {
            return existing == normalize(fqcn);
        }
        file.imports
            .insert(short.to_string(), normalize(fqcn).to_string());
        true
    }

    /// The spelling of `fqcn` in this scope.
    pub fn resolve(&self, fqcn: &str) -> String {
        let (namespace, short) = split(fqcn);
        let Some(file) = &self.file else {
            return short.to_string();
        };
        if let Some(imported) = file.imports.get(short) {
            if imported == normalize(fqcn) {
                return short.to_string();
            }
            return format!("\\{}", normalize(fqcn));
        }
        if namespace == file.namespace.as_deref() {
            return short.to_string();
        }
        format!("\\{}", normalize(fqcn))
    }

    /// Fully qualified names to emit as `use` statements, sorted.
    pub fn imports(&self) -> Vec<&str> {
        let mut imports: Vec<&str> = self
            .file
            .iter()
            .flat_map(|f| f.imports.values().map(String::as_str))
            .collect();
        imports.sort_unstable_by_key(|s| s.to_ascii_lowercase());
        imports
    }

    /// The namespace of the file, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.file.as_ref().and_then(|f| f.namespace.as_deref())
    }

    pub fn is_file_scoped(&self) -> bool {
        self.file.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_uses_short_names() {
        let scope = NameScope::detached();
        assert_eq!(scope.resolve("\\Vendor\\Lib\\Thing"), "Thing");
        assert!(!scope.is_file_scoped());
    }

    #[test]
    fn test_same_namespace_is_short() {
        let scope = NameScope::file(Some("App\\Models"));
        assert_eq!(scope.resolve("App\\Models\\User"), "User");
        assert_eq!(scope.resolve("App\\Other\\User"), "\\App\\Other\\User");
        assert_eq!(scope.resolve("DateTime"), "\\DateTime");
    }

    #[test]
    fn test_global_file() {
        let scope = NameScope::file(None);
        assert_eq!(scope.resolve("\\DateTime"), "DateTime");
        assert_eq!(scope.resolve("App\\User"), "\\App\\User");
    }

    #[test]
    fn test_import() {
        let mut scope = NameScope::file(Some("App"));
        assert!(scope.import("Carbon\\Carbon"));
        assert!(scope.import("\\Carbon\\Carbon"));
        assert!(!scope.import("Other\\Carbon"));
        assert!(!scope.import("App\\User"));

        assert_eq!(scope.resolve("Carbon\\Carbon"), "Carbon");
        assert_eq!(scope.resolve("Other\\Carbon"), "\\Other\\Carbon");
        assert_eq!(scope.imports(), ["Carbon\\Carbon"]);
    }

    #[test]
    fn test_declared_names_block_imports() {
        let mut scope = NameScope::file(Some("App"));
        scope.declare("App\\Collection");
        assert!(!scope.import("Illuminate\\Support\\Collection"));
        assert_eq!(
            scope.resolve("Illuminate\\Support\\Collection"),
            "\\Illuminate\\Support\\Collection"
        );
    }

    #[test]
    fn test_imports_sorted() {
        let mut scope = NameScope::file(Some("App"));
        scope.import("Zed\\Last");
        scope.import("JsonSerializable");
        scope.import("Acme\\First");
        assert_eq!(scope.imports(), ["Acme\\First", "JsonSerializable", "Zed\\Last"]);
    }
}
