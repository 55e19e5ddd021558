//! Doc-comments.

use crate::PhpType;

/// A single `@tag value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTag {
    pub name: String,
    pub value: String,
}

impl DocTag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().trim_start_matches('@').to_string(),
            value: value.into(),
        }
    }
}

/// A `/** ... */` block: free text followed by tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocComment {
    text: Vec<String>,
    tags: Vec<DocTag>,
    /// `@var` naming a type whose spelling depends on the file it ends up in.
    var_type: Option<PhpType>,
}

impl DocComment {
    pub fn new() -> Self {
        Self::default()
    }

    /// A comment holding only `text` (may span several lines).
    pub fn text(text: impl AsRef<str>) -> Self {
        Self::new().line(text)
    }

    /// Append text lines. Embedded newlines split into several lines.
    pub fn line(mut self, text: impl AsRef<str>) -> Self {
        self.text.extend(text.as_ref().lines().map(str::to_string));
        self
    }

    /// Append a tag.
    pub fn tag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push(DocTag::new(name, value));
        self
    }

    /// `@var Type`
    pub fn var(self, hint: impl Into<String>) -> Self {
        self.tag("var", hint)
    }

    /// `@var` for `ty`, spelled by [`DocComment::spelled`] at render time.
    pub fn var_type(mut self, ty: PhpType) -> Self {
        self.var_type = Some(ty);
        self
    }

    pub fn typed_var(&self) -> Option<&PhpType> {
        self.var_type.as_ref()
    }

    /// A copy whose typed `@var` is written out with `spell`, ahead of the
    /// other tags.
    pub fn spelled(&self, spell: impl Fn(&PhpType) -> String) -> Self {
        let mut doc = Self {
            text: self.text.clone(),
            tags: Vec::with_capacity(self.tags.len() + 1),
            var_type: None,
        };
        if let Some(ty) = &self.var_type {
            doc.tags.push(DocTag::new("var", spell(ty)));
        }
        doc.tags.extend(self.tags.iter().cloned());
        doc
    }

    /// `@param Type $name`
    pub fn param(self, hint: impl AsRef<str>, name: impl AsRef<str>) -> Self {
        let value = format!("{} ${}", hint.as_ref(), name.as_ref());
        self.tag("param", value)
    }

    /// `@return Type`
    pub fn returns(self, hint: impl Into<String>) -> Self {
        self.tag("return", hint)
    }

    pub fn text_lines(&self) -> &[String] {
        &self.text
    }

    pub fn tags(&self) -> &[DocTag] {
        &self.tags
    }

    pub fn has_tag(&self, name: &str) -> bool {
        (name == "var" && self.var_type.is_some()) || self.tags.iter().any(|t| t.name == name)
    }

    /// Whether a `@param` tag already documents `$name`.
    pub fn has_param(&self, name: &str) -> bool {
        let var = format!("${}", name);
        self.tags
            .iter()
            .filter(|t| t.name == "param")
            .any(|t| t.value.split_whitespace().any(|word| word == var || word == format!("...{}", var)))
    }

    /// A copy without any tag called `name`.
    pub fn without_tag(&self, name: &str) -> Self {
        Self {
            text: self.text.clone(),
            tags: self.tags.iter().filter(|t| t.name != name).cloned().collect(),
            var_type: self.var_type.clone().filter(|_| name != "var"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.iter().all(|l| l.trim().is_empty())
            && self.tags.is_empty()
            && self.var_type.is_none()
    }
}
