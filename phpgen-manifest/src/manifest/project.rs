use std::path::PathBuf;

use phpgen_core::{
    DEFAULT_MAX_INLINE_PARAMS, DEFAULT_MAX_LINE_LENGTH, Indent, PhpVersion, RenderContext,
};
use serde::Deserialize;

/// `[project]`: what to generate and where.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Target PHP version, e.g. `"8.1"`
    #[serde(default)]
    pub target: PhpVersion,
    /// Root namespace of the generated declarations
    pub namespace: Option<String>,
    /// Directory the root namespace maps to
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,
    /// Emit `declare(strict_types=1);`
    #[serde(default)]
    pub strict_types: bool,
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("src")
}

/// Indent unit: a string (`"\t"`) or a number of spaces.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IndentConfig {
    Spaces(usize),
    Text(String),
}

impl Default for IndentConfig {
    fn default() -> Self {
        Self::Text("\t".to_string())
    }
}

impl IndentConfig {
    pub fn to_indent(&self) -> Indent {
        match self {
            Self::Spaces(width) => Indent::spaces(*width),
            Self::Text(text) => Indent::new(text.clone()),
        }
    }
}

/// `[format]`: layout settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatConfig {
    #[serde(default)]
    pub indent: IndentConfig,
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
    #[serde(default = "default_max_inline_params")]
    pub max_inline_params: usize,
}

fn default_max_line_length() -> usize {
    DEFAULT_MAX_LINE_LENGTH
}

fn default_max_inline_params() -> usize {
    DEFAULT_MAX_INLINE_PARAMS
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent: IndentConfig::default(),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            max_inline_params: DEFAULT_MAX_INLINE_PARAMS,
        }
    }
}

impl FormatConfig {
    /// The render context these settings describe.
    pub fn context(&self) -> RenderContext {
        RenderContext::new()
            .indent(self.indent.to_indent())
            .max_line_length(self.max_line_length)
            .max_inline_params(self.max_inline_params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_defaults() {
        let ctx = FormatConfig::default().context();
        assert_eq!(ctx, RenderContext::default());
    }

    #[test]
    fn test_indent_forms() {
        let format: FormatConfig = toml::from_str("indent = 4").unwrap();
        assert_eq!(format.context().indent_unit(), &Indent::PSR12);

        let format: FormatConfig = toml::from_str("indent = \"  \"\nmax_line_length = 80").unwrap();
        assert_eq!(format.context().indent_unit().as_str(), "  ");
        assert_eq!(format.context().line_limit(), 80);
    }

    #[test]
    fn test_project_defaults() {
        let project: ProjectConfig = toml::from_str("namespace = 'App'").unwrap();
        assert_eq!(project.target, PhpVersion::Php81);
        assert_eq!(project.source_dir, PathBuf::from("src"));
        assert!(!project.strict_types);
    }
}
