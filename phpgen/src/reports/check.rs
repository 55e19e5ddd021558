//! Check command report data structures.

use std::path::PathBuf;

use phpgen_core::PhpVersion;

use super::output::{Output, Report};

/// Report data from manifest validation.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the config file.
    pub config_path: PathBuf,
    /// Target version the manifest was checked against.
    pub target: PhpVersion,
    /// Declaration counts.
    pub stats: Stats,
    /// Number of files a render would produce.
    pub files: usize,
    /// Things that render differently than declared on this target.
    pub warnings: Vec<String>,
}

/// Declaration counts.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub classes: usize,
    pub interfaces: usize,
    pub traits: usize,
    pub enums: usize,
    /// Entries under `[types]`.
    pub types: usize,
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for warning in &self.warnings {
            out.warning(warning);
        }
        if !self.warnings.is_empty() {
            out.newline();
        }

        out.preformatted(&format!(
            "✓ {} is valid for {}",
            self.config_path.display(),
            self.target
        ));
        out.newline();
        out.key_value_indented("classes", &self.stats.classes.to_string());
        out.key_value_indented("interfaces", &self.stats.interfaces.to_string());
        out.key_value_indented("traits", &self.stats.traits.to_string());
        out.key_value_indented("enums", &self.stats.enums.to_string());
        out.key_value_indented("external types", &self.stats.types.to_string());
        out.key_value_indented("files", &self.files.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::BufferOutput;

    #[test]
    fn test_warnings_come_first() {
        let report = CheckReport {
            config_path: PathBuf::from("phpgen.toml"),
            target: PhpVersion::Php74,
            stats: Stats {
                enums: 1,
                ..Stats::default()
            },
            files: 1,
            warnings: vec!["enum 'App\\Status' is emulated with a final class".to_string()],
        };
        let mut out = BufferOutput::default();
        report.render(&mut out);

        assert_eq!(
            out.lines[0],
            "warning: enum 'App\\Status' is emulated with a final class"
        );
        assert_eq!(out.lines[2], "✓ phpgen.toml is valid for PHP 7.4");
        assert!(out.lines.contains(&"  enums: 1".to_string()));
    }
}
