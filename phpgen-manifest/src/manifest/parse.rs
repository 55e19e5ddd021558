//! Manifest parsing from files and strings.

use std::{path::Path, str::FromStr};

use tracing::debug;

use super::Manifest;
use crate::{Error, Result, error::SourceContext, validate::ParseContext};

impl FromStr for Manifest {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        parse_manifest(s, "phpgen.toml")
    }
}

impl Manifest {
    /// Parse a phpgen.toml file from the given path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        parse_manifest(&content, &path.display().to_string())
    }

    /// Parse a phpgen.toml from a string with a custom filename for error reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        parse_manifest(content, filename)
    }
}

/// Parse a manifest from content with the given filename for error reporting.
pub fn parse_manifest(content: &str, filename: &str) -> Result<Manifest> {
    let source_ctx = SourceContext::new(content, filename);
    let manifest: Manifest = toml::from_str(content).map_err(|e| source_ctx.parse_error(e))?;
    ParseContext::new(content, filename).validate_manifest(&manifest)?;
    debug!(
        filename,
        declarations = manifest.declaration_count(),
        target = %manifest.project.target,
        "parsed manifest"
    );
    Ok(manifest)
}
