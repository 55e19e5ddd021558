//! Turning declarations into files on disk.

use std::path::{Path, PathBuf};

use eyre::WrapErr;
use phpgen_core::{OutputFile, Result};
use phpgen_ir::{ClassName, Declaration, PhpFile};
use tracing::info;

use crate::render::Renderer;

/// Paths written by [`Generator::generate`], relative to the output
/// directory.
#[derive(Debug, Default)]
pub struct GenerateResult {
    pub written: Vec<PathBuf>,
}

/// Renders one file per declaration, laid out PSR-4 style: the root
/// namespace maps to the output directory and every further namespace
/// segment is a subdirectory.
#[derive(Debug, Clone)]
pub struct Generator {
    renderer: Renderer,
    root_namespace: Option<String>,
    strict_types: bool,
    declarations: Vec<Declaration>,
}

impl Generator {
    pub fn new(renderer: Renderer) -> Self {
        Self {
            renderer,
            root_namespace: None,
            strict_types: false,
            declarations: Vec::new(),
        }
    }

    /// The namespace that maps to the output directory itself.
    pub fn root_namespace(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let namespace = namespace.trim_matches('\\');
        self.root_namespace = (!namespace.is_empty()).then(|| namespace.to_string());
        self
    }

    /// Emit `declare(strict_types=1);` in every file.
    pub fn strict_types(mut self, strict: bool) -> Self {
        self.strict_types = strict;
        self
    }

    pub fn declare(mut self, declaration: impl Into<Declaration>) -> Self {
        self.declarations.push(declaration.into());
        self
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Where the file for `name` goes, relative to the output directory.
    pub fn path_for(&self, name: &ClassName) -> PathBuf {
        let namespace = name.namespace().unwrap_or("");
        let relative = match &self.root_namespace {
            Some(root) if namespace == root => "",
            Some(root) => namespace
                .strip_prefix(root.as_str())
                .and_then(|rest| rest.strip_prefix('\\'))
                .unwrap_or(namespace),
            None => namespace,
        };
        let mut path: PathBuf = relative.split('\\').filter(|s| !s.is_empty()).collect();
        path.push(format!("{}.php", name.short()));
        path
    }

    /// Render every file without touching the disk.
    pub fn preview(&self) -> Result<Vec<OutputFile>> {
        self.declarations
            .iter()
            .map(|declaration| {
                let file =
                    PhpFile::for_declaration(declaration.clone()).strict_types(self.strict_types);
                let content = self.renderer.render(&file)?;
                Ok(OutputFile::new(self.path_for(declaration.name()), content))
            })
            .collect()
    }

    /// Render and write every file below `output_dir`.
    pub fn generate(&self, output_dir: &Path) -> eyre::Result<GenerateResult> {
        let files = self
            .preview()
            .wrap_err("failed to render declarations")?;
        let mut result = GenerateResult::default();
        for file in files {
            file.write(output_dir)?;
            result.written.push(file.path().to_path_buf());
        }
        info!(
            written = result.written.len(),
            output = %output_dir.display(),
            version = %self.renderer.version(),
            "generated PHP sources"
        );
        Ok(result)
    }
}
