//! Render command report data structures.

use std::path::PathBuf;

use phpgen_core::PhpVersion;

use super::output::{Output, Report};

/// Report data from rendering a manifest.
#[derive(Debug)]
pub struct RenderReport {
    /// Target version the files were rendered for.
    pub target: PhpVersion,
    /// Root namespace, if any.
    pub namespace: Option<String>,
    /// `(kind, fully qualified name)` of every declaration.
    pub declarations: Vec<(&'static str, String)>,
    /// Files written or previewed.
    pub result: GenerationResult,
}

/// Result of rendering.
#[derive(Debug)]
pub enum GenerationResult {
    /// Files were written to disk.
    Written(WrittenResult),
    /// Dry-run preview.
    Preview(Vec<PreviewFile>),
}

/// Result when files were written to disk.
#[derive(Debug)]
pub struct WrittenResult {
    /// Output directory.
    pub output_dir: PathBuf,
    /// Written paths, relative to the output directory.
    pub files: Vec<PathBuf>,
}

/// A file in preview mode.
#[derive(Debug)]
pub struct PreviewFile {
    pub path: PathBuf,
    pub content: String,
}

impl Report for RenderReport {
    fn render(&self, out: &mut dyn Output) {
        match &self.result {
            GenerationResult::Preview(files) => {
                for file in files {
                    out.divider(&file.path.display().to_string());
                    out.preformatted(&file.content);
                }
                out.divider("Summary");
                out.preformatted(&format!(
                    "{} files would be generated for {}",
                    files.len(),
                    self.target
                ));
            }
            GenerationResult::Written(written) => {
                let namespace = self.namespace.as_deref().unwrap_or("(global)");
                out.preformatted(&format!("{} → {}", namespace, self.target));
                out.newline();
                out.section(&format!("Declarations ({})", self.declarations.len()));
                for (kind, name) in &self.declarations {
                    out.list_item(&format!("{} {}", kind, name));
                }
                out.newline();
                out.section(&format!("Written to {}", written.output_dir.display()));
                for path in &written.files {
                    out.added_item(&path.display().to_string());
                }
            }
        }
    }
}
