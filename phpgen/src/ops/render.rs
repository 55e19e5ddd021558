//! Render operation - write or preview PHP files.

use std::path::Path;

use eyre::{Context, Result};
use phpgen_manifest::Project;

use crate::reports::{GenerationResult, PreviewFile, RenderReport, WrittenResult};

/// Execute the render operation.
///
/// Writes one file per declaration below `output`, or only renders them
/// when `dry_run` is set.
pub fn render(project: &Project, output: &Path, dry_run: bool) -> Result<RenderReport> {
    let generator = project.generator();

    let result = if dry_run {
        let files = generator
            .preview()
            .wrap_err("Failed to render declarations")?
            .into_iter()
            .map(|file| PreviewFile {
                path: file.path().to_path_buf(),
                content: file.content().to_string(),
            })
            .collect();
        GenerationResult::Preview(files)
    } else {
        let generated = generator
            .generate(output)
            .wrap_err_with(|| format!("Failed to generate into {}", output.display()))?;
        GenerationResult::Written(WrittenResult {
            output_dir: output.to_path_buf(),
            files: generated.written,
        })
    };

    Ok(RenderReport {
        target: project.target,
        namespace: project.namespace.clone(),
        declarations: project
            .declarations
            .iter()
            .map(|d| (d.kind(), d.name().fqcn().to_string()))
            .collect(),
        result,
    })
}

#[cfg(test)]
mod tests {
    use phpgen_core::PhpVersion;
    use phpgen_manifest::Manifest;
    use tempfile::TempDir;

    use super::*;

    const MANIFEST: &str = r#"
[project]
namespace = "Acme"

[classes."Billing\\Invoice"]
final = true

[classes."Billing\\Invoice".properties.total]
type = "int"
promote = true

[interfaces.Payable.methods.pay]
returns = "void"
"#;

    fn project(target: PhpVersion) -> Project {
        let manifest: Manifest = MANIFEST.parse().unwrap();
        manifest.lower(target).unwrap()
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let report = render(&project(PhpVersion::Php80), dir.path(), true).unwrap();

        let GenerationResult::Preview(files) = report.result else {
            panic!("expected a preview");
        };
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, Path::new("Billing/Invoice.php"));
        assert!(files[0].content.contains("public function __construct(private int $total)"));
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_render_writes_files() {
        let dir = TempDir::new().unwrap();
        let report = render(&project(PhpVersion::Php74), dir.path(), false).unwrap();

        assert_eq!(
            report.declarations,
            [
                ("class", "Acme\\Billing\\Invoice".to_string()),
                ("interface", "Acme\\Payable".to_string()),
            ]
        );
        let GenerationResult::Written(written) = report.result else {
            panic!("expected written files");
        };
        assert_eq!(written.files.len(), 2);
        let invoice = std::fs::read_to_string(dir.path().join("Billing/Invoice.php")).unwrap();
        assert!(invoice.contains("$this->total = $total;"));
    }
}
