//! Check operation - manifest validation.

use std::path::Path;

use eyre::{Context, Result};
use phpgen_core::PhpVersion;
use phpgen_ir::Declaration;
use phpgen_manifest::{Manifest, Project};

use crate::reports::{CheckReport, Stats};

/// Execute the check operation.
///
/// The manifest has already been parsed, validated and lowered; this
/// renders every file in memory and collects what will look different on
/// the target than it was declared.
pub fn check(manifest: &Manifest, project: &Project, config_path: &Path) -> Result<CheckReport> {
    let files = project
        .generator()
        .preview()
        .wrap_err("Validation failed")?;

    let warnings = project
        .declarations
        .iter()
        .flat_map(|declaration| downgrades(declaration, project.target))
        .collect();

    Ok(CheckReport {
        config_path: config_path.to_path_buf(),
        target: project.target,
        stats: Stats {
            classes: manifest.classes.len(),
            interfaces: manifest.interfaces.len(),
            traits: manifest.traits.len(),
            enums: manifest.enums.len(),
            types: manifest.types.len(),
        },
        files: files.len(),
        warnings,
    })
}

/// Features of `declaration` the target can only approximate.
fn downgrades(declaration: &Declaration, target: PhpVersion) -> Vec<String> {
    let mut warnings = Vec::new();
    match declaration {
        Declaration::Enum(e) if target < PhpVersion::Php81 => {
            warnings.push(format!(
                "enum '{}' is emulated with a final class on {}",
                e.name, target
            ));
        }
        Declaration::Class(class) => {
            if class.readonly && target < PhpVersion::Php82 {
                warnings.push(format!(
                    "readonly class '{}' needs PHP 8.2; {}",
                    class.name,
                    if target < PhpVersion::Php81 {
                        "readonly is dropped"
                    } else {
                        "its properties are marked readonly instead"
                    }
                ));
            }
            if target < PhpVersion::Php81 {
                for property in class.members.properties.values() {
                    if property.readonly && !class.readonly {
                        warnings.push(format!(
                            "readonly on '{}::${}' is not enforced before PHP 8.1",
                            class.name.short(),
                            property.name
                        ));
                    }
                }
            }
        }
        _ => {}
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
[project]
namespace = "App"

[classes.Point]
readonly = true

[classes.Point.properties.x]
type = "int"
promote = true

[classes.Money.properties.amount]
type = "int"
readonly = true

[enums.Suit]
cases = ["Hearts", "Spades"]
"#;

    fn run(target: PhpVersion) -> CheckReport {
        let manifest: Manifest = MANIFEST.parse().unwrap();
        let project = manifest.lower(target).unwrap();
        check(&manifest, &project, Path::new("phpgen.toml")).unwrap()
    }

    #[test]
    fn test_stats() {
        let report = run(PhpVersion::Php82);
        assert_eq!(
            report.stats,
            Stats {
                classes: 2,
                enums: 1,
                ..Stats::default()
            }
        );
        assert_eq!(report.files, 3);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_downgrade_warnings() {
        let report = run(PhpVersion::Php74);
        assert_eq!(
            report.warnings,
            [
                "readonly class 'App\\Point' needs PHP 8.2; readonly is dropped",
                "readonly on 'Money::$amount' is not enforced before PHP 8.1",
                "enum 'App\\Suit' is emulated with a final class on PHP 7.4",
            ]
        );
    }

    #[test]
    fn test_readonly_class_on_81() {
        let report = run(PhpVersion::Php81);
        assert_eq!(
            report.warnings,
            ["readonly class 'App\\Point' needs PHP 8.2; its properties are marked readonly instead"]
        );
    }
}
