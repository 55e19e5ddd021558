//! End-to-end: phpgen.toml in, PHP out.

use std::fs;

use phpgen_core::PhpVersion;
use phpgen_manifest::{Error, Manifest, PhpgenToml};
use tempfile::TempDir;

const MANIFEST: &str = r#"
[project]
target = "8.1"
namespace = "App"
strict_types = true

[format]
indent = 4

[classes.Tag]
final = true
json_serialize = true

[classes.Tag.properties.label]
type = "string"
readonly = true
promote = true

[classes."Models\\Post"]
getters = true
json_serialize = true

[classes."Models\\Post".properties.id]
type = "int"
readonly = true
promote = true

[classes."Models\\Post".properties.tags]
type = "Tag[]"
default = []

[enums.Visibility]
backing = "string"
cases = { Draft = "draft", Published = "published" }
"#;

fn render_all(manifest: &Manifest, target: PhpVersion) -> Vec<String> {
    let project = manifest.lower(target).unwrap();
    project
        .generator()
        .preview()
        .unwrap()
        .into_iter()
        .map(|file| format!("// {}\n{}", file.path().display(), file.content()))
        .collect()
}

#[test]
fn test_render_php81() {
    let manifest: Manifest = MANIFEST.parse().unwrap();
    let files = render_all(&manifest, manifest.project.target);
    assert_eq!(files.len(), 3);
    insta::assert_snapshot!(files[0], @r"
// Tag.php
<?php

declare(strict_types=1);

namespace App;

use JsonSerializable;

final class Tag implements JsonSerializable
{
    public function __construct(private readonly string $label)
    {
    }

    public function jsonSerialize(): array
    {
        return [
            'label' => $this->label,
        ];
    }
}
");
}

#[test]
fn test_render_emulated_enum_php74() {
    let manifest: Manifest = MANIFEST.parse().unwrap();
    let files = render_all(&manifest, PhpVersion::Php74);
    assert!(files[2].starts_with("// Visibility.php\n<?php"));
    assert!(files[2].contains("final class Visibility implements JsonSerializable"));
    assert!(files[2].contains("public static function from(string $value): self"));
    assert!(!files[2].contains("enum Visibility"));
}

#[test]
fn test_generate_writes_psr4_tree() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("phpgen.toml");
    fs::write(&path, MANIFEST).unwrap();

    let toml = PhpgenToml::open(&path).unwrap();
    let project = toml.manifest().lower(PhpVersion::Php81).unwrap();
    let output = toml.base_dir().join(&project.source_dir);
    let result = project.generator().generate(&output).unwrap();

    assert_eq!(result.written.len(), 3);
    assert!(output.join("Tag.php").exists());
    assert!(output.join("Models/Post.php").exists());
    assert!(output.join("Visibility.php").exists());

    let post = fs::read_to_string(output.join("Models/Post.php")).unwrap();
    assert!(post.contains("namespace App\\Models;"));
    assert!(post.contains("use App\\Tag;"));
    assert!(post.contains("public function getTags(): array"));

    let preview = project.generator().preview().unwrap();
    let tag = preview.iter().find(|f| f.path().ends_with("Tag.php")).unwrap();
    assert_eq!(fs::read_to_string(output.join("Tag.php")).unwrap(), tag.content());
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = PhpgenToml::open(dir.path().join("phpgen.toml")).unwrap_err();
    assert!(matches!(*err, Error::Io { .. }));
}

#[test]
fn test_parse_error_has_span() {
    let err = "[project\nnamespace = 'App'".parse::<Manifest>().unwrap_err();
    let Error::Parse { span, .. } = *err else {
        panic!("expected a parse error");
    };
    assert!(span.is_some());
}

#[test]
fn test_unknown_field_is_rejected() {
    let err = "[project]\nnamspace = 'App'".parse::<Manifest>().unwrap_err();
    assert!(matches!(*err, Error::Parse { .. }));
}

#[test]
fn test_invalid_property_name() {
    let err = r#"
[project]

[classes.User.properties."first-name"]
type = "string"
"#
    .parse::<Manifest>()
    .unwrap_err();
    let Error::InvalidName { name, context, .. } = *err else {
        panic!("expected an invalid name error");
    };
    assert_eq!(name, "first-name");
    assert_eq!(context, "property in 'classes.User'");
}

#[test]
fn test_reserved_class_name() {
    let err = "[project]\n\n[classes.List]\n".parse::<Manifest>().unwrap_err();
    assert!(matches!(*err, Error::InvalidName { .. }));
}

#[test]
fn test_invalid_type() {
    let err = r#"
[project]

[classes.User.properties.id]
type = "int|"
"#
    .parse::<Manifest>()
    .unwrap_err();
    let Error::InvalidType { ty, span, .. } = *err else {
        panic!("expected an invalid type error");
    };
    assert_eq!(ty, "int|");
    assert!(span.is_some());
}

#[test]
fn test_enum_values_must_match_backing() {
    let err = r#"
[project]

[enums.Level]
backing = "int"
cases = { Low = "low" }
"#
    .parse::<Manifest>()
    .unwrap_err();
    assert_eq!(err.to_string(), "case 'Low' needs a int value");
}

#[test]
fn test_duplicate_declaration() {
    let err = r#"
[project]

[classes.Status]

[enums.Status]
cases = ["On", "Off"]
"#
    .parse::<Manifest>()
    .unwrap_err();
    assert_eq!(err.to_string(), "'Status' is declared more than once");
}

#[test]
fn test_static_promotion_is_rejected() {
    let err = r#"
[project]

[classes.Counter.properties.count]
type = "int"
static = true
promote = true
"#
    .parse::<Manifest>()
    .unwrap_err();
    assert_eq!(err.to_string(), "static property 'count' cannot be promoted");
}

#[test]
fn test_case_clashing_with_emulated_method_is_rejected() {
    let err = r#"
[project]

[enums.Source]
backing = "string"
cases = { From = "from", To = "to" }
"#
    .parse::<Manifest>()
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "case 'From' clashes with the generated 'from()' method used before PHP 8.1"
    );

    let err = "[project]\n\n[enums.Toggle]\ncases = [\"On\", \"ON\"]\n"
        .parse::<Manifest>()
        .unwrap_err();
    assert!(matches!(*err, Error::Validation { .. }));
}
