//! Whole files: header, namespace, imports and declarations.

use phpgen_core::{LineNode, Lines, NameScope, Result};
use phpgen_ir::PhpFile;
use tracing::debug;

use super::Renderer;
use crate::{engine::separated, imports::UseCollector};

pub(super) fn render_file(r: &Renderer, file: &PhpFile) -> Result<Lines> {
    let namespace = file.namespace.as_deref();
    let mut scope = NameScope::file(namespace);
    for declaration in &file.declarations {
        scope.declare(declaration.name().fqcn());
    }
    let mut uses = UseCollector::new();
    uses.collect_file(file);
    let imported = uses.import_into(&mut scope);
    debug!(
        namespace = namespace.unwrap_or(""),
        referenced = uses.len(),
        imported,
        "resolved file imports"
    );

    let r = r.scoped(scope);
    let mut groups = vec![vec![LineNode::line("<?php")]];
    if let Some(doc) = &file.doc {
        groups.push(r.render_doc(doc));
    }
    if file.strict_types {
        groups.push(vec![LineNode::line("declare(strict_types=1);")]);
    }
    if let Some(namespace) = namespace {
        groups.push(vec![LineNode::Line(format!("namespace {};", namespace))]);
    }
    groups.push(
        r.context()
            .scope()
            .imports()
            .into_iter()
            .map(|fqcn| LineNode::Line(format!("use {};", fqcn)))
            .collect(),
    );
    for declaration in &file.declarations {
        groups.push(r.render_declaration(declaration)?);
    }
    Ok(separated(groups))
}
