//! Argument-list layout shared by calls and instantiations.

use phpgen_core::{LineNode, Lines, RenderContext, Result};
use phpgen_ir::Value;
use tracing::debug;

use crate::{
    engine::{expand, has_open_ends, join, single_line, suffix_last, text},
    format::value_lines,
};

/// Render `opener(args...)`.
///
/// - no arguments: `opener()`;
/// - every argument on one line: inline when the whole line fits,
///   otherwise exploded;
/// - only the last argument spans several lines: hugged, so its first
///   line opens on the call line and the closing `)` lands on its last
///   line, provided the opening line fits;
/// - anything else: exploded.
///
/// An exploded list puts each argument in a block with a trailing comma
/// and the closing `)` on its own line.
pub fn argument_list(ctx: &RenderContext, opener: &str, args: &[Value]) -> Result<Lines> {
    if args.is_empty() {
        return Ok(text(format!("{}()", opener)));
    }
    let rendered = args
        .iter()
        .map(|arg| expand(ctx, value_lines(ctx, arg)?))
        .collect::<Result<Vec<_>>>()?;

    if let Some(parts) = rendered
        .iter()
        .map(|lines| single_line(lines))
        .collect::<Option<Vec<_>>>()
    {
        let line = format!("{}({})", opener, parts.join(", "));
        if ctx.fits(&line) {
            return Ok(text(line));
        }
        debug!(call = opener, width = line.chars().count(), "argument list too long, exploding");
        return explode(opener, rendered);
    }

    if let Some((last, init)) = rendered.split_last()
        && has_open_ends(last)
        && let Some(head) = init
            .iter()
            .map(|lines| single_line(lines).map(|s| format!("{}, ", s)))
            .collect::<Option<String>>()
    {
        let open = format!("{}({}", opener, head);
        let first = last.first().and_then(LineNode::as_line).unwrap_or_default();
        if ctx.fits(&format!("{}{}", open, first)) {
            return join("call", [text(open), last.clone(), text(")")]);
        }
    }

    debug!(call = opener, args = rendered.len(), "multi-line arguments, exploding");
    explode(opener, rendered)
}

fn explode(opener: &str, rendered: Vec<Lines>) -> Result<Lines> {
    let mut block = Lines::new();
    for arg in rendered {
        block.extend(suffix_last("call", arg, ",")?);
    }
    Ok(vec![
        LineNode::Line(format!("{}(", opener)),
        LineNode::Block(block),
        LineNode::line(")"),
    ])
}
