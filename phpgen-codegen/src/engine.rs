//! Flattening and joining of line trees.
//!
//! Every composer builds its output from two primitives: [`append`], which
//! adds a fragment after existing lines, and [`join`], which glues the last
//! line of one fragment onto the first line of the next. [`flatten`] turns
//! the finished tree into indented text.

use phpgen_core::{Error, Formatted, LineNode, Lines, RenderContext, Result};

/// Accumulates flattened output at a moving indentation level.
struct CodeBuilder<'a> {
    ctx: &'a RenderContext,
    level: usize,
    buffer: String,
}

impl<'a> CodeBuilder<'a> {
    fn new(ctx: &'a RenderContext, level: usize) -> Self {
        Self {
            ctx,
            level,
            buffer: String::new(),
        }
    }

    fn push_line(&mut self, s: &str) {
        // Blank lines carry no indentation.
        if !s.is_empty() {
            self.buffer.push_str(&self.ctx.indent_unit().repeat(self.level));
            self.buffer.push_str(s);
        }
        self.buffer.push('\n');
    }

    fn emit(&mut self, node: &LineNode) -> Result<()> {
        match node {
            LineNode::Line(s) => self.push_line(s),
            LineNode::Block(lines) => {
                self.level += 1;
                for node in lines {
                    self.emit(node)?;
                }
                self.level -= 1;
            }
            LineNode::Fragment(fragment) => {
                let lines = fragment.to_lines(self.ctx)?;
                match lines.as_slice() {
                    [LineNode::Line(s)] => self.push_line(s),
                    _ => {
                        for node in &lines {
                            self.emit(node)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn build(self) -> String {
        self.buffer
    }
}

/// Flatten `lines` to text, top-level lines indented `level` times.
pub fn flatten(ctx: &RenderContext, lines: &[LineNode], level: usize) -> Result<String> {
    let mut builder = CodeBuilder::new(ctx, level);
    for node in lines {
        builder.emit(node)?;
    }
    Ok(builder.build())
}

/// Add `fragment` after `onto`: a string becomes one more line, a tree is
/// spliced in node by node.
pub fn append(onto: &mut Lines, fragment: impl Into<Formatted>) {
    match fragment.into() {
        Formatted::Inline(s) => onto.push(LineNode::Line(s)),
        Formatted::Lines(lines) => onto.extend(lines),
    }
}

/// One-line fragment.
pub fn text(s: impl Into<String>) -> Lines {
    vec![LineNode::Line(s.into())]
}

/// Concatenate `parts`, gluing the last line of each part onto the first
/// line of the next. Empty parts are skipped.
///
/// Fails with [`Error::InvalidCode`] (attributed to `composer`) when a glue
/// edge is a block or an unexpanded fragment.
pub fn join(composer: &'static str, parts: impl IntoIterator<Item = Lines>) -> Result<Lines> {
    let mut out = Lines::new();
    for part in parts {
        let mut nodes = part.into_iter();
        let Some(first) = nodes.next() else {
            continue;
        };
        match out.pop() {
            None => out.push(first),
            Some(LineNode::Line(head)) => match first {
                LineNode::Line(tail) => out.push(LineNode::Line(head + &tail)),
                _ => {
                    return Err(Error::invalid_code(
                        composer,
                        format!("cannot glue '{}' onto a nested block", head),
                    ));
                }
            },
            Some(_) => {
                return Err(Error::invalid_code(
                    composer,
                    "cannot glue onto the end of a nested block",
                ));
            }
        }
        out.extend(nodes);
    }
    Ok(out)
}

/// Glue `prefix` onto the first line of `lines`.
pub fn prefix_first(composer: &'static str, prefix: &str, lines: Lines) -> Result<Lines> {
    join(composer, [text(prefix), lines])
}

/// Glue `suffix` onto the last line of `lines`.
pub fn suffix_last(composer: &'static str, lines: Lines, suffix: &str) -> Result<Lines> {
    join(composer, [lines, text(suffix)])
}

/// Make sure the last physical line ends with `;`, descending into a
/// trailing block if needed.
pub fn terminate(lines: Lines) -> Result<Lines> {
    let mut lines = lines;
    match lines.last_mut() {
        None => return Err(Error::invalid_code("statement", "nothing to terminate")),
        Some(LineNode::Line(s)) => {
            if !s.ends_with(';') {
                s.push(';');
            }
        }
        Some(LineNode::Block(inner)) => {
            let inner_lines = std::mem::take(inner);
            *inner = terminate(inner_lines)?;
        }
        Some(LineNode::Fragment(_)) => {
            return Err(Error::invalid_code(
                "statement",
                "cannot terminate an unexpanded fragment",
            ));
        }
    }
    Ok(lines)
}

/// Replace every fragment node with its rendered lines, recursively.
pub fn expand(ctx: &RenderContext, lines: Lines) -> Result<Lines> {
    let mut out = Lines::with_capacity(lines.len());
    for node in lines {
        match node {
            LineNode::Line(_) => out.push(node),
            LineNode::Block(inner) => out.push(LineNode::Block(expand(ctx, inner)?)),
            LineNode::Fragment(fragment) => out.extend(expand(ctx, fragment.to_lines(ctx)?)?),
        }
    }
    Ok(out)
}

/// The text of `lines` if it is exactly one physical line.
pub fn single_line(lines: &[LineNode]) -> Option<&str> {
    match lines {
        [LineNode::Line(s)] => Some(s),
        _ => None,
    }
}

/// Whether the first and last nodes are plain lines, so both ends can be
/// glued.
pub fn has_open_ends(lines: &[LineNode]) -> bool {
    matches!(lines.first(), Some(LineNode::Line(_))) && matches!(lines.last(), Some(LineNode::Line(_)))
}

/// Separate groups of lines with one blank line, skipping empty groups.
pub fn separated(groups: impl IntoIterator<Item = Lines>) -> Lines {
    let mut out = Lines::new();
    for group in groups.into_iter().filter(|g| !g.is_empty()) {
        if !out.is_empty() {
            out.push(LineNode::blank());
        }
        out.extend(group);
    }
    out
}

#[cfg(test)]
mod tests {
    use phpgen_core::{Indent, ToLines, lines};

    use super::*;

    #[derive(Debug)]
    struct Pair;

    impl ToLines for Pair {
        fn to_lines(&self, _ctx: &RenderContext) -> Result<Lines> {
            Ok(lines!["first();", "second();"])
        }
    }

    #[derive(Debug)]
    struct One;

    impl ToLines for One {
        fn to_lines(&self, _ctx: &RenderContext) -> Result<Lines> {
            Ok(lines!["only();"])
        }
    }

    #[test]
    fn test_flatten_indents_per_level() {
        let ctx = RenderContext::default();
        let tree = lines!["a", ["b", ["c"], "d"], "e"];
        for level in 0..3 {
            let out = flatten(&ctx, &tree, level).unwrap();
            let depths: Vec<usize> = out
                .lines()
                .map(|l| l.len() - l.trim_start_matches('\t').len())
                .collect();
            assert_eq!(
                depths,
                vec![level, level + 1, level + 2, level + 1, level],
                "level {}",
                level
            );
        }
    }

    #[test]
    fn test_flatten_blank_lines_have_no_indent() {
        let ctx = RenderContext::default();
        let out = flatten(&ctx, &lines![["a", "", "b"]], 1).unwrap();
        assert_eq!(out, "\t\ta\n\n\t\tb\n");
    }

    #[test]
    fn test_flatten_custom_unit() {
        let ctx = RenderContext::new().indent(Indent::new("--"));
        let out = flatten(&ctx, &lines!["x", ["y"]], 0).unwrap();
        assert_eq!(out, "x\n--y\n");
    }

    #[test]
    fn test_flatten_expands_fragments() {
        let ctx = RenderContext::default();
        let tree = vec![
            LineNode::line("{"),
            LineNode::block(vec![LineNode::fragment(One), LineNode::fragment(Pair)]),
            LineNode::line("}"),
        ];
        let out = flatten(&ctx, &tree, 0).unwrap();
        assert_eq!(out, "{\n\tonly();\n\tfirst();\n\tsecond();\n}\n");
    }

    #[test]
    fn test_append() {
        let mut lines = lines!["a"];
        append(&mut lines, "b");
        append(&mut lines, lines!["c", ["d"]]);
        assert_eq!(lines, lines!["a", "b", "c", ["d"]]);
    }

    #[test]
    fn test_join_glues_edges() {
        let joined = join(
            "test",
            [text("return "), lines!["[", ["1,"], "]"], text(";")],
        )
        .unwrap();
        assert_eq!(joined, lines!["return [", ["1,"], "];"]);
    }

    #[test]
    fn test_join_skips_empty_parts() {
        let joined = join("test", [Lines::new(), text("a"), Lines::new(), text("b")]).unwrap();
        assert_eq!(joined, lines!["ab"]);
    }

    #[test]
    fn test_join_rejects_block_edges() {
        let err = suffix_last("return", lines!["x", ["y"]], ";").unwrap_err();
        assert!(matches!(err, Error::InvalidCode { composer: "return", .. }));

        let err = prefix_first("assign", "$a = ", lines![["y"]]).unwrap_err();
        assert!(matches!(err, Error::InvalidCode { composer: "assign", .. }));
    }

    #[test]
    fn test_terminate() {
        assert_eq!(terminate(lines!["foo()"]).unwrap(), lines!["foo();"]);
        assert_eq!(terminate(lines!["foo();"]).unwrap(), lines!["foo();"]);
        assert_eq!(
            terminate(lines!["foo(", ["bar"]]).unwrap(),
            lines!["foo(", ["bar;"]]
        );
        assert!(terminate(Lines::new()).is_err());
        assert!(terminate(vec![LineNode::fragment(One)]).is_err());
    }

    #[test]
    fn test_expand() {
        let ctx = RenderContext::default();
        let tree = vec![LineNode::block(vec![LineNode::fragment(Pair)])];
        assert_eq!(
            expand(&ctx, tree).unwrap(),
            lines![["first();", "second();"]]
        );
    }

    #[test]
    fn test_separated() {
        let out = separated([lines!["a"], Lines::new(), lines!["b", "c"]]);
        assert_eq!(out, lines!["a", "", "b", "c"]);
    }
}
