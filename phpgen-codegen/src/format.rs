//! Literal formatting for runtime values.

use phpgen_core::{Formatted, LineNode, Lines, RenderContext, Result};
use phpgen_ir::{ArrayKey, PhpArray, Value};

use crate::engine::{join, text};

/// Format `value` as a PHP expression.
///
/// Scalars come back inline; non-empty arrays and multi-line fragments as
/// line trees. Class references are spelled through the context's scope.
pub fn format_value(ctx: &RenderContext, value: &Value) -> Result<Formatted> {
    let formatted = match value {
        Value::Null => Formatted::from("null"),
        Value::Bool(true) => Formatted::from("true"),
        Value::Bool(false) => Formatted::from("false"),
        Value::Int(i) => Formatted::Inline(i.to_string()),
        Value::Float(x) => Formatted::Inline(format_float(*x)),
        Value::String(s) => Formatted::Inline(quote(s)),
        Value::Array(array) if array.is_empty() => Formatted::from("[]"),
        Value::Array(array) => Formatted::Lines(array_literal(ctx, array)?),
        Value::ClassRef(class) => Formatted::Inline(format!("{}::class", ctx.class_name(class.fqcn()))),
        Value::ClassConstant { class, name } => {
            Formatted::Inline(format!("{}::{}", ctx.class_name(class.fqcn()), name))
        }
        Value::Raw(expr) => Formatted::Inline(expr.clone()),
        Value::Fragment(fragment) => Formatted::Lines(fragment.to_lines(ctx)?),
    };
    Ok(formatted)
}

/// [`format_value`] as a line tree.
pub fn value_lines(ctx: &RenderContext, value: &Value) -> Result<Lines> {
    Ok(format_value(ctx, value)?.into_lines())
}

/// Render an array literal: `[`, one entry per line with a trailing comma,
/// `]`. Empty arrays render as `[]`.
///
/// The array is associative when any key is a string; then every entry is
/// written `key => value`. Otherwise entries are bare values.
pub fn array_literal(ctx: &RenderContext, array: &PhpArray) -> Result<Lines> {
    if array.is_empty() {
        return Ok(text("[]"));
    }
    let associative = array.is_associative();
    let mut entries = Lines::with_capacity(array.len());
    for (key, value) in array.iter() {
        let head = if associative {
            format!("{} => ", format_key(key))
        } else {
            String::new()
        };
        entries.extend(join(
            "array",
            [text(head), value_lines(ctx, value)?, text(",")],
        )?);
    }
    Ok(vec![
        LineNode::line("["),
        LineNode::Block(entries),
        LineNode::line("]"),
    ])
}

fn format_key(key: &ArrayKey) -> String {
    match key {
        ArrayKey::Int(i) => i.to_string(),
        ArrayKey::String(s) => quote(s),
    }
}

/// Decimal float text that always reads back as a float.
pub fn format_float(x: f64) -> String {
    if x.is_nan() {
        "NAN".to_string()
    } else if x.is_infinite() {
        if x > 0.0 { "INF" } else { "-INF" }.to_string()
    } else {
        // Debug keeps a fractional part (`1.0`) and switches to exponent
        // notation for very large or small magnitudes.
        format!("{:?}", x)
    }
}

/// Quote a string literal.
///
/// Single quotes with `\` and `'` escaped, unless the string holds control
/// characters: those cannot appear raw inside a line, so the string is
/// written double-quoted with escape sequences.
pub fn quote(s: &str) -> String {
    if s.chars().any(char::is_control) {
        return double_quote(s);
    }
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

fn double_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0b}' => out.push_str("\\v"),
            '\u{0c}' => out.push_str("\\f"),
            '\u{1b}' => out.push_str("\\e"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use phpgen_core::{NameScope, lines};
    use phpgen_ir::ClassName;

    use super::*;
    use crate::engine::flatten;

    fn inline(value: impl Into<Value>) -> String {
        let ctx = RenderContext::default();
        match format_value(&ctx, &value.into()).unwrap() {
            Formatted::Inline(s) => s,
            other => panic!("expected inline, got {:?}", other),
        }
    }

    #[test]
    fn test_scalars() {
        assert_eq!(inline(Value::Null), "null");
        assert_eq!(inline(true), "true");
        assert_eq!(inline(false), "false");
        assert_eq!(inline(-42), "-42");
        assert_eq!(inline(1.0), "1.0");
        assert_eq!(inline(0.25), "0.25");
        assert_eq!(inline(f64::NAN), "NAN");
        assert_eq!(inline(f64::NEG_INFINITY), "-INF");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(inline("plain"), "'plain'");
        assert_eq!(inline("it's"), "'it\\'s'");
        assert_eq!(inline("C:\\dir"), "'C:\\\\dir'");
        assert_eq!(inline("a\nb$c"), "\"a\\nb\\$c\"");
    }

    #[test]
    fn test_references() {
        let user = ClassName::parse("App\\Models\\User").unwrap();
        assert_eq!(inline(Value::class_ref(user.clone())), "User::class");
        assert_eq!(inline(Value::constant(user.clone(), "TABLE")), "User::TABLE");

        let ctx = RenderContext::default().with_scope(NameScope::file(Some("App")));
        let formatted = format_value(&ctx, &Value::class_ref(user)).unwrap();
        assert_eq!(formatted.as_inline(), Some("\\App\\Models\\User::class"));
    }

    #[test]
    fn test_raw_passthrough() {
        assert_eq!(inline(Value::raw("PHP_EOL")), "PHP_EOL");
    }

    #[test]
    fn test_associative_array() {
        let ctx = RenderContext::default();
        let array = PhpArray::new().with("a", 1).with("b", "x").with("c", true);
        let out = flatten(&ctx, &array_literal(&ctx, &array).unwrap(), 0).unwrap();
        assert_eq!(out, "[\n\t'a' => 1,\n\t'b' => 'x',\n\t'c' => true,\n]\n");
    }

    #[test]
    fn test_list_array() {
        let ctx = RenderContext::default();
        let lines = array_literal(&ctx, &PhpArray::from_iter([Value::from("x")])).unwrap();
        assert_eq!(lines, lines!["[", ["'x',"], "]"]);
    }

    #[test]
    fn test_mixed_keys_render_associative() {
        let ctx = RenderContext::default();
        let array = PhpArray::new().with(0, "zero").with("one", 1);
        let lines = array_literal(&ctx, &array).unwrap();
        assert_eq!(lines, lines!["[", ["0 => 'zero',", "'one' => 1,"], "]"]);
    }

    #[test]
    fn test_nested_arrays() {
        let ctx = RenderContext::default();
        let inner = PhpArray::from_iter([Value::from(1), Value::from(2)]);
        let array = PhpArray::new()
            .with("ids", inner)
            .with("empty", PhpArray::new());
        let out = flatten(&ctx, &array_literal(&ctx, &array).unwrap(), 0).unwrap();
        assert_eq!(
            out,
            "[\n\t'ids' => [\n\t\t1,\n\t\t2,\n\t],\n\t'empty' => [],\n]\n"
        );
    }
}
