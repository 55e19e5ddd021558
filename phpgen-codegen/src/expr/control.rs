//! Loops and conditionals.

use std::{fmt, rc::Rc};

use phpgen_core::{LineNode, Lines, RenderContext, Result, ToLines};
use phpgen_ir::Value;

use super::Variable;
use crate::{
    engine::{expand, join, text},
    format::value_lines,
};

type LoopBody = Rc<dyn Fn(&Variable, &Variable) -> Lines>;

/// `foreach (<iterable> as $key => $value) { ... }`
///
/// The body is built by a closure that receives the loop variables. With a
/// prefix `item` they are named `$itemKey` and `$itemValue`, so nested
/// loops do not collide.
#[derive(Clone)]
pub struct Foreach {
    iterable: Value,
    prefix: Option<String>,
    body: LoopBody,
}

impl Foreach {
    pub fn new(
        iterable: impl Into<Value>,
        body: impl Fn(&Variable, &Variable) -> Lines + 'static,
    ) -> Self {
        Self {
            iterable: iterable.into(),
            prefix: None,
            body: Rc::new(body),
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into()).filter(|p: &String| !p.is_empty());
        self
    }

    /// The key and value variables.
    pub fn variables(&self) -> (Variable, Variable) {
        Self::variables_for(self.prefix.as_deref())
    }

    /// The key and value variables a loop with `prefix` declares.
    pub fn variables_for(prefix: Option<&str>) -> (Variable, Variable) {
        match prefix {
            None => (Variable::new("key"), Variable::new("value")),
            Some(prefix) => (
                Variable::new(format!("{}Key", prefix)),
                Variable::new(format!("{}Value", prefix)),
            ),
        }
    }
}

impl fmt::Debug for Foreach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Foreach")
            .field("iterable", &self.iterable)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl ToLines for Foreach {
    fn to_lines(&self, ctx: &RenderContext) -> Result<Lines> {
        let (key, value) = self.variables();
        let mut lines = join(
            "foreach",
            [
                text("foreach ("),
                expand(ctx, value_lines(ctx, &self.iterable)?)?,
                text(format!(" as {} => {}) {{", key, value)),
            ],
        )?;
        lines.push(LineNode::Block(expand(ctx, (self.body)(&key, &value))?));
        lines.push(LineNode::line("}"));
        Ok(lines)
    }
}

/// `if (<condition>) { ... } else { ... }`
#[derive(Debug, Clone)]
pub struct If {
    condition: Value,
    then: Lines,
    otherwise: Option<Lines>,
}

impl If {
    pub fn new(condition: impl Into<Value>, then: Lines) -> Self {
        Self {
            condition: condition.into(),
            then,
            otherwise: None,
        }
    }

    pub fn otherwise(mut self, body: Lines) -> Self {
        self.otherwise = Some(body);
        self
    }
}

impl ToLines for If {
    fn to_lines(&self, ctx: &RenderContext) -> Result<Lines> {
        let mut lines = join(
            "if",
            [
                text("if ("),
                expand(ctx, value_lines(ctx, &self.condition)?)?,
                text(") {"),
            ],
        )?;
        lines.push(LineNode::Block(expand(ctx, self.then.clone())?));
        if let Some(otherwise) = &self.otherwise {
            lines.push(LineNode::line("} else {"));
            lines.push(LineNode::Block(expand(ctx, otherwise.clone())?));
        }
        lines.push(LineNode::line("}"));
        Ok(lines)
    }
}

/// `<check> ? <success> : <failure>`
///
/// Multi-line branches open on the operator's line; their continuation
/// lines keep their own nesting and the next operator is glued onto the
/// branch's last line.
#[derive(Debug, Clone)]
pub struct Ternary {
    check: Value,
    success: Value,
    failure: Value,
}

impl Ternary {
    pub fn new(
        check: impl Into<Value>,
        success: impl Into<Value>,
        failure: impl Into<Value>,
    ) -> Self {
        Self {
            check: check.into(),
            success: success.into(),
            failure: failure.into(),
        }
    }

    /// `$value === null ? null : <expr>`
    pub fn unless_null(value: &Variable, expr: impl Into<Value>) -> Self {
        Self::new(
            Value::raw(format!("{} === null", value)),
            Value::Null,
            expr,
        )
    }
}

impl ToLines for Ternary {
    fn to_lines(&self, ctx: &RenderContext) -> Result<Lines> {
        join(
            "ternary",
            [
                expand(ctx, value_lines(ctx, &self.check)?)?,
                text(" ? "),
                expand(ctx, value_lines(ctx, &self.success)?)?,
                text(" : "),
                expand(ctx, value_lines(ctx, &self.failure)?)?,
            ],
        )
    }
}
