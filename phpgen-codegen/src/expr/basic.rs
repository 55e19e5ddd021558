//! Variables, raw code and the simple statements.

use std::fmt;

use phpgen_core::{Error, LineNode, Lines, RenderContext, Result, ToLines};
use phpgen_ir::Value;

use crate::{
    engine::{expand, join, single_line, terminate, text},
    format::value_lines,
};

/// A variable or property access: `$name`, `$this`, `$this->field`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    expr: String,
}

impl Variable {
    /// `$name`; a leading `$` in `name` is ignored.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            expr: format!("${}", name.as_ref().trim_start_matches('$')),
        }
    }

    pub fn this() -> Self {
        Self::new("this")
    }

    /// `$this->field`
    pub fn this_field(field: impl AsRef<str>) -> Self {
        Self::this().field(field)
    }

    /// `self::$field`
    pub fn static_field(field: impl AsRef<str>) -> Self {
        Self {
            expr: format!("self::${}", field.as_ref()),
        }
    }

    /// Property access on this expression.
    pub fn field(&self, field: impl AsRef<str>) -> Self {
        Self {
            expr: format!("{}->{}", self.expr, field.as_ref()),
        }
    }

    /// Array element access: `$items[$key]`.
    pub fn index(&self, key: impl fmt::Display) -> Self {
        Self {
            expr: format!("{}[{}]", self.expr, key),
        }
    }

    /// Array append target: `$items[]`.
    pub fn push(&self) -> Self {
        Self {
            expr: format!("{}[]", self.expr),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.expr
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr)
    }
}

impl ToLines for Variable {
    fn to_lines(&self, _ctx: &RenderContext) -> Result<Lines> {
        Ok(text(&self.expr))
    }
}

/// Verbatim code. Embedded newlines split it into several lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raw(pub String);

impl Raw {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }
}

impl ToLines for Raw {
    fn to_lines(&self, _ctx: &RenderContext) -> Result<Lines> {
        Ok(self
            .0
            .split('\n')
            .map(|l| LineNode::line(l.trim_end_matches('\r')))
            .collect())
    }
}

/// `target = value;`
#[derive(Debug, Clone)]
pub struct Assign {
    target: Value,
    value: Value,
}

impl Assign {
    pub fn new(target: impl Into<Value>, value: impl Into<Value>) -> Self {
        Self {
            target: target.into(),
            value: value.into(),
        }
    }
}

impl ToLines for Assign {
    fn to_lines(&self, ctx: &RenderContext) -> Result<Lines> {
        join(
            "assign",
            [
                expand(ctx, value_lines(ctx, &self.target)?)?,
                text(" = "),
                expand(ctx, value_lines(ctx, &self.value)?)?,
                text(";"),
            ],
        )
    }
}

/// `(type)expr`; the expression must fit on one line.
#[derive(Debug, Clone)]
pub struct Cast {
    ty: String,
    expr: Value,
}

impl Cast {
    pub fn new(ty: impl Into<String>, expr: impl Into<Value>) -> Self {
        Self {
            ty: ty.into(),
            expr: expr.into(),
        }
    }

    pub fn string(expr: impl Into<Value>) -> Self {
        Self::new("string", expr)
    }

    pub fn array(expr: impl Into<Value>) -> Self {
        Self::new("array", expr)
    }
}

impl ToLines for Cast {
    fn to_lines(&self, ctx: &RenderContext) -> Result<Lines> {
        let lines = expand(ctx, value_lines(ctx, &self.expr)?)?;
        let expr = single_line(&lines).ok_or_else(|| {
            Error::invalid_code("cast", format!("cannot cast a multi-line expression to {}", self.ty))
        })?;
        Ok(text(format!("({}){}", self.ty, expr)))
    }
}

/// `return expr;` or a bare `return;`.
#[derive(Debug, Clone, Default)]
pub struct Return {
    value: Option<Value>,
}

impl Return {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    pub fn void() -> Self {
        Self::default()
    }
}

impl ToLines for Return {
    fn to_lines(&self, ctx: &RenderContext) -> Result<Lines> {
        match &self.value {
            None => Ok(text("return;")),
            Some(value) => join(
                "return",
                [
                    text("return "),
                    expand(ctx, value_lines(ctx, value)?)?,
                    text(";"),
                ],
            ),
        }
    }
}

/// `throw expr;`
#[derive(Debug, Clone)]
pub struct Throw(Value);

impl Throw {
    pub fn new(exception: impl Into<Value>) -> Self {
        Self(exception.into())
    }
}

impl ToLines for Throw {
    fn to_lines(&self, ctx: &RenderContext) -> Result<Lines> {
        join(
            "throw",
            [text("throw "), expand(ctx, value_lines(ctx, &self.0)?)?, text(";")],
        )
    }
}

/// Turns an expression into a statement by terminating its last line.
#[derive(Debug, Clone)]
pub struct Statement(Value);

impl Statement {
    pub fn new(expr: impl Into<Value>) -> Self {
        Self(expr.into())
    }
}

impl ToLines for Statement {
    fn to_lines(&self, ctx: &RenderContext) -> Result<Lines> {
        terminate(expand(ctx, value_lines(ctx, &self.0)?)?)
    }
}

#[cfg(test)]
mod tests {
    use phpgen_core::lines;
    use phpgen_ir::PhpArray;

    use super::*;
    use crate::expr::Call;

    fn render(fragment: impl ToLines) -> Lines {
        fragment.to_lines(&RenderContext::default()).unwrap()
    }

    #[test]
    fn test_variables() {
        assert_eq!(Variable::new("id").as_str(), "$id");
        assert_eq!(Variable::new("$id").as_str(), "$id");
        assert_eq!(Variable::this().as_str(), "$this");
        assert_eq!(Variable::this_field("id").as_str(), "$this->id");
        assert_eq!(Variable::static_field("cache").as_str(), "self::$cache");
        assert_eq!(Variable::new("items").index("$key").as_str(), "$items[$key]");
        assert_eq!(Variable::new("items").push().as_str(), "$items[]");
    }

    #[test]
    fn test_raw_splits_lines() {
        assert_eq!(render(Raw::new("a();\r\nb();")), lines!["a();", "b();"]);
    }

    #[test]
    fn test_assign_glues_multi_line_value() {
        let array = PhpArray::new().with("a", 1);
        assert_eq!(
            render(Assign::new(Variable::new("data"), array)),
            lines!["$data = [", ["'a' => 1,"], "];"]
        );
        assert_eq!(
            render(Assign::new(Variable::this_field("id"), Variable::new("id"))),
            lines!["$this->id = $id;"]
        );
    }

    #[test]
    fn test_cast() {
        assert_eq!(render(Cast::string(Variable::new("name"))), lines!["(string)$name"]);
        let err = Cast::array(PhpArray::from_iter([Value::from(1)]))
            .to_lines(&RenderContext::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCode { composer: "cast", .. }));
    }

    #[test]
    fn test_return() {
        assert_eq!(render(Return::void()), lines!["return;"]);
        assert_eq!(render(Return::new(Variable::this_field("id"))), lines!["return $this->id;"]);
        assert_eq!(
            render(Return::new(PhpArray::new().with("id", 1))),
            lines!["return [", ["'id' => 1,"], "];"]
        );
    }

    #[test]
    fn test_throw() {
        let exception = crate::expr::New::new(phpgen_ir::ClassName::parse("RuntimeException").unwrap())
            .arg("boom");
        assert_eq!(
            render(Throw::new(exception)),
            lines!["throw new RuntimeException('boom');"]
        );
    }

    #[test]
    fn test_statement_terminates_last_line() {
        let call = Call::method(Variable::this(), "save");
        assert_eq!(render(Statement::new(call)), lines!["$this->save();"]);

        let call = Call::function("dispatch").arg(PhpArray::from_iter([Value::from(1)]));
        assert_eq!(render(Statement::new(call)), lines!["dispatch([", ["1,"], "]);"]);
    }
}
