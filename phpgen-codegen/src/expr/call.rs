//! Calls, instantiation and the nullsafe rewrite.

use phpgen_core::{Error, LineNode, Lines, RenderContext, Result, ToLines};
use phpgen_ir::{ClassName, Value};

use super::args::argument_list;
use crate::{
    engine::{expand, join, single_line},
    format::value_lines,
};

/// The left-hand side of `::` or `new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassTarget {
    /// A class, spelled through the active name scope.
    Class(ClassName),
    /// `self`, `static` or `parent`.
    Keyword(&'static str),
}

impl ClassTarget {
    pub fn self_() -> Self {
        Self::Keyword("self")
    }

    pub fn static_() -> Self {
        Self::Keyword("static")
    }

    pub fn parent() -> Self {
        Self::Keyword("parent")
    }

    fn spell(&self, ctx: &RenderContext) -> String {
        match self {
            Self::Class(name) => ctx.class_name(name.fqcn()),
            Self::Keyword(keyword) => keyword.to_string(),
        }
    }
}

impl From<ClassName> for ClassTarget {
    fn from(name: ClassName) -> Self {
        Self::Class(name)
    }
}

#[derive(Debug, Clone)]
enum Callee {
    Function(String),
    Method { target: Value, name: String },
    Static { class: ClassTarget, name: String },
}

/// A function, instance method or static method call.
#[derive(Debug, Clone)]
pub struct Call {
    callee: Callee,
    args: Vec<Value>,
}

impl Call {
    /// `name(...)`
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            callee: Callee::Function(name.into()),
            args: Vec::new(),
        }
    }

    /// `$target->name(...)`
    pub fn method(target: impl Into<Value>, name: impl Into<String>) -> Self {
        Self {
            callee: Callee::Method {
                target: target.into(),
                name: name.into(),
            },
            args: Vec::new(),
        }
    }

    /// `Class::name(...)`
    pub fn static_(class: impl Into<ClassTarget>, name: impl Into<String>) -> Self {
        Self {
            callee: Callee::Static {
                class: class.into(),
                name: name.into(),
            },
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<Value>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<V: Into<Value>>(mut self, args: impl IntoIterator<Item = V>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The same call through `?->`.
    pub fn nullsafe(self) -> Nullsafe {
        let target = match &self.callee {
            Callee::Method { target, .. } => Some(target.clone()),
            _ => None,
        };
        Nullsafe {
            target,
            call: Value::fragment(self),
        }
    }
}

impl ToLines for Call {
    fn to_lines(&self, ctx: &RenderContext) -> Result<Lines> {
        match &self.callee {
            Callee::Function(name) => argument_list(ctx, name, &self.args),
            Callee::Static { class, name } => {
                argument_list(ctx, &format!("{}::{}", class.spell(ctx), name), &self.args)
            }
            Callee::Method { target, name } => {
                let target = expand(ctx, value_lines(ctx, target)?)?;
                match single_line(&target) {
                    Some(target) => {
                        argument_list(ctx, &format!("{}->{}", target, name), &self.args)
                    }
                    // A multi-line receiver (an exploded call) keeps its
                    // shape; the method is chained onto its last line.
                    None => join(
                        "call",
                        [target, argument_list(ctx, &format!("->{}", name), &self.args)?],
                    ),
                }
            }
        }
    }
}

/// `new Class(...)`
#[derive(Debug, Clone)]
pub struct New {
    class: ClassTarget,
    args: Vec<Value>,
}

impl New {
    pub fn new(class: impl Into<ClassTarget>) -> Self {
        Self {
            class: class.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<Value>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<V: Into<Value>>(mut self, args: impl IntoIterator<Item = V>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl ToLines for New {
    fn to_lines(&self, ctx: &RenderContext) -> Result<Lines> {
        argument_list(ctx, &format!("new {}", self.class.spell(ctx)), &self.args)
    }
}

/// Rewrites the `->` that follows the receiver on a call's first line to
/// `?->`. Every other line is left alone.
#[derive(Debug, Clone)]
pub struct Nullsafe {
    target: Option<Value>,
    call: Value,
}

impl Nullsafe {
    /// `call` must start with `target->`.
    pub fn new(target: impl Into<Value>, call: impl Into<Value>) -> Self {
        Self {
            target: Some(target.into()),
            call: call.into(),
        }
    }
}

impl ToLines for Nullsafe {
    fn to_lines(&self, ctx: &RenderContext) -> Result<Lines> {
        let Some(target) = &self.target else {
            return Err(Error::invalid_code("nullsafe", "only instance calls have a receiver"));
        };
        let target = expand(ctx, value_lines(ctx, target)?)?;
        let Some(target) = single_line(&target) else {
            return Err(Error::invalid_code("nullsafe", "receiver spans several lines"));
        };
        let mut lines = expand(ctx, value_lines(ctx, &self.call)?)?;
        match lines.first_mut() {
            Some(LineNode::Line(first)) if first[..].starts_with(&format!("{}->", target)) => {
                first.insert(target.len(), '?');
                Ok(lines)
            }
            Some(LineNode::Line(first)) => Err(Error::invalid_code(
                "nullsafe",
                format!("'{}' does not start with '{}->'", first, target),
            )),
            _ => Err(Error::invalid_code("nullsafe", "call does not start with a line")),
        }
    }
}

#[cfg(test)]
mod tests {
    use phpgen_core::{NameScope, lines};
    use phpgen_ir::PhpArray;

    use super::*;
    use crate::expr::Variable;

    fn render(fragment: impl ToLines) -> Lines {
        fragment.to_lines(&RenderContext::default()).unwrap()
    }

    fn name(s: &str) -> ClassName {
        ClassName::parse(s).unwrap()
    }

    #[test]
    fn test_call_forms() {
        assert_eq!(render(Call::function("count").arg(Variable::new("items"))), lines!["count($items)"]);
        assert_eq!(
            render(Call::method(Variable::this(), "find").arg(1)),
            lines!["$this->find(1)"]
        );
        assert_eq!(
            render(Call::static_(name("App\\Models\\User"), "find").args([1, 2])),
            lines!["User::find(1, 2)"]
        );
        assert_eq!(
            render(Call::static_(ClassTarget::parent(), "__construct")),
            lines!["parent::__construct()"]
        );
    }

    #[test]
    fn test_static_call_resolves_through_scope() {
        let ctx = RenderContext::default().with_scope(NameScope::file(Some("App")));
        let call = Call::static_(name("Vendor\\Clock"), "now");
        assert_eq!(call.to_lines(&ctx).unwrap(), lines!["\\Vendor\\Clock::now()"]);
    }

    #[test]
    fn test_new() {
        assert_eq!(render(New::new(ClassTarget::static_())), lines!["new static()"]);
        assert_eq!(
            render(New::new(name("ArrayObject")).arg(PhpArray::new().with("a", 1))),
            lines!["new ArrayObject([", ["'a' => 1,"], "])"]
        );
    }

    #[test]
    fn test_chained_call_on_exploded_receiver() {
        let ctx = RenderContext::new().max_line_length(20);
        let inner = Call::function("build").args(["first-argument", "second"]);
        let outer = Call::method(inner, "done");
        assert_eq!(
            outer.to_lines(&ctx).unwrap(),
            lines!["build(", ["'first-argument',", "'second',"], ")->done()"]
        );
    }

    #[test]
    fn test_nullsafe_rewrites_first_line_only() {
        let ctx = RenderContext::new().max_line_length(20);
        let call = Call::method(Variable::new("x"), "method").args(["a-long-argument", "->b"]);
        assert_eq!(
            call.nullsafe().to_lines(&ctx).unwrap(),
            lines!["$x?->method(", ["'a-long-argument',", "'->b',"], ")"]
        );
        assert_eq!(
            render(Call::method(Variable::this_field("owner"), "getName").nullsafe()),
            lines!["$this->owner?->getName()"]
        );
    }

    #[test]
    fn test_nullsafe_rejects_mismatched_receivers() {
        let err = Call::function("strlen")
            .nullsafe()
            .to_lines(&RenderContext::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCode { composer: "nullsafe", .. }));

        let call = Call::method(Variable::new("a"), "run");
        let err = Nullsafe::new(Variable::new("b"), call)
            .to_lines(&RenderContext::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCode { composer: "nullsafe", .. }));
    }
}
