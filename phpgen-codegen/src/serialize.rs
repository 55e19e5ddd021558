//! Choosing how a typed value is turned into plain data.
//!
//! [`resolve`] is a decision table over a type and the capability
//! descriptors attached to its classes. [`Converter`] turns the decision
//! into code for a particular variable.

use phpgen_core::{LineNode, Lines, RenderContext, Result, ToLines, to_camel_case};
use phpgen_ir::{Capabilities, PhpType, Value};

use crate::{
    engine::{join, text},
    expr::{Call, Cast, Foreach, If, Ternary, Variable},
};

/// How a value of some type becomes serializable data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    /// Used as is.
    Native,
    /// `$v->jsonSerialize()`
    JsonSerialize,
    /// `(string)$v`
    Stringable,
    /// `$v->method()`, for `toString`/`toArray`-style methods.
    Method(String),
    /// Copied key by key into a plain array.
    CopyIterable,
    /// An array whose elements each need the inner conversion.
    Elements(Box<Conversion>),
    /// The inner conversion, skipped when the value is null.
    Nullable(Box<Conversion>),
}

/// Pick the conversion for `ty`.
///
/// Classes are checked in a fixed order: `JsonSerializable`, then
/// stringable, then a `toString`-like method, then a `toArray`-like
/// method, then traversable. The first capability present wins no matter
/// which others the class also has. Arrays and nullables only convert when
/// their inner type does.
pub fn resolve(ty: &PhpType) -> Conversion {
    match ty {
        PhpType::Iterable => Conversion::CopyIterable,
        PhpType::Class(class) => resolve_class(&class.capabilities),
        PhpType::Array(Some(element)) => match resolve(element) {
            Conversion::Native => Conversion::Native,
            inner => Conversion::Elements(Box::new(inner)),
        },
        PhpType::Nullable(inner) => match resolve(inner) {
            Conversion::Native => Conversion::Native,
            inner => Conversion::Nullable(Box::new(inner)),
        },
        _ => Conversion::Native,
    }
}

impl Conversion {
    /// Names of the variables the conversion declares when seeded with
    /// `name`: the copied array and its loop variables, then those of any
    /// nested copy.
    pub fn temporaries(&self, name: &str) -> Vec<String> {
        match self {
            Conversion::Nullable(inner) => inner.temporaries(name),
            Conversion::CopyIterable | Conversion::Elements(_) => {
                let prefix = to_camel_case(name);
                let mut names = vec![
                    format!("{}Key", prefix),
                    format!("{}Value", prefix),
                    prefix.clone(),
                ];
                if let Conversion::Elements(inner) = self {
                    names.extend(inner.temporaries(&format!("{}Item", prefix)));
                }
                names
            }
            _ => Vec::new(),
        }
    }
}

fn resolve_class(capabilities: &Capabilities) -> Conversion {
    if capabilities.json_serializable {
        Conversion::JsonSerialize
    } else if capabilities.stringable {
        Conversion::Stringable
    } else if let Some(method) = &capabilities.to_string {
        Conversion::Method(method.clone())
    } else if let Some(method) = &capabilities.to_array {
        Conversion::Method(method.clone())
    } else if capabilities.traversable {
        Conversion::CopyIterable
    } else {
        Conversion::Native
    }
}

/// Code computing a converted value: statements to run first, then the
/// expression holding the result.
#[derive(Debug, Clone, PartialEq)]
pub struct Converted {
    pub setup: Lines,
    pub expr: Lines,
}

impl Converted {
    fn expr(expr: Lines) -> Self {
        Self {
            setup: Lines::new(),
            expr,
        }
    }
}

/// Emits conversion code.
#[derive(Debug, Clone, Copy, Default)]
pub struct Converter {
    /// Whether `?->` is available for nullable method calls.
    pub nullsafe: bool,
}

impl Converter {
    pub fn new(nullsafe: bool) -> Self {
        Self { nullsafe }
    }

    /// Convert `value` according to `conversion`. `name` seeds the names
    /// of temporaries the conversion may declare.
    pub fn convert(
        &self,
        ctx: &RenderContext,
        conversion: &Conversion,
        value: &Variable,
        name: &str,
    ) -> Result<Converted> {
        self.convert_value(ctx, conversion, value, name, false)
    }

    fn convert_value(
        &self,
        ctx: &RenderContext,
        conversion: &Conversion,
        value: &Variable,
        name: &str,
        nullable: bool,
    ) -> Result<Converted> {
        match conversion {
            Conversion::Native => Ok(Converted::expr(text(value.as_str()))),
            Conversion::Nullable(inner) => self.convert_value(ctx, inner, value, name, true),
            Conversion::JsonSerialize => self.call(ctx, value, "jsonSerialize", nullable),
            Conversion::Method(method) => self.call(ctx, value, method, nullable),
            Conversion::Stringable => {
                let cast = Cast::string(value.clone());
                let expr = if nullable {
                    Ternary::unless_null(value, cast).to_lines(ctx)?
                } else {
                    cast.to_lines(ctx)?
                };
                Ok(Converted::expr(expr))
            }
            Conversion::CopyIterable => self.copy(ctx, value, name, nullable, None),
            Conversion::Elements(inner) => self.copy(ctx, value, name, nullable, Some(inner)),
        }
    }

    fn call(
        &self,
        ctx: &RenderContext,
        value: &Variable,
        method: &str,
        nullable: bool,
    ) -> Result<Converted> {
        let call = Call::method(value.clone(), method);
        let expr = match (nullable, self.nullsafe) {
            (false, _) => call.to_lines(ctx)?,
            (true, true) => call.nullsafe().to_lines(ctx)?,
            (true, false) => Ternary::unless_null(value, call).to_lines(ctx)?,
        };
        Ok(Converted::expr(expr))
    }

    /// Copy `value` into a fresh array named after `name`, converting each
    /// element with `element` if given.
    fn copy(
        &self,
        ctx: &RenderContext,
        value: &Variable,
        name: &str,
        nullable: bool,
        element: Option<&Conversion>,
    ) -> Result<Converted> {
        let prefix = to_camel_case(name);
        let target = Variable::new(&prefix);
        let (key, item) = Foreach::variables_for(Some(&prefix));

        let mut body = Lines::new();
        let converted = match element {
            None => text(item.as_str()),
            Some(inner) => {
                let converted =
                    self.convert_value(ctx, inner, &item, &format!("{}Item", prefix), false)?;
                body.extend(converted.setup);
                converted.expr
            }
        };
        body.extend(join(
            "assign",
            [text(format!("{} = ", target.index(&key))), converted, text(";")],
        )?);

        let mut fill = vec![LineNode::Line(format!("{} = [];", target))];
        fill.extend(
            Foreach::new(value.clone(), move |_, _| body.clone())
                .prefix(&prefix)
                .to_lines(ctx)?,
        );

        let setup = if nullable {
            let mut setup = vec![LineNode::Line(format!("{} = null;", target))];
            let present = Value::raw(format!("{} !== null", value));
            setup.extend(If::new(present, fill).to_lines(ctx)?);
            setup
        } else {
            fill
        };
        Ok(Converted {
            setup,
            expr: text(target.as_str()),
        })
    }
}
