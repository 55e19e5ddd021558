//! Expression and statement composers.
//!
//! Each composer implements [`ToLines`](phpgen_core::ToLines) and accepts its operands as
//! [`Value`]s, so literals and other composers nest freely:
//!
//! ```
//! use phpgen_codegen::expr::{Call, Return, Variable};
//! use phpgen_core::{RenderContext, ToLines, lines};
//!
//! let ret = Return::new(Call::method(Variable::this(), "toArray"));
//! let out = ret.to_lines(&RenderContext::default()).unwrap();
//! assert_eq!(out, lines!["return $this->toArray();"]);
//! ```

mod args;
mod array;
mod basic;
mod call;
mod control;

pub use args::argument_list;
pub use array::ArrayLiteral;
pub use basic::{Assign, Cast, Raw, Return, Statement, Throw, Variable};
pub use call::{Call, ClassTarget, New, Nullsafe};
pub use control::{Foreach, If, Ternary};
use phpgen_ir::Value;

impl From<Variable> for Value {
    fn from(variable: Variable) -> Self {
        Value::raw(variable.as_str())
    }
}

macro_rules! impl_into_value {
    ($($composer:ty),+ $(,)?) => {
        $(
            impl From<$composer> for Value {
                fn from(composer: $composer) -> Self {
                    Value::fragment(composer)
                }
            }
        )+
    };
}

impl_into_value!(
    ArrayLiteral,
    Assign,
    Call,
    Cast,
    Foreach,
    If,
    New,
    Nullsafe,
    Raw,
    Return,
    Statement,
    Ternary,
    Throw,
);
