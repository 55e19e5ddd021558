//! Enums: native syntax on 8.1+, a final class with one cached instance per
//! case before that.

use std::collections::HashSet;

use phpgen_core::{Error, LineNode, Lines, Result};
use phpgen_ir::{
    Class, ClassName, Constant, Enum, EnumBacking, Method, Param, PhpArray, PhpType, Property,
    Value,
};
use tracing::debug;

use super::{Owner, Renderer, base};
use crate::{
    engine::{expand, join, separated, text},
    expr::{ArrayLiteral, Assign, Call, ClassTarget, Foreach, If, New, Return, Throw, Variable},
    format::value_lines,
};

/// `enum Name: string implements ... { case A = 'a'; ... }`
pub(super) fn render_native(r: &Renderer, e: &Enum) -> Result<Lines> {
    let ctx = r.context();
    let mut header = format!("enum {}", e.name.short());
    if let Some(backing) = e.backing {
        header.push_str(&format!(": {}", backing.as_str()));
    }
    if !e.implements.is_empty() {
        let names: Vec<String> = e.implements.iter().map(|name| r.class_name(name)).collect();
        header.push_str(&format!(" implements {}", names.join(", ")));
    }

    let mut cases = Lines::new();
    for case in e.cases.values() {
        if let Some(doc) = &case.doc {
            cases.extend(r.render_doc(doc));
        }
        match &case.value {
            None => cases.push(LineNode::Line(format!("case {};", case.name))),
            Some(value) => cases.extend(join(
                "case",
                [
                    text(format!("case {} = ", case.name)),
                    expand(ctx, value_lines(ctx, value)?)?,
                    text(";"),
                ],
            )?),
        }
    }

    // Cases come before constants in native enums.
    let mut groups = base::render_member_groups(r, &Owner::enum_(e))?;
    groups.insert(1, cases);
    Ok(base::declaration(r, e.doc.as_ref(), header, separated(groups)))
}

/// Lower `e` to a final class and render that.
pub(super) fn render_emulated(r: &Renderer, e: &Enum) -> Result<Lines> {
    debug!(name = %e.name, version = %r.version(), "emulating enum with a class");
    r.render_class(&emulate(e)?)
}

fn backing_type(e: &Enum) -> PhpType {
    match e.backing {
        Some(EnumBacking::Int) => PhpType::Int,
        Some(EnumBacking::String) | None => PhpType::String,
    }
}

/// Methods every emulated enum declares next to its case factories.
const HELPERS: &[&str] = &["__construct", "cases", "getValue", "of"];
/// Methods only emulated backed enums declare.
const BACKED_HELPERS: &[&str] = &["from", "jsonSerialize"];

/// The generated helper a case factory named `case` would collide with
/// once the enum is emulated. PHP method names ignore case.
pub fn emulated_method_clash(case: &str, backed: bool) -> Option<&'static str> {
    let backed_helpers: &[&str] = if backed { BACKED_HELPERS } else { &[] };
    HELPERS
        .iter()
        .chain(backed_helpers)
        .copied()
        .find(|helper| helper.eq_ignore_ascii_case(case))
}

/// Cases become static methods, so their names must not meet a helper, a
/// declared method or each other when letter case is ignored.
fn check_case_methods(e: &Enum) -> Result<()> {
    let mut seen = HashSet::new();
    for case in e.cases.keys() {
        let clash = emulated_method_clash(case, e.backing.is_some())
            .map(str::to_owned)
            .or_else(|| e.members.method(case).map(|method| method.name.clone()));
        if let Some(method) = clash {
            return Err(Error::invalid_argument(format!(
                "case '{}' of {} clashes with method '{}' when emulated before PHP 8.1",
                case,
                e.name.fqcn(),
                method
            )));
        }
        if !seen.insert(case.to_ascii_lowercase()) {
            return Err(Error::invalid_argument(format!(
                "case '{}' of {} differs from another case only in letter case",
                case,
                e.name.fqcn()
            )));
        }
    }
    Ok(())
}

/// The class standing in for `e`.
///
/// Each case is a constant holding its value (the case name for pure
/// enums) and a static factory returning the shared instance for that
/// value. Backed enums also get `from()` and serialize to their value.
pub(super) fn emulate(e: &Enum) -> Result<Class> {
    check_case_methods(e)?;
    let backing = backing_type(e);
    let mut class = Class::new(e.name.clone()).final_();
    class.doc = e.doc.clone();
    class.members.traits = e.members.traits.clone();
    for interface in &e.implements {
        class = class.implements(interface.clone());
    }
    if e.backing.is_some() {
        class = class.implements(ClassName::parse("JsonSerializable")?);
    }

    for case in e.cases.values() {
        let value = case
            .value
            .clone()
            .unwrap_or_else(|| Value::String(case.name.clone()));
        let mut constant = Constant::new(&case.name, value);
        constant.doc = case.doc.clone();
        class = class.constant(constant)?;
    }
    for constant in e.members.constants.values() {
        class = class.constant(constant.clone())?;
    }

    class = class
        .property(Property::new("value").ty(backing.clone()))?
        .property(
            Property::new("instances")
                .static_()
                .ty(PhpType::array_of(PhpType::SelfType))
                .default(PhpArray::new()),
        )?;

    let value = Variable::new("value");
    class = class.method(
        Method::constructor()
            .private()
            .param(Param::new("value").ty(backing.clone()))?
            .statement(Assign::new(Variable::this_field("value"), value.clone())),
    )?;

    for case in e.cases.keys() {
        class = class.method(
            Method::new(case)
                .static_()
                .returns(PhpType::SelfType)
                .statement(Return::new(
                    Call::static_(ClassTarget::self_(), "of")
                        .arg(Value::raw(format!("self::{}", case))),
                )),
        )?;
    }

    let all = e.cases.keys().fold(ArrayLiteral::new(), |all, case| {
        all.item(Call::static_(ClassTarget::self_(), case.as_str()))
    });
    class = class.method(
        Method::new("cases")
            .static_()
            .returns(PhpType::array_of(PhpType::SelfType))
            .statement(Return::new(all)),
    )?;

    class = class.method(
        Method::new("getValue")
            .returns(backing.clone())
            .statement(Return::new(Variable::this_field("value"))),
    )?;

    if e.backing.is_some() {
        class = class.method(from(&backing)?)?.method(
            Method::new("jsonSerialize")
                .returns(backing.clone())
                .statement(Return::new(Variable::this_field("value"))),
        )?;
    }

    let instance = Variable::static_field("instances").index(&value);
    class = class.method(
        Method::new("of")
            .private()
            .static_()
            .param(Param::new("value").ty(backing))?
            .returns(PhpType::SelfType)
            .statement(If::new(
                Value::raw(format!("!isset({})", instance)),
                vec![LineNode::fragment(Assign::new(
                    instance.clone(),
                    New::new(ClassTarget::self_()).arg(value),
                ))],
            ))
            .statement(Return::new(instance)),
    )?;

    for method in e.members.methods.values() {
        class = class.method(method.clone())?;
    }
    Ok(class)
}

/// `from($value)`: the instance for a known value, an exception otherwise.
fn from(backing: &PhpType) -> Result<Method> {
    let lookup = Foreach::new(Call::static_(ClassTarget::self_(), "cases"), |_, case| {
        vec![LineNode::fragment(If::new(
            Value::raw(format!("{}->getValue() === $value", case)),
            vec![LineNode::fragment(Return::new(case.clone()))],
        ))]
    })
    .prefix("case");
    let message = Call::function("sprintf").args([
        Value::from("%s is not a valid %s"),
        Value::from(Variable::new("value")),
        Value::raw("self::class"),
    ]);
    let invalid = New::new(ClassName::parse("InvalidArgumentException")?).arg(message);
    Ok(Method::new("from")
        .static_()
        .param(Param::new("value").ty(backing.clone()))?
        .returns(PhpType::SelfType)
        .statement(lookup)
        .statement(Throw::new(invalid)))
}

#[cfg(test)]
mod tests {
    use phpgen_core::PhpVersion;
    use phpgen_ir::EnumCase;

    use super::*;

    fn name(s: &str) -> ClassName {
        ClassName::parse(s).unwrap()
    }

    #[test]
    fn test_emulated_method_clash() {
        assert_eq!(emulated_method_clash("From", true), Some("from"));
        assert_eq!(emulated_method_clash("From", false), None);
        assert_eq!(emulated_method_clash("Cases", false), Some("cases"));
        assert_eq!(emulated_method_clash("GETVALUE", false), Some("getValue"));
        assert_eq!(emulated_method_clash("To", true), None);
    }

    #[test]
    fn test_case_named_like_helper_is_rejected_before_81() {
        let source = Enum::backed(name("App\\Source"), EnumBacking::String)
            .case(EnumCase::new("From").value("from"))
            .unwrap()
            .case(EnumCase::new("To").value("to"))
            .unwrap();
        assert!(Renderer::new(PhpVersion::Php81).render(&source).is_ok());

        let err = Renderer::new(PhpVersion::Php74).render(&source).unwrap_err();
        assert_eq!(
            err,
            Error::invalid_argument(
                "case 'From' of App\\Source clashes with method 'from' when emulated before PHP 8.1"
            )
        );

        let pure = Enum::new(name("App\\Kind")).case(EnumCase::new("Cases")).unwrap();
        assert!(matches!(
            Renderer::new(PhpVersion::Php80).render(&pure),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_cases_differing_in_letter_case_are_rejected() {
        let toggle = Enum::new(name("App\\Toggle"))
            .case(EnumCase::new("On"))
            .unwrap()
            .case(EnumCase::new("ON"))
            .unwrap();
        let err = emulate(&toggle).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid argument: case 'ON' of App\\Toggle differs from another case only in letter case"
        );
    }

    #[test]
    fn test_case_named_like_declared_method_is_rejected() {
        let level = Enum::new(name("App\\Level"))
            .case(EnumCase::new("Label"))
            .unwrap()
            .method(Method::new("label").returns(PhpType::String).line("return 'x';"))
            .unwrap();
        assert!(matches!(emulate(&level), Err(Error::InvalidArgument(_))));
    }
}
