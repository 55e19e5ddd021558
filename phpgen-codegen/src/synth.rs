//! Generated members: getters and `jsonSerialize()`.

use std::collections::HashSet;

use phpgen_core::{
    Lines, PhpVersion, RenderContext, Result, ToLines, to_camel_case, to_pascal_case,
};
use phpgen_ir::{Class, ClassName, Method, PhpType, Property, Value};
use tracing::debug;

use crate::{
    expr::{ArrayLiteral, Return, Variable},
    render::dialect_for,
    serialize::{Conversion, Converter, resolve},
};

/// `getName`, or `isActive`/`isEnabled` for booleans.
pub fn getter_name(property: &Property) -> String {
    let boolean = match &property.ty {
        Some(PhpType::Bool) => true,
        Some(PhpType::Nullable(inner)) => **inner == PhpType::Bool,
        _ => false,
    };
    let name = &property.name;
    if boolean {
        let already_prefixed = name
            .strip_prefix("is")
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_uppercase());
        if already_prefixed {
            return name.clone();
        }
        return format!("is{}", to_pascal_case(name));
    }
    format!("get{}", to_pascal_case(name))
}

/// A public accessor returning `property`.
pub fn getter(property: &Property) -> Method {
    let mut method = Method::new(getter_name(property));
    if let Some(ty) = &property.ty {
        method = method.returns(ty.clone());
    }
    if property.is_static {
        method
            .static_()
            .statement(Return::new(Variable::static_field(&property.name)))
    } else {
        method.statement(Return::new(Variable::this_field(&property.name)))
    }
}

/// Add a getter for every property that does not have one yet. Returns
/// how many were added.
pub fn add_getters(class: &mut Class) -> Result<usize> {
    let getters: Vec<Method> = class
        .members
        .properties
        .values()
        .map(getter)
        .filter(|getter| class.members.method(&getter.name).is_none())
        .collect();
    let added = getters.len();
    for getter in getters {
        debug!(class = %class.name, method = %getter.name, "adding getter");
        class.members.add_method(getter, &class.name)?;
    }
    Ok(added)
}

/// Body of a generated `jsonSerialize()`: conversions for each property
/// followed by `return [...]`.
#[derive(Debug, Clone)]
struct SerializeProperties {
    entries: Vec<(String, Conversion)>,
    converter: Converter,
}

impl ToLines for SerializeProperties {
    fn to_lines(&self, ctx: &RenderContext) -> Result<Lines> {
        let mut lines = Lines::new();
        let mut data = ArrayLiteral::new();
        let mut temporaries = HashSet::new();
        for (name, conversion) in &self.entries {
            let seed = unique_seed(name, conversion, &mut temporaries);
            let converted =
                self.converter
                    .convert(ctx, conversion, &Variable::this_field(name), &seed)?;
            lines.extend(converted.setup);
            data = data.entry(name.as_str(), Value::fragment(converted.expr));
        }
        lines.extend(Return::new(data).to_lines(ctx)?);
        Ok(lines)
    }
}

/// Seed for the temporaries of `conversion`, numbered when a plain
/// camelCase seed would reuse a variable declared for an earlier property.
fn unique_seed(name: &str, conversion: &Conversion, used: &mut HashSet<String>) -> String {
    let base = match to_camel_case(name) {
        base if base.is_empty() => "value".to_owned(),
        base => base,
    };
    let mut seed = base.clone();
    let mut n = 2;
    while conversion
        .temporaries(&seed)
        .iter()
        .any(|temporary| used.contains(temporary))
    {
        seed = format!("{}{}", base, n);
        n += 1;
    }
    used.extend(conversion.temporaries(&seed));
    seed
}

/// `jsonSerialize(): array` returning every instance property, converted
/// according to its type.
pub fn json_serialize(class: &Class, version: PhpVersion) -> Method {
    let entries = class
        .members
        .properties
        .values()
        .filter(|property| !property.is_static)
        .map(|property| {
            let conversion = property
                .ty
                .as_ref()
                .map(resolve)
                .unwrap_or(Conversion::Native);
            (property.name.clone(), conversion)
        })
        .collect();
    let converter = Converter::new(dialect_for(version).supports_nullsafe());
    Method::new("jsonSerialize")
        .returns(PhpType::Array(None))
        .statement(SerializeProperties { entries, converter })
}

/// Make `class` implement `JsonSerializable` with a generated
/// `jsonSerialize()`, unless it already has one.
pub fn add_json_serialize(class: &mut Class, version: PhpVersion) -> Result<bool> {
    if class.members.method("jsonSerialize").is_some() {
        return Ok(false);
    }
    let method = json_serialize(class, version);
    class.members.add_method(method, &class.name)?;
    let interface = ClassName::parse("JsonSerializable")?;
    if !class.implements.contains(&interface) {
        class.implements.push(interface);
    }
    debug!(class = %class.name, %version, "adding jsonSerialize");
    Ok(true)
}
