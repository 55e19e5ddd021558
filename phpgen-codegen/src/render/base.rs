//! Rendering shared by every dialect. This is what PHP 7.3 gets; newer
//! layers override pieces of it.

use phpgen_core::{LineNode, Lines, Result};
use phpgen_ir::{
    Class, ClassName, Constant, DocComment, DocTag, Function, HintPosition, Interface, Method,
    Param, PhpType, Property, Trait,
};
use tracing::debug;

use super::{Owner, Renderer};
use crate::{
    engine::{expand, join, separated, single_line, suffix_last, text},
    expr::{Assign, Variable},
    format::value_lines,
};

fn name_list(r: &Renderer, names: &[ClassName]) -> String {
    names
        .iter()
        .map(|name| r.class_name(name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn doc_lines(r: &Renderer, doc: Option<&DocComment>) -> Lines {
    doc.map(|doc| r.render_doc(doc)).unwrap_or_default()
}

/// Doc-comment, header line and a braced body.
pub(super) fn declaration(r: &Renderer, doc: Option<&DocComment>, header: String, body: Lines) -> Lines {
    let mut lines = doc_lines(r, doc);
    lines.push(LineNode::Line(header));
    lines.push(LineNode::line("{"));
    if !body.is_empty() {
        lines.push(LineNode::Block(body));
    }
    lines.push(LineNode::line("}"));
    lines
}

pub(super) fn class_modifiers(class: &Class) -> Vec<&'static str> {
    let mut modifiers = Vec::new();
    if class.is_abstract {
        modifiers.push("abstract");
    }
    if class.is_final {
        modifiers.push("final");
    }
    modifiers
}

pub(super) fn render_class(r: &Renderer, class: &Class) -> Result<Lines> {
    let mut header: Vec<String> = r
        .dialect()
        .class_modifiers(r, class)
        .into_iter()
        .map(String::from)
        .collect();
    header.push(format!("class {}", class.name.short()));
    if let Some(parent) = &class.extends {
        header.push(format!("extends {}", r.class_name(parent)));
    }
    if !class.implements.is_empty() {
        header.push(format!("implements {}", name_list(r, &class.implements)));
    }
    let body = render_body(r, &Owner::class(class))?;
    Ok(declaration(r, class.doc.as_ref(), header.join(" "), body))
}

pub(super) fn render_interface(r: &Renderer, interface: &Interface) -> Result<Lines> {
    let mut header = format!("interface {}", interface.name.short());
    if !interface.extends.is_empty() {
        header.push_str(&format!(" extends {}", name_list(r, &interface.extends)));
    }
    let body = render_body(r, &Owner::interface(interface))?;
    Ok(declaration(r, interface.doc.as_ref(), header, body))
}

pub(super) fn render_trait(r: &Renderer, t: &Trait) -> Result<Lines> {
    let body = render_body(r, &Owner::trait_(t))?;
    Ok(declaration(r, t.doc.as_ref(), format!("trait {}", t.name.short()), body))
}

/// Trait uses, constants, properties and methods, one blank line between
/// groups.
pub(super) fn render_body(r: &Renderer, owner: &Owner<'_>) -> Result<Lines> {
    Ok(separated(render_member_groups(r, owner)?))
}

/// Traits, constants, properties and methods of `owner`, in that order.
pub(super) fn render_member_groups(r: &Renderer, owner: &Owner<'_>) -> Result<Vec<Lines>> {
    let members = owner.members;
    let traits: Lines = members
        .traits
        .iter()
        .map(|name| LineNode::Line(format!("use {};", r.class_name(name))))
        .collect();

    let mut constants = Lines::new();
    for constant in members.constants.values() {
        constants.extend(r.render_constant(constant)?);
    }

    // The constructor decides which properties it declares, so methods are
    // rendered before the property list.
    for property in members.properties.values() {
        property.mark_promoted(false);
    }
    let methods = members
        .ordered_methods()
        .map(|method| r.render_method(method, owner))
        .collect::<Result<Vec<_>>>()?;
    let properties = members
        .properties
        .values()
        .map(|property| r.render_property(property, owner))
        .collect::<Result<Vec<_>>>()?;

    Ok(vec![
        traits,
        constants,
        separated(properties),
        separated(methods),
    ])
}

pub(super) fn render_method(r: &Renderer, method: &Method, owner: &Owner<'_>) -> Result<Lines> {
    let params: Vec<Param> = method.params.values().cloned().collect();
    let rendered = params
        .iter()
        .map(|param| r.dialect().render_param(r, param, None))
        .collect::<Result<Vec<_>>>()?;
    render_callable(r, method, owner, &params, rendered, &method.body)
}

/// The property a constructor parameter declares, if it promotes one.
pub(super) fn promoted_property<'a>(param: &Param, owner: &Owner<'a>) -> Option<&'a Property> {
    if !param.promote {
        return None;
    }
    owner
        .members
        .property(&param.name)
        .filter(|property| !property.is_static)
}

/// `param` with the type and default of the property it promotes filled
/// in where it has none.
pub(super) fn promoted_param(param: &Param, property: &Property) -> Param {
    Param {
        ty: param.ty.clone().or_else(|| property.ty.clone()),
        default: param.default.clone().or_else(|| property.default.clone()),
        ..param.clone()
    }
}

/// Without promotion syntax, promoted parameters are assigned at the top
/// of the constructor body.
pub(super) fn render_constructor(r: &Renderer, method: &Method, owner: &Owner<'_>) -> Result<Lines> {
    let mut params = Vec::with_capacity(method.params.len());
    let mut body = Lines::new();
    for param in method.params.values() {
        match promoted_property(param, owner) {
            Some(property) => {
                body.push(LineNode::fragment(Assign::new(
                    Variable::this_field(&property.name),
                    Variable::new(&param.name),
                )));
                params.push(promoted_param(param, property));
            }
            None => params.push(param.clone()),
        }
    }
    body.extend(method.body.iter().cloned());
    let rendered = params
        .iter()
        .map(|param| r.dialect().render_param(r, param, None))
        .collect::<Result<Vec<_>>>()?;
    render_callable(r, method, owner, &params, rendered, &body)
}

/// Modifiers, signature, doc-comment and body of a method.
pub(super) fn render_callable(
    r: &Renderer,
    method: &Method,
    owner: &Owner<'_>,
    params: &[Param],
    rendered: Vec<Lines>,
    body: &Lines,
) -> Result<Lines> {
    let mut head = Vec::new();
    if method.is_abstract && !owner.is_interface() {
        head.push("abstract");
    }
    if method.is_final {
        head.push("final");
    }
    head.push(method.visibility.as_str());
    if method.is_static {
        head.push("static");
    }
    let head = format!("{} function {}", head.join(" "), method.name);
    let doc = callable_doc(r, method.doc.as_ref(), params, method.returns.as_ref());
    let body = (!owner.is_interface() && !method.is_abstract).then_some(body);
    signature(r, doc, &head, rendered, method.returns.as_ref(), body)
}

pub(super) fn render_function(r: &Renderer, function: &Function) -> Result<Lines> {
    let params: Vec<Param> = function.params.values().cloned().collect();
    let rendered = params
        .iter()
        .map(|param| r.dialect().render_param(r, param, None))
        .collect::<Result<Vec<_>>>()?;
    let doc = callable_doc(r, function.doc.as_ref(), &params, function.returns.as_ref());
    let head = format!("function {}", function.name.short());
    signature(
        r,
        doc,
        &head,
        rendered,
        function.returns.as_ref(),
        Some(&function.body),
    )
}

/// Lay out `head(params): returns` and the body.
///
/// The parameter list stays on the head line when it has at most
/// `max_inline_params` entries, each on one line, and the result fits.
/// Otherwise every parameter goes on its own line with a trailing comma
/// and the opening brace joins the closing parenthesis.
fn signature(
    r: &Renderer,
    doc: Option<DocComment>,
    head: &str,
    params: Vec<Lines>,
    returns: Option<&PhpType>,
    body: Option<&Lines>,
) -> Result<Lines> {
    let ctx = r.context();
    let returns = returns
        .and_then(|ty| r.hint(ty, HintPosition::Return))
        .map(|hint| format!(": {}", hint))
        .unwrap_or_default();
    let params = params
        .into_iter()
        .map(|param| expand(ctx, param))
        .collect::<Result<Vec<_>>>()?;

    let inline = params
        .iter()
        .map(|param| single_line(param))
        .collect::<Option<Vec<_>>>()
        .filter(|inline| params.is_empty() || inline.len() <= ctx.inline_params())
        .map(|inline| format!("{}({}){}", head, inline.join(", "), returns))
        .filter(|line| params.is_empty() || ctx.fits(line));

    let mut lines = doc_lines(r, doc.as_ref());
    match (inline, body) {
        (Some(line), Some(_)) => {
            lines.push(LineNode::Line(line));
            lines.push(LineNode::line("{"));
        }
        (Some(line), None) => lines.push(LineNode::Line(format!("{};", line))),
        (None, _) => {
            debug!(head, params = params.len(), "wrapping parameter list");
            lines.push(LineNode::Line(format!("{}(", head)));
            let mut entries = Lines::new();
            for param in params {
                entries.extend(suffix_last("signature", param, ",")?);
            }
            lines.push(LineNode::Block(entries));
            let close = if body.is_some() { " {" } else { ";" };
            lines.push(LineNode::Line(format!("){}{}", returns, close)));
        }
    }
    if let Some(body) = body {
        let body = expand(ctx, body.clone())?;
        if !body.is_empty() {
            lines.push(LineNode::Block(body));
        }
        lines.push(LineNode::line("}"));
    }
    Ok(lines)
}

/// The user's doc-comment plus `@param` and `@return` tags for whatever
/// the native hints cannot say.
fn callable_doc(
    r: &Renderer,
    doc: Option<&DocComment>,
    params: &[Param],
    returns: Option<&PhpType>,
) -> Option<DocComment> {
    let features = r.features();
    let mut doc = doc.cloned().unwrap_or_default();
    for param in params {
        let needs_doc = param
            .ty
            .as_ref()
            .is_some_and(|ty| ty.needs_doc(features, HintPosition::Param));
        if doc.has_param(&param.name) || !(needs_doc || param.description.is_some()) {
            continue;
        }
        let hint = param
            .ty
            .as_ref()
            .map(|ty| r.doc_hint(ty))
            .unwrap_or_else(|| "mixed".to_string());
        let name = if param.variadic {
            format!("...${}", param.name)
        } else {
            format!("${}", param.name)
        };
        let value = match &param.description {
            Some(description) => format!("{} {} {}", hint, name, description),
            None => format!("{} {}", hint, name),
        };
        doc = doc.tag("param", value);
    }
    if let Some(ty) = returns
        && !doc.has_tag("return")
        && ty.needs_doc(features, HintPosition::Return)
    {
        doc = doc.returns(r.doc_hint(ty));
    }
    (!doc.is_empty()).then_some(doc)
}

/// `[hint ][&][...]$name[ = default]`
pub(super) fn render_param(r: &Renderer, param: &Param) -> Result<Lines> {
    let mut head = String::new();
    if let Some(hint) = param
        .ty
        .as_ref()
        .and_then(|ty| r.hint(ty, HintPosition::Param))
    {
        head.push_str(&hint);
        head.push(' ');
    }
    if param.by_ref {
        head.push('&');
    }
    if param.variadic {
        head.push_str("...");
    }
    head.push('$');
    head.push_str(&param.name);
    match &param.default {
        None => Ok(text(head)),
        Some(value) => {
            let ctx = r.context();
            join(
                "param",
                [text(format!("{} = ", head)), expand(ctx, value_lines(ctx, value)?)?],
            )
        }
    }
}

pub(super) fn property_modifiers(property: &Property) -> Vec<&'static str> {
    let mut modifiers = vec![property.visibility.as_str()];
    if property.is_static {
        modifiers.push("static");
    }
    modifiers
}

/// Untyped dialects describe the property type with `@var`. The tag is
/// attached to the property the first time it is needed and holds the
/// type itself, so [`Renderer::render_doc`] spells it for the file it
/// lands in.
pub(super) fn property_doc(r: &Renderer, property: &Property) -> Option<DocComment> {
    let Some(ty) = property
        .ty
        .as_ref()
        .filter(|ty| ty.needs_doc(r.features(), HintPosition::Property))
    else {
        return property.doc_comment();
    };
    let doc = property.doc_or_attach(|| {
        debug!(property = %property.name, "attaching @var doc-comment");
        DocComment::new().var_type(ty.clone())
    });
    if doc.has_tag("var") {
        Some(doc)
    } else {
        Some(doc.var(r.doc_hint(ty)))
    }
}

pub(super) fn render_property(r: &Renderer, property: &Property, owner: &Owner<'_>) -> Result<Lines> {
    let dialect = r.dialect();
    let mut lines = doc_lines(r, dialect.property_doc(r, property).as_ref());
    let mut head: Vec<String> = dialect
        .property_modifiers(r, property, owner.readonly)
        .into_iter()
        .map(String::from)
        .collect();
    if let Some(hint) = property
        .ty
        .as_ref()
        .and_then(|ty| r.hint(ty, HintPosition::Property))
    {
        head.push(hint);
    }
    head.push(format!("${}", property.name));
    let head = head.join(" ");
    let line = match &property.default {
        None => text(format!("{};", head)),
        Some(value) => {
            let ctx = r.context();
            join(
                "property",
                [
                    text(format!("{} = ", head)),
                    expand(ctx, value_lines(ctx, value)?)?,
                    text(";"),
                ],
            )?
        }
    };
    lines.extend(line);
    Ok(lines)
}

/// `public const NAME = value;`
pub(super) fn render_constant(r: &Renderer, constant: &Constant) -> Result<Lines> {
    let ctx = r.context();
    let mut lines = doc_lines(r, constant.doc.as_ref());
    lines.extend(join(
        "constant",
        [
            text(format!(
                "{} const {} = ",
                constant.visibility.as_str(),
                constant.name
            )),
            expand(ctx, value_lines(ctx, &constant.value)?)?,
            text(";"),
        ],
    )?);
    Ok(lines)
}

fn tag_line(tag: &DocTag) -> String {
    if tag.value.is_empty() {
        format!("@{}", tag.name)
    } else {
        format!("@{} {}", tag.name, tag.value)
    }
}

/// `/** ... */`. A comment holding a single tag and no text stays on one
/// line.
pub(super) fn render_doc(doc: &DocComment) -> Lines {
    if doc.is_empty() {
        return Lines::new();
    }
    let has_text = doc.text_lines().iter().any(|l| !l.trim().is_empty());
    if let ([tag], false) = (doc.tags(), has_text) {
        return vec![LineNode::Line(format!("/** {} */", tag_line(tag)))];
    }

    let mut lines = vec![LineNode::line("/**")];
    if has_text {
        for line in doc.text_lines() {
            let line = line.trim_end();
            lines.push(LineNode::Line(if line.is_empty() {
                " *".to_string()
            } else {
                format!(" * {}", line)
            }));
        }
        if !doc.tags().is_empty() {
            lines.push(LineNode::line(" *"));
        }
    }
    for tag in doc.tags() {
        lines.push(LineNode::Line(format!(" * {}", tag_line(tag))));
    }
    lines.push(LineNode::line(" */"));
    lines
}
