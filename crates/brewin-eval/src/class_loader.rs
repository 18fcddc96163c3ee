//! Building `ClassDef`/`TClassDef` out of the input tree (§4.2): a
//! registration pass that makes every class/template name resolvable
//! regardless of declaration order, followed by a body-extraction pass
//! that turns member forms into `FieldDef`/`MethodDef`.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use brewin_core::classdef::{ClassDef, FieldDef, MethodDef, ParamDef, TClassDef};
use brewin_core::error::{BrewinResult, SemanticError};
use brewin_core::sexp::{Sexp, Token};
use brewin_core::span::Span;
use brewin_core::types::CLASS_ROOT;

use brewin_registry::{ClassRegistry, TemplateRegistry};

pub struct LoadedProgram {
    pub classes: FxHashMap<String, Rc<ClassDef>>,
    pub templates: FxHashMap<String, TClassDef>,
}

fn syntax(span: Span, message: impl Into<String>) -> SemanticError {
    SemanticError::SyntaxAt {
        message: message.into(),
        span,
    }
}

fn name_err(span: Span, message: impl Into<String>) -> SemanticError {
    SemanticError::NameAt {
        message: message.into(),
        span,
    }
}

fn as_list<'a>(form: &'a Sexp, what: &str) -> BrewinResult<(&'a [Sexp], Span)> {
    form.as_list()
        .map(|items| (items, form.span()))
        .ok_or_else(|| syntax(form.span(), format!("expected a {what} form")))
}

fn head_atom<'a>(items: &'a [Sexp], span: Span) -> BrewinResult<&'a Token> {
    items
        .first()
        .and_then(Sexp::as_atom)
        .ok_or_else(|| syntax(span, "expected a form head"))
}

fn nth_atom<'a>(items: &'a [Sexp], i: usize, span: Span, what: &str) -> BrewinResult<&'a Token> {
    items
        .get(i)
        .and_then(Sexp::as_atom)
        .ok_or_else(|| syntax(span, format!("expected {what}")))
}

fn nth<'a>(items: &'a [Sexp], i: usize, span: Span, what: &str) -> BrewinResult<&'a Sexp> {
    items
        .get(i)
        .ok_or_else(|| syntax(span, format!("expected {what}")))
}

/// Parses `(class Name ...)` / `(tclass Name (...) ...)`'s registration
/// data without touching member bodies, then registers it.
fn register_top_level(
    form: &Sexp,
    classes: &mut ClassRegistry,
    templates: &mut TemplateRegistry,
) -> BrewinResult<()> {
    let (items, span) = as_list(form, "top-level")?;
    let head = head_atom(items, span)?;
    match head.text.as_str() {
        "class" => {
            let name = nth_atom(items, 1, span, "a class name")?;
            // Optional `(inherits Parent)` as the next member, or the
            // third slot being a bare `inherits` token followed by a
            // parent name (either shape reads the same two atoms).
            let mut super_name = CLASS_ROOT.to_string();
            if let Some(Sexp::Atom(t)) = items.get(2) {
                if t.text == "inherits" {
                    let parent = nth_atom(items, 3, span, "a parent class name")?;
                    super_name = parent.text.clone();
                }
            }
            classes.register(&name.text, &super_name, name.span)
        }
        "tclass" => {
            let name = nth_atom(items, 1, span, "a template name")?;
            let params = nth(items, 2, span, "a parameter list")?;
            let (param_items, _) = as_list(params, "parameter list")?;
            templates.register(&name.text, param_items.len(), name.span)
        }
        other => Err(syntax(span, format!("unknown top-level form `{other}`"))),
    }
}

fn parse_params(list: &Sexp) -> BrewinResult<Vec<ParamDef>> {
    let (items, span) = as_list(list, "parameter list")?;
    let mut params = Vec::with_capacity(items.len());
    for item in items {
        let (pair, pspan) = as_list(item, "parameter")?;
        let ty = nth_atom(pair, 0, pspan, "a parameter type")?;
        let name = nth_atom(pair, 1, pspan, "a parameter name")?;
        if params.iter().any(|p: &ParamDef| p.name == name.text) {
            return Err(name_err(name.span, format!("duplicate parameter `{}`", name.text)));
        }
        params.push(ParamDef {
            declared_type: ty.text.clone(),
            name: name.text.clone(),
            span: pspan,
        });
    }
    Ok(params)
}

/// Extracts `FieldDef`/`MethodDef`s from a class's member forms (§4.2's
/// body-extraction pass). Used for both ordinary classes and already-
/// substituted template instantiations.
pub fn extract_members(members: &[Sexp], class_span: Span) -> BrewinResult<(Vec<FieldDef>, Vec<MethodDef>)> {
    let mut fields = Vec::new();
    let mut methods: Vec<MethodDef> = Vec::new();
    for member in members {
        let (items, span) = as_list(member, "class member")?;
        let head = head_atom(items, span)?;
        match head.text.as_str() {
            "field" => {
                let ty = nth_atom(items, 1, span, "a field type")?;
                let name = nth_atom(items, 2, span, "a field name")?;
                if fields.iter().any(|f: &FieldDef| f.name == name.text) {
                    return Err(name_err(name.span, format!("duplicate field `{}`", name.text)));
                }
                let initial = match items.get(3) {
                    Some(Sexp::Atom(t)) => Some(t.clone()),
                    Some(other) => {
                        return Err(syntax(other.span(), "field initializer must be a literal"))
                    }
                    None => None,
                };
                fields.push(FieldDef {
                    declared_type: ty.text.clone(),
                    name: name.text.clone(),
                    initial,
                    span,
                });
            }
            "method" => {
                let ret = nth_atom(items, 1, span, "a method return type")?;
                let name = nth_atom(items, 2, span, "a method name")?;
                let params_form = nth(items, 3, span, "a parameter list")?;
                let params = parse_params(params_form)?;
                let body = nth(items, 4, span, "a method body")?;
                let param_types: Vec<&str> = params.iter().map(|p| p.declared_type.as_str()).collect();
                if methods.iter().any(|m| {
                    m.name == name.text && m.params.iter().map(|p| p.declared_type.as_str()).collect::<Vec<_>>() == param_types
                }) {
                    return Err(name_err(
                        name.span,
                        format!("duplicate method `{}` with the same signature", name.text),
                    ));
                }
                methods.push(MethodDef {
                    return_type: ret.text.clone(),
                    name: name.text.clone(),
                    params,
                    body: Rc::new(body.clone()),
                    span,
                });
            }
            other => return Err(syntax(span, format!("unknown class member `{other}`"))),
        }
    }
    let _ = class_span;
    Ok((fields, methods))
}

fn build_class_def(form: &Sexp) -> BrewinResult<ClassDef> {
    let (items, span) = as_list(form, "class")?;
    let name = nth_atom(items, 1, span, "a class name")?;
    let mut super_name = CLASS_ROOT.to_string();
    let mut member_start = 2;
    if let Some(Sexp::Atom(t)) = items.get(2) {
        if t.text == "inherits" {
            let parent = nth_atom(items, 3, span, "a parent class name")?;
            super_name = parent.text.clone();
            member_start = 4;
        }
    }
    let (fields, methods) = extract_members(&items[member_start..], span)?;
    Ok(ClassDef {
        name: name.text.clone(),
        super_name,
        fields,
        methods,
        span,
    })
}

fn build_tclass_def(form: &Sexp) -> BrewinResult<TClassDef> {
    let (items, span) = as_list(form, "tclass")?;
    let name = nth_atom(items, 1, span, "a template name")?;
    let params_form = nth(items, 2, span, "a parameter list")?;
    let (param_items, pspan) = as_list(params_form, "parameter list")?;
    let mut params = Vec::with_capacity(param_items.len());
    for p in param_items {
        let t = p
            .as_atom()
            .ok_or_else(|| syntax(pspan, "template parameters must be names"))?;
        if params.contains(&t.text) {
            return Err(name_err(t.span, format!("duplicate template parameter `{}`", t.text)));
        }
        params.push(t.text.clone());
    }
    Ok(TClassDef {
        name: name.text.clone(),
        params,
        body: items[3..].to_vec(),
        span,
    })
}

/// Loads every top-level form in `program` into the registries and
/// returns the extracted class/template definitions (§4.2). Classes are
/// registered (pass 1) before any body is extracted (pass 2), so a
/// field or method may reference any class declared anywhere in the
/// program.
pub fn load_program(
    program: &[Sexp],
    classes: &mut ClassRegistry,
    templates: &mut TemplateRegistry,
) -> BrewinResult<LoadedProgram> {
    for form in program {
        register_top_level(form, classes, templates)?;
    }

    let mut out = LoadedProgram {
        classes: FxHashMap::default(),
        templates: FxHashMap::default(),
    };
    for form in program {
        let (items, span) = as_list(form, "top-level")?;
        let head = head_atom(items, span)?;
        match head.text.as_str() {
            "class" => {
                let def = build_class_def(form)?;
                out.classes.insert(def.name.clone(), Rc::new(def));
            }
            "tclass" => {
                let def = build_tclass_def(form)?;
                out.templates.insert(def.name.clone(), def);
            }
            other => return Err(syntax(span, format!("unknown top-level form `{other}`"))),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use brewin_core::sexp::Sexp;

    fn atom(s: &str) -> Sexp {
        Sexp::atom(s, Span::new(1))
    }

    fn list(items: Vec<Sexp>) -> Sexp {
        Sexp::list(items, Span::new(1))
    }

    #[test]
    fn loads_simple_class_with_a_field_and_method() {
        let program = vec![list(vec![
            atom("class"),
            atom("main"),
            list(vec![
                atom("method"),
                atom("void"),
                atom("main"),
                list(vec![]),
                list(vec![atom("print"), atom("1")]),
            ]),
        ])];
        let mut classes = ClassRegistry::new();
        let mut templates = TemplateRegistry::new();
        let loaded = load_program(&program, &mut classes, &mut templates).unwrap();
        assert!(classes.is_registered("main"));
        let def = &loaded.classes["main"];
        assert_eq!(def.methods.len(), 1);
        assert_eq!(def.methods[0].name, "main");
    }

    #[test]
    fn inherits_clause_registers_declared_super() {
        let program = vec![
            list(vec![atom("class"), atom("A")]),
            list(vec![atom("class"), atom("B"), atom("inherits"), atom("A")]),
        ];
        let mut classes = ClassRegistry::new();
        let mut templates = TemplateRegistry::new();
        load_program(&program, &mut classes, &mut templates).unwrap();
        assert_eq!(classes.super_of("B"), Some("A"));
    }

    #[test]
    fn duplicate_field_name_is_a_name_error() {
        let members = vec![
            list(vec![atom("field"), atom("int"), atom("x")]),
            list(vec![atom("field"), atom("int"), atom("x")]),
        ];
        let err = extract_members(&members, Span::new(1)).unwrap_err();
        assert_eq!(err.kind(), brewin_core::error::ErrorKind::Name);
    }

    #[test]
    fn forward_reference_to_a_later_class_is_allowed() {
        let program = vec![
            list(vec![
                atom("class"),
                atom("A"),
                list(vec![atom("field"), atom("B"), atom("b")]),
            ]),
            list(vec![atom("class"), atom("B")]),
        ];
        let mut classes = ClassRegistry::new();
        let mut templates = TemplateRegistry::new();
        assert!(load_program(&program, &mut classes, &mut templates).is_ok());
    }
}
