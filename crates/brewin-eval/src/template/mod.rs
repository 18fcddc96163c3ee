pub mod cache;
pub mod substitution;

use std::rc::Rc;

use rustc_hash::FxHashMap;

use brewin_core::classdef::{ClassDef, TClassDef};
use brewin_core::error::BrewinResult;
use brewin_core::span::Span;
use brewin_core::types::split_template;

use brewin_registry::{ClassRegistry, TemplateRegistry};

use crate::class_loader::extract_members;
use cache::TemplateInstanceCache;
use substitution::{build_substitution_map, substitute_sexp};

/// Lazily specializes `mangled_name` (e.g. `"Box@int"`) into a concrete
/// `ClassDef`, registering and caching it the first time (§4.3 step 5).
/// Subsequent calls for the same mangled name return the cached `Rc`
/// unchanged (§8's template idempotence).
///
/// Arity is checked against `templates` before anything else (§4.3 step
/// 1): a mismatched `Name@A1@...@An` fails before `classes`/`cache` are
/// touched, so a bad instantiation never leaves a bogus entry behind.
pub fn specialize(
    mangled_name: &str,
    tclasses: &FxHashMap<String, TClassDef>,
    templates: &TemplateRegistry,
    classes: &mut ClassRegistry,
    cache: &mut TemplateInstanceCache,
    span: Span,
) -> BrewinResult<Rc<ClassDef>> {
    if let Some(cached) = cache.get(mangled_name) {
        return Ok(cached);
    }

    let (base, args) = split_template(mangled_name).ok_or_else(|| {
        brewin_core::error::SemanticError::UnknownType {
            found: mangled_name.to_string(),
            span,
        }
    })?;

    let arity = templates.arity_of(base).ok_or_else(|| brewin_core::error::SemanticError::UnknownType {
        found: mangled_name.to_string(),
        span,
    })?;
    if arity != args.len() {
        return Err(brewin_core::error::SemanticError::UnknownType {
            found: mangled_name.to_string(),
            span,
        });
    }

    let tdef = tclasses.get(base).ok_or_else(|| brewin_core::error::SemanticError::UnknownType {
        found: mangled_name.to_string(),
        span,
    })?;

    let args: Vec<String> = args.into_iter().map(|s| s.to_string()).collect();
    let map = build_substitution_map(&tdef.params, &args);
    let substituted_members: Vec<_> = tdef.body.iter().map(|m| substitute_sexp(m, &map)).collect();

    let (fields, methods) = extract_members(&substituted_members, tdef.span)?;
    let super_name = brewin_core::types::CLASS_ROOT.to_string();

    if !classes.is_registered(mangled_name) {
        classes.register(mangled_name, &super_name, span)?;
    }

    let def = Rc::new(ClassDef {
        name: mangled_name.to_string(),
        super_name,
        fields,
        methods,
        span: tdef.span,
    });
    cache.insert(mangled_name.to_string(), Rc::clone(&def));
    Ok(def)
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
    fn specializes_and_caches_box_of_int() {
        let mut tclasses = FxHashMap::default();
        tclasses.insert(
            "Box".to_string(),
            TClassDef {
                name: "Box".into(),
                params: vec!["T".into()],
                body: vec![
                    list(vec![atom("field"), atom("T"), atom("v")]),
                    list(vec![
                        atom("method"),
                        atom("T"),
                        atom("get"),
                        list(vec![]),
                        list(vec![atom("return"), atom("v")]),
                    ]),
                ],
                span: Span::new(1),
            },
        );
        let mut templates = TemplateRegistry::new();
        templates.register("Box", 1, Span::new(1)).unwrap();
        let mut classes = ClassRegistry::new();
        let mut cache = TemplateInstanceCache::new();

        let first = specialize("Box@int", &tclasses, &templates, &mut classes, &mut cache, Span::new(2)).unwrap();
        assert_eq!(first.fields[0].declared_type, "int");

        let second = specialize("Box@int", &tclasses, &templates, &mut classes, &mut cache, Span::new(3)).unwrap();
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn rejects_mismatched_arity_without_registering_or_caching() {
        let mut tclasses = FxHashMap::default();
        tclasses.insert(
            "Box".to_string(),
            TClassDef {
                name: "Box".into(),
                params: vec!["T".into()],
                body: vec![list(vec![atom("field"), atom("T"), atom("v")])],
                span: Span::new(1),
            },
        );
        let mut templates = TemplateRegistry::new();
        templates.register("Box", 1, Span::new(1)).unwrap();
        let mut classes = ClassRegistry::new();
        let mut cache = TemplateInstanceCache::new();

        let err = specialize("Box@int@string", &tclasses, &templates, &mut classes, &mut cache, Span::new(2));
        assert!(err.is_err());
        assert!(!classes.is_registered("Box@int@string"));
        assert!(cache.get("Box@int@string").is_none());
    }
}
