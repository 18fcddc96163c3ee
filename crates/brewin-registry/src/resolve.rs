use brewin_core::error::{BrewinResult, SemanticError};
use brewin_core::span::Span;
use brewin_core::types::{split_template, Type};

use crate::class_registry::ClassRegistry;
use crate::template_registry::TemplateRegistry;

/// `str_to_type(s)` (§4.1): the exact primitive tokens map to the
/// primitive tags (`void` -> `Nothing`); any other token is a class
/// name, valid if registered; a name containing the template separator
/// must name a registered template of matching arity whose arguments
/// are themselves valid types (recursively — this also validates
/// templates-of-templates like `Box@Box@int`).
pub fn str_to_type(
    s: &str,
    classes: &ClassRegistry,
    templates: &TemplateRegistry,
    span: Span,
) -> BrewinResult<Type> {
    match s {
        "int" => return Ok(Type::Int),
        "string" => return Ok(Type::Str),
        "bool" => return Ok(Type::Bool),
        "null" => return Ok(Type::Null),
        "void" => return Ok(Type::Nothing),
        _ => {}
    }

    if let Some((base, args)) = split_template(s) {
        let arity = templates.arity_of(base).ok_or_else(|| SemanticError::UnknownType {
            found: s.to_string(),
            span,
        })?;
        if arity != args.len() {
            return Err(SemanticError::UnknownType {
                found: s.to_string(),
                span,
            });
        }
        for arg in &args {
            str_to_type(arg, classes, templates, span)?;
        }
        return Ok(Type::class(s));
    }

    if classes.is_registered(s) {
        Ok(Type::class(s))
    } else {
        Err(SemanticError::UnknownType {
            found: s.to_string(),
            span,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_primitives() {
        let classes = ClassRegistry::new();
        let templates = TemplateRegistry::new();
        assert_eq!(
            str_to_type("void", &classes, &templates, Span::new(1)).unwrap(),
            Type::Nothing
        );
    }

    #[test]
    fn resolves_registered_class() {
        let mut classes = ClassRegistry::new();
        classes.register("Person", brewin_core::types::CLASS_ROOT, Span::new(1)).unwrap();
        let templates = TemplateRegistry::new();
        assert_eq!(
            str_to_type("Person", &classes, &templates, Span::new(2)).unwrap(),
            Type::class("Person")
        );
    }

    #[test]
    fn resolves_template_instantiation_with_matching_arity() {
        let classes = ClassRegistry::new();
        let mut templates = TemplateRegistry::new();
        templates.register("Box", 1, Span::new(1)).unwrap();
        assert_eq!(
            str_to_type("Box@int", &classes, &templates, Span::new(2)).unwrap(),
            Type::class("Box@int")
        );
        assert!(str_to_type("Box@int@string", &classes, &templates, Span::new(3)).is_err());
    }

    #[test]
    fn rejects_unknown_name() {
        let classes = ClassRegistry::new();
        let templates = TemplateRegistry::new();
        assert!(str_to_type("Ghost", &classes, &templates, Span::new(1)).is_err());
    }
}
