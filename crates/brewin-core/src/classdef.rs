use std::rc::Rc;

use crate::sexp::{Sexp, Token};
use crate::span::Span;

/// `(T name)` inside a method's parameter list.
#[derive(Debug, Clone)]
pub struct ParamDef {
    pub declared_type: String,
    pub name: String,
    pub span: Span,
}

/// A `(field T name [initial])` form, as extracted by the body-extraction
/// pass (§4.2). `declared_type` is kept as source text rather than a
/// resolved `Type`, because resolving it requires the class/template
/// registries and happens again at each `instantiate` (§4.4) — mirroring
/// how the original source re-parses type strings per instantiation
/// rather than caching a resolved type on the definition.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub declared_type: String,
    pub name: String,
    pub initial: Option<Token>,
    pub span: Span,
}

/// A `(method R name (params) stmt)` form.
#[derive(Debug, Clone)]
pub struct MethodDef {
    pub return_type: String,
    pub name: String,
    pub params: Vec<ParamDef>,
    pub body: Rc<Sexp>,
    pub span: Span,
}

impl MethodDef {
    /// The formal-parameter-type tuple, used for overload distinctness
    /// checks (§8) and as the textual signature key.
    pub fn param_types(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.declared_type.as_str()).collect()
    }
}

/// A class, ready to be instantiated (§4.2). For a specialized template
/// instantiation, `name` is the mangled string (`Base@A1@...@An`) and
/// `super_name` is always `CLASS_ROOT` (§4.3 step 3: "with no parent,
/// implicit `CLASS`").
#[derive(Debug, Clone)]
pub struct ClassDef {
    pub name: String,
    pub super_name: String,
    pub fields: Vec<FieldDef>,
    pub methods: Vec<MethodDef>,
    pub span: Span,
}

impl ClassDef {
    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodDef> {
        self.methods.iter().filter(move |m| m.name == name)
    }
}

/// An unspecialized `(tclass Name (P1 P2 ...) member...)` form (§4.3).
/// `body` holds the raw member forms to be walked and type-substituted
/// per concrete argument tuple; it is never itself registered as a type.
#[derive(Debug, Clone)]
pub struct TClassDef {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Sexp>,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn methods_named_filters_by_name() {
        let span = Span::new(1);
        let def = ClassDef {
            name: "A".into(),
            super_name: crate::types::CLASS_ROOT.to_string(),
            fields: vec![],
            methods: vec![
                MethodDef {
                    return_type: "int".into(),
                    name: "f".into(),
                    params: vec![],
                    body: Rc::new(Sexp::list(vec![], span)),
                    span,
                },
                MethodDef {
                    return_type: "int".into(),
                    name: "g".into(),
                    params: vec![],
                    body: Rc::new(Sexp::list(vec![], span)),
                    span,
                },
            ],
            span,
        };
        assert_eq!(def.methods_named("f").count(), 1);
        assert_eq!(def.methods_named("missing").count(), 0);
    }
}
