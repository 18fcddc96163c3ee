use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::classdef::ClassDef;
use crate::error::{BrewinResult, SemanticError};
use crate::field::Field;
use crate::method::Method;
use crate::span::Span;
use crate::subtype::SubtypeRel;
use crate::types::Type;

/// A runtime instance is always accessed through a shared, mutable
/// handle: fields of class type hold one of these (§4.6's "bind the
/// argument Field by reference"), so multiple Fields can alias the same
/// Object.
pub type ObjectRef = Rc<RefCell<Object>>;

/// A runtime instance of a `ClassDef` (§3). `super_obj` is the
/// parent-class slice of this object's state, constructed recursively
/// at instantiation time and reachable only through this object (§3's
/// "owns (exclusively) its super-instance").
#[derive(Debug)]
pub struct Object {
    pub class_def: Rc<ClassDef>,
    pub fields: FxHashMap<String, Field>,
    pub methods: FxHashMap<String, Vec<Rc<Method>>>,
    pub super_obj: Option<ObjectRef>,
}

impl Object {
    pub fn new(class_def: Rc<ClassDef>) -> Self {
        Object {
            class_def,
            fields: FxHashMap::default(),
            methods: FxHashMap::default(),
            super_obj: None,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_def.name
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.get_mut(name)
    }

    /// Overload resolution (§4.5): search this object's own methods
    /// first, matching `name` and requiring every argument's dynamic
    /// type to be a subtype of the corresponding formal's declared type
    /// (arities must also match). First match wins, walking own methods
    /// then the super chain; no most-specific disambiguation beyond
    /// declaration order.
    ///
    /// Returns the object the match was found on (`self` or a clone of
    /// some ancestor's handle) alongside the matched method. Call
    /// `get_method` on a borrow obtained from an `ObjectRef` so the
    /// returned handle is a real alias, not a dangling clone.
    pub fn get_method(
        &self,
        name: &str,
        arg_types: &[Type],
        rel: &impl SubtypeRel,
        self_ref: &ObjectRef,
        call_span: Span,
    ) -> BrewinResult<(ObjectRef, Rc<Method>)> {
        if let Some(candidates) = self.methods.get(name) {
            for m in candidates {
                if Self::signature_matches(m, arg_types, rel) {
                    return Ok((Rc::clone(self_ref), Rc::clone(m)));
                }
            }
        }
        if let Some(super_ref) = &self.super_obj {
            let found = super_ref.borrow().get_method(name, arg_types, rel, super_ref, call_span);
            if found.is_ok() {
                return found;
            }
        }
        Err(SemanticError::NoMatchingMethod {
            name: name.to_string(),
            span: call_span,
        })
    }

    fn signature_matches(method: &Method, arg_types: &[Type], rel: &impl SubtypeRel) -> bool {
        if method.arity() != arg_types.len() {
            return false;
        }
        method
            .formal_types()
            .iter()
            .zip(arg_types)
            .all(|(formal, arg)| rel.is_subtype(arg, formal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classdef::ClassDef;
    use crate::sexp::Sexp;
    use crate::subtype::NoHierarchy;

    fn empty_class(name: &str) -> Rc<ClassDef> {
        let span = Span::new(1);
        Rc::new(ClassDef {
            name: name.to_string(),
            super_name: crate::types::CLASS_ROOT.to_string(),
            fields: vec![],
            methods: vec![],
            span,
        })
    }

    fn method(name: &str, formal_types: Vec<Type>) -> Rc<Method> {
        Rc::new(Method {
            name: name.to_string(),
            return_type: Type::Nothing,
            formals: formal_types
                .into_iter()
                .enumerate()
                .map(|(i, t)| Field::default_for(t, format!("p{i}")))
                .collect(),
            body: Rc::new(Sexp::list(vec![], Span::new(1))),
            span: Span::new(1),
        })
    }

    #[test]
    fn finds_own_method_by_arity_and_type() {
        let obj = Rc::new(RefCell::new(Object::new(empty_class("A"))));
        obj.borrow_mut()
            .methods
            .insert("f".into(), vec![method("f", vec![Type::Int])]);
        let (found_on, m) = obj
            .borrow()
            .get_method("f", &[Type::Int], &NoHierarchy, &obj, Span::new(1))
            .unwrap();
        assert!(Rc::ptr_eq(&found_on, &obj));
        assert_eq!(m.name, "f");
    }

    #[test]
    fn falls_through_to_super_chain() {
        let child = Rc::new(RefCell::new(Object::new(empty_class("B"))));
        let parent = Rc::new(RefCell::new(Object::new(empty_class("A"))));
        parent
            .borrow_mut()
            .methods
            .insert("speak".into(), vec![method("speak", vec![])]);
        child.borrow_mut().super_obj = Some(Rc::clone(&parent));

        let (found_on, m) = child
            .borrow()
            .get_method("speak", &[], &NoHierarchy, &child, Span::new(1))
            .unwrap();
        assert!(Rc::ptr_eq(&found_on, &parent));
        assert_eq!(m.name, "speak");
    }

    #[test]
    fn unmatched_name_is_a_name_error() {
        let obj = Rc::new(RefCell::new(Object::new(empty_class("A"))));
        let err = obj
            .borrow()
            .get_method("missing", &[], &NoHierarchy, &obj, Span::new(9))
            .unwrap_err();
        assert_eq!(err.span(), Span::new(9));
    }
}
