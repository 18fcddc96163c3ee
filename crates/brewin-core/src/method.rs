use std::rc::Rc;

use crate::field::Field;
use crate::sexp::Sexp;
use crate::span::Span;
use crate::types::Type;

/// The runtime counterpart of a `MethodDef` (§3, §4.4 step 4): built
/// once per `Object` at instantiation time, with its return type and
/// each formal parameter's type already resolved, and a placeholder
/// `Field` per parameter seeded with that type's default value (the
/// shape `execute_method` clones/rebinds into an activation record).
#[derive(Debug, Clone)]
pub struct Method {
    pub name: String,
    pub return_type: Type,
    pub formals: Vec<Field>,
    pub body: Rc<Sexp>,
    pub span: Span,
}

impl Method {
    pub fn arity(&self) -> usize {
        self.formals.len()
    }

    pub fn formal_types(&self) -> Vec<&Type> {
        self.formals.iter().map(|f| f.declared_type()).collect()
    }
}
