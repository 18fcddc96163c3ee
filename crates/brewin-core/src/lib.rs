//! Leaf data types shared by the rest of the evaluator: source spans,
//! the semantic error taxonomy, the input S-expression tree, the Brewin
//! type system, and the runtime value/field/object/method model built
//! on top of it.
//!
//! Resolving a textual type into a `Type` and deciding subtyping both
//! need the class/template registries (`brewin-registry`), so those
//! operations live there; this crate only defines the `SubtypeRel`
//! trait registries implement, so `Field`/`Object` can type-check
//! without depending on a registry crate themselves.

pub mod classdef;
pub mod environment;
pub mod error;
pub mod field;
pub mod method;
pub mod object;
pub mod sexp;
pub mod span;
pub mod subtype;
pub mod types;
pub mod value;

pub use classdef::{ClassDef, FieldDef, MethodDef, ParamDef, TClassDef};
pub use environment::Environment;
pub use error::{BrewinResult, ErrorKind, SemanticError};
pub use field::Field;
pub use method::Method;
pub use object::{Object, ObjectRef};
pub use sexp::{Sexp, Token};
pub use span::Span;
pub use subtype::SubtypeRel;
pub use types::{Type, CLASS_ROOT, TEMPLATE_SEP};
pub use value::{Payload, Value};
