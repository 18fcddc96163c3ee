//! Method invocation (§4.6): overload resolution, activation-record
//! construction (the `me`-override invariant, by-reference object
//! parameters vs. by-value primitive parameters), body execution, and
//! return-value type-checking.

use std::rc::Rc;

use brewin_core::environment::Environment;
use brewin_core::error::{BrewinResult, SemanticError};
use brewin_core::field::Field;
use brewin_core::object::ObjectRef;
use brewin_core::span::Span;
use brewin_core::subtype::SubtypeRel;
use brewin_core::types::Type;
use brewin_core::value::Value;

use crate::host::Host;
use crate::interpreter::Interpreter;
use crate::stmt::eval_stmt;
use crate::status::Status;

/// `execute_method(name, args, line, me_override)` (§4.6).
///
/// `receiver` is the object to start overload resolution from: the
/// original receiver for an ordinary call, or the super-object for an
/// explicit `call super ...` (in which case `me_override` is already
/// `Some`, carrying the rebound `me` per the decision recorded in
/// `DESIGN.md`).
pub fn execute_method<H: Host>(
    interp: &mut Interpreter<H>,
    receiver: &ObjectRef,
    method_name: &str,
    args: &[Field],
    me_override: Option<Field>,
    call_span: Span,
) -> BrewinResult<(Status, Field)> {
    let arg_types: Vec<Type> = args.iter().map(|f| f.declared_type().clone()).collect();

    let (found_on, method) = {
        let obj = receiver.borrow();
        obj.get_method(method_name, &arg_types, &interp.classes, receiver, call_span)?
    };

    let mut env = Environment::new();
    let me_field = me_override.unwrap_or_else(|| {
        let class_name = receiver.borrow().class_name().to_string();
        Field::new_unchecked(
            Type::class(class_name.clone()),
            "me",
            Value::object(Type::class(class_name), Rc::clone(receiver)),
        )
    });
    env.bind(me_field);

    for (formal, arg) in method.formals.iter().zip(args) {
        let mut bound = Field::default_for(formal.declared_type().clone(), formal.name().to_string());
        // Object-typed formals alias the caller's object (Value::clone
        // clones the underlying `Rc`, not the `Object`); primitive
        // formals get an independent copy, since `Value::clone` owns
        // its int/string/bool payload outright.
        bound.assign(arg.value().clone(), &interp.classes, call_span)?;
        env.bind(bound);
    }

    let outcome = eval_stmt(interp, &method.body, &mut env, &found_on)?;

    match outcome.status {
        Status::Exception => Ok((Status::Exception, outcome.field)),
        Status::Return => {
            let dyn_ty = outcome.field.value().ty().clone();
            if matches!(dyn_ty, Type::Nothing) {
                Ok((
                    Status::Proceed,
                    Field::default_for(method.return_type.clone(), ""),
                ))
            } else if SubtypeRel::is_subtype(&interp.classes, &dyn_ty, &method.return_type) {
                Ok((Status::Proceed, outcome.field))
            } else {
                Err(SemanticError::TypeMismatch {
                    expected: method.return_type.to_string(),
                    found: dyn_ty.to_string(),
                    span: call_span,
                })
            }
        }
        Status::Proceed => Ok((Status::Proceed, Field::default_for(method.return_type.clone(), ""))),
    }
}
