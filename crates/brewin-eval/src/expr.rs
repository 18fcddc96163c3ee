//! The expression evaluator (§4.8): atoms resolved through environment
//! -> own fields -> `super` -> literal, and compound `(op args...)`
//! forms for operators, `new`, and `call`.

use std::rc::Rc;

use brewin_core::environment::Environment;
use brewin_core::error::{BrewinResult, SemanticError};
use brewin_core::field::Field;
use brewin_core::object::ObjectRef;
use brewin_core::sexp::Sexp;
use brewin_core::span::Span;
use brewin_core::subtype::SubtypeRel;
use brewin_core::types::Type;
use brewin_core::value::Value;

use crate::host::Host;
use crate::interpreter::Interpreter;
use crate::method_call::execute_method;
use crate::status::Outcome;

fn anon(value: Value) -> Field {
    Field::new_unchecked(value.ty().clone(), "", value)
}

fn syntax(span: Span, message: impl Into<String>) -> SemanticError {
    SemanticError::SyntaxAt {
        message: message.into(),
        span,
    }
}

fn type_err(span: Span, message: impl Into<String>) -> SemanticError {
    SemanticError::TypeAt {
        message: message.into(),
        span,
    }
}

/// Evaluates an atom (§4.8's non-list case): environment, then the
/// executing object's own fields, then the reserved `super` token, then
/// a parsed literal.
fn eval_atom<H: Host>(
    interp: &Interpreter<H>,
    token: &brewin_core::sexp::Token,
    env: &Environment,
    exec_self: &ObjectRef,
) -> BrewinResult<Field> {
    if let Some(f) = env.get(&token.text) {
        return Ok(f.clone());
    }
    if let Some(f) = exec_self.borrow().field(&token.text) {
        return Ok(f.clone());
    }
    if token.text == "super" {
        let obj = exec_self.borrow();
        let super_ref = obj
            .super_obj
            .as_ref()
            .ok_or_else(|| type_err(token.span, "`super` used in a class with no super"))?;
        let super_name = super_ref.borrow().class_name().to_string();
        return Ok(Field::new_unchecked(
            Type::class(super_name.clone()),
            "super",
            Value::object(Type::class(super_name), Rc::clone(super_ref)),
        ));
    }
    let _ = interp;
    Value::parse_literal(token).map(anon)
}

/// Resolves a `call` expression's receiver token to the object to
/// dispatch on, plus an optional `me`-override (§4.8, and the `super`
/// rebind decision recorded in `DESIGN.md`).
/// Either a resolved dispatch target, or an exception raised while
/// evaluating the receiver expression that must propagate instead.
enum Receiver {
    Resolved(ObjectRef, Option<Field>),
    Exception(Field),
}

fn resolve_receiver<H: Host>(
    interp: &mut Interpreter<H>,
    receiver: &Sexp,
    env: &mut Environment,
    exec_self: &ObjectRef,
) -> BrewinResult<Receiver> {
    if let Some(tok) = receiver.as_atom() {
        if tok.text == "super" {
            let super_ref = {
                let obj = exec_self.borrow();
                obj.super_obj
                    .clone()
                    .ok_or_else(|| type_err(tok.span, "`super` used in a class with no super"))?
            };
            let super_name = super_ref.borrow().class_name().to_string();
            let me_override = Field::new_unchecked(
                Type::class(super_name.clone()),
                "me",
                Value::object(Type::class(super_name), Rc::clone(&super_ref)),
            );
            return Ok(Receiver::Resolved(super_ref, Some(me_override)));
        }
    }
    let outcome = eval_expr(interp, receiver, env, exec_self)?;
    if outcome.is_exception() {
        return Ok(Receiver::Exception(outcome.field));
    }
    match outcome.field.value().payload() {
        brewin_core::value::Payload::Object(obj) => Ok(Receiver::Resolved(Rc::clone(obj), None)),
        brewin_core::value::Payload::Null => Err(SemanticError::NullDereference { span: receiver.span() }),
        _ => Err(type_err(receiver.span(), "call receiver is not an object")),
    }
}

fn binary_int(op: &str, a: i64, b: i64, span: Span) -> BrewinResult<Value> {
    Ok(match op {
        "+" => Value::int(a + b),
        "-" => Value::int(a - b),
        "*" => Value::int(a * b),
        "/" => {
            if b == 0 {
                return Err(SemanticError::FaultAt {
                    message: "division by zero".into(),
                    span,
                });
            }
            Value::int(a / b)
        }
        "%" => {
            if b == 0 {
                return Err(SemanticError::FaultAt {
                    message: "division by zero".into(),
                    span,
                });
            }
            Value::int(a % b)
        }
        "==" => Value::bool(a == b),
        "!=" => Value::bool(a != b),
        ">" => Value::bool(a > b),
        "<" => Value::bool(a < b),
        ">=" => Value::bool(a >= b),
        "<=" => Value::bool(a <= b),
        other => return Err(syntax(span, format!("unknown integer operator `{other}`"))),
    })
}

fn binary_str(op: &str, a: &str, b: &str, span: Span) -> BrewinResult<Value> {
    Ok(match op {
        "+" => Value::string(format!("{a}{b}")),
        "==" => Value::bool(a == b),
        "!=" => Value::bool(a != b),
        ">" => Value::bool(a > b),
        "<" => Value::bool(a < b),
        ">=" => Value::bool(a >= b),
        "<=" => Value::bool(a <= b),
        other => return Err(syntax(span, format!("unknown string operator `{other}`"))),
    })
}

fn binary_bool(op: &str, a: bool, b: bool, span: Span) -> BrewinResult<Value> {
    Ok(match op {
        "&" => Value::bool(a && b),
        "|" => Value::bool(a || b),
        "==" => Value::bool(a == b),
        "!=" => Value::bool(a != b),
        other => return Err(syntax(span, format!("unknown boolean operator `{other}`"))),
    })
}

/// `(op args...)` (§4.8): strictly left-to-right operand evaluation
/// with exception propagation after the first faulting operand, then
/// dispatch keyed by the operands' shared type.
fn eval_compound<H: Host>(
    interp: &mut Interpreter<H>,
    items: &[Sexp],
    span: Span,
    env: &mut Environment,
    exec_self: &ObjectRef,
) -> BrewinResult<Outcome> {
    let head = items
        .first()
        .and_then(Sexp::as_atom)
        .ok_or_else(|| syntax(span, "expected an operator"))?;

    match head.text.as_str() {
        "new" => {
            if items.len() != 2 {
                return Err(syntax(span, "`new` takes exactly one type argument"));
            }
            let ty_tok = items[1]
                .as_atom()
                .ok_or_else(|| syntax(items[1].span(), "`new` expects a type name"))?;
            let obj = interp.instantiate(&ty_tok.text, ty_tok.span)?;
            let ty = interp.str_to_type(&ty_tok.text, ty_tok.span)?;
            Ok(Outcome::proceed(anon(Value::object(ty, obj))))
        }
        "call" => {
            if items.len() < 3 {
                return Err(syntax(span, "`call` takes a receiver and a method name"));
            }
            let (receiver_obj, me_override) = match resolve_receiver(interp, &items[1], env, exec_self)? {
                Receiver::Resolved(obj, ov) => (obj, ov),
                Receiver::Exception(field) => return Ok(Outcome::exception(field)),
            };
            let method_name = items[2]
                .as_atom()
                .ok_or_else(|| syntax(items[2].span(), "expected a method name"))?;

            let mut args = Vec::with_capacity(items.len() - 3);
            for arg_expr in &items[3..] {
                let out = eval_expr(interp, arg_expr, env, exec_self)?;
                if out.is_exception() {
                    return Ok(out);
                }
                args.push(out.field);
            }

            let (status, field) =
                execute_method(interp, &receiver_obj, &method_name.text, &args, me_override, span)?;
            Ok(Outcome { status, field })
        }
        "!" => {
            if items.len() != 2 {
                return Err(syntax(span, "`!` takes exactly one operand"));
            }
            let out = eval_expr(interp, &items[1], env, exec_self)?;
            if out.is_exception() {
                return Ok(out);
            }
            let b = out
                .field
                .value()
                .as_bool()
                .ok_or_else(|| type_err(span, "`!` requires a bool operand"))?;
            Ok(Outcome::proceed(anon(Value::bool(!b))))
        }
        op => {
            if items.len() != 3 {
                return Err(syntax(span, format!("`{op}` takes exactly two operands")));
            }
            let lhs = eval_expr(interp, &items[1], env, exec_self)?;
            if lhs.is_exception() {
                return Ok(lhs);
            }
            let rhs = eval_expr(interp, &items[2], env, exec_self)?;
            if rhs.is_exception() {
                return Ok(rhs);
            }
            let (a, b) = (lhs.field.value(), rhs.field.value());
            let result = match (a.payload(), b.payload()) {
                (brewin_core::value::Payload::Int(x), brewin_core::value::Payload::Int(y)) => {
                    binary_int(op, *x, *y, span)?
                }
                (brewin_core::value::Payload::Str(x), brewin_core::value::Payload::Str(y)) => {
                    binary_str(op, x, y, span)?
                }
                (brewin_core::value::Payload::Bool(x), brewin_core::value::Payload::Bool(y)) => {
                    binary_bool(op, *x, *y, span)?
                }
                (brewin_core::value::Payload::Object(x), brewin_core::value::Payload::Object(y)) => {
                    eval_object_cmp(op, x, y, a.ty(), b.ty(), &interp.classes, span)?
                }
                (brewin_core::value::Payload::Null, brewin_core::value::Payload::Object(_))
                | (brewin_core::value::Payload::Object(_), brewin_core::value::Payload::Null) => {
                    eval_null_cmp(op, false, span)?
                }
                (brewin_core::value::Payload::Null, brewin_core::value::Payload::Null) => {
                    eval_null_cmp(op, true, span)?
                }
                _ => {
                    return Err(type_err(
                        span,
                        format!("operator `{op}` not defined for `{}` and `{}`", a.ty(), b.ty()),
                    ))
                }
            };
            Ok(Outcome::proceed(anon(result)))
        }
    }
}

fn eval_object_cmp(
    op: &str,
    x: &ObjectRef,
    y: &ObjectRef,
    tx: &Type,
    ty: &Type,
    classes: &brewin_registry::ClassRegistry,
    span: Span,
) -> BrewinResult<Value> {
    if !(classes.is_subtype(tx, ty) || classes.is_subtype(ty, tx)) {
        return Err(type_err(span, format!("cannot compare `{tx}` with `{ty}`")));
    }
    let same = Rc::ptr_eq(x, y);
    match op {
        "==" => Ok(Value::bool(same)),
        "!=" => Ok(Value::bool(!same)),
        other => Err(syntax(span, format!("unknown object operator `{other}`"))),
    }
}

/// `null == null` is `true`; a live object reference is never equal to
/// `null` (§3's reference-identity rule — a non-null reference can't
/// alias the null sentinel).
fn eval_null_cmp(op: &str, same: bool, span: Span) -> BrewinResult<Value> {
    match op {
        "==" => Ok(Value::bool(same)),
        "!=" => Ok(Value::bool(!same)),
        other => Err(syntax(span, format!("unknown null operator `{other}`"))),
    }
}

pub fn eval_expr<H: Host>(
    interp: &mut Interpreter<H>,
    node: &Sexp,
    env: &mut Environment,
    exec_self: &ObjectRef,
) -> BrewinResult<Outcome> {
    match node {
        Sexp::Atom(tok) => Ok(Outcome::proceed(eval_atom(interp, tok, env, exec_self)?)),
        Sexp::List(items, span) => {
            if items.is_empty() {
                return Err(syntax(*span, "empty expression"));
            }
            eval_compound(interp, items, *span, env, exec_self)
        }
    }
}
