//! The statement evaluator (§4.7): dispatch on the head token, uniform
//! `(Status, Field)` return convention.

use brewin_core::environment::Environment;
use brewin_core::error::{BrewinResult, SemanticError};
use brewin_core::field::Field;
use brewin_core::object::ObjectRef;
use brewin_core::sexp::Sexp;
use brewin_core::span::Span;
use brewin_core::types::Type;
use brewin_core::value::Value;

use crate::expr::eval_expr;
use crate::host::Host;
use crate::interpreter::Interpreter;
use crate::status::Outcome;

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

fn anon(value: Value) -> Field {
    Field::new_unchecked(value.ty().clone(), "", value)
}

fn nothing_outcome() -> Outcome {
    Outcome::proceed(anon(Value::nothing()))
}

/// Assigns through the `set`/`inputi`/`inputs` resolution order: the
/// environment first, then the executing object's own fields (§4.7).
fn assign_named<H: Host>(
    interp: &Interpreter<H>,
    env: &mut Environment,
    exec_self: &ObjectRef,
    name: &str,
    value: Value,
    span: Span,
) -> BrewinResult<()> {
    if matches!(value.ty(), Type::Nothing) {
        return Err(type_err(span, "cannot assign `nothing` to a variable"));
    }
    if let Some(field) = env.get_mut(name) {
        return field.assign(value, &interp.classes, span);
    }
    let mut obj = exec_self.borrow_mut();
    if let Some(field) = obj.field_mut(name) {
        return field.assign(value, &interp.classes, span);
    }
    Err(SemanticError::UnknownIdentifier {
        name: name.to_string(),
        span,
    })
}

fn eval_cond<H: Host>(
    interp: &mut Interpreter<H>,
    cond: &Sexp,
    env: &mut Environment,
    exec_self: &ObjectRef,
) -> BrewinResult<Result<bool, Outcome>> {
    let out = eval_expr(interp, cond, env, exec_self)?;
    if out.is_exception() {
        return Ok(Err(out));
    }
    match out.field.value().as_bool() {
        Some(b) => Ok(Ok(b)),
        None => Err(type_err(cond.span(), "condition must be bool")),
    }
}

pub fn eval_stmt<H: Host>(
    interp: &mut Interpreter<H>,
    node: &Sexp,
    env: &mut Environment,
    exec_self: &ObjectRef,
) -> BrewinResult<Outcome> {
    let items = node
        .as_list()
        .ok_or_else(|| syntax(node.span(), "expected a statement"))?;
    let stmt_span = node.span();
    let head = items
        .first()
        .and_then(Sexp::as_atom)
        .ok_or_else(|| syntax(stmt_span, "expected a statement head"))?;

    match head.text.as_str() {
        "begin" => {
            for s in &items[1..] {
                let out = eval_stmt(interp, s, env, exec_self)?;
                if !out.is_proceed() {
                    return Ok(out);
                }
            }
            Ok(nothing_outcome())
        }
        "set" => {
            let name = items
                .get(1)
                .and_then(Sexp::as_atom)
                .ok_or_else(|| syntax(stmt_span, "expected a variable name"))?;
            let rhs = eval_expr(interp, &items[2], env, exec_self)?;
            if rhs.is_exception() {
                return Ok(rhs);
            }
            assign_named(interp, env, exec_self, &name.text, rhs.field.value().clone(), stmt_span)?;
            Ok(nothing_outcome())
        }
        "if" => {
            let cond_ok = eval_cond(interp, &items[1], env, exec_self)?;
            let cond = match cond_ok {
                Ok(c) => c,
                Err(exc) => return Ok(exc),
            };
            if cond {
                eval_stmt(interp, &items[2], env, exec_self)
            } else if let Some(else_branch) = items.get(3) {
                eval_stmt(interp, else_branch, env, exec_self)
            } else {
                Ok(nothing_outcome())
            }
        }
        "while" => loop {
            let cond_ok = eval_cond(interp, &items[1], env, exec_self)?;
            let cond = match cond_ok {
                Ok(c) => c,
                Err(exc) => return Ok(exc),
            };
            if !cond {
                return Ok(nothing_outcome());
            }
            let out = eval_stmt(interp, &items[2], env, exec_self)?;
            if !out.is_proceed() {
                return Ok(out);
            }
        },
        "call" => {
            let out = eval_expr(interp, node, env, exec_self)?;
            // Statement form discards the return value, but an
            // EXCEPTION must still propagate (§4.7).
            if out.is_exception() {
                Ok(out)
            } else {
                Ok(nothing_outcome())
            }
        }
        "return" => match items.get(1) {
            None => Ok(Outcome::ret(anon(Value::nothing()))),
            Some(expr) => {
                let out = eval_expr(interp, expr, env, exec_self)?;
                if out.is_exception() {
                    Ok(out)
                } else {
                    Ok(Outcome::ret(out.field))
                }
            }
        },
        "inputi" => {
            let name = items
                .get(1)
                .and_then(Sexp::as_atom)
                .ok_or_else(|| syntax(stmt_span, "expected a variable name"))?;
            let line = interp.host.get_input();
            let n: i64 = line.trim().parse().map_err(|_| {
                type_err(stmt_span, format!("`{line}` is not a valid integer"))
            })?;
            assign_named(interp, env, exec_self, &name.text, Value::int(n), stmt_span)?;
            Ok(nothing_outcome())
        }
        "inputs" => {
            let name = items
                .get(1)
                .and_then(Sexp::as_atom)
                .ok_or_else(|| syntax(stmt_span, "expected a variable name"))?;
            let line = interp.host.get_input();
            assign_named(interp, env, exec_self, &name.text, Value::string(line), stmt_span)?;
            Ok(nothing_outcome())
        }
        "print" => {
            let mut out_line = String::new();
            for expr in &items[1..] {
                let out = eval_expr(interp, expr, env, exec_self)?;
                if out.is_exception() {
                    return Ok(out);
                }
                match out.field.value().payload() {
                    brewin_core::value::Payload::Object(_) | brewin_core::value::Payload::Null => {
                        return Err(type_err(
                            expr.span(),
                            format!("cannot print a value of type `{}`", out.field.value().ty()),
                        ))
                    }
                    payload => out_line.push_str(&payload.to_string()),
                }
            }
            interp.host.output(&out_line);
            Ok(nothing_outcome())
        }
        "let" => {
            let bindings = items
                .get(1)
                .and_then(Sexp::as_list)
                .ok_or_else(|| syntax(stmt_span, "expected a binding list"))?;
            let mut inner = env.enter();
            let mut seen = Vec::with_capacity(bindings.len());
            for binding in bindings {
                let (triple, bspan) = (
                    binding
                        .as_list()
                        .ok_or_else(|| syntax(stmt_span, "expected a binding"))?,
                    binding.span(),
                );
                let ty_tok = triple
                    .first()
                    .and_then(Sexp::as_atom)
                    .ok_or_else(|| syntax(bspan, "expected a declared type"))?;
                let name_tok = triple
                    .get(1)
                    .and_then(Sexp::as_atom)
                    .ok_or_else(|| syntax(bspan, "expected a binding name"))?;
                if seen.contains(&name_tok.text) {
                    return Err(SemanticError::Duplicate {
                        what: "local",
                        name: name_tok.text.clone(),
                        span: bspan,
                    });
                }
                seen.push(name_tok.text.clone());

                let declared = interp.str_to_type(&ty_tok.text, ty_tok.span)?;
                let value = match triple.get(2) {
                    Some(init_atom) => {
                        let tok = init_atom
                            .as_atom()
                            .ok_or_else(|| syntax(init_atom.span(), "expected a literal"))?;
                        Value::parse_literal(tok)?
                    }
                    None => Value::default_for(&declared),
                };
                let mut field = Field::default_for(declared, name_tok.text.clone());
                field.assign(value, &interp.classes, bspan)?;
                inner.bind(field);
            }

            let mut outcome = nothing_outcome();
            for s in &items[2..] {
                let out = eval_stmt(interp, s, &mut inner, exec_self)?;
                if !out.is_proceed() {
                    outcome = out;
                    break;
                }
                outcome = out;
            }
            Ok(outcome)
        }
        "throw" => {
            let out = eval_expr(interp, &items[1], env, exec_self)?;
            if out.is_exception() {
                return Ok(out);
            }
            if out.field.value().as_str().is_none() {
                return Err(type_err(stmt_span, "`throw` requires a string expression"));
            }
            Ok(Outcome::exception(out.field))
        }
        "try" => {
            let body_out = eval_stmt(interp, &items[1], env, exec_self)?;
            if !body_out.is_exception() {
                return Ok(body_out);
            }
            let mut inner = env.enter();
            inner.bind(Field::new_unchecked(
                Type::Str,
                "exception",
                body_out.field.value().clone(),
            ));
            eval_stmt(interp, &items[2], &mut inner, exec_self)
        }
        other => Err(syntax(stmt_span, format!("unknown statement `{other}`"))),
    }
}
