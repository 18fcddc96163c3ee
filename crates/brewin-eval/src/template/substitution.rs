//! Type-parameter substitution over a template body (§4.3 steps 2-4).
//! Only syntactic *type positions* are rewritten — field types, method
//! return types, formal parameter types, `new T` operands, and `let`
//! binding types — everything else (operators, identifiers, literals)
//! passes through unchanged.

use std::collections::HashMap;

use brewin_core::sexp::Sexp;
use brewin_core::types::TEMPLATE_SEP;

pub type SubstitutionMap = HashMap<String, String>;

pub fn build_substitution_map(params: &[String], args: &[String]) -> SubstitutionMap {
    params.iter().cloned().zip(args.iter().cloned()).collect()
}

/// Splits a type string by the template separator, replaces any
/// component equal to a parameter name with its mapped argument, and
/// rejoins (§4.3 step 3).
pub fn substitute_type_string(s: &str, map: &SubstitutionMap) -> String {
    s.split(TEMPLATE_SEP)
        .map(|part| map.get(part).cloned().unwrap_or_else(|| part.to_string()))
        .collect::<Vec<_>>()
        .join(&TEMPLATE_SEP.to_string())
}

fn substitute_type_atom(node: &Sexp, map: &SubstitutionMap) -> Sexp {
    match node {
        Sexp::Atom(t) => {
            let mut t = t.clone();
            t.text = substitute_type_string(&t.text, map);
            Sexp::Atom(t)
        }
        other => other.clone(),
    }
}

fn head_is(items: &[Sexp], word: &str) -> bool {
    items.first().and_then(Sexp::as_atom).map(|t| t.text.as_str()) == Some(word)
}

/// Substitutes one `(T name [init])` field-param-binding-shaped form's
/// leading type slot, leaving the rest untouched.
fn substitute_typed_pair(items: &[Sexp], span: brewin_core::span::Span, map: &SubstitutionMap) -> Sexp {
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        if i == 0 {
            out.push(substitute_type_atom(item, map));
        } else {
            out.push(item.clone());
        }
    }
    Sexp::List(out, span)
}

/// Recursively substitutes type positions throughout a member or
/// statement/expression tree (§4.3 step 4: "walked structurally so that
/// nested `new`/`call`/`let` are reached").
pub fn substitute_sexp(node: &Sexp, map: &SubstitutionMap) -> Sexp {
    let (items, span) = match node {
        Sexp::Atom(_) => return node.clone(),
        Sexp::List(items, span) => (items, *span),
    };
    if items.is_empty() {
        return Sexp::List(vec![], span);
    }

    if head_is(items, "field") {
        // (field T name [init])
        let mut out = items.clone();
        if out.len() > 1 {
            out[1] = substitute_type_atom(&out[1], map);
        }
        return Sexp::List(out, span);
    }

    if head_is(items, "method") {
        // (method R name (params) body)
        let mut out = items.clone();
        if out.len() > 1 {
            out[1] = substitute_type_atom(&out[1], map);
        }
        if let Some(Sexp::List(params, pspan)) = items.get(3) {
            let substituted_params: Vec<Sexp> = params
                .iter()
                .map(|p| match p {
                    Sexp::List(pair, s) => substitute_typed_pair(pair, *s, map),
                    other => other.clone(),
                })
                .collect();
            out[3] = Sexp::List(substituted_params, *pspan);
        }
        if let Some(body) = items.get(4) {
            out[4] = substitute_sexp(body, map);
        }
        return Sexp::List(out, span);
    }

    if head_is(items, "new") {
        // (new T)
        let mut out = items.clone();
        if out.len() > 1 {
            out[1] = substitute_type_atom(&out[1], map);
        }
        return Sexp::List(out, span);
    }

    if head_is(items, "let") {
        // (let ((T name [init])...) stmt...)
        let mut out = items.clone();
        if let Some(Sexp::List(bindings, bspan)) = items.get(1) {
            let substituted_bindings: Vec<Sexp> = bindings
                .iter()
                .map(|b| match b {
                    Sexp::List(triple, s) => {
                        let mut triple = triple.clone();
                        if !triple.is_empty() {
                            triple[0] = substitute_type_atom(&triple[0], map);
                        }
                        // the init literal, if present, carries no type position
                        Sexp::List(triple, *s)
                    }
                    other => other.clone(),
                })
                .collect();
            out[1] = Sexp::List(substituted_bindings, *bspan);
        }
        for out_item in out.iter_mut().skip(2) {
            *out_item = substitute_sexp(out_item, map);
        }
        return Sexp::List(out, span);
    }

    // Generic recursion: operators, `call`, `begin`, `if`, `while`,
    // `print`, etc. carry no type positions themselves, but may nest
    // any of the above arbitrarily deep.
    let out: Vec<Sexp> = items.iter().map(|i| substitute_sexp(i, map)).collect();
    Sexp::List(out, span)
}
