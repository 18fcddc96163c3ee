//! End-to-end scenarios exercising the public `Interpreter` API through a
//! `BufferHost`, built by hand-assembling `Sexp` trees (the lexer/parser
//! that would normally produce them is out of scope).

use brewin::{BufferHost, Interpreter};
use brewin_core::sexp::Sexp;
use brewin_core::span::Span;

fn atom(s: &str) -> Sexp {
    Sexp::atom(s, Span::new(1))
}

fn list(items: Vec<Sexp>) -> Sexp {
    Sexp::list(items, Span::new(1))
}

fn params(pairs: Vec<(&str, &str)>) -> Sexp {
    list(
        pairs
            .into_iter()
            .map(|(ty, name)| list(vec![atom(ty), atom(name)]))
            .collect(),
    )
}

fn method(ret: &str, name: &str, params_form: Sexp, body: Sexp) -> Sexp {
    list(vec![atom("method"), atom(ret), atom(name), params_form, body])
}

fn class(name: &str, members: Vec<Sexp>) -> Sexp {
    let mut items = vec![atom("class"), atom(name)];
    items.extend(members);
    list(items)
}

fn class_inheriting(name: &str, parent: &str, members: Vec<Sexp>) -> Sexp {
    let mut items = vec![atom("class"), atom(name), atom("inherits"), atom(parent)];
    items.extend(members);
    list(items)
}

fn run(program: Vec<Sexp>) -> BufferHost {
    let mut interp = Interpreter::new(BufferHost::new());
    interp.load(&program).expect("program should load");
    interp.run();
    interp.host
}

#[test]
fn integer_arithmetic_and_print() {
    let body = list(vec![
        atom("print"),
        list(vec![
            atom("+"),
            atom("3"),
            list(vec![atom("*"), atom("4"), atom("5")]),
        ]),
    ]);
    let program = vec![class(
        "main",
        vec![method("void", "main", params(vec![]), body)],
    )];

    let host = run(program);
    assert_eq!(host.output, vec!["23".to_string()]);
}

#[test]
fn inheritance_dispatches_on_the_dynamic_receiver() {
    let a = class(
        "A",
        vec![method(
            "string",
            "speak",
            params(vec![]),
            list(vec![atom("return"), atom("\"A\"")]),
        )],
    );
    let b = class_inheriting(
        "B",
        "A",
        vec![method(
            "string",
            "speak",
            params(vec![]),
            list(vec![atom("return"), atom("\"B\"")]),
        )],
    );
    let main_body = list(vec![
        atom("let"),
        list(vec![list(vec![atom("A"), atom("x")])]),
        list(vec![
            atom("set"),
            atom("x"),
            list(vec![atom("new"), atom("B")]),
        ]),
        list(vec![
            atom("print"),
            list(vec![atom("call"), atom("x"), atom("speak")]),
        ]),
    ]);
    let main = class(
        "main",
        vec![method("void", "main", params(vec![]), main_body)],
    );

    let host = run(vec![a, b, main]);
    assert_eq!(host.output, vec!["B".to_string()]);
}

#[test]
fn me_is_retained_across_inherited_dispatch() {
    let a = class(
        "A",
        vec![
            method(
                "string",
                "id",
                params(vec![]),
                list(vec![
                    atom("return"),
                    list(vec![atom("call"), atom("me"), atom("kind")]),
                ]),
            ),
            method(
                "string",
                "kind",
                params(vec![]),
                list(vec![atom("return"), atom("\"A\"")]),
            ),
        ],
    );
    let b = class_inheriting(
        "B",
        "A",
        vec![method(
            "string",
            "kind",
            params(vec![]),
            list(vec![atom("return"), atom("\"B\"")]),
        )],
    );
    let main_body = list(vec![
        atom("let"),
        list(vec![list(vec![atom("A"), atom("x")])]),
        list(vec![
            atom("set"),
            atom("x"),
            list(vec![atom("new"), atom("B")]),
        ]),
        list(vec![
            atom("print"),
            list(vec![atom("call"), atom("x"), atom("id")]),
        ]),
    ]);
    let main = class(
        "main",
        vec![method("void", "main", params(vec![]), main_body)],
    );

    let host = run(vec![a, b, main]);
    assert_eq!(host.output, vec!["B".to_string()]);
}

#[test]
#[should_panic(expected = "FAULT error")]
fn null_dereference_reaches_the_host_error_sink() {
    let a = class("A", vec![]);
    let main_body = list(vec![
        atom("let"),
        list(vec![list(vec![atom("A"), atom("x")])]),
        list(vec![atom("call"), atom("x"), atom("foo")]),
    ]);
    let main = class(
        "main",
        vec![method("void", "main", params(vec![]), main_body)],
    );

    run(vec![a, main]);
}

#[test]
fn try_catches_a_thrown_exception_and_skips_the_rest_of_the_body() {
    let main_body = list(vec![
        atom("try"),
        list(vec![
            atom("begin"),
            list(vec![atom("print"), atom("\"a\"")]),
            list(vec![atom("throw"), atom("\"boom\"")]),
            list(vec![atom("print"), atom("\"b\"")]),
        ]),
        list(vec![atom("print"), atom("\"caught \""), atom("exception")]),
    ]);
    let main = class(
        "main",
        vec![method("void", "main", params(vec![]), main_body)],
    );

    let host = run(vec![main]);
    assert_eq!(host.output, vec!["a".to_string(), "caught boom".to_string()]);
    assert_eq!(host.output.concat(), "acaught boom");
}

#[test]
fn template_specialization_defaults_the_uninitialized_field() {
    let tbox = list(vec![
        atom("tclass"),
        atom("Box"),
        list(vec![atom("T")]),
        list(vec![atom("field"), atom("T"), atom("v")]),
        method(
            "T",
            "get",
            params(vec![]),
            list(vec![atom("return"), atom("v")]),
        ),
    ]);
    let main_body = list(vec![
        atom("let"),
        list(vec![list(vec![atom("Box@int"), atom("b")])]),
        list(vec![
            atom("set"),
            atom("b"),
            list(vec![atom("new"), atom("Box@int")]),
        ]),
        list(vec![
            atom("print"),
            list(vec![atom("call"), atom("b"), atom("get")]),
        ]),
    ]);
    let main = class(
        "main",
        vec![method("void", "main", params(vec![]), main_body)],
    );

    let host = run(vec![tbox, main]);
    assert_eq!(host.output, vec!["0".to_string()]);
}
