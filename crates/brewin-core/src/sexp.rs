use std::fmt;

use crate::span::Span;

/// A single source token: its literal text plus the line it came from.
/// The lexer/parser producing these is out of scope (§1); this is the
/// shape the evaluator assumes it receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Token {
            text: text.into(),
            span,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// The already-parsed input tree (§1, §6): either a bare token or a
/// parenthesized list of sub-forms. Every `class`/`tclass`/`field`/
/// `method`/statement/expression form is a `List`; atoms (identifiers,
/// literals) are `Atom`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sexp {
    Atom(Token),
    List(Vec<Sexp>, Span),
}

impl Sexp {
    pub fn atom(text: impl Into<String>, span: Span) -> Self {
        Sexp::Atom(Token::new(text, span))
    }

    pub fn list(items: Vec<Sexp>, span: Span) -> Self {
        Sexp::List(items, span)
    }

    /// The line this node (or its first token) was parsed from.
    pub fn span(&self) -> Span {
        match self {
            Sexp::Atom(t) => t.span,
            Sexp::List(_, span) => *span,
        }
    }

    pub fn as_atom(&self) -> Option<&Token> {
        match self {
            Sexp::Atom(t) => Some(t),
            Sexp::List(..) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Sexp]> {
        match self {
            Sexp::List(items, _) => Some(items),
            Sexp::Atom(_) => None,
        }
    }

    /// The text of the head atom of a list form, e.g. `"class"` in
    /// `(class Name ...)`. `None` if this isn't a non-empty list headed
    /// by an atom.
    pub fn head_text(&self) -> Option<&str> {
        self.as_list()?
            .first()?
            .as_atom()
            .map(|t| t.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_text_reads_first_atom() {
        let span = Span::new(1);
        let form = Sexp::list(
            vec![Sexp::atom("print", span), Sexp::atom("1", span)],
            span,
        );
        assert_eq!(form.head_text(), Some("print"));
    }

    #[test]
    fn atom_has_no_head_text() {
        let a = Sexp::atom("x", Span::new(1));
        assert_eq!(a.head_text(), None);
    }
}
