use std::fmt;

use thiserror::Error;

use crate::span::Span;

/// The four-way error taxonomy the host's `error` sink observes (§6, §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Name,
    Type,
    Fault,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Syntax => "SYNTAX",
            ErrorKind::Name => "NAME",
            ErrorKind::Type => "TYPE",
            ErrorKind::Fault => "FAULT",
        };
        f.write_str(s)
    }
}

/// An unrecoverable semantic error, carrying the source line it was
/// raised at. Distinct from `Status::Exception` (§4.9): this is the
/// `Result` channel used by pure helpers (§2.1), not the language-level
/// `throw`/`try` mechanism.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SemanticError {
    #[error("at {span}: unknown statement or operator `{head}`")]
    Syntax { head: String, span: Span },

    #[error("at {span}: {message}")]
    SyntaxAt { message: String, span: Span },

    #[error("at {span}: no method {name} matches the calling signature")]
    NoMatchingMethod { name: String, span: Span },

    #[error("at {span}: unknown identifier `{name}`")]
    UnknownIdentifier { name: String, span: Span },

    #[error("at {span}: duplicate {what} `{name}`")]
    Duplicate {
        what: &'static str,
        name: String,
        span: Span,
    },

    #[error("at {span}: {message}")]
    NameAt { message: String, span: Span },

    #[error("at {span}: `{found}` is not a valid type")]
    UnknownType { found: String, span: Span },

    #[error("at {span}: expected type `{expected}`, found `{found}`")]
    TypeMismatch {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("at {span}: {message}")]
    TypeAt { message: String, span: Span },

    #[error("at {span}: null dereference")]
    NullDereference { span: Span },

    #[error("at {span}: {message}")]
    FaultAt { message: String, span: Span },
}

impl SemanticError {
    pub fn kind(&self) -> ErrorKind {
        use SemanticError::*;
        match self {
            Syntax { .. } | SyntaxAt { .. } => ErrorKind::Syntax,
            NoMatchingMethod { .. } | UnknownIdentifier { .. } | Duplicate { .. } | NameAt { .. } => {
                ErrorKind::Name
            }
            UnknownType { .. } | TypeMismatch { .. } | TypeAt { .. } => ErrorKind::Type,
            NullDereference { .. } | FaultAt { .. } => ErrorKind::Fault,
        }
    }

    pub fn span(&self) -> Span {
        use SemanticError::*;
        match self {
            Syntax { span, .. }
            | SyntaxAt { span, .. }
            | NoMatchingMethod { span, .. }
            | UnknownIdentifier { span, .. }
            | Duplicate { span, .. }
            | NameAt { span, .. }
            | UnknownType { span, .. }
            | TypeMismatch { span, .. }
            | TypeAt { span, .. }
            | NullDereference { span, .. }
            | FaultAt { span, .. } => *span,
        }
    }
}

pub type BrewinResult<T> = Result<T, SemanticError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_taxonomy() {
        let e = SemanticError::NullDereference { span: Span::new(4) };
        assert_eq!(e.kind(), ErrorKind::Fault);
        assert_eq!(e.span(), Span::new(4));
    }

    #[test]
    fn display_includes_line() {
        let e = SemanticError::UnknownIdentifier {
            name: "foo".into(),
            span: Span::new(12),
        };
        assert_eq!(e.to_string(), "at line 12: unknown identifier `foo`");
    }
}
