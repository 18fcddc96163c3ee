use brewin_core::Field;

/// The three-valued control outcome threaded through every statement
/// and expression (§4.9): no hidden exceptions, no Rust `panic!` for
/// language-level control flow. `SemanticError` (the `Result` channel)
/// is orthogonal — it's for unrecoverable errors, not `throw`/`try`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Proceed,
    Return,
    Exception,
}

/// A statement/expression's outcome: the `Status` tag plus the `Field`
/// it carries along (a return value, a thrown string, or `nothing`).
#[derive(Debug, Clone)]
pub struct Outcome {
    pub status: Status,
    pub field: Field,
}

impl Outcome {
    pub fn proceed(field: Field) -> Self {
        Outcome {
            status: Status::Proceed,
            field,
        }
    }

    pub fn ret(field: Field) -> Self {
        Outcome {
            status: Status::Return,
            field,
        }
    }

    pub fn exception(field: Field) -> Self {
        Outcome {
            status: Status::Exception,
            field,
        }
    }

    pub fn is_proceed(&self) -> bool {
        self.status == Status::Proceed
    }

    pub fn is_return(&self) -> bool {
        self.status == Status::Return
    }

    pub fn is_exception(&self) -> bool {
        self.status == Status::Exception
    }
}
