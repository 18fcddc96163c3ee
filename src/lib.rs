//! Facade crate: re-exports the evaluator's public API and ships the two
//! `Host` implementations embedders actually construct
//! (`ConsoleHost` for real use, `BufferHost` for tests).

mod host;

pub use brewin_core::error::{BrewinResult, ErrorKind, SemanticError};
pub use brewin_eval::{Host, Interpreter};
pub use host::{BufferHost, ConsoleHost};
