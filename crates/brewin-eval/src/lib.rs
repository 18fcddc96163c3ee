//! The tree-walking passes: class loading, template specialization,
//! expression/statement evaluation, method dispatch, and the top-level
//! `Interpreter` orchestrator that ties them to a `Host`.

pub mod class_loader;
pub mod expr;
pub mod host;
pub mod interpreter;
pub mod method_call;
pub mod status;
pub mod stmt;
pub mod template;

pub use host::Host;
pub use interpreter::Interpreter;
pub use status::{Outcome, Status};
