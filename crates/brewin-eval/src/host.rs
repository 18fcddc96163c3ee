use brewin_core::error::ErrorKind;
use brewin_core::span::Span;

/// The external collaborator the evaluator consumes but never
/// implements itself (§1, §6): line-buffered I/O and a non-returning
/// error sink. `error` is the one place a `SemanticError` stops being a
/// `Result` and becomes a terminal abort.
pub trait Host {
    fn output(&mut self, line: &str);
    fn get_input(&mut self) -> String;
    /// Terminates interpretation. Never returns — a `ConsoleHost`
    /// exits the process; a test `BufferHost` panics so assertions can
    /// inspect the message.
    fn error(&mut self, kind: ErrorKind, message: &str, span: Option<Span>) -> !;
}
