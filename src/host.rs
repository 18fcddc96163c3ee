use std::collections::VecDeque;
use std::io::{self, Write};

use brewin_core::error::ErrorKind;
use brewin_core::span::Span;
use brewin_eval::Host;

/// The real-world `Host`: stdin/stdout, aborting the process on the
/// first semantic error (§6's "non-returning sink").
#[derive(Debug, Default)]
pub struct ConsoleHost;

impl ConsoleHost {
    pub fn new() -> Self {
        ConsoleHost
    }
}

impl Host for ConsoleHost {
    fn output(&mut self, line: &str) {
        println!("{line}");
    }

    fn get_input(&mut self) -> String {
        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) | Err(_) => String::new(),
            Ok(_) => line.trim_end_matches(['\n', '\r']).to_string(),
        }
    }

    fn error(&mut self, kind: ErrorKind, message: &str, span: Option<Span>) -> ! {
        let _ = io::stdout().flush();
        match span {
            Some(span) => eprintln!("{kind} error at {span}: {message}"),
            None => eprintln!("{kind} error: {message}"),
        }
        std::process::exit(1);
    }
}

/// An in-memory `Host` for tests: a queued input buffer and a
/// `Vec<String>` of emitted lines. `error` panics with a formatted
/// message instead of aborting the process, so test assertions can match
/// on it.
#[derive(Debug, Default)]
pub struct BufferHost {
    pub input: VecDeque<String>,
    pub output: Vec<String>,
}

impl BufferHost {
    pub fn new() -> Self {
        BufferHost::default()
    }

    pub fn with_input(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        BufferHost {
            input: lines.into_iter().map(Into::into).collect(),
            output: Vec::new(),
        }
    }
}

impl Host for BufferHost {
    fn output(&mut self, line: &str) {
        self.output.push(line.to_string());
    }

    fn get_input(&mut self) -> String {
        self.input.pop_front().unwrap_or_default()
    }

    fn error(&mut self, kind: ErrorKind, message: &str, span: Option<Span>) -> ! {
        match span {
            Some(span) => panic!("{kind} error at {span}: {message}"),
            None => panic!("{kind} error: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_host_records_output_lines() {
        let mut host = BufferHost::new();
        host.output("hello");
        host.output("world");
        assert_eq!(host.output, vec!["hello".to_string(), "world".to_string()]);
    }

    #[test]
    fn buffer_host_drains_queued_input_in_order() {
        let mut host = BufferHost::with_input(["1", "2"]);
        assert_eq!(host.get_input(), "1");
        assert_eq!(host.get_input(), "2");
        assert_eq!(host.get_input(), "");
    }

    #[test]
    #[should_panic(expected = "TYPE error at line 3: bad")]
    fn buffer_host_error_panics_with_formatted_message() {
        let mut host = BufferHost::new();
        host.error(ErrorKind::Type, "bad", Some(Span::new(3)));
    }
}
