use rustc_hash::FxHashMap;

use brewin_core::error::{BrewinResult, SemanticError};
use brewin_core::span::Span;

/// Template name -> arity (§3's "template registry"). A template is not
/// itself a type; only a mangled instantiation `Tname@A1@...@An` is,
/// and only once `Tname`'s arity matches the argument count (§4.1).
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    arities: FxHashMap<String, usize>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        TemplateRegistry::default()
    }

    pub fn clear(&mut self) {
        self.arities.clear();
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.arities.contains_key(name)
    }

    pub fn arity_of(&self, name: &str) -> Option<usize> {
        self.arities.get(name).copied()
    }

    pub fn register(&mut self, name: &str, arity: usize, span: Span) -> BrewinResult<()> {
        if self.is_registered(name) {
            return Err(SemanticError::Duplicate {
                what: "template",
                name: name.to_string(),
                span,
            });
        }
        self.arities.insert(name.to_string(), arity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_and_reports_arity() {
        let mut reg = TemplateRegistry::new();
        reg.register("Box", 1, Span::new(1)).unwrap();
        assert_eq!(reg.arity_of("Box"), Some(1));
        assert!(reg.register("Box", 1, Span::new(2)).is_err());
    }
}
