use rustc_hash::FxHashMap;

use brewin_core::error::{BrewinResult, SemanticError};
use brewin_core::span::Span;
use brewin_core::subtype::SubtypeRel;
use brewin_core::types::{Type, CLASS_ROOT};

/// Class name -> direct super (§3's "class registry"). `CLASS_ROOT` is
/// pre-registered with no super; every other class registers with an
/// explicit super or, absent an `inherits` clause, `CLASS_ROOT` itself
/// (§4.2).
#[derive(Debug)]
pub struct ClassRegistry {
    supers: FxHashMap<String, Option<String>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        let mut supers = FxHashMap::default();
        supers.insert(CLASS_ROOT.to_string(), None);
        ClassRegistry { supers }
    }

    /// Resets to just the root class, so a process can run more than
    /// one interpreter instance in sequence (§9's "process-wide state"
    /// design note).
    pub fn clear(&mut self) {
        self.supers.clear();
        self.supers.insert(CLASS_ROOT.to_string(), None);
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.supers.contains_key(name)
    }

    pub fn super_of(&self, name: &str) -> Option<&str> {
        self.supers.get(name)?.as_deref()
    }

    /// Registers `name` with direct super `super_name`. Errors if
    /// `name` is already registered, or if `super_name` isn't
    /// registered yet (§3's "every registered class's super must
    /// already be registered", no forward references at registration).
    pub fn register(&mut self, name: &str, super_name: &str, span: Span) -> BrewinResult<()> {
        if self.is_registered(name) {
            return Err(SemanticError::Duplicate {
                what: "class",
                name: name.to_string(),
                span,
            });
        }
        if !self.is_registered(super_name) {
            return Err(SemanticError::UnknownType {
                found: super_name.to_string(),
                span,
            });
        }
        self.supers.insert(name.to_string(), Some(super_name.to_string()));
        Ok(())
    }

    /// True iff `target` appears in `start`'s transitive super-chain,
    /// including `start` itself.
    pub fn chain_contains(&self, start: &str, target: &str) -> bool {
        let mut cur = Some(start.to_string());
        while let Some(name) = cur {
            if name == target {
                return true;
            }
            cur = match self.supers.get(&name) {
                Some(next) => next.clone(),
                None => return false,
            };
        }
        false
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SubtypeRel for ClassRegistry {
    /// `subtype(a, b)` (§4.1): equal types, `NULL` against any class
    /// type, or `b` in `a`'s super-chain. Template instantiations are
    /// registered with super `CLASS_ROOT` (§4.3 step 3), so they never
    /// appear in each other's chains — this single chain-walk handles
    /// both ordinary classes and template instantiations uniformly.
    fn is_subtype(&self, a: &Type, b: &Type) -> bool {
        if a == b {
            return true;
        }
        match (a, b) {
            (Type::Null, Type::Class(_)) => true,
            (Type::Class(a_name), Type::Class(b_name)) => self.chain_contains(a_name, b_name),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_has_no_super() {
        let reg = ClassRegistry::new();
        assert!(reg.is_registered(CLASS_ROOT));
        assert_eq!(reg.super_of(CLASS_ROOT), None);
    }

    #[test]
    fn register_rejects_duplicate_and_unknown_super() {
        let mut reg = ClassRegistry::new();
        reg.register("A", CLASS_ROOT, Span::new(1)).unwrap();
        assert!(reg.register("A", CLASS_ROOT, Span::new(2)).is_err());
        assert!(reg.register("B", "Ghost", Span::new(3)).is_err());
    }

    #[test]
    fn subtype_walks_transitive_chain() {
        let mut reg = ClassRegistry::new();
        reg.register("A", CLASS_ROOT, Span::new(1)).unwrap();
        reg.register("B", "A", Span::new(2)).unwrap();
        assert!(reg.is_subtype(&Type::class("B"), &Type::class("A")));
        assert!(reg.is_subtype(&Type::class("B"), &Type::class(CLASS_ROOT)));
        assert!(!reg.is_subtype(&Type::class("A"), &Type::class("B")));
        assert!(reg.is_subtype(&Type::Null, &Type::class("B")));
        assert!(!reg.is_subtype(&Type::Null, &Type::Int));
    }

    #[test]
    fn clear_resets_to_root_only() {
        let mut reg = ClassRegistry::new();
        reg.register("A", CLASS_ROOT, Span::new(1)).unwrap();
        reg.clear();
        assert!(!reg.is_registered("A"));
        assert!(reg.is_registered(CLASS_ROOT));
    }
}
