use rustc_hash::FxHashMap;

use crate::field::Field;

/// A lexical scope: name -> Field (§3). `let` and method activation both
/// enter a new scope by copying the enclosing one (§4.6, §4.7), so a
/// binding introduced inside shadows an outer one of the same name for
/// the remainder of that scope without mutating the parent.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: FxHashMap<String, Field>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            vars: FxHashMap::default(),
        }
    }

    /// A copy of this environment, ready to receive new bindings that
    /// shadow without disturbing the original (method activation
    /// records, `let` blocks).
    pub fn enter(&self) -> Self {
        self.clone()
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.vars.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.vars.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Binds `field` under its own name, shadowing any existing binding.
    pub fn bind(&mut self, field: Field) {
        self.vars.insert(field.name().to_string(), field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Type;
    use crate::value::Value;

    #[test]
    fn entered_scope_shadows_without_mutating_parent() {
        let mut outer = Environment::new();
        outer.bind(Field::new_unchecked(Type::Int, "x", Value::int(1)));

        let mut inner = outer.enter();
        inner.bind(Field::new_unchecked(Type::Int, "x", Value::int(2)));

        assert_eq!(inner.get("x").unwrap().value().as_int(), Some(2));
        assert_eq!(outer.get("x").unwrap().value().as_int(), Some(1));
    }
}
