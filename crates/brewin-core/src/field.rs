use crate::error::{BrewinResult, SemanticError};
use crate::span::Span;
use crate::subtype::SubtypeRel;
use crate::types::Type;
use crate::value::Value;

/// A named, statically-typed mutable cell (§3). `declared_type` never
/// changes after construction; `assign` is the only way to change
/// `value`, and it rejects anything whose dynamic type isn't a subtype
/// of `declared_type`.
#[derive(Debug, Clone)]
pub struct Field {
    declared_type: Type,
    name: String,
    value: Value,
}

impl Field {
    /// Builds a field already holding `value`, without checking it
    /// against `declared_type` — used when the caller has already
    /// type-checked (e.g. object construction, where the checked error
    /// needs to carry the literal's own source line rather than this
    /// call's).
    pub fn new_unchecked(declared_type: Type, name: impl Into<String>, value: Value) -> Self {
        Field {
            declared_type,
            name: name.into(),
            value,
        }
    }

    /// Builds a field seeded with `declared_type`'s default value
    /// (§4.4's placeholder fields for formal parameters).
    pub fn default_for(declared_type: Type, name: impl Into<String>) -> Self {
        let value = Value::default_for(&declared_type);
        Field::new_unchecked(declared_type, name, value)
    }

    pub fn declared_type(&self) -> &Type {
        &self.declared_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    /// Type-checked assignment (§3, §4.6, §4.7's `set`): `new_value`'s
    /// dynamic type must be a subtype of `declared_type`, per `rel`.
    pub fn assign(
        &mut self,
        new_value: Value,
        rel: &impl SubtypeRel,
        span: Span,
    ) -> BrewinResult<()> {
        if !rel.is_subtype(new_value.ty(), &self.declared_type) {
            return Err(SemanticError::TypeMismatch {
                expected: self.declared_type.to_string(),
                found: new_value.ty().to_string(),
                span,
            });
        }
        self.value.set(new_value);
        Ok(())
    }
}
