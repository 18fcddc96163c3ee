//! The class and template lookup tables (§3's "class registry" and
//! "template registry"), plus the `str_to_type` resolver that combines
//! them. `ClassRegistry` implements `brewin_core::SubtypeRel`, which is
//! how `Field`/`Object` type-check without this crate's types leaking
//! down into `brewin-core`.

pub mod class_registry;
pub mod resolve;
pub mod template_registry;

pub use class_registry::ClassRegistry;
pub use resolve::str_to_type;
pub use template_registry::TemplateRegistry;
