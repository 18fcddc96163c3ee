//! Monomorphization cache (§4.3 step 5, §8's "template idempotence"):
//! specializing the same mangled name twice must return the identical
//! `ClassDef`, not merely an equal one.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use brewin_core::classdef::ClassDef;

#[derive(Debug, Default)]
pub struct TemplateInstanceCache {
    instances: FxHashMap<String, Rc<ClassDef>>,
}

impl TemplateInstanceCache {
    pub fn new() -> Self {
        TemplateInstanceCache::default()
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn get(&self, mangled_name: &str) -> Option<Rc<ClassDef>> {
        self.instances.get(mangled_name).cloned()
    }

    pub fn insert(&mut self, mangled_name: String, def: Rc<ClassDef>) {
        self.instances.insert(mangled_name, def);
    }
}
