use std::rc::Rc;

use rustc_hash::FxHashMap;

use brewin_core::classdef::{ClassDef, TClassDef};
use brewin_core::error::{BrewinResult, SemanticError};
use brewin_core::field::Field;
use brewin_core::object::{Object, ObjectRef};
use brewin_core::sexp::Sexp;
use brewin_core::span::Span;
use brewin_core::subtype::SubtypeRel;
use brewin_core::types::{split_template, Type, CLASS_ROOT};
use brewin_core::value::Value;

use brewin_registry::{str_to_type, ClassRegistry, TemplateRegistry};

use crate::class_loader::{self, LoadedProgram};
use crate::host::Host;
use crate::template::{self, cache::TemplateInstanceCache};

/// The top-level orchestrator (§2 component 8): owns both registries,
/// the extracted class/template definitions, the specialization cache,
/// and the `Host`. Nothing below this struct ever calls `Host::error`
/// directly — every evaluator function threads a `BrewinResult`/`Status`
/// back up to here, and `run` is the one place a `SemanticError`
/// becomes a terminal host call.
pub struct Interpreter<H: Host> {
    pub host: H,
    pub classes: ClassRegistry,
    pub templates: TemplateRegistry,
    pub class_defs: FxHashMap<String, Rc<ClassDef>>,
    pub tclasses: FxHashMap<String, TClassDef>,
    pub cache: TemplateInstanceCache,
}

impl<H: Host> Interpreter<H> {
    pub fn new(host: H) -> Self {
        Interpreter {
            host,
            classes: ClassRegistry::new(),
            templates: TemplateRegistry::new(),
            class_defs: FxHashMap::default(),
            tclasses: FxHashMap::default(),
            cache: TemplateInstanceCache::new(),
        }
    }

    /// Resets every piece of process-wide state so a fresh program can
    /// be loaded without restarting the process (§9).
    pub fn reset(&mut self) {
        self.classes.clear();
        self.templates.clear();
        self.class_defs.clear();
        self.tclasses.clear();
        self.cache.clear();
    }

    /// Registers and body-extracts every top-level form (§4.2).
    pub fn load(&mut self, program: &[Sexp]) -> BrewinResult<()> {
        let LoadedProgram { classes, templates } =
            class_loader::load_program(program, &mut self.classes, &mut self.templates)?;
        self.class_defs = classes;
        self.tclasses = templates;
        Ok(())
    }

    pub fn str_to_type(&self, s: &str, span: Span) -> BrewinResult<Type> {
        str_to_type(s, &self.classes, &self.templates, span)
    }

    /// Resolves a class name to its `ClassDef`, specializing lazily if
    /// it's a mangled template instantiation (§4.3 step 5).
    pub fn resolve_class_def(&mut self, name: &str, span: Span) -> BrewinResult<Rc<ClassDef>> {
        if split_template(name).is_some() {
            return template::specialize(
                name,
                &self.tclasses,
                &self.templates,
                &mut self.classes,
                &mut self.cache,
                span,
            );
        }
        self.class_defs
            .get(name)
            .cloned()
            .ok_or_else(|| SemanticError::UnknownType {
                found: name.to_string(),
                span,
            })
    }

    /// `instantiate(class_name)` (§4.4): allocates an `Object`, builds
    /// each declared field and method, and recursively instantiates the
    /// super-instance if the class has one.
    pub fn instantiate(&mut self, class_name: &str, span: Span) -> BrewinResult<ObjectRef> {
        let class_def = self.resolve_class_def(class_name, span)?;
        let mut obj = Object::new(Rc::clone(&class_def));

        for field_def in &class_def.fields {
            let declared = self.str_to_type(&field_def.declared_type, field_def.span)?;
            let value = match &field_def.initial {
                Some(token) => {
                    let v = Value::parse_literal(token)?;
                    if !SubtypeRel::is_subtype(&self.classes, v.ty(), &declared) {
                        return Err(SemanticError::TypeMismatch {
                            expected: declared.to_string(),
                            found: v.ty().to_string(),
                            span: token.span,
                        });
                    }
                    v
                }
                None => Value::default_for(&declared),
            };
            obj.fields
                .insert(field_def.name.clone(), Field::new_unchecked(declared, field_def.name.clone(), value));
        }

        for method_def in &class_def.methods {
            let return_type = self.str_to_type(&method_def.return_type, method_def.span)?;
            let mut formals = Vec::with_capacity(method_def.params.len());
            for p in &method_def.params {
                let ty = self.str_to_type(&p.declared_type, p.span)?;
                formals.push(Field::default_for(ty, p.name.clone()));
            }
            let method = brewin_core::method::Method {
                name: method_def.name.clone(),
                return_type,
                formals,
                body: Rc::clone(&method_def.body),
                span: method_def.span,
            };
            obj.methods.entry(method_def.name.clone()).or_default().push(Rc::new(method));
        }

        if class_def.super_name != CLASS_ROOT {
            let super_obj = self.instantiate(&class_def.super_name.clone(), span)?;
            obj.super_obj = Some(super_obj);
        }

        Ok(Rc::new(std::cell::RefCell::new(obj)))
    }

    /// Instantiates `main` and calls its zero-argument `main` method
    /// (§6's entry point). A `SemanticError` reaches the host's
    /// non-returning sink here; an uncaught `throw` that escapes `main`
    /// terminates silently (§4.9, §9's supplemented behavior).
    pub fn run(&mut self) {
        if let Err(e) = self.run_inner() {
            self.host.error(e.kind(), &e.to_string(), Some(e.span()));
        }
    }

    fn run_inner(&mut self) -> BrewinResult<()> {
        let entry_span = Span::new(0);
        let main_obj = self.instantiate("main", entry_span)?;
        let outcome = crate::method_call::execute_method(
            self,
            &main_obj,
            "main",
            &[],
            None,
            entry_span,
        )?;
        // An uncaught exception escaping `main` terminates the program
        // normally, with no additional host-error output (§4.9).
        let _ = outcome;
        Ok(())
    }
}
