//! Class and method definition ops, plus constant resolution.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::runtime::class::{ClassRef, LexicalScope, MethodEntry, MethodObject, RClass};
use crate::runtime::environment::Environment;
use crate::runtime::value::Value;

use super::opcode::DefinitionKind;
use super::vm::Vm;

impl Vm {
    /// `DefClass`: define or reopen a class/module, then execute its body
    /// with `self` bound to the class. Operands stay on the stack until
    /// validation passes; a module used as a superclass faults with both
    /// still there.
    pub(super) fn op_def_class(
        &mut self,
        name_index: u16,
        proto_index: u16,
        kind: DefinitionKind,
    ) -> Result<(), RuntimeError> {
        let proto = self.current_proto();
        let name = proto.chunk.string_constant(name_index).to_string();
        let Some(body) = proto.chunk.proto_constant(proto_index) else {
            return Err(RuntimeError::new(
                crate::error::ErrorKind::Internal,
                format!("missing class body for {}", name),
            ));
        };

        let superclass = match kind {
            DefinitionKind::SubClass => match self.peek(0).clone() {
                Value::Class(c) => {
                    let is_module = c.borrow().is_module;
                    if is_module {
                        let module_name = c.borrow().name.clone();
                        return Err(RuntimeError::module_inheritance(&module_name));
                    }
                    Some(c)
                }
                other => {
                    return Err(RuntimeError::wrong_type("Class", &other.class_name()));
                }
            },
            _ => None,
        };

        // Validation passed: consume the operands.
        if matches!(kind, DefinitionKind::SubClass) {
            self.pop();
        }
        let owner_value = self.pop();
        let owner = match owner_value {
            Value::Class(c) => c,
            _ => self.classes.object.clone(),
        };

        let existing = owner.borrow().constants.get(&name).cloned();
        let class = match existing {
            // Reopening mutates the original class object.
            Some(Value::Class(c)) => c,
            _ => {
                let fqn = if Rc::ptr_eq(&owner, &self.classes.object) {
                    name.clone()
                } else {
                    format!("{}::{}", owner.borrow().name, name)
                };
                let is_module = matches!(kind, DefinitionKind::Module);
                let parent = superclass.unwrap_or_else(|| self.classes.object.clone());
                let class: ClassRef = Rc::new(RefCell::new(RClass::new(
                    fqn.clone(),
                    Some(parent.clone()),
                    is_module,
                )));
                // Mirror the superclass chain on the singleton side so
                // class methods inherit.
                let meta_super = self.classes.singleton_class(&parent);
                let mut meta = RClass::new(format!("#<Class:{}>", fqn), Some(meta_super), false);
                meta.is_singleton = true;
                class.borrow_mut().singleton = Some(Rc::new(RefCell::new(meta)));
                owner
                    .borrow_mut()
                    .constants
                    .insert(name.clone(), Value::Class(class.clone()));
                self.classes.define(fqn, class.clone());
                class
            }
        };

        // Execute the body with self = the class and the class pushed onto
        // the lexical chain.
        let lexical = Rc::new(LexicalScope {
            class: class.clone(),
            parent: self.frames.last().unwrap().lexical.clone(),
        });
        self.push_frame(
            body,
            Value::Class(class.clone()),
            Rc::new(RefCell::new(Environment::new())),
            None,
            Some(lexical),
        );
        self.run_frame()?;
        self.push(Value::Class(class));
        Ok(())
    }

    /// `DefMethod` / `DefClassMethod`. Instance methods land on `self`
    /// when it is a class (class bodies) or on `self`'s class (top level,
    /// where definitions go to Object). Class-side methods land on the
    /// singleton class.
    pub(super) fn op_def_method(
        &mut self,
        proto_index: u16,
        class_side: bool,
    ) -> Result<(), RuntimeError> {
        let proto = self.current_proto();
        let Some(method_proto) = proto.chunk.proto_constant(proto_index) else {
            return Err(RuntimeError::new(
                crate::error::ErrorKind::Internal,
                "missing method body",
            ));
        };
        let frame = self.frames.last().unwrap();
        let lexical = frame.lexical.clone();
        let holder = match &frame.self_value {
            Value::Class(c) => c.clone(),
            other => other.class_of(&self.classes),
        };
        let target = if class_side {
            self.classes.singleton_class(&holder)
        } else {
            holder
        };
        let name = method_proto.name.clone();
        let method = MethodObject {
            proto: method_proto,
            lexical,
        };
        target
            .borrow_mut()
            .methods
            .insert(name, MethodEntry::Defined(Rc::new(method)));
        self.push(Value::Null);
        Ok(())
    }

    /// Bare-constant lookup: the lexical scope chain innermost-first, then
    /// Object's constants.
    pub(super) fn resolve_constant(&self, name: &str) -> Result<Value, RuntimeError> {
        let mut scope = self.frames.last().unwrap().lexical.clone();
        while let Some(s) = scope {
            if let Some(value) = s.class.borrow().constants.get(name) {
                return Ok(value.clone());
            }
            scope = s.parent.clone();
        }
        if let Some(value) = self.classes.object.borrow().constants.get(name) {
            return Ok(value.clone());
        }
        Err(RuntimeError::uninitialized_constant(name))
    }

    /// `A::B`: strict lookup of `name` in the popped namespace value.
    pub(super) fn resolve_scoped_constant(
        &self,
        scope: &Value,
        name: &str,
    ) -> Result<Value, RuntimeError> {
        match scope {
            Value::Class(class) => match class.borrow().constants.get(name) {
                Some(value) => Ok(value.clone()),
                None => Err(RuntimeError::uninitialized_constant(name)),
            },
            other => Err(RuntimeError::wrong_type("Class", &other.class_name())),
        }
    }

    /// Define a constant in the current lexical class (Object at top level).
    pub(super) fn define_constant(&mut self, name: &str, value: Value) {
        let target = match &self.frames.last().unwrap().lexical {
            Some(scope) => scope.class.clone(),
            None => self.classes.object.clone(),
        };
        target
            .borrow_mut()
            .constants
            .insert(name.to_string(), value);
    }
}
