//! The class graph: classes, modules, singleton classes, method tables and
//! the process-wide class registry.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::runtime::value::Value;
use crate::vm::chunk::MethodProto;
use crate::vm::{Block, Vm};

pub type ClassRef = Rc<RefCell<RClass>>;

/// A class, module, or singleton class. Modules share the representation so
/// they can reuse the method-table machinery; the flags tell them apart.
#[derive(Debug)]
pub struct RClass {
    /// Fully qualified name, e.g. `Foo::Bar`; singleton classes render as
    /// `#<Class:Owner>`.
    pub name: String,
    pub superclass: Option<ClassRef>,
    /// Included modules, most recently included first.
    pub includes: Vec<ClassRef>,
    /// Instance-method table. Class-side methods live on the singleton class.
    pub methods: HashMap<String, MethodEntry>,
    /// Constants defined under this namespace.
    pub constants: HashMap<String, Value>,
    /// The class object's own `@...` slots.
    pub ivars: HashMap<String, Value>,
    pub singleton: Option<ClassRef>,
    pub is_module: bool,
    pub is_singleton: bool,
}

impl RClass {
    pub fn new(name: impl Into<String>, superclass: Option<ClassRef>, is_module: bool) -> Self {
        Self {
            name: name.into(),
            superclass,
            includes: Vec::new(),
            methods: HashMap::new(),
            constants: HashMap::new(),
            ivars: HashMap::new(),
            singleton: None,
            is_module,
            is_singleton: false,
        }
    }

    fn new_singleton(owner_name: &str, superclass: ClassRef) -> Self {
        let mut class = Self::new(
            format!("#<Class:{}>", owner_name),
            Some(superclass),
            false,
        );
        class.is_singleton = true;
        class
    }
}

/// An entry in a method table. Attribute accessors get their own variants so
/// `attr_reader`/`attr_writer` don't need synthesized bytecode.
#[derive(Clone)]
pub enum MethodEntry {
    Builtin(&'static BuiltinMethod),
    Defined(Rc<MethodObject>),
    AttrReader(Rc<str>),
    AttrWriter(Rc<str>),
}

/// A user-defined method: compiled body plus the lexical scope captured at
/// definition time, which is what bare constants resolve against.
#[derive(Debug)]
pub struct MethodObject {
    pub proto: Rc<MethodProto>,
    pub lexical: Option<Rc<LexicalScope>>,
}

/// A built-in method implemented in Rust. All built-ins share one signature.
pub struct BuiltinMethod {
    pub name: &'static str,
    pub func: BuiltinFn,
}

pub type BuiltinFn =
    fn(&mut Vm, Value, &[Value], Option<&Rc<Block>>) -> Result<Value, RuntimeError>;

/// One link of the lexical class-nesting chain active while a class body or
/// a method defined inside it executes.
#[derive(Debug)]
pub struct LexicalScope {
    pub class: ClassRef,
    pub parent: Option<Rc<LexicalScope>>,
}

/// The process-wide class table, keyed by fully qualified name, plus direct
/// handles to the core classes. Owned by the `Vm`.
pub struct ClassRegistry {
    classes: HashMap<String, ClassRef>,
    pub object: ClassRef,
    pub class: ClassRef,
    pub integer: ClassRef,
    pub string: ClassRef,
    pub boolean: ClassRef,
    pub null: ClassRef,
    pub array: ClassRef,
    pub hash: ClassRef,
    pub range: ClassRef,
}

impl ClassRegistry {
    /// Build the core class graph. `Object` is the root; `Class` is itself a
    /// class; every singleton-class chain terminates at `#<Class:Object>`,
    /// whose superclass is `Class`.
    pub fn bootstrap() -> Self {
        let object: ClassRef = Rc::new(RefCell::new(RClass::new("Object", None, false)));
        let class: ClassRef = Rc::new(RefCell::new(RClass::new(
            "Class",
            Some(object.clone()),
            false,
        )));

        let meta_object: ClassRef = Rc::new(RefCell::new(RClass::new_singleton(
            "Object",
            class.clone(),
        )));
        object.borrow_mut().singleton = Some(meta_object.clone());
        let meta_class: ClassRef = Rc::new(RefCell::new(RClass::new_singleton(
            "Class",
            meta_object.clone(),
        )));
        class.borrow_mut().singleton = Some(meta_class);

        let core = |name: &str| -> ClassRef {
            let c: ClassRef = Rc::new(RefCell::new(RClass::new(
                name,
                Some(object.clone()),
                false,
            )));
            c.borrow_mut().singleton = Some(Rc::new(RefCell::new(RClass::new_singleton(
                name,
                meta_object.clone(),
            ))));
            c
        };

        let integer = core("Integer");
        let string = core("String");
        let boolean = core("Boolean");
        let null = core("Null");
        let array = core("Array");
        let hash = core("Hash");
        let range = core("Range");

        let mut registry = Self {
            classes: HashMap::new(),
            object,
            class,
            integer,
            string,
            boolean,
            null,
            array,
            hash,
            range,
        };

        for c in [
            &registry.object,
            &registry.class,
            &registry.integer,
            &registry.string,
            &registry.boolean,
            &registry.null,
            &registry.array,
            &registry.hash,
            &registry.range,
        ] {
            let name = c.borrow().name.clone();
            registry.classes.insert(name.clone(), (*c).clone());
            registry
                .object
                .borrow_mut()
                .constants
                .insert(name, Value::Class((*c).clone()));
        }

        registry
    }

    pub fn define(&mut self, fqn: String, class: ClassRef) {
        self.classes.insert(fqn, class);
    }

    pub fn get(&self, fqn: &str) -> Option<ClassRef> {
        self.classes.get(fqn).cloned()
    }

    /// The singleton class of `class`, materializing it (and, transitively,
    /// its superclass's singleton) on first use. For a class with superclass
    /// `S` this keeps `C.singleton_class.superclass == S.singleton_class`.
    pub fn singleton_class(&self, class: &ClassRef) -> ClassRef {
        if let Some(existing) = class.borrow().singleton.clone() {
            return existing;
        }
        let (name, superclass) = {
            let c = class.borrow();
            (c.name.clone(), c.superclass.clone())
        };
        let meta_super = match superclass {
            Some(ref s) => self.singleton_class(s),
            None => self.class.clone(),
        };
        let meta: ClassRef = Rc::new(RefCell::new(RClass::new_singleton(&name, meta_super)));
        class.borrow_mut().singleton = Some(meta.clone());
        meta
    }
}

/// Walk the method resolution order starting at `start`: each class itself,
/// then its included modules in inclusion order, then its superclass.
pub fn lookup_method(start: &ClassRef, name: &str) -> Option<MethodEntry> {
    let mut current = Some(start.clone());
    while let Some(k) = current {
        {
            let kb = k.borrow();
            if let Some(entry) = kb.methods.get(name) {
                return Some(entry.clone());
            }
            for module in &kb.includes {
                if !Rc::ptr_eq(module, &k) {
                    if let Some(entry) = module.borrow().methods.get(name) {
                        return Some(entry.clone());
                    }
                }
            }
        }
        let next = k.borrow().superclass.clone();
        current = next;
    }
    None
}

/// True when `target` appears in `start`'s ancestor chain, counting included
/// modules. Backs `is_a?`.
pub fn ancestors_contain(start: &ClassRef, target: &ClassRef) -> bool {
    let mut current = Some(start.clone());
    while let Some(k) = current {
        if Rc::ptr_eq(&k, target) {
            return true;
        }
        {
            let kb = k.borrow();
            for module in &kb.includes {
                if Rc::ptr_eq(module, target) {
                    return true;
                }
            }
        }
        let next = k.borrow().superclass.clone();
        current = next;
    }
    false
}

impl std::fmt::Debug for MethodEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Builtin(b) => f.debug_tuple("Builtin").field(&b.name).finish(),
            Self::Defined(m) => f.debug_tuple("Defined").field(&m.proto.name).finish(),
            Self::AttrReader(name) => f.debug_tuple("AttrReader").field(name).finish(),
            Self::AttrWriter(name) => f.debug_tuple("AttrWriter").field(name).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_wires_the_core_graph() {
        let registry = ClassRegistry::bootstrap();
        assert_eq!(registry.object.borrow().name, "Object");
        assert!(registry.object.borrow().superclass.is_none());
        let class_super = registry.class.borrow().superclass.clone().unwrap();
        assert!(Rc::ptr_eq(&class_super, &registry.object));
        // Core classes are constants of Object.
        assert!(registry.object.borrow().constants.contains_key("Integer"));
        assert!(registry.object.borrow().constants.contains_key("Class"));
    }

    #[test]
    fn singleton_chain_terminates_at_object_metaclass() {
        let registry = ClassRegistry::bootstrap();
        let meta_int = registry.singleton_class(&registry.integer);
        assert_eq!(meta_int.borrow().name, "#<Class:Integer>");
        let meta_super = meta_int.borrow().superclass.clone().unwrap();
        assert_eq!(meta_super.borrow().name, "#<Class:Object>");
        // #<Class:Object> inherits from Class itself.
        let root_super = meta_super.borrow().superclass.clone().unwrap();
        assert!(Rc::ptr_eq(&root_super, &registry.class));
    }

    #[test]
    fn metaclasses_materialize_lazily() {
        let registry = ClassRegistry::bootstrap();
        let meta = registry.singleton_class(&registry.integer);
        let meta_meta = registry.singleton_class(&meta);
        assert_eq!(meta_meta.borrow().name, "#<Class:#<Class:Integer>>");
        // Repeated requests return the same object.
        assert!(Rc::ptr_eq(&meta_meta, &registry.singleton_class(&meta)));
    }

    #[test]
    fn lookup_searches_class_then_modules_then_superclass() {
        let registry = ClassRegistry::bootstrap();
        let module: ClassRef = Rc::new(RefCell::new(RClass::new(
            "M",
            Some(registry.object.clone()),
            true,
        )));
        let class: ClassRef = Rc::new(RefCell::new(RClass::new(
            "C",
            Some(registry.object.clone()),
            false,
        )));
        let marker = |name: &str| MethodEntry::AttrReader(Rc::from(format!("@{}", name)));

        module.borrow_mut().methods.insert("m".to_string(), marker("module"));
        registry
            .object
            .borrow_mut()
            .methods
            .insert("m".to_string(), marker("object"));
        class.borrow_mut().includes.push(module.clone());

        // The included module shadows the superclass.
        let Some(MethodEntry::AttrReader(ivar)) = lookup_method(&class, "m") else {
            panic!("expected a hit");
        };
        assert_eq!(&*ivar, "@module");

        // The class's own entry wins over everything.
        class.borrow_mut().methods.insert("m".to_string(), marker("own"));
        let Some(MethodEntry::AttrReader(ivar)) = lookup_method(&class, "m") else {
            panic!("expected a hit");
        };
        assert_eq!(&*ivar, "@own");

        assert!(lookup_method(&class, "absent").is_none());
    }

    #[test]
    fn ancestor_walk_counts_modules() {
        let registry = ClassRegistry::bootstrap();
        let module: ClassRef = Rc::new(RefCell::new(RClass::new("M", None, true)));
        let class: ClassRef = Rc::new(RefCell::new(RClass::new(
            "C",
            Some(registry.object.clone()),
            false,
        )));
        class.borrow_mut().includes.push(module.clone());
        assert!(ancestors_contain(&class, &module));
        assert!(ancestors_contain(&class, &registry.object));
        assert!(!ancestors_contain(&registry.object, &class));
    }
}
