//! Runtime values. Every value knows its class; aggregates are shared
//! `Rc<RefCell<...>>` handles so mutation through one reference is visible
//! through all of them.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::RuntimeError;
use crate::runtime::class::{ClassRef, ClassRegistry, MethodObject};

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    String(String),
    Boolean(bool),
    Null,
    Array(Rc<RefCell<Vec<Value>>>),
    /// String-keyed; insertion-ordered storage, sorted iteration only where
    /// an operation specifies it.
    Hash(Rc<RefCell<IndexMap<String, Value>>>),
    /// Inclusive integer range.
    Range(i64, i64),
    Class(ClassRef),
    Instance(Rc<RefCell<Instance>>),
    Method(Rc<MethodObject>),
    Error(Rc<RuntimeError>),
}

/// A user-defined object: its class plus its `@...` slots.
#[derive(Debug)]
pub struct Instance {
    pub class: ClassRef,
    pub ivars: HashMap<String, Value>,
}

impl Instance {
    pub fn new(class: ClassRef) -> Self {
        Self {
            class,
            ivars: HashMap::new(),
        }
    }
}

impl Value {
    pub fn array(values: Vec<Value>) -> Self {
        Self::Array(Rc::new(RefCell::new(values)))
    }

    pub fn hash(map: IndexMap<String, Value>) -> Self {
        Self::Hash(Rc::new(RefCell::new(map)))
    }

    /// Everything is truthy except FALSE and NIL.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Boolean(false) | Self::Null)
    }

    /// The name reported for this value's class in error messages.
    pub fn class_name(&self) -> String {
        match self {
            Self::Integer(_) => "Integer".to_string(),
            Self::String(_) => "String".to_string(),
            Self::Boolean(_) => "Boolean".to_string(),
            Self::Null => "Null".to_string(),
            Self::Array(_) => "Array".to_string(),
            Self::Hash(_) => "Hash".to_string(),
            Self::Range(..) => "Range".to_string(),
            Self::Class(_) => "Class".to_string(),
            Self::Instance(instance) => instance.borrow().class.borrow().name.clone(),
            Self::Method(_) => "Method".to_string(),
            Self::Error(e) => e.kind.as_str().to_string(),
        }
    }

    /// The class that method dispatch starts from: the singleton class for
    /// class receivers, the value's class otherwise.
    pub fn dispatch_class(&self, registry: &ClassRegistry) -> ClassRef {
        match self {
            Self::Class(c) => registry.singleton_class(c),
            other => other.class_of(registry),
        }
    }

    /// The class the `class` method reports. Class values report `Class`,
    /// not their singleton class.
    pub fn class_of(&self, registry: &ClassRegistry) -> ClassRef {
        match self {
            Self::Integer(_) => registry.integer.clone(),
            Self::String(_) => registry.string.clone(),
            Self::Boolean(_) => registry.boolean.clone(),
            Self::Null => registry.null.clone(),
            Self::Array(_) => registry.array.clone(),
            Self::Hash(_) => registry.hash.clone(),
            Self::Range(..) => registry.range.clone(),
            Self::Class(_) => registry.class.clone(),
            Self::Instance(instance) => instance.borrow().class.clone(),
            Self::Method(_) | Self::Error(_) => registry.object.clone(),
        }
    }

    /// Read an `@...` slot. Instances and classes both have them; anything
    /// else reads as NIL.
    pub fn instance_variable(&self, name: &str) -> Value {
        match self {
            Self::Instance(instance) => instance
                .borrow()
                .ivars
                .get(name)
                .cloned()
                .unwrap_or(Value::Null),
            Self::Class(class) => class
                .borrow()
                .ivars
                .get(name)
                .cloned()
                .unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }

    pub fn set_instance_variable(&self, name: &str, value: Value) {
        match self {
            Self::Instance(instance) => {
                instance.borrow_mut().ivars.insert(name.to_string(), value);
            }
            Self::Class(class) => {
                class.borrow_mut().ivars.insert(name.to_string(), value);
            }
            _ => {}
        }
    }

    /// The quoted form used for elements inside containers: strings get
    /// double quotes, everything else renders as `to_s`.
    pub fn inspect(&self) -> String {
        match self {
            Self::String(s) => format!("\"{}\"", s),
            other => other.to_string(),
        }
    }

    /// Convert to a `serde_json::Value` for `to_json`. NIL maps to `null`;
    /// ranges expand to arrays; values with no JSON shape render as strings.
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            Self::Integer(n) => serde_json::Value::from(*n),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Boolean(b) => serde_json::Value::Bool(*b),
            Self::Null => serde_json::Value::Null,
            Self::Array(values) => serde_json::Value::Array(
                values.borrow().iter().map(Value::to_json_value).collect(),
            ),
            Self::Hash(map) => {
                let mut object = serde_json::Map::new();
                for (k, v) in map.borrow().iter() {
                    object.insert(k.clone(), v.to_json_value());
                }
                serde_json::Value::Object(object)
            }
            Self::Range(start, end) => serde_json::Value::Array(
                (*start..=*end).map(serde_json::Value::from).collect(),
            ),
            other => serde_json::Value::String(other.to_string()),
        }
    }

    pub fn to_json_string(&self) -> String {
        self.to_json_value().to_string()
    }
}

/// Keys of a hash in ascending order, for the `sorted_*` operations and the
/// sorted renderings.
pub fn sorted_hash_keys(map: &IndexMap<String, Value>) -> Vec<String> {
    let mut keys: Vec<String> = map.keys().cloned().collect();
    keys.sort();
    keys
}

/// Deep structural equality for primitives and containers; reference
/// identity for classes, instances and methods.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Null, Self::Null) => true,
            (Self::Range(a1, a2), Self::Range(b1, b2)) => a1 == b1 && a2 == b2,
            (Self::Array(a), Self::Array(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (Self::Hash(a), Self::Hash(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len()
                    && a.iter().all(|(k, v)| b.get(k).is_some_and(|bv| bv == v))
            }
            (Self::Class(a), Self::Class(b)) => Rc::ptr_eq(a, b),
            (Self::Instance(a), Self::Instance(b)) => Rc::ptr_eq(a, b),
            (Self::Method(a), Self::Method(b)) => Rc::ptr_eq(a, b),
            (Self::Error(a), Self::Error(b)) => a.kind == b.kind && a.message == b.message,
            _ => false,
        }
    }
}

/// The `to_s` rendering. NIL renders empty; hashes render with keys in
/// ascending order and string values quoted; ranges render `(a..b)`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{}", n),
            Self::String(s) => f.write_str(s),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Null => Ok(()),
            Self::Array(values) => {
                let parts: Vec<String> =
                    values.borrow().iter().map(Value::inspect).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Self::Hash(map) => {
                let map = map.borrow();
                if map.is_empty() {
                    return f.write_str("{}");
                }
                let pairs: Vec<String> = sorted_hash_keys(&map)
                    .into_iter()
                    .map(|k| {
                        let rendered = map[&k].inspect();
                        format!("{}: {}", k, rendered)
                    })
                    .collect();
                write!(f, "{{ {} }}", pairs.join(", "))
            }
            Self::Range(start, end) => write!(f, "({}..{})", start, end),
            Self::Class(class) => f.write_str(&class.borrow().name),
            Self::Instance(instance) => {
                write!(f, "#<{}>", instance.borrow().class.borrow().name)
            }
            Self::Method(method) => write!(f, "#<Method: {}>", method.proto.name),
            Self::Error(e) => write!(f, "{}", e),
        }
    }
}
