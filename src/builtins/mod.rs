//! Built-in method tables for the core classes, one file per class, plus
//! the argument-checking helpers they share. `install` wires the tables
//! into a freshly bootstrapped registry.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::RuntimeError;
use crate::runtime::class::{BuiltinMethod, ClassRef, ClassRegistry, MethodEntry};
use crate::runtime::value::Value;
use crate::vm::Block;
use crate::vm::Vm;

mod array;
mod class;
mod hash;
mod integer;
mod object;
mod range;
mod string;

pub fn install(classes: &mut ClassRegistry) {
    install_methods(&classes.object, object::METHODS);
    install_methods(&classes.class, class::METHODS);
    install_methods(&classes.integer, integer::METHODS);
    install_methods(&classes.string, string::METHODS);
    install_methods(&classes.array, array::METHODS);
    install_methods(&classes.hash, hash::METHODS);
    install_methods(&classes.range, range::METHODS);

    // Literals are the only constructors for the primitive classes; their
    // class-side `new` reports UnsupportedMethodError.
    let primitives = [
        classes.integer.clone(),
        classes.string.clone(),
        classes.boolean.clone(),
        classes.null.clone(),
        classes.array.clone(),
        classes.hash.clone(),
        classes.range.clone(),
    ];
    for class in &primitives {
        let meta = classes.singleton_class(class);
        meta.borrow_mut()
            .methods
            .insert("new".to_string(), MethodEntry::Builtin(&UNSUPPORTED_NEW));
    }
}

fn install_methods(class: &ClassRef, methods: &'static [BuiltinMethod]) {
    let mut class = class.borrow_mut();
    for method in methods {
        class
            .methods
            .insert(method.name.to_string(), MethodEntry::Builtin(method));
    }
}

static UNSUPPORTED_NEW: BuiltinMethod = BuiltinMethod {
    name: "new",
    func: unsupported_new,
};

fn unsupported_new(
    _vm: &mut Vm,
    receiver: Value,
    _args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    Err(RuntimeError::unsupported_method(
        "#new",
        &receiver.to_string(),
    ))
}

// --- Shared argument helpers ---

pub(super) fn check_argc(args: &[Value], expected: usize) -> Result<(), RuntimeError> {
    if args.len() != expected {
        return Err(RuntimeError::argument_count(expected, args.len()));
    }
    Ok(())
}

pub(super) fn expect_string(value: &Value) -> Result<&str, RuntimeError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(RuntimeError::wrong_type("String", &other.class_name())),
    }
}

pub(super) fn expect_integer(value: &Value) -> Result<i64, RuntimeError> {
    match value {
        Value::Integer(n) => Ok(*n),
        other => Err(RuntimeError::wrong_type("Integer", &other.class_name())),
    }
}

pub(super) fn expect_boolean(value: &Value) -> Result<bool, RuntimeError> {
    match value {
        Value::Boolean(b) => Ok(*b),
        other => Err(RuntimeError::wrong_type("Boolean", &other.class_name())),
    }
}

pub(super) fn expect_array(value: &Value) -> Result<Rc<RefCell<Vec<Value>>>, RuntimeError> {
    match value {
        Value::Array(values) => Ok(values.clone()),
        other => Err(RuntimeError::wrong_type("Array", &other.class_name())),
    }
}

pub(super) fn expect_hash(
    value: &Value,
) -> Result<Rc<RefCell<IndexMap<String, Value>>>, RuntimeError> {
    match value {
        Value::Hash(map) => Ok(map.clone()),
        other => Err(RuntimeError::wrong_type("Hash", &other.class_name())),
    }
}

pub(super) fn expect_class(value: &Value) -> Result<ClassRef, RuntimeError> {
    match value {
        Value::Class(class) => Ok(class.clone()),
        other => Err(RuntimeError::wrong_type("Class", &other.class_name())),
    }
}

pub(super) fn require_block<'a>(
    block: Option<&'a Rc<Block>>,
) -> Result<&'a Rc<Block>, RuntimeError> {
    block.ok_or_else(|| RuntimeError::cant_yield_without_block())
}
