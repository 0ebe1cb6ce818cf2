//! Class-side surface: reflection, allocation, module inclusion and the
//! attr_* accessor definers. These are instance methods of `Class`, so
//! every class reaches them through its singleton-class chain.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::runtime::class::{lookup_method, BuiltinMethod, MethodEntry};
use crate::runtime::value::{Instance, Value};
use crate::vm::{Block, Vm};

use super::{check_argc, expect_class, expect_string};

pub(super) static METHODS: &[BuiltinMethod] = &[
    BuiltinMethod {
        name: "name",
        func: name,
    },
    BuiltinMethod {
        name: "superclass",
        func: superclass,
    },
    BuiltinMethod {
        name: "singleton_class",
        func: singleton_class,
    },
    BuiltinMethod {
        name: "new",
        func: new,
    },
    BuiltinMethod {
        name: "include",
        func: include,
    },
    BuiltinMethod {
        name: "attr_reader",
        func: attr_reader,
    },
    BuiltinMethod {
        name: "attr_writer",
        func: attr_writer,
    },
    BuiltinMethod {
        name: "attr_accessor",
        func: attr_accessor,
    },
];

fn name(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let class = expect_class(&receiver)?;
    let name = class.borrow().name.clone();
    Ok(Value::String(name))
}

fn superclass(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let class = expect_class(&receiver)?;
    let superclass = class.borrow().superclass.clone();
    // The root reports itself, so Object.superclass.name is "Object".
    Ok(Value::Class(superclass.unwrap_or(class)))
}

fn singleton_class(
    vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let class = expect_class(&receiver)?;
    Ok(Value::Class(vm.classes.singleton_class(&class)))
}

/// Allocate an instance and run `initialize` on it when the class chain
/// defines one, forwarding arguments and block.
fn new(
    vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    let class = expect_class(&receiver)?;
    if class.borrow().is_module {
        return Err(RuntimeError::unsupported_method(
            "#new",
            &receiver.to_string(),
        ));
    }
    let instance = Value::Instance(Rc::new(RefCell::new(Instance::new(class.clone()))));
    if let Some(initialize) = lookup_method(&class, "initialize") {
        vm.invoke_method(&initialize, instance.clone(), args, block)?;
    }
    Ok(instance)
}

fn include(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    if args.is_empty() {
        return Err(RuntimeError::argument_count_at_least(1, 0));
    }
    let class = expect_class(&receiver)?;
    for arg in args {
        let module = expect_class(arg)?;
        if !module.borrow().is_module {
            return Err(RuntimeError::wrong_type("Module", &arg.class_name()));
        }
        // Most recent inclusion wins lookup.
        class.borrow_mut().includes.insert(0, module);
    }
    Ok(receiver)
}

fn attr_reader(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    define_accessors(&receiver, args, true, false)
}

fn attr_writer(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    define_accessors(&receiver, args, false, true)
}

fn attr_accessor(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    define_accessors(&receiver, args, true, true)
}

fn define_accessors(
    receiver: &Value,
    args: &[Value],
    reader: bool,
    writer: bool,
) -> Result<Value, RuntimeError> {
    let class = expect_class(receiver)?;
    for arg in args {
        let attr = expect_string(arg)?;
        let ivar: Rc<str> = Rc::from(format!("@{}", attr));
        let mut class = class.borrow_mut();
        if reader {
            class
                .methods
                .insert(attr.to_string(), MethodEntry::AttrReader(ivar.clone()));
        }
        if writer {
            class
                .methods
                .insert(format!("{}=", attr), MethodEntry::AttrWriter(ivar));
        }
    }
    Ok(Value::Null)
}
