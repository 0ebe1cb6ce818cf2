//! Methods every object responds to: identity, reflection, output, and
//! the require family.

use std::rc::Rc;

use crate::error::RuntimeError;
use crate::runtime::class::{ancestors_contain, BuiltinMethod};
use crate::runtime::value::Value;
use crate::vm::{Block, Vm};

use super::{check_argc, expect_class, expect_string};

pub(super) static METHODS: &[BuiltinMethod] = &[
    BuiltinMethod {
        name: "class",
        func: object_class,
    },
    BuiltinMethod {
        name: "nil?",
        func: is_nil,
    },
    BuiltinMethod {
        name: "is_a?",
        func: is_a,
    },
    BuiltinMethod {
        name: "==",
        func: eq,
    },
    BuiltinMethod {
        name: "!=",
        func: not_eq,
    },
    BuiltinMethod {
        name: "!",
        func: not,
    },
    BuiltinMethod {
        name: "to_s",
        func: to_s,
    },
    BuiltinMethod {
        name: "instance_variable_get",
        func: ivar_get,
    },
    BuiltinMethod {
        name: "instance_variable_set",
        func: ivar_set,
    },
    BuiltinMethod {
        name: "puts",
        func: puts,
    },
    BuiltinMethod {
        name: "require",
        func: require,
    },
    BuiltinMethod {
        name: "require_relative",
        func: require_relative,
    },
];

fn object_class(
    vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    Ok(Value::Class(receiver.class_of(&vm.classes)))
}

fn is_nil(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    Ok(Value::Boolean(matches!(receiver, Value::Null)))
}

fn is_a(
    vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 1)?;
    let target = expect_class(&args[0])?;
    let start = receiver.class_of(&vm.classes);
    Ok(Value::Boolean(ancestors_contain(&start, &target)))
}

fn eq(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 1)?;
    Ok(Value::Boolean(receiver == args[0]))
}

fn not_eq(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 1)?;
    Ok(Value::Boolean(receiver != args[0]))
}

fn not(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    Ok(Value::Boolean(!receiver.is_truthy()))
}

fn to_s(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    Ok(Value::String(receiver.to_string()))
}

fn ivar_get(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 1)?;
    let name = expect_string(&args[0])?;
    Ok(receiver.instance_variable(name))
}

fn ivar_set(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 2)?;
    let name = expect_string(&args[0])?;
    receiver.set_instance_variable(name, args[1].clone());
    Ok(args[1].clone())
}

/// Write each argument's string form to stdout, one per line. The VM also
/// buffers the lines so tests can observe them.
fn puts(
    vm: &mut Vm,
    _receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    if args.is_empty() {
        println!();
        vm.output.push(String::new());
    }
    for arg in args {
        let line = arg.to_string();
        println!("{}", line);
        vm.output.push(line);
    }
    Ok(Value::Null)
}

fn require(
    vm: &mut Vm,
    _receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 1)?;
    let name = expect_string(&args[0])?.to_string();
    vm.require_name(&name)
}

fn require_relative(
    vm: &mut Vm,
    _receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 1)?;
    let path = expect_string(&args[0])?.to_string();
    vm.require_relative(&path)
}
