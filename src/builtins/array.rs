//! Array methods. Negative indices count from the end; writes past the end
//! pad with NIL.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::{ErrorKind, RuntimeError};
use crate::runtime::class::BuiltinMethod;
use crate::runtime::value::Value;
use crate::vm::{Block, Vm};

use super::{check_argc, expect_array, expect_integer, expect_string, require_block};

pub(super) static METHODS: &[BuiltinMethod] = &[
    BuiltinMethod {
        name: "push",
        func: push,
    },
    BuiltinMethod {
        name: "pop",
        func: pop,
    },
    BuiltinMethod {
        name: "length",
        func: length,
    },
    BuiltinMethod {
        name: "[]",
        func: index_get,
    },
    BuiltinMethod {
        name: "[]=",
        func: index_set,
    },
    BuiltinMethod {
        name: "first",
        func: first,
    },
    BuiltinMethod {
        name: "last",
        func: last,
    },
    BuiltinMethod {
        name: "each",
        func: each,
    },
    BuiltinMethod {
        name: "to_h",
        func: to_h,
    },
    BuiltinMethod {
        name: "to_json",
        func: to_json,
    },
];

fn push(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    if args.is_empty() {
        return Err(RuntimeError::argument_count_at_least(1, 0));
    }
    let values = expect_array(&receiver)?;
    values.borrow_mut().extend(args.iter().cloned());
    Ok(receiver)
}

fn pop(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let values = expect_array(&receiver)?;
    let popped = values.borrow_mut().pop();
    Ok(popped.unwrap_or(Value::Null))
}

fn length(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let values = expect_array(&receiver)?;
    let len = values.borrow().len();
    Ok(Value::Integer(len as i64))
}

fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let real = if index < 0 { len + index } else { index };
    if real < 0 {
        None
    } else {
        Some(real as usize)
    }
}

fn index_get(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 1)?;
    let index = expect_integer(&args[0])?;
    let values = expect_array(&receiver)?;
    let values = values.borrow();
    let value = resolve_index(index, values.len())
        .and_then(|i| values.get(i).cloned())
        .unwrap_or(Value::Null);
    Ok(value)
}

fn index_set(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 2)?;
    let index = expect_integer(&args[0])?;
    let values = expect_array(&receiver)?;
    let mut values = values.borrow_mut();
    let len = values.len();
    let Some(real) = resolve_index(index, len) else {
        return Err(RuntimeError::new(
            ErrorKind::Argument,
            format!(
                "Index value {} too small for array. minimum: {}",
                index,
                -(len as i64)
            ),
        ));
    };
    if real >= len {
        values.resize(real + 1, Value::Null);
    }
    values[real] = args[1].clone();
    Ok(args[1].clone())
}

fn first(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let values = expect_array(&receiver)?;
    let value = values.borrow().first().cloned();
    Ok(value.unwrap_or(Value::Null))
}

fn last(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let values = expect_array(&receiver)?;
    let value = values.borrow().last().cloned();
    Ok(value.unwrap_or(Value::Null))
}

fn each(
    vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let block = require_block(block)?;
    let values = expect_array(&receiver)?;
    let snapshot: Vec<Value> = values.borrow().clone();
    for value in snapshot {
        vm.yield_block(block, &[value])?;
    }
    Ok(receiver)
}

/// Rebuild a hash from an array of `[key, value]` pairs; later pairs win.
fn to_h(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let values = expect_array(&receiver)?;
    let mut map = IndexMap::new();
    for element in values.borrow().iter() {
        let pair = expect_array(element)?;
        let pair = pair.borrow();
        if pair.len() != 2 {
            return Err(RuntimeError::new(
                ErrorKind::Type,
                format!("Expect element to be a pair. got: {} elements", pair.len()),
            ));
        }
        let key = expect_string(&pair[0])?;
        map.insert(key.to_string(), pair[1].clone());
    }
    Ok(Value::hash(map))
}

fn to_json(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    Ok(Value::String(receiver.to_json_string()))
}
