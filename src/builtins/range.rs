//! Range methods. Ranges are inclusive integer pairs.

use std::rc::Rc;

use crate::error::RuntimeError;
use crate::runtime::class::BuiltinMethod;
use crate::runtime::value::Value;
use crate::vm::{Block, Vm};

use super::{check_argc, require_block};

pub(super) static METHODS: &[BuiltinMethod] = &[
    BuiltinMethod {
        name: "to_a",
        func: to_a,
    },
    BuiltinMethod {
        name: "each",
        func: each,
    },
    BuiltinMethod {
        name: "first",
        func: first,
    },
    BuiltinMethod {
        name: "last",
        func: last,
    },
];

fn bounds(receiver: &Value) -> Result<(i64, i64), RuntimeError> {
    match receiver {
        Value::Range(start, end) => Ok((*start, *end)),
        other => Err(RuntimeError::wrong_type("Range", &other.class_name())),
    }
}

fn to_a(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let (start, end) = bounds(&receiver)?;
    Ok(Value::array((start..=end).map(Value::Integer).collect()))
}

fn each(
    vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let block = require_block(block)?;
    let (start, end) = bounds(&receiver)?;
    for i in start..=end {
        vm.yield_block(block, &[Value::Integer(i)])?;
    }
    Ok(receiver)
}

fn first(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let (start, _) = bounds(&receiver)?;
    Ok(Value::Integer(start))
}

fn last(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let (_, end) = bounds(&receiver)?;
    Ok(Value::Integer(end))
}

#[cfg(test)]
mod tests {
    use crate::testing::{assert_clean_stack, eval, expect_int, expect_string};

    #[test]
    fn renders_and_expands() {
        let (vm, value) = eval("(1..3).to_s");
        expect_string(&value, "(1..3)");
        assert_clean_stack(&vm);
        let (vm, value) = eval("(1..3).to_a.to_s");
        expect_string(&value, "[1, 2, 3]");
        assert_clean_stack(&vm);
        let (vm, value) = eval("(3..1).to_a.length");
        expect_int(&value, 0);
        assert_clean_stack(&vm);
    }

    #[test]
    fn bounds() {
        let (vm, value) = eval("(2..10).first");
        expect_int(&value, 2);
        assert_clean_stack(&vm);
        let (vm, value) = eval("(2..10).last");
        expect_int(&value, 10);
        assert_clean_stack(&vm);
    }

    #[test]
    fn each_yields_every_integer() {
        let (vm, value) = eval("sum = 0\n(1..4).each do |n|\n  sum = sum + n\nend\nsum");
        expect_int(&value, 10);
        assert_clean_stack(&vm);
    }
}
