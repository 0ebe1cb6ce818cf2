//! Integer arithmetic and comparison. Operands must be integers; division
//! and modulo by zero fault.

use std::rc::Rc;

use crate::error::RuntimeError;
use crate::runtime::class::BuiltinMethod;
use crate::runtime::value::Value;
use crate::vm::{Block, Vm};

use super::{check_argc, expect_integer, require_block};

pub(super) static METHODS: &[BuiltinMethod] = &[
    BuiltinMethod {
        name: "+",
        func: add,
    },
    BuiltinMethod {
        name: "-",
        func: subtract,
    },
    BuiltinMethod {
        name: "*",
        func: multiply,
    },
    BuiltinMethod {
        name: "/",
        func: divide,
    },
    BuiltinMethod {
        name: "%",
        func: modulo,
    },
    BuiltinMethod {
        name: "<",
        func: less,
    },
    BuiltinMethod {
        name: "<=",
        func: less_equal,
    },
    BuiltinMethod {
        name: ">",
        func: greater,
    },
    BuiltinMethod {
        name: ">=",
        func: greater_equal,
    },
    BuiltinMethod {
        name: "-@",
        func: negate,
    },
    BuiltinMethod {
        name: "times",
        func: times,
    },
];

fn operands(receiver: &Value, args: &[Value]) -> Result<(i64, i64), RuntimeError> {
    check_argc(args, 1)?;
    let a = expect_integer(receiver)?;
    let b = expect_integer(&args[0])?;
    Ok((a, b))
}

fn add(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    let (a, b) = operands(&receiver, args)?;
    Ok(Value::Integer(a + b))
}

fn subtract(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    let (a, b) = operands(&receiver, args)?;
    Ok(Value::Integer(a - b))
}

fn multiply(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    let (a, b) = operands(&receiver, args)?;
    Ok(Value::Integer(a * b))
}

fn divide(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    let (a, b) = operands(&receiver, args)?;
    if b == 0 {
        return Err(RuntimeError::division_by_zero());
    }
    Ok(Value::Integer(a / b))
}

fn modulo(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    let (a, b) = operands(&receiver, args)?;
    if b == 0 {
        return Err(RuntimeError::modulo_by_zero());
    }
    Ok(Value::Integer(a % b))
}

fn less(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    let (a, b) = operands(&receiver, args)?;
    Ok(Value::Boolean(a < b))
}

fn less_equal(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    let (a, b) = operands(&receiver, args)?;
    Ok(Value::Boolean(a <= b))
}

fn greater(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    let (a, b) = operands(&receiver, args)?;
    Ok(Value::Boolean(a > b))
}

fn greater_equal(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    let (a, b) = operands(&receiver, args)?;
    Ok(Value::Boolean(a >= b))
}

fn negate(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let n = expect_integer(&receiver)?;
    Ok(Value::Integer(-n))
}

/// Yield 0..n-1, returning the receiver.
fn times(
    vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let block = require_block(block)?;
    let n = expect_integer(&receiver)?;
    for i in 0..n.max(0) {
        vm.yield_block(block, &[Value::Integer(i)])?;
    }
    Ok(receiver)
}

#[cfg(test)]
mod tests {
    use crate::testing::{assert_clean_stack, eval, expect_bool, expect_error, expect_int};

    #[test]
    fn arithmetic() {
        let tests = [
            ("7 + 3", 10),
            ("7 - 3", 4),
            ("7 * 3", 21),
            ("7 / 3", 2),
            ("7 % 3", 1),
            ("-7 % 3", -1),
            ("-(7)", -7),
        ];
        for (input, expected) in tests {
            let (vm, value) = eval(input);
            expect_int(&value, expected);
            assert_clean_stack(&vm);
        }
    }

    #[test]
    fn comparisons() {
        let tests = [
            ("1 < 2", true),
            ("2 < 1", false),
            ("2 <= 2", true),
            ("3 > 2", true),
            ("2 >= 3", false),
        ];
        for (input, expected) in tests {
            let (vm, value) = eval(input);
            expect_bool(&value, expected);
            assert_clean_stack(&vm);
        }
    }

    #[test]
    fn operand_type_errors() {
        let tests = [
            ("1 + \"a\"", "TypeError: Expect argument to be Integer. got: String"),
            ("1 - nil", "TypeError: Expect argument to be Integer. got: Null"),
            ("1 < \"2\"", "TypeError: Expect argument to be Integer. got: String"),
        ];
        for (input, expected) in tests {
            let (vm, value) = eval(input);
            expect_error(&value, expected, 1);
            assert_eq!(vm.cfp(), 1);
            assert_eq!(vm.sp(), 1);
        }
    }

    #[test]
    fn zero_division_and_modulo() {
        let (vm, value) = eval("10 / 0");
        expect_error(&value, "InternalError: Division by zero", 1);
        assert_eq!(vm.cfp(), 1);
        let (vm, value) = eval("10 % 0");
        expect_error(&value, "InternalError: Modulo by zero", 1);
        assert_eq!(vm.cfp(), 1);
    }

    #[test]
    fn times_returns_receiver_and_counts() {
        let (vm, value) = eval("x = 0\n5.times do |i|\n  x = x + i\nend");
        expect_int(&value, 5);
        assert_clean_stack(&vm);
        let (vm, value) = eval("x = 0\n5.times do |i|\n  x = x + i\nend\nx");
        expect_int(&value, 10);
        assert_clean_stack(&vm);
    }
}
