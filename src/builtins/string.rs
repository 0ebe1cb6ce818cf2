//! String methods.

use std::rc::Rc;

use crate::error::{ErrorKind, RuntimeError};
use crate::runtime::class::BuiltinMethod;
use crate::runtime::value::Value;
use crate::vm::{Block, Vm};

use super::{check_argc, expect_integer, expect_string};

pub(super) static METHODS: &[BuiltinMethod] = &[
    BuiltinMethod {
        name: "+",
        func: concat,
    },
    BuiltinMethod {
        name: "*",
        func: repeat,
    },
    BuiltinMethod {
        name: "<",
        func: less,
    },
    BuiltinMethod {
        name: ">",
        func: greater,
    },
    BuiltinMethod {
        name: "length",
        func: length,
    },
    BuiltinMethod {
        name: "reverse",
        func: reverse,
    },
    BuiltinMethod {
        name: "upcase",
        func: upcase,
    },
    BuiltinMethod {
        name: "downcase",
        func: downcase,
    },
    BuiltinMethod {
        name: "include?",
        func: include,
    },
];

fn concat(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 1)?;
    let a = expect_string(&receiver)?;
    let b = expect_string(&args[0])?;
    Ok(Value::String(format!("{}{}", a, b)))
}

fn repeat(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 1)?;
    let s = expect_string(&receiver)?;
    let n = expect_integer(&args[0])?;
    if n < 0 {
        return Err(RuntimeError::new(ErrorKind::Argument, "negative argument"));
    }
    Ok(Value::String(s.repeat(n as usize)))
}

fn less(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 1)?;
    let a = expect_string(&receiver)?;
    let b = expect_string(&args[0])?;
    Ok(Value::Boolean(a < b))
}

fn greater(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 1)?;
    let a = expect_string(&receiver)?;
    let b = expect_string(&args[0])?;
    Ok(Value::Boolean(a > b))
}

fn length(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let s = expect_string(&receiver)?;
    Ok(Value::Integer(s.chars().count() as i64))
}

fn reverse(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let s = expect_string(&receiver)?;
    Ok(Value::String(s.chars().rev().collect()))
}

fn upcase(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let s = expect_string(&receiver)?;
    Ok(Value::String(s.to_uppercase()))
}

fn downcase(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let s = expect_string(&receiver)?;
    Ok(Value::String(s.to_lowercase()))
}

fn include(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 1)?;
    let a = expect_string(&receiver)?;
    let b = expect_string(&args[0])?;
    Ok(Value::Boolean(a.contains(b)))
}

#[cfg(test)]
mod tests {
    use crate::testing::{assert_clean_stack, eval, expect_bool, expect_error, expect_int, expect_string};

    #[test]
    fn concatenation_and_repetition() {
        let (vm, value) = eval("\"Hello \" + \"World\"");
        expect_string(&value, "Hello World");
        assert_clean_stack(&vm);
        let (vm, value) = eval("\"ab\" * 3");
        expect_string(&value, "ababab");
        assert_clean_stack(&vm);
    }

    #[test]
    fn concatenation_requires_a_string() {
        let (vm, value) = eval("\"a\" + 1");
        expect_error(
            &value,
            "TypeError: Expect argument to be String. got: Integer",
            1,
        );
        assert_eq!(vm.cfp(), 1);
    }

    #[test]
    fn repetition_rejects_negative_counts() {
        let (vm, value) = eval("\"a\" * -1");
        expect_error(&value, "ArgumentError: negative argument", 1);
        assert_eq!(vm.cfp(), 1);
    }

    #[test]
    fn length_counts_characters() {
        let (vm, value) = eval("\"hello\".length");
        expect_int(&value, 5);
        assert_clean_stack(&vm);
        let (vm, value) = eval("\"\".length");
        expect_int(&value, 0);
        assert_clean_stack(&vm);
    }

    #[test]
    fn case_and_reverse() {
        let (vm, value) = eval("\"AbC\".upcase");
        expect_string(&value, "ABC");
        assert_clean_stack(&vm);
        let (vm, value) = eval("\"AbC\".downcase");
        expect_string(&value, "abc");
        assert_clean_stack(&vm);
        let (vm, value) = eval("\"abc\".reverse");
        expect_string(&value, "cba");
        assert_clean_stack(&vm);
    }

    #[test]
    fn membership_and_ordering() {
        let (vm, value) = eval("\"hello world\".include?(\"lo w\")");
        expect_bool(&value, true);
        assert_clean_stack(&vm);
        let (vm, value) = eval("\"abc\" < \"abd\"");
        expect_bool(&value, true);
        assert_clean_stack(&vm);
        let (vm, value) = eval("\"b\" > \"c\"");
        expect_bool(&value, false);
        assert_clean_stack(&vm);
    }
}
