//! Shared test helpers: evaluate a source string on a fresh VM and assert
//! on the result, the post-run stack depths, and error surfaces.

use crate::runtime::Value;
use crate::vm::Vm;

pub(crate) const TEST_FILE: &str = "test.gr";

/// Compile and run `source`, returning the VM (for SP/CFP and output
/// inspection) and the final value, which is an Error value on failure.
pub(crate) fn eval(source: &str) -> (Vm, Value) {
    eval_with_file(source, TEST_FILE)
}

pub(crate) fn eval_with_file(source: &str, file: &str) -> (Vm, Value) {
    let unit = crate::compile(source, file).expect("compile error");
    let mut vm = Vm::new();
    let value = vm.execute(&unit);
    (vm, value)
}

/// Successful top-level evaluations always end with one value on the
/// stack and no frames.
pub(crate) fn assert_clean_stack(vm: &Vm) {
    assert_eq!(vm.cfp(), 0, "call-frame depth after success");
    assert_eq!(vm.sp(), 1, "stack depth after success");
}

pub(crate) fn expect_int(value: &Value, expected: i64) {
    match value {
        Value::Integer(n) => assert_eq!(*n, expected),
        other => panic!("expected {}, got {:?}", expected, other),
    }
}

pub(crate) fn expect_string(value: &Value, expected: &str) {
    match value {
        Value::String(s) => assert_eq!(s, expected),
        other => panic!("expected {:?}, got {:?}", expected, other),
    }
}

pub(crate) fn expect_bool(value: &Value, expected: bool) {
    match value {
        Value::Boolean(b) => assert_eq!(*b, expected),
        other => panic!("expected {}, got {:?}", expected, other),
    }
}

pub(crate) fn expect_nil(value: &Value) {
    assert!(matches!(value, Value::Null), "expected nil, got {:?}", value);
}

/// Assert an Error value's rendered message, file, and line.
pub(crate) fn expect_error(value: &Value, rendered: &str, line: usize) {
    match value {
        Value::Error(e) => {
            assert_eq!(e.to_string(), rendered);
            assert_eq!(e.file.as_deref(), Some(TEST_FILE), "error file");
            assert_eq!(e.line, line, "error line");
        }
        other => panic!("expected error {:?}, got {:?}", rendered, other),
    }
}
