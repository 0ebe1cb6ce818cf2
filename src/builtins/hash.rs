//! Hash methods. Keys are strings; a non-String key is a TypeError.
//! Storage preserves insertion order, and iteration order is unspecified
//! except for the operations that sort: `sorted_keys`, `each_key`,
//! `each_value`, `to_s`, and `to_a(true)`.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::RuntimeError;
use crate::runtime::class::BuiltinMethod;
use crate::runtime::value::{sorted_hash_keys, Value};
use crate::vm::{Block, Vm};

use super::{check_argc, expect_boolean, expect_hash, expect_string, require_block};

pub(super) static METHODS: &[BuiltinMethod] = &[
    BuiltinMethod {
        name: "[]",
        func: index_get,
    },
    BuiltinMethod {
        name: "[]=",
        func: index_set,
    },
    BuiltinMethod {
        name: "clear",
        func: clear,
    },
    BuiltinMethod {
        name: "delete",
        func: delete,
    },
    BuiltinMethod {
        name: "empty?",
        func: is_empty,
    },
    BuiltinMethod {
        name: "eql?",
        func: eql,
    },
    BuiltinMethod {
        name: "has_key?",
        func: has_key,
    },
    BuiltinMethod {
        name: "has_value?",
        func: has_value,
    },
    BuiltinMethod {
        name: "keys",
        func: keys,
    },
    BuiltinMethod {
        name: "length",
        func: length,
    },
    BuiltinMethod {
        name: "map_values",
        func: map_values,
    },
    BuiltinMethod {
        name: "merge",
        func: merge,
    },
    BuiltinMethod {
        name: "sorted_keys",
        func: sorted_keys,
    },
    BuiltinMethod {
        name: "to_a",
        func: to_a,
    },
    BuiltinMethod {
        name: "to_json",
        func: to_json,
    },
    BuiltinMethod {
        name: "to_s",
        func: to_s,
    },
    BuiltinMethod {
        name: "transform_values",
        func: transform_values,
    },
    BuiltinMethod {
        name: "values",
        func: values,
    },
    BuiltinMethod {
        name: "each_key",
        func: each_key,
    },
    BuiltinMethod {
        name: "each_value",
        func: each_value,
    },
];

/// Value at the key, NIL when absent.
fn index_get(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 1)?;
    let key = expect_string(&args[0])?;
    let map = expect_hash(&receiver)?;
    let value = map.borrow().get(key).cloned();
    Ok(value.unwrap_or(Value::Null))
}

/// Associate the key with the value; evaluates to the value.
fn index_set(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 2)?;
    let key = expect_string(&args[0])?;
    let map = expect_hash(&receiver)?;
    map.borrow_mut().insert(key.to_string(), args[1].clone());
    Ok(args[1].clone())
}

/// A new empty hash; the receiver is untouched.
fn clear(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    expect_hash(&receiver)?;
    Ok(Value::hash(IndexMap::new()))
}

/// Remove the key when present; returns the (mutated) receiver.
fn delete(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 1)?;
    let key = expect_string(&args[0])?;
    let map = expect_hash(&receiver)?;
    map.borrow_mut().shift_remove(key);
    Ok(receiver)
}

fn is_empty(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let map = expect_hash(&receiver)?;
    let empty = map.borrow().is_empty();
    Ok(Value::Boolean(empty))
}

/// Deep structural equality; a non-hash argument compares false.
fn eql(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 1)?;
    expect_hash(&receiver)?;
    Ok(Value::Boolean(receiver == args[0]))
}

fn has_key(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 1)?;
    let key = expect_string(&args[0])?;
    let map = expect_hash(&receiver)?;
    let present = map.borrow().contains_key(key);
    Ok(Value::Boolean(present))
}

/// Deep-equality search over the values.
fn has_value(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 1)?;
    let map = expect_hash(&receiver)?;
    let found = map.borrow().values().any(|v| v == &args[0]);
    Ok(Value::Boolean(found))
}

fn keys(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let map = expect_hash(&receiver)?;
    let keys: Vec<Value> = map.borrow().keys().cloned().map(Value::String).collect();
    Ok(Value::array(keys))
}

fn length(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let map = expect_hash(&receiver)?;
    let len = map.borrow().len();
    Ok(Value::Integer(len as i64))
}

/// Replace each value with the block's result, mutating the receiver.
fn map_values(
    vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let block = require_block(block)?;
    let map = expect_hash(&receiver)?;
    let snapshot: Vec<(String, Value)> = map
        .borrow()
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    for (key, value) in snapshot {
        let result = vm.yield_block(block, &[value])?;
        map.borrow_mut().insert(key, result);
    }
    Ok(receiver)
}

/// A new hash combining the receiver with each argument; later wins.
fn merge(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    if args.is_empty() {
        return Err(RuntimeError::argument_count_at_least(1, 0));
    }
    let map = expect_hash(&receiver)?;
    let mut result = map.borrow().clone();
    for arg in args {
        let other = expect_hash(arg)?;
        for (k, v) in other.borrow().iter() {
            result.insert(k.clone(), v.clone());
        }
    }
    Ok(Value::hash(result))
}

fn sorted_keys(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let map = expect_hash(&receiver)?;
    let keys: Vec<Value> = sorted_hash_keys(&map.borrow())
        .into_iter()
        .map(Value::String)
        .collect();
    Ok(Value::array(keys))
}

/// `[key, value]` pairs; sorted by key iff the optional flag is true.
fn to_a(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    let sorted = match args.len() {
        0 => false,
        1 => expect_boolean(&args[0])?,
        n => return Err(RuntimeError::argument_count_range("0..1", n)),
    };
    let map = expect_hash(&receiver)?;
    let map = map.borrow();
    let keys: Vec<String> = if sorted {
        sorted_hash_keys(&map)
    } else {
        map.keys().cloned().collect()
    };
    let pairs: Vec<Value> = keys
        .into_iter()
        .map(|k| {
            let value = map[&k].clone();
            Value::array(vec![Value::String(k), value])
        })
        .collect();
    Ok(Value::array(pairs))
}

fn to_json(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    expect_hash(&receiver)?;
    Ok(Value::String(receiver.to_json_string()))
}

fn to_s(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    expect_hash(&receiver)?;
    Ok(Value::String(receiver.to_string()))
}

/// Like `map_values`, but into a new hash; the receiver is unchanged.
fn transform_values(
    vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let block = require_block(block)?;
    let map = expect_hash(&receiver)?;
    let snapshot: Vec<(String, Value)> = map
        .borrow()
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let mut result = IndexMap::new();
    for (key, value) in snapshot {
        let transformed = vm.yield_block(block, &[value])?;
        result.insert(key, transformed);
    }
    Ok(Value::hash(result))
}

fn values(
    _vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    _block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let map = expect_hash(&receiver)?;
    let values: Vec<Value> = map.borrow().values().cloned().collect();
    Ok(Value::array(values))
}

/// Yield each key in ascending order; returns the sorted key array.
fn each_key(
    vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let block = require_block(block)?;
    let map = expect_hash(&receiver)?;
    let keys = sorted_hash_keys(&map.borrow());
    let mut result = Vec::with_capacity(keys.len());
    for key in keys {
        let key = Value::String(key);
        result.push(key.clone());
        vm.yield_block(block, &[key])?;
    }
    Ok(Value::array(result))
}

/// Yield each value in ascending key order; returns the value array.
fn each_value(
    vm: &mut Vm,
    receiver: Value,
    args: &[Value],
    block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    check_argc(args, 0)?;
    let block = require_block(block)?;
    let map = expect_hash(&receiver)?;
    let snapshot: Vec<Value> = {
        let map = map.borrow();
        sorted_hash_keys(&map)
            .into_iter()
            .map(|k| map[&k].clone())
            .collect()
    };
    let mut result = Vec::with_capacity(snapshot.len());
    for value in snapshot {
        result.push(value.clone());
        vm.yield_block(block, &[value])?;
    }
    Ok(Value::array(result))
}

#[cfg(test)]
mod tests {
    use crate::testing::{assert_clean_stack, eval, expect_bool, expect_error, expect_int, expect_nil, expect_string};
    use crate::runtime::Value;

    #[test]
    fn index_returns_value_or_nil() {
        let tests = [
            ("h = { a: 1, b: 2 }\nh[\"a\"]", 1),
            ("h = { a: 1, b: 2 }\nh[\"b\"]", 2),
        ];
        for (input, expected) in tests {
            let (vm, value) = eval(input);
            expect_int(&value, expected);
            assert_clean_stack(&vm);
        }
        let (vm, value) = eval("h = { a: 1 }\nh[\"missing\"]");
        expect_nil(&value);
        assert_clean_stack(&vm);
        let (vm, value) = eval("{}[\"anything\"]");
        expect_nil(&value);
        assert_clean_stack(&vm);
    }

    #[test]
    fn index_contract_violations() {
        let tests = [
            ("{ a: 1 }[]", "ArgumentError: Expect 1 argument. got: 0"),
            (
                "{ a: 1 }[\"a\", \"b\"]",
                "ArgumentError: Expect 1 argument. got: 2",
            ),
            (
                "{ a: 1 }[123]",
                "TypeError: Expect argument to be String. got: Integer",
            ),
            (
                "{ a: 1 }[true]",
                "TypeError: Expect argument to be String. got: Boolean",
            ),
            (
                "h = { a: 1 }\nh[nil] = 5",
                "TypeError: Expect argument to be String. got: Null",
            ),
        ];
        for (input, expected) in tests {
            let (vm, value) = eval(input);
            match &value {
                Value::Error(e) => assert_eq!(e.to_string(), expected, "{}", input),
                other => panic!("expected error for {}, got {:?}", input, other),
            }
            assert_eq!(vm.cfp(), 1);
            assert_eq!(vm.sp(), 1);
        }
    }

    #[test]
    fn index_set_evaluates_to_the_value() {
        let (vm, value) = eval("h = {}\nh[\"a\"] = 42");
        expect_int(&value, 42);
        assert_clean_stack(&vm);
        let (vm, value) = eval("h = {}\nh[\"a\"] = 42\nh[\"a\"]");
        expect_int(&value, 42);
        assert_clean_stack(&vm);
    }

    #[test]
    fn clear_returns_a_fresh_hash_leaving_receiver() {
        let (vm, value) = eval("h = { a: 1 }\nh.clear.length");
        expect_int(&value, 0);
        assert_clean_stack(&vm);
        // The receiver is untouched.
        let (vm, value) = eval("h = { a: 1 }\nh.clear\nh.length");
        expect_int(&value, 1);
        assert_clean_stack(&vm);
    }

    #[test]
    fn delete_mutates_and_returns_receiver() {
        let (vm, value) = eval("h = { a: 1, b: 2, c: 3 }\nh.delete(\"b\").sorted_keys.to_s");
        expect_string(&value, "[\"a\", \"c\"]");
        assert_clean_stack(&vm);
        let (vm, value) = eval("h = { a: 1 }\nh.delete(\"missing\")\nh.length");
        expect_int(&value, 1);
        assert_clean_stack(&vm);
    }

    #[test]
    fn empty_predicate() {
        let (vm, value) = eval("{}.empty?");
        expect_bool(&value, true);
        assert_clean_stack(&vm);
        let (vm, value) = eval("{ a: 1 }.empty?");
        expect_bool(&value, false);
        assert_clean_stack(&vm);
    }

    #[test]
    fn eql_is_deep_and_order_insensitive() {
        let tests = [
            ("{ a: 1, b: 2 }.eql?({ b: 2, a: 1 })", true),
            ("{ a: 1 }.eql?({ a: 2 })", false),
            ("{ a: [1, 2], b: { c: \"v\" } }.eql?({ b: { c: \"v\" }, a: [1, 2] })", true),
            ("{ a: [1, 2] }.eql?({ a: [2, 1] })", false),
            ("{ a: 1 }.eql?(1)", false),
            ("{}.eql?({})", true),
        ];
        for (input, expected) in tests {
            let (vm, value) = eval(input);
            expect_bool(&value, expected);
            assert_clean_stack(&vm);
        }
    }

    #[test]
    fn key_and_value_membership() {
        let tests = [
            ("{ a: 1, b: \"2\" }.has_key?(\"a\")", true),
            ("{ a: 1, b: \"2\" }.has_key?(\"e\")", false),
            ("{ a: 1, b: \"2\" }.has_value?(1)", true),
            ("{ a: 1, b: \"2\" }.has_value?(2)", false),
            ("{ a: 1, b: \"2\" }.has_value?(\"2\")", true),
            ("{ a: [1, 2, 3] }.has_value?([1, 2, 3])", true),
            ("{ a: { k: \"v\" } }.has_value?({ k: \"v\" })", true),
        ];
        for (input, expected) in tests {
            let (vm, value) = eval(input);
            expect_bool(&value, expected);
            assert_clean_stack(&vm);
        }
    }

    #[test]
    fn has_key_requires_a_string() {
        let (vm, value) = eval("{ a: 1 }.has_key?(123)");
        expect_error(
            &value,
            "TypeError: Expect argument to be String. got: Integer",
            1,
        );
        assert_eq!(vm.cfp(), 1);
    }

    #[test]
    fn length_and_keys_agree() {
        let (vm, value) = eval("h = { a: 1, b: \"2\", c: [1, 2, 3], d: { k: \"v\" } }\nh.length");
        expect_int(&value, 4);
        assert_clean_stack(&vm);
        let (vm, value) = eval("h = { a: 1, b: 2, c: 3 }\nh.keys.length == h.length");
        expect_bool(&value, true);
        assert_clean_stack(&vm);
        let (vm, value) = eval("{}.length");
        expect_int(&value, 0);
        assert_clean_stack(&vm);
    }

    #[test]
    fn sorted_keys_sorts_ascending() {
        let tests = [
            ("{ a: 1, b: \"2\", c: 3 }.sorted_keys.to_s", "[\"a\", \"b\", \"c\"]"),
            ("{ c: 1, b: \"2\", a: 3 }.sorted_keys.to_s", "[\"a\", \"b\", \"c\"]"),
            ("{ b: 1, c: \"2\", a: 3 }.sorted_keys.to_s", "[\"a\", \"b\", \"c\"]"),
        ];
        for (input, expected) in tests {
            let (vm, value) = eval(input);
            expect_string(&value, expected);
            assert_clean_stack(&vm);
        }
    }

    #[test]
    fn hash_ordering_scenarios() {
        let (vm, _) = eval("puts({ c:1, b:2, a:3 }.sorted_keys.to_s)");
        assert_eq!(vm.output, vec!["[\"a\", \"b\", \"c\"]".to_string()]);
        assert_clean_stack(&vm);
        let (vm, _) = eval("puts({ a:1, b:2, c:3 }.to_a(true).to_s)");
        assert_eq!(vm.output, vec!["[[\"a\", 1], [\"b\", 2], [\"c\", 3]]".to_string()]);
        assert_clean_stack(&vm);
    }

    #[test]
    fn merge_is_left_to_right() {
        let input = "
h = { a: 1, b: \"2\" }
m = h.merge({ b: \"Hello\", d: \"World\" })
m.to_s
";
        let (vm, value) = eval(input);
        expect_string(&value, "{ a: 1, b: \"Hello\", d: \"World\" }");
        assert_clean_stack(&vm);

        // Later arguments override earlier ones; the receiver is unchanged.
        let input = "
h = { k: 1 }
m = h.merge({ k: 2 }, { k: 3, x: 9 })
[m[\"k\"], m[\"x\"], h[\"k\"]].to_s
";
        let (vm, value) = eval(input);
        expect_string(&value, "[3, 9, 1]");
        assert_clean_stack(&vm);
    }

    #[test]
    fn merge_contract_violations() {
        let (vm, value) = eval("{ a: 1 }.merge");
        expect_error(&value, "ArgumentError: Expect at least 1 argument. got: 0", 1);
        assert_eq!(vm.cfp(), 1);
        let (vm, value) = eval("{ a: 1 }.merge(123)");
        expect_error(
            &value,
            "TypeError: Expect argument to be Hash. got: Integer",
            1,
        );
        assert_eq!(vm.cfp(), 1);
    }

    #[test]
    fn each_key_yields_sorted_and_returns_keys() {
        let input = "
seen = []
result = { c: 1, a: 2, b: 3 }.each_key do |k|
  seen.push(k)
end
[seen.to_s, result.to_s]
";
        let (vm, value) = eval(input);
        match &value {
            Value::Array(values) => {
                let values = values.borrow();
                expect_string(&values[0], "[\"a\", \"b\", \"c\"]");
                expect_string(&values[1], "[\"a\", \"b\", \"c\"]");
            }
            other => panic!("expected array, got {:?}", other),
        }
        assert_clean_stack(&vm);
    }

    #[test]
    fn each_value_yields_by_sorted_key() {
        let input = "
seen = []
{ c: 30, a: 10, b: 20 }.each_value do |v|
  seen.push(v)
end
seen.to_s
";
        let (vm, value) = eval(input);
        expect_string(&value, "[10, 20, 30]");
        assert_clean_stack(&vm);
    }

    #[test]
    fn iteration_without_block_faults() {
        let tests = [
            "{ a: 1 }.each_key",
            "{ a: 1 }.each_value",
            "{ a: 1 }.map_values",
            "{ a: 1 }.transform_values",
        ];
        for input in tests {
            let (vm, value) = eval(input);
            expect_error(&value, "InternalError: can't yield without a block", 1);
            assert_eq!(vm.cfp(), 1);
            assert_eq!(vm.sp(), 1);
        }
    }

    #[test]
    fn map_values_mutates_receiver() {
        let input = "
h = { a: 1, b: 2, c: 3 }
result = h.map_values do |v|
  v * 3
end
[h.to_s, result.to_s]
";
        let (vm, value) = eval(input);
        match &value {
            Value::Array(values) => {
                let values = values.borrow();
                expect_string(&values[0], "{ a: 3, b: 6, c: 9 }");
                expect_string(&values[1], "{ a: 3, b: 6, c: 9 }");
            }
            other => panic!("expected array, got {:?}", other),
        }
        assert_clean_stack(&vm);
    }

    #[test]
    fn transform_values_leaves_receiver() {
        let input = "
h = { a: 1, b: 2, c: 3 }
result = h.transform_values do |v|
  v * 3
end
[h.to_s, result.to_s]
";
        let (vm, value) = eval(input);
        match &value {
            Value::Array(values) => {
                let values = values.borrow();
                expect_string(&values[0], "{ a: 1, b: 2, c: 3 }");
                expect_string(&values[1], "{ a: 3, b: 6, c: 9 }");
            }
            other => panic!("expected array, got {:?}", other),
        }
        assert_clean_stack(&vm);
    }

    #[test]
    fn blocks_run_once_per_entry() {
        let input = "
count = 0
{ a: 1, b: 2, c: 3 }.transform_values do |v|
  count = count + 1
  v
end
count
";
        let (vm, value) = eval(input);
        expect_int(&value, 3);
        assert_clean_stack(&vm);
    }

    #[test]
    fn to_a_sorted_flag() {
        let (vm, value) = eval("{ b: 1, a: 2, c: 3 }.to_a(true).to_s");
        expect_string(&value, "[[\"a\", 2], [\"b\", 1], [\"c\", 3]]");
        assert_clean_stack(&vm);
        let (vm, value) = eval("{ a: 1, b: 2 }.to_a.length");
        expect_int(&value, 2);
        assert_clean_stack(&vm);
    }

    #[test]
    fn to_a_contract_violations() {
        let (vm, value) = eval("{ a: 1 }.to_a(true, true)");
        expect_error(&value, "ArgumentError: Expect 0..1 argument. got: 2", 1);
        assert_eq!(vm.cfp(), 1);
        let (vm, value) = eval("{ a: 1 }.to_a(123)");
        expect_error(
            &value,
            "TypeError: Expect argument to be Boolean. got: Integer",
            1,
        );
        assert_eq!(vm.cfp(), 1);
    }

    #[test]
    fn sorted_pairs_rebuild_the_hash() {
        let (vm, value) = eval("h = { b: 1, a: 2, c: 3 }\nh.to_a(true).to_h.eql?(h)");
        expect_bool(&value, true);
        assert_clean_stack(&vm);
    }

    #[test]
    fn to_s_sorts_keys_and_quotes_strings() {
        let tests = [
            ("{ a: 1 }.to_s", "{ a: 1 }"),
            ("{ b: \"2\", a: 1 }.to_s", "{ a: 1, b: \"2\" }"),
            (
                "{ a: 1, b: [1, \"2\"], c: { foo: \"bar\" } }.to_s",
                "{ a: 1, b: [1, \"2\"], c: { foo: \"bar\" } }",
            ),
            ("{}.to_s", "{}"),
        ];
        for (input, expected) in tests {
            let (vm, value) = eval(input);
            expect_string(&value, expected);
            assert_clean_stack(&vm);
        }
    }

    #[test]
    fn to_json_round_trips_through_serde() {
        let input = "{ a: 1, b: [1, \"2\", [4, 5, nil], { foo: \"bar\" }] }.to_json";
        let (vm, value) = eval(input);
        let Value::String(json) = &value else {
            panic!("expected string, got {:?}", value);
        };
        let parsed: serde_json::Value = serde_json::from_str(json).expect("valid json");
        assert_eq!(
            parsed,
            serde_json::json!({ "a": 1, "b": [1, "2", [4, 5, null], { "foo": "bar" }] })
        );
        assert_clean_stack(&vm);
    }

    #[test]
    fn nil_renders_as_json_null() {
        let (vm, value) = eval("{ a: nil }.to_json");
        expect_string(&value, "{\"a\":null}");
        assert_clean_stack(&vm);
    }
}
