//! Built-in handlers for pure platform methods.
//!
//! | Method | Result |
//! |--------|--------|
//! | `String.valueOf(int)` | decimal string |
//! | `String.length()` | UTF-16 length |
//! | `Integer.parseInt(String)` | parsed value, fails like `NumberFormatException` |
//! | `Integer.valueOf(int)` | boxed value |
//! | `Math.abs(int)` | two's complement absolute value |
//!
//! Unknown arguments produce an unknown result of the declared return type.

use crate::{
    dalvik::MethodReference,
    emulate::registry::{EmulationCall, EmulationRegistry},
    exec::Value,
    Result,
};

type Handler = fn(&EmulationCall<'_>) -> Result<Value>;

/// A built-in handler and the method it answers for, spelled out in parts.
struct Builtin {
    owner: &'static str,
    name: &'static str,
    parameters: &'static [&'static str],
    return_type: &'static str,
    handler: Handler,
}

impl Builtin {
    fn method(&self) -> MethodReference {
        MethodReference::new(
            self.owner,
            self.name,
            self.parameters.iter().copied(),
            self.return_type,
        )
    }
}

const STRING: &str = "Ljava/lang/String;";
const INTEGER: &str = "Ljava/lang/Integer;";

const BUILTINS: &[Builtin] = &[
    Builtin {
        owner: STRING,
        name: "valueOf",
        parameters: &["I"],
        return_type: STRING,
        handler: string_value_of_int,
    },
    Builtin {
        owner: STRING,
        name: "length",
        parameters: &[],
        return_type: "I",
        handler: string_length,
    },
    Builtin {
        owner: INTEGER,
        name: "parseInt",
        parameters: &[STRING],
        return_type: "I",
        handler: integer_parse_int,
    },
    Builtin {
        owner: INTEGER,
        name: "valueOf",
        parameters: &["I"],
        return_type: INTEGER,
        handler: integer_value_of,
    },
    Builtin {
        owner: "Ljava/lang/Math;",
        name: "abs",
        parameters: &["I"],
        return_type: "I",
        handler: math_abs_int,
    },
];

pub(super) fn install(registry: &mut EmulationRegistry) {
    for builtin in BUILTINS {
        registry.insert(builtin.method(), builtin.handler);
    }
}

fn string_value_of_int(call: &EmulationCall<'_>) -> Result<Value> {
    Ok(call
        .argument(0)
        .as_int()
        .map_or_else(|| call.unknown(), |v| Value::String(v.to_string())))
}

fn string_length(call: &EmulationCall<'_>) -> Result<Value> {
    let receiver = call.argument(0);
    match receiver {
        Value::String(s) => {
            let length = i32::try_from(s.encode_utf16().count())
                .map_err(|_| call.fail("string length exceeds int range"))?;
            Ok(Value::Int(length))
        }
        Value::Null => Err(call.fail("null receiver")),
        _ => Ok(call.unknown()),
    }
}

fn integer_parse_int(call: &EmulationCall<'_>) -> Result<Value> {
    match call.argument(0) {
        Value::String(s) => s
            .parse::<i32>()
            .map(Value::Int)
            .map_err(|_| call.fail(format!("For input string: \"{s}\""))),
        Value::Null => Err(call.fail("null input")),
        _ => Ok(call.unknown()),
    }
}

fn integer_value_of(call: &EmulationCall<'_>) -> Result<Value> {
    Ok(call.argument(0).as_int().map_or_else(|| call.unknown(), Value::Int))
}

fn math_abs_int(call: &EmulationCall<'_>) -> Result<Value> {
    Ok(call
        .argument(0)
        .as_int()
        .map_or_else(|| call.unknown(), |v| Value::Int(v.wrapping_abs())))
}
