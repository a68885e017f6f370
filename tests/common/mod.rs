// Test utility module for quackquack integration tests
#![allow(dead_code)]

use quackquack::{Callable, QuackError, Value};

/// Callable returning its first argument.
pub fn identity() -> Callable {
    Callable::named("identity", |args| {
        Ok(args.into_iter().next().unwrap_or_default())
    })
}

/// Callable doubling a numeric first argument, passing anything else through.
pub fn double() -> Callable {
    Callable::named("double", |args| match args.first() {
        Some(Value::Number(n)) => Ok(Value::Number(n * 2.0)),
        Some(other) => Ok(other.clone()),
        None => Err(QuackError::raised("double needs an argument")),
    })
}

/// Callable reporting whether its first argument is a non-empty string.
pub fn non_empty() -> Callable {
    Callable::named("non_empty", |args| {
        Ok(Value::Bool(
            args.first()
                .and_then(Value::as_str)
                .is_some_and(|s| !s.is_empty()),
        ))
    })
}

/// `(a, b) => typeof b === "string"`
pub fn second_is_string() -> Callable {
    Callable::named("second_is_string", |args| {
        Ok(Value::Bool(args.get(1).and_then(Value::as_str).is_some()))
    })
}

pub fn args<const N: usize>(values: [Value; N]) -> Vec<Value> {
    values.into_iter().collect()
}
