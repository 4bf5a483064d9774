//! Processors available through [`ProcessorRegistry::with_builtins`].

use serde_json::Value;

use super::{ProcessorError, ProcessorRegistry};

pub(super) fn install(registry: &mut ProcessorRegistry) {
    registry
        .register("trim", |args| map_string(args, "trim", |s| s.trim().to_owned()))
        .register("lowercase", |args| {
            map_string(args, "lowercase", str::to_lowercase)
        })
        .register("uppercase", |args| {
            map_string(args, "uppercase", str::to_uppercase)
        })
        .register("csv", csv)
        .register("integer", integer)
        .register("boolean", boolean);
}

static NULL: Value = Value::Null;

fn subject(args: &[Value]) -> &Value {
    args.first().unwrap_or(&NULL)
}

fn map_string(
    args: &[Value],
    name: &str,
    f: impl Fn(&str) -> String,
) -> Result<Value, ProcessorError> {
    match subject(args) {
        Value::Null => Ok(Value::Null),
        Value::String(s) => Ok(Value::String(f(s))),
        other => Err(ProcessorError::new(format!(
            "{name} expects a string, got {other}"
        ))),
    }
}

/// Split a comma-separated string into an array of trimmed, non-empty items.
///
/// Arrays pass through unchanged and `null` becomes an empty array.
fn csv(args: &[Value]) -> Result<Value, ProcessorError> {
    match subject(args) {
        Value::Null => Ok(Value::Array(Vec::new())),
        Value::Array(items) => Ok(Value::Array(items.clone())),
        Value::String(s) => Ok(s
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| Value::from(item.to_owned()))
            .collect::<Vec<_>>()
            .into()),
        other => Err(ProcessorError::new(format!(
            "csv expects a string or an array, got {other}"
        ))),
    }
}

fn integer(args: &[Value]) -> Result<Value, ProcessorError> {
    match subject(args) {
        Value::Null => Ok(Value::Null),
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Value::Number(n.clone())),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|e| ProcessorError::new(format!("integer cannot parse {s:?}: {e}"))),
        other => Err(ProcessorError::new(format!(
            "integer expects a whole number, got {other}"
        ))),
    }
}

fn boolean(args: &[Value]) -> Result<Value, ProcessorError> {
    match subject(args) {
        Value::Null => Ok(Value::Bool(false)),
        Value::Bool(b) => Ok(Value::Bool(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(Value::Bool(false)),
            Some(1) => Ok(Value::Bool(true)),
            _ => Err(ProcessorError::new(format!(
                "boolean expects 0 or 1, got {n}"
            ))),
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
            "false" | "no" | "off" | "0" | "" => Ok(Value::Bool(false)),
            _ => Err(ProcessorError::new(format!(
                "boolean cannot interpret {s:?}"
            ))),
        },
        other => Err(ProcessorError::new(format!(
            "boolean expects a scalar, got {other}"
        ))),
    }
}
