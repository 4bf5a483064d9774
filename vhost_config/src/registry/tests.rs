//! Unit tests for the processor and callable registries.

use rstest::rstest;
use serde_json::{Value, json};

use super::{CallableRegistry, ProcessorRegistry};

fn run(name: &str, input: Value) -> Result<Value, String> {
    let registry = ProcessorRegistry::with_builtins();
    let Some(processor) = registry.get(name) else {
        return Err(format!("{name} is not registered"));
    };
    processor(&[input]).map_err(|e| e.to_string())
}

#[rstest]
#[case("trim", json!("  padded  "), json!("padded"))]
#[case("lowercase", json!("MiXeD"), json!("mixed"))]
#[case("uppercase", json!("MiXeD"), json!("MIXED"))]
#[case("trim", Value::Null, Value::Null)]
#[case("csv", json!("a, b,,c "), json!(["a", "b", "c"]))]
#[case("csv", json!(["kept", "as is"]), json!(["kept", "as is"]))]
#[case("csv", Value::Null, json!([]))]
#[case("integer", json!(" 42 "), json!(42))]
#[case("integer", json!(-7), json!(-7))]
#[case("boolean", json!("Yes"), json!(true))]
#[case("boolean", json!("off"), json!(false))]
#[case("boolean", json!(1), json!(true))]
#[case("boolean", json!(false), json!(false))]
fn builtins_transform_values(#[case] name: &str, #[case] input: Value, #[case] expected: Value) {
    assert_eq!(run(name, input), Ok(expected));
}

#[rstest]
#[case("trim", json!(3))]
#[case("csv", json!({"a": 1}))]
#[case("integer", json!("twelve"))]
#[case("integer", json!(1.5))]
#[case("boolean", json!("maybe"))]
#[case("boolean", json!(2))]
fn builtins_reject_unsuitable_input(#[case] name: &str, #[case] input: Value) {
    let result = run(name, input);
    assert!(result.is_err(), "{name} should reject, got {result:?}");
}

#[test]
fn processors_see_forwarded_arguments() {
    let mut registry = ProcessorRegistry::new();
    registry.register("suffix", |args| {
        let base = args.first().and_then(Value::as_str).unwrap_or_default();
        let tail = args.get(1).and_then(Value::as_str).unwrap_or_default();
        Ok(Value::from(format!("{base}{tail}")))
    });
    let processor = registry.get("suffix").expect("registered");
    let out = processor(&[json!("file"), json!(".txt")]).expect("suffix succeeds");
    assert_eq!(out, json!("file.txt"));
}

#[test]
fn later_registration_replaces_earlier() {
    let mut registry = ProcessorRegistry::with_builtins();
    registry.register("trim", |_| Ok(json!("replaced")));
    let processor = registry.get("trim").expect("registered");
    assert_eq!(processor(&[json!(" x ")]).expect("runs"), json!("replaced"));
}

#[rstest]
#[case("Tenant::quota", true)]
#[case("Tenant::other", false)]
#[case("not a reference", false)]
fn callables_resolve_registered_references_only(#[case] token: &str, #[case] found: bool) {
    let mut callables = CallableRegistry::new();
    callables.register("Tenant::quota", |_| Ok(json!(10)));
    assert_eq!(callables.resolve(token).is_some(), found);
}

#[test]
fn unshaped_callable_names_are_unreachable() {
    let mut callables = CallableRegistry::new();
    callables.register("quota", |_| Ok(json!(10)));
    assert_eq!(callables.len(), 1);
    assert!(callables.resolve("quota").is_none());
}

#[test]
fn debug_lists_sorted_names() {
    let registry = ProcessorRegistry::with_builtins();
    let text = format!("{registry:?}");
    assert!(text.contains("\"boolean\", \"csv\", \"integer\""), "{text}");
}
