//! Lazy evaluation of raw parameter values.

use serde_json::Value;

use crate::registry::{CallableRegistry, ProcessorRegistry};
use crate::value::{ChainTable, RawValue};
use crate::{ConfigError, ConfigResult};

/// Turns a [`RawValue`] into a concrete value and runs the key's processor
/// chain over it.
///
/// The evaluator only looks at the value, the forwarded arguments and its
/// registries, so it can run against a working map that is still being
/// merged.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Evaluator<'a> {
    processors: &'a ProcessorRegistry,
    callables: &'a CallableRegistry,
    chains: &'a ChainTable,
}

impl<'a> Evaluator<'a> {
    pub(crate) const fn new(
        processors: &'a ProcessorRegistry,
        callables: &'a CallableRegistry,
        chains: &'a ChainTable,
    ) -> Self {
        Self {
            processors,
            callables,
            chains,
        }
    }

    /// Evaluate `raw` for `key` with the caller's `args`.
    pub(crate) fn evaluate(&self, key: &str, raw: &RawValue, args: &[Value]) -> ConfigResult<Value> {
        let value = match raw {
            RawValue::Deferred(compute) => compute(args)?,
            RawValue::Static(Value::String(token)) => match self.callables.resolve(token) {
                Some(compute) => compute(args)?,
                None => Value::String(token.clone()),
            },
            RawValue::Static(value) => value.clone(),
        };
        self.process(key, value, args)
    }

    fn process(&self, key: &str, value: Value, args: &[Value]) -> ConfigResult<Value> {
        let Some(chain) = self.chains.get(key) else {
            return Ok(value);
        };
        let mut call_args = Vec::with_capacity(args.len() + 1);
        call_args.push(value);
        call_args.extend_from_slice(args);
        for name in chain {
            let processor = self
                .processors
                .get(name)
                .ok_or_else(|| ConfigError::unknown_processor(name.as_str()).shared())?;
            let next = processor(&call_args).map_err(|e| {
                ConfigError::Processor {
                    name: name.clone(),
                    key: key.to_owned(),
                    message: e.to_string(),
                }
                .shared()
            })?;
            if let Some(running) = call_args.first_mut() {
                *running = next;
            }
        }
        Ok(call_args.into_iter().next().unwrap_or(Value::Null))
    }
}
