//! Raw parameter values as they appear in configuration layers.
//!
//! A layer maps keys to [`RawValue`]s. Static values come straight from a
//! configuration source; deferred values are closures supplied by the
//! embedding application and evaluated on first access.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::ConfigResult;

/// Shared deferred computation.
///
/// The closure receives the arguments forwarded by the caller of
/// [`crate::Resolver::get_with`] and returns the parameter's value.
pub type Deferred = Arc<dyn Fn(&[Value]) -> ConfigResult<Value> + Send + Sync>;

/// Merged parameter mapping keyed by parameter name.
pub type ParameterMap = BTreeMap<String, RawValue>;

/// Ordered processor names per parameter key.
pub type ChainTable = BTreeMap<String, Vec<String>>;

/// A parameter value before evaluation.
///
/// Strings shaped like `Type::member` are kept as [`RawValue::Static`]; the
/// evaluator decides whether they name a registered callable.
#[derive(Clone)]
pub enum RawValue {
    /// Literal scalar or structured value.
    Static(Value),
    /// Computation evaluated on first access.
    Deferred(Deferred),
}

impl RawValue {
    /// Wrap a closure as a deferred value.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use vhost_config::RawValue;
    ///
    /// let quota = RawValue::deferred(|_args| Ok(json!(1024)));
    /// assert!(quota.as_static().is_none());
    /// ```
    #[must_use]
    pub fn deferred<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> ConfigResult<Value> + Send + Sync + 'static,
    {
        Self::Deferred(Arc::new(f))
    }

    /// Returns the literal value, if this is not a deferred computation.
    #[must_use]
    pub const fn as_static(&self) -> Option<&Value> {
        match self {
            Self::Static(value) => Some(value),
            Self::Deferred(_) => None,
        }
    }
}

impl fmt::Debug for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Deferred(_) => f.write_str("Deferred(<closure>)"),
        }
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        Self::Static(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Static(Value::from(value))
    }
}

/// Convert a JSON object into a [`ParameterMap`] of static values.
#[must_use]
pub fn static_parameters(map: serde_json::Map<String, Value>) -> ParameterMap {
    map.into_iter()
        .map(|(key, value)| (key, RawValue::Static(value)))
        .collect()
}

/// Returns `token` when it has the shape `Identifier::Identifier`.
///
/// Identifiers start with a letter, an underscore or a non-ASCII character
/// and continue with letters, digits, underscores or non-ASCII characters.
///
/// ```
/// use vhost_config::value::static_reference;
///
/// assert_eq!(static_reference("Quota::for_tenant"), Some("Quota::for_tenant"));
/// assert_eq!(static_reference("http://example.org"), None);
/// assert_eq!(static_reference("A::B::C"), None);
/// ```
#[must_use]
pub fn static_reference(token: &str) -> Option<&str> {
    let (owner, member) = token.split_once("::")?;
    (is_identifier(owner) && is_identifier(member)).then_some(token)
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || !first.is_ascii())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || !c.is_ascii())
}
