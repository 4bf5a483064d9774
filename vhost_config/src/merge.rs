//! Layer merging and snapshot construction.
//!
//! A snapshot is built in two phases. Defaults and the base layer are merged
//! into a working snapshot first; the `virtualhost` parameter is then
//! resolved from that working snapshot through the ordinary lazy path, and
//! only afterwards is the matching override layer read and overlaid.

use std::sync::Arc;

use serde_json::Value;

use crate::evaluate::Evaluator;
use crate::provider::{Layer, LayerProvider};
use crate::snapshot::{Snapshot, Staging};
use crate::value::{ParameterMap, RawValue};
use crate::{ConfigError, ConfigResult};

/// Parameter naming the virtualhost whose overrides apply.
pub const VIRTUALHOST_KEY: &str = "virtualhost";

/// Overlay `layer` onto `target`. Every key in the layer replaces the
/// existing raw value wholesale.
pub(crate) fn overlay(target: &mut ParameterMap, layer: Layer) {
    target.extend(layer.into_parameters());
}

/// Whether an explicitly requested identity selects a virtualhost.
///
/// `""` and `"0"` select none.
pub(crate) fn selects_virtualhost(id: &str) -> bool {
    !id.is_empty() && id != "0"
}

/// Build a fresh snapshot from `defaults` and the provider's layers.
///
/// With an `explicit` identity, a non-empty one is written into the working
/// map and decides the override layer on its own; `Some("")` builds without
/// any virtualhost. Otherwise the identity comes from the merged
/// `virtualhost` parameter, resolved while the working snapshot is staged
/// so the calling thread can read other keys from it.
pub(crate) fn build_snapshot(
    provider: &dyn LayerProvider,
    defaults: &ParameterMap,
    evaluator: &Evaluator<'_>,
    explicit: Option<&str>,
    staging: &Staging,
) -> ConfigResult<Snapshot> {
    let base = provider
        .base()?
        .ok_or_else(|| ConfigError::missing_source(provider.base_location()).shared())?;

    let mut working = defaults.clone();
    overlay(&mut working, base);
    if let Some(id) = explicit.filter(|id| !id.is_empty()) {
        working.insert(VIRTUALHOST_KEY.to_owned(), RawValue::from(id));
    }
    let working = Arc::new(Snapshot::new(working));

    let identity = match explicit {
        Some(id) => virtualhost_identity(Some(Value::from(id)))?,
        None => {
            let _staged = staging.stage(Arc::clone(&working));
            virtualhost_identity(working.get(VIRTUALHOST_KEY, &[], evaluator)?)?
        }
    };
    let mut snapshot = Arc::try_unwrap(working).map_err(|_| {
        ConfigError::evaluation(VIRTUALHOST_KEY, "working configuration is still in use").shared()
    })?;

    if let Some(id) = identity.as_deref() {
        let layer = provider
            .virtualhost(id)?
            .ok_or_else(|| ConfigError::missing_source(provider.virtualhost_location(id)).shared())?;
        tracing::info!(
            virtualhost = %id,
            keys = layer.parameters().len(),
            "applying virtualhost overrides"
        );
        snapshot.overlay(layer.into_parameters());
    }
    snapshot.set_virtualhost(identity);
    Ok(snapshot)
}

/// Interpret the resolved `virtualhost` parameter.
///
/// Falsy values (`null`, `false`, `0`, `""`, `"0"`, empty arrays and
/// objects) select no virtualhost; any other non-string value is rejected.
fn virtualhost_identity(value: Option<Value>) -> ConfigResult<Option<String>> {
    match value {
        None | Some(Value::Null | Value::Bool(false)) => Ok(None),
        Some(Value::String(id)) if selects_virtualhost(&id) => Ok(Some(id)),
        Some(Value::String(_)) => Ok(None),
        Some(Value::Number(n)) if n.as_f64().is_some_and(|f| f == 0.0) => Ok(None),
        Some(Value::Array(items)) if items.is_empty() => Ok(None),
        Some(Value::Object(map)) if map.is_empty() => Ok(None),
        Some(_) => Err(ConfigError::invalid_type(VIRTUALHOST_KEY, "string").shared()),
    }
}
