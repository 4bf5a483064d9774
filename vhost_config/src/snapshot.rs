//! Memoizing parameter store.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};

use crate::ConfigResult;
use crate::evaluate::Evaluator;
use crate::value::{ParameterMap, RawValue};

/// One parameter: its raw value and, once evaluated, the cached result.
#[derive(Debug)]
struct Entry {
    raw: RawValue,
    resolved: Mutex<Option<Value>>,
}

impl Entry {
    fn new(raw: RawValue) -> Self {
        Self {
            raw,
            resolved: Mutex::new(None),
        }
    }
}

/// Merged, partially evaluated parameters for one virtualhost selection.
///
/// The key set is fixed once the snapshot is installed. Each entry guards its
/// own cache, so an unresolved key is evaluated at most once even when
/// several threads ask for it together.
#[derive(Debug, Default)]
pub(crate) struct Snapshot {
    virtualhost: Option<String>,
    entries: BTreeMap<String, Entry>,
}

impl Snapshot {
    pub(crate) fn new(parameters: ParameterMap) -> Self {
        Self {
            virtualhost: None,
            entries: parameters
                .into_iter()
                .map(|(key, raw)| (key, Entry::new(raw)))
                .collect(),
        }
    }

    /// Overwrite entries with `parameters`, discarding any cached results for
    /// the replaced keys.
    pub(crate) fn overlay(&mut self, parameters: ParameterMap) {
        for (key, raw) in parameters {
            self.entries.insert(key, Entry::new(raw));
        }
    }

    pub(crate) fn set_virtualhost(&mut self, virtualhost: Option<String>) {
        self.virtualhost = virtualhost;
    }

    pub(crate) fn virtualhost(&self) -> Option<&str> {
        self.virtualhost.as_deref()
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Resolve a single key, evaluating and caching it on first access.
    ///
    /// Absent keys yield `None`. Once cached, `args` are ignored.
    pub(crate) fn get(
        &self,
        key: &str,
        args: &[Value],
        evaluator: &Evaluator<'_>,
    ) -> ConfigResult<Option<Value>> {
        let Some(entry) = self.entries.get(key) else {
            return Ok(None);
        };
        let mut resolved = entry.resolved.lock();
        if let Some(value) = resolved.as_ref() {
            return Ok(Some(value.clone()));
        }
        tracing::debug!(%key, "evaluating parameter");
        let value = evaluator.evaluate(key, &entry.raw, args)?;
        *resolved = Some(value.clone());
        Ok(Some(value))
    }

    /// Resolve every key starting with `prefix`, keyed by the remaining
    /// suffix. Each key is passed to its own evaluation as the first
    /// argument, ahead of `args`.
    pub(crate) fn family(
        &self,
        prefix: &str,
        args: &[Value],
        evaluator: &Evaluator<'_>,
    ) -> ConfigResult<Map<String, Value>> {
        let mut set = Map::new();
        for key in self.entries.keys() {
            let Some(suffix) = key.strip_prefix(prefix) else {
                continue;
            };
            let mut forwarded = Vec::with_capacity(args.len() + 1);
            forwarded.push(Value::String(key.clone()));
            forwarded.extend_from_slice(args);
            if let Some(value) = self.get(key, &forwarded, evaluator)? {
                set.insert(suffix.to_owned(), value);
            }
        }
        Ok(set)
    }
}

/// Working snapshot published to the thread that is building it.
///
/// While the `virtualhost` parameter is resolved during a load, reads made
/// from that same thread see the defaults and base merged so far instead of
/// waiting on the load in progress.
#[derive(Debug, Default)]
pub(crate) struct Staging {
    slot: RwLock<Option<(ThreadId, Arc<Snapshot>)>>,
}

impl Staging {
    /// The staged snapshot, if the calling thread staged one.
    pub(crate) fn visible(&self) -> Option<Arc<Snapshot>> {
        let current = thread::current().id();
        self.slot
            .read()
            .as_ref()
            .filter(|(owner, _)| *owner == current)
            .map(|(_, snapshot)| Arc::clone(snapshot))
    }

    /// Publish `snapshot` to the calling thread until the guard drops.
    pub(crate) fn stage(&self, snapshot: Arc<Snapshot>) -> StagingGuard<'_> {
        *self.slot.write() = Some((thread::current().id(), snapshot));
        StagingGuard { staging: self }
    }
}

/// Clears the staged snapshot on drop.
pub(crate) struct StagingGuard<'a> {
    staging: &'a Staging,
}

impl Drop for StagingGuard<'_> {
    fn drop(&mut self) {
        *self.staging.slot.write() = None;
    }
}
