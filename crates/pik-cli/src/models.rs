use std::collections::BTreeMap;

use pik_core::Value;
use pik_runtime::ScriptEngine;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckSummary {
    pub(crate) files: usize,
    pub(crate) objects: usize,
}

/// Value of every object in scope by name; a local object hides a global one
/// of the same name.
pub(crate) fn capture_state(engine: &ScriptEngine) -> BTreeMap<String, Value> {
    let scope = engine.scope();
    scope
        .global_objects()
        .chain(scope.local_objects())
        .map(|object| (object.name().to_string(), object.value()))
        .collect()
}
