//! Read-only dump of a session store for debugging panels.

use crate::store::SessionStore;
use crate::value::TabsState;
use serde_json::{Map, Value};
use std::fmt;

/// Heading printed above the state dump.
pub const DEBUG_HEADING: &str = "Debug: Session State";

/// Snapshot of every tab, ready to be shown in a sidebar or a log.
///
/// Opaque values are rendered as `"<opaque TYPE>"`.
#[derive(Clone, Debug, PartialEq)]
pub struct DebugView {
    tabs: Value,
}

impl DebugView {
    pub fn capture(store: &SessionStore) -> Self {
        Self {
            tabs: store.read(render),
        }
    }

    pub fn to_json(&self) -> &Value {
        &self.tabs
    }

    pub fn into_json(self) -> Value {
        self.tabs
    }
}

impl fmt::Display for DebugView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{DEBUG_HEADING}")?;
        let body = serde_json::to_string_pretty(&self.tabs).map_err(|_| fmt::Error)?;
        write!(f, "{body}")
    }
}

fn render(tabs: &TabsState) -> Value {
    let rendered: Map<String, Value> = tabs
        .iter()
        .map(|(tab, state)| {
            let values: Map<String, Value> = state
                .iter()
                .map(|(key, value)| (key.clone(), value.debug_json()))
                .collect();
            (tab.clone(), Value::Object(values))
        })
        .collect();
    Value::Object(rendered)
}
