//! JSON persistence of a whole session store.
//!
//! # File format
//! A single JSON object, pretty-printed with two-space indentation:
//! `{ "<tab>": { "<key>": <value>, ... }, ... }`.
//!
//! # Invariants
//! - Only persistable values are written; `null` and opaque values are skipped.
//! - A tab whose values are all skipped is still written, as `{}`.
//! - Loading replaces the whole store; tabs absent from the file are dropped.
//! - A missing file loads as a no-op; a malformed one leaves the store untouched.

use crate::error::{Result, StateError};
use crate::store::SessionStore;
use crate::value::{StateValue, TabsState};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk shape of the store.
type PersistedTabs = BTreeMap<String, Map<String, Value>>;

/// Write every tab of `store` to `path`.
///
/// The document is written to a sibling temporary file first, then renamed
/// into place.
pub fn save_all(store: &SessionStore, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let persisted = store.read(persistable);
    let tab_count = persisted.len();
    let mut document = serde_json::to_string_pretty(&persisted)?;
    document.push('\n');

    let tmp_path = temp_path(path);
    fs::write(&tmp_path, document).map_err(|err| StateError::io(&tmp_path, err))?;
    fs::rename(&tmp_path, path).map_err(|err| {
        let _ = fs::remove_file(&tmp_path);
        StateError::io(path, err)
    })?;

    log::info!(
        "event=state_save module=persist status=ok tabs={} path={}",
        tab_count,
        path.display()
    );
    Ok(())
}

/// Replace the contents of `store` with the tabs saved at `path`.
///
/// Returns `Ok(false)` without touching the store when `path` does not
/// exist.
pub fn load_all(store: &SessionStore, path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    if !path.exists() {
        log::debug!(
            "event=state_load module=persist status=skipped reason=missing path={}",
            path.display()
        );
        return Ok(false);
    }

    let raw = fs::read_to_string(path).map_err(|err| StateError::io(path, err))?;
    let persisted: PersistedTabs = serde_json::from_str(&raw).inspect_err(|err| {
        log::warn!(
            "event=state_load module=persist status=error path={} error={}",
            path.display(),
            err
        );
    })?;

    let tab_count = persisted.len();
    store.replace_all(restore(persisted));
    log::info!(
        "event=state_load module=persist status=ok tabs={} path={}",
        tab_count,
        path.display()
    );
    Ok(true)
}

fn persistable(tabs: &TabsState) -> PersistedTabs {
    tabs.iter()
        .map(|(tab, state)| {
            let values = state
                .iter()
                .filter(|(_, value)| value.is_persistable())
                .filter_map(|(key, value)| {
                    value.as_json().map(|json| (key.clone(), json.clone()))
                })
                .collect();
            (tab.clone(), values)
        })
        .collect()
}

fn restore(persisted: PersistedTabs) -> TabsState {
    persisted
        .into_iter()
        .map(|(tab, values)| {
            let state = values
                .into_iter()
                .map(|(key, value)| (key, StateValue::Json(value)))
                .collect();
            (tab, state)
        })
        .collect()
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
