//! Per-tab namespace accessor.
//!
//! # Responsibility
//! - Bind one UI tab to its own namespace in the session store.
//! - Offer explicit, read-only access to other tabs and explicit copies.
//!
//! # Invariants
//! - Creating a manager never touches existing values of its tab.
//! - `init` only writes keys that are absent (idempotent default-seeding).
//! - Cross-tab reads never create the tab they read from.
//!
//! Every script rerun creates its managers again; state survives only in
//! the session store.

use crate::debug::DebugView;
use crate::error::{Result, StateError};
use crate::persist;
use crate::session::Session;
use crate::store::{SessionStore, StateChange, Subscription};
use crate::value::{StateValue, TabState};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::path::Path;
use std::sync::Arc;

/// Handle to one tab's namespace.
///
/// # Examples
///
/// ```
/// use tabstate::{Session, StateManager, StateValue};
///
/// Session::scope(|| {
///     let state = StateManager::new("visual_plots");
///     state.init([
///         ("selected_city", StateValue::from("Barcelona")),
///         ("metric", StateValue::from("total_trips")),
///     ]);
///
///     state.set("metric", "daily_trips");
///     assert_eq!(state.get("selected_city").unwrap().as_str(), Some("Barcelona"));
///
///     // Rerun: seeding again keeps the user's choice.
///     let state = StateManager::new("visual_plots");
///     state.init([("metric", StateValue::from("total_trips"))]);
///     assert_eq!(state.get("metric").unwrap().as_str(), Some("daily_trips"));
/// });
/// ```
#[derive(Clone)]
pub struct StateManager {
    tab: String,
    session: Arc<Session>,
}

impl StateManager {
    /// Bind to `tab_name` in the current session, creating an empty
    /// namespace if needed.
    pub fn new(tab_name: impl Into<String>) -> Self {
        Self::in_session(Session::current(), tab_name)
    }

    /// Bind to the session's default tab.
    pub fn global() -> Self {
        let session = Session::current();
        let tab = session.config().default_tab.clone();
        Self::in_session(session, tab)
    }

    /// Bind to `tab_name` in an explicit session.
    pub fn in_session(session: Arc<Session>, tab_name: impl Into<String>) -> Self {
        let tab = tab_name.into();
        session.store().ensure_tab(&tab);
        Self { tab, session }
    }

    pub fn tab_name(&self) -> &str {
        &self.tab
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn store(&self) -> &SessionStore {
        self.session.store()
    }

    /// Seed default values, writing only keys that are not set yet.
    ///
    /// Returns how many keys were seeded.
    pub fn init<I, K>(&self, defaults: I) -> usize
    where
        I: IntoIterator<Item = (K, StateValue)>,
        K: Into<String>,
    {
        let tab = self.tab.clone();
        let change = self.store().update(|tabs| {
            let state = tabs.entry(tab.clone()).or_default();
            let mut seeded = Vec::new();
            for (key, value) in defaults {
                let key = key.into();
                if !state.contains_key(&key) {
                    state.insert(key.clone(), value);
                    seeded.push(key);
                }
            }
            (!seeded.is_empty()).then_some(StateChange::Seeded { tab, keys: seeded })
        });

        let count = match &change {
            Some(StateChange::Seeded { keys, .. }) => keys.len(),
            _ => 0,
        };
        log::debug!(
            "event=state_init module=manager status=ok tab={} seeded={}",
            self.tab,
            count
        );
        count
    }

    /// Value of `key` in this tab.
    pub fn get(&self, key: &str) -> Option<StateValue> {
        self.store()
            .read(|tabs| tabs.get(&self.tab).and_then(|state| state.get(key)).cloned())
    }

    /// Value of `key`, or `default` when it is not set.
    pub fn get_or(&self, key: &str, default: impl Into<StateValue>) -> StateValue {
        self.get(key).unwrap_or_else(|| default.into())
    }

    /// Deserialize the JSON value of `key`.
    ///
    /// # Errors
    /// - [`StateError::NotJson`] when the value is opaque.
    /// - [`StateError::Decode`] when it does not fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key) {
            None => Ok(None),
            Some(StateValue::Json(value)) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| StateError::Decode {
                    tab: self.tab.clone(),
                    key: key.to_string(),
                    source,
                }),
            Some(StateValue::Opaque(opaque)) => Err(StateError::NotJson {
                tab: self.tab.clone(),
                key: key.to_string(),
                type_name: opaque.type_name(),
            }),
        }
    }

    /// The opaque value under `key`, if it has type `T`.
    pub fn get_opaque<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.get(key).and_then(|value| value.downcast::<T>())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.store().read(|tabs| {
            tabs.get(&self.tab)
                .is_some_and(|state| state.contains_key(key))
        })
    }

    /// Set or overwrite `key` in this tab.
    pub fn set(&self, key: impl Into<String>, value: impl Into<StateValue>) {
        let key = key.into();
        let value = value.into();
        let tab = self.tab.clone();
        self.store().update(|tabs| {
            tabs.entry(tab.clone())
                .or_default()
                .insert(key.clone(), value);
            Some(StateChange::Set { tab, key })
        });
    }

    /// Serialize `value` and store it under `key`.
    pub fn set_serialized<T: Serialize + ?Sized>(
        &self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<()> {
        let value = StateValue::serialized(value)?;
        self.set(key, value);
        Ok(())
    }

    /// Store a value that lives in memory only and is never persisted.
    pub fn set_opaque<T: Any + Send + Sync>(&self, key: impl Into<String>, value: T) {
        self.set(key, StateValue::opaque(value));
    }

    /// Empty this tab. The tab itself stays.
    pub fn reset(&self) {
        let tab = self.tab.clone();
        self.store().update(|tabs| {
            tabs.insert(tab.clone(), TabState::new());
            Some(StateChange::Cleared { tab })
        });
        log::debug!(
            "event=state_reset module=manager status=ok tab={}",
            self.tab
        );
    }

    /// Remove the given keys from this tab; unknown keys are ignored.
    pub fn reset_keys<I, K>(&self, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let tab = self.tab.clone();
        self.store().update(|tabs| {
            let state = tabs.get_mut(&tab)?;
            let removed: Vec<String> = keys
                .into_iter()
                .filter_map(|key| state.remove_entry(key.as_ref()).map(|(key, _)| key))
                .collect();
            (!removed.is_empty()).then_some(StateChange::Removed { tab, keys: removed })
        });
    }

    /// Shallow copy of this tab's state.
    pub fn get_all(&self) -> TabState {
        self.store().tab(&self.tab).unwrap_or_default()
    }

    /// Read `key` from another tab without creating that tab.
    pub fn get_from_tab(&self, tab_name: &str, key: &str) -> Option<StateValue> {
        self.store()
            .read(|tabs| tabs.get(tab_name).and_then(|state| state.get(key)).cloned())
    }

    pub fn get_from_tab_or(
        &self,
        tab_name: &str,
        key: &str,
        default: impl Into<StateValue>,
    ) -> StateValue {
        self.get_from_tab(tab_name, key)
            .unwrap_or_else(|| default.into())
    }

    /// Copy every key of `source_tab` into this tab, overwriting on
    /// conflict.
    ///
    /// Returns the number of keys copied.
    pub fn copy_from_tab(&self, source_tab: &str) -> usize {
        self.copy_matching(source_tab, |_| true)
    }

    /// Copy the listed keys from `source_tab`; keys it lacks are skipped.
    ///
    /// Returns the number of keys copied.
    pub fn copy_keys_from_tab<I, K>(&self, source_tab: &str, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let wanted: Vec<K> = keys.into_iter().collect();
        self.copy_matching(source_tab, |key| {
            wanted.iter().any(|wanted| wanted.as_ref() == key)
        })
    }

    fn copy_matching(&self, source_tab: &str, keep: impl Fn(&str) -> bool) -> usize {
        let tab = self.tab.clone();
        let source = source_tab.to_string();
        let change = self.store().update(|tabs| {
            let copied: TabState = tabs
                .get(&source)?
                .iter()
                .filter(|(key, _)| keep(key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            if copied.is_empty() {
                return None;
            }
            let keys: Vec<String> = copied.keys().cloned().collect();
            tabs.entry(tab.clone()).or_default().extend(copied);
            Some(StateChange::Copied { tab, source, keys })
        });

        let count = match &change {
            Some(StateChange::Copied { keys, .. }) => keys.len(),
            _ => 0,
        };
        log::debug!(
            "event=state_copy module=manager status=ok tab={} source={} copied={}",
            self.tab,
            source_tab,
            count
        );
        count
    }

    /// Call `callback` for every change that touches this tab.
    pub fn watch<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        let tab = self.tab.clone();
        self.store().subscribe(move |change| {
            if change.affects(&tab) {
                callback(change);
            }
        })
    }

    /// Save every tab of the current session to `path`.
    pub fn save_all(path: impl AsRef<Path>) -> Result<()> {
        persist::save_all(Session::current().store(), path)
    }

    /// Load the current session from `path`; a missing file is a no-op.
    pub fn load_all(path: impl AsRef<Path>) -> Result<bool> {
        persist::load_all(Session::current().store(), path)
    }

    /// Save to the session's configured state file.
    pub fn save_default() -> Result<()> {
        let session = Session::current();
        persist::save_all(session.store(), &session.config().state_file)
    }

    /// Load from the session's configured state file.
    pub fn load_default() -> Result<bool> {
        let session = Session::current();
        persist::load_all(session.store(), &session.config().state_file)
    }

    /// Snapshot of every tab in the current session, for display.
    pub fn debug_view() -> DebugView {
        let view = DebugView::capture(Session::current().store());
        log::debug!(
            "event=state_debug module=manager status=ok state={}",
            view.to_json()
        );
        view
    }
}
