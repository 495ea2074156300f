use super::StateChange;
use crate::value::{TabState, TabsState};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

type Subscriber = Arc<dyn Fn(&StateChange) + Send + Sync>;
type Subscribers = RwLock<HashMap<usize, Subscriber>>;

/// A thread-safe store holding every tab's state for one session.
///
/// Cloning a store yields another handle to the same state.
#[derive(Clone, Default)]
pub struct SessionStore {
    tabs: Arc<RwLock<TabsState>>,
    subscribers: Arc<Subscribers>,
    next_subscriber: Arc<AtomicUsize>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure a namespace exists for `tab`. Existing state is kept.
    pub fn ensure_tab(&self, tab: &str) {
        if self.read_tabs().contains_key(tab) {
            return;
        }
        self.write_tabs().entry(tab.to_string()).or_default();
    }

    /// Read the state without notifying anyone.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&TabsState) -> R,
    {
        f(&self.read_tabs())
    }

    /// Mutate the state, then notify subscribers.
    ///
    /// `f` returns the change it made; `None` means nothing changed and no
    /// notification is sent.
    pub fn update<F>(&self, f: F) -> Option<StateChange>
    where
        F: FnOnce(&mut TabsState) -> Option<StateChange>,
    {
        let change = {
            let mut tabs = self.write_tabs();
            f(&mut tabs)
        };
        if let Some(change) = &change {
            self.notify(change);
        }
        change
    }

    /// Clone of the full state.
    pub fn snapshot(&self) -> TabsState {
        self.read_tabs().clone()
    }

    /// Clone of one tab's state, if that tab exists.
    pub fn tab(&self, tab: &str) -> Option<TabState> {
        self.read_tabs().get(tab).cloned()
    }

    pub fn tab_names(&self) -> Vec<String> {
        self.read_tabs().keys().cloned().collect()
    }

    /// Swap in a whole new state, as after loading from disk.
    pub fn replace_all(&self, tabs: TabsState) {
        self.update(|current| {
            *current = tabs;
            Some(StateChange::Loaded)
        });
    }

    /// Drop every tab.
    pub fn clear(&self) {
        self.update(|current| {
            current.clear();
            Some(StateChange::Reset)
        });
    }

    /// Subscribe to state changes.
    ///
    /// The callback runs after every mutation, outside the state lock, so it
    /// may read the store. It stops running once the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        let id = self.next_subscriber.fetch_add(1, Ordering::SeqCst);
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(callback));
        Subscription {
            id,
            subscribers: Arc::downgrade(&self.subscribers),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn notify(&self, change: &StateChange) {
        let subscribers: Vec<Subscriber> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        for subscriber in subscribers {
            subscriber(change);
        }
    }

    fn read_tabs(&self) -> RwLockReadGuard<'_, TabsState> {
        self.tabs.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_tabs(&self) -> RwLockWriteGuard<'_, TabsState> {
        self.tabs.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// RAII guard for a store subscription.
pub struct Subscription {
    id: usize,
    subscribers: Weak<Subscribers>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            subscribers
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::StateValue;
    use std::sync::Mutex;

    fn set(store: &SessionStore, tab: &str, key: &str, value: StateValue) {
        store.update(|tabs| {
            tabs.entry(tab.to_string())
                .or_default()
                .insert(key.to_string(), value);
            Some(StateChange::Set {
                tab: tab.to_string(),
                key: key.to_string(),
            })
        });
    }

    #[test]
    fn ensure_tab_keeps_existing_state() {
        let store = SessionStore::new();
        set(&store, "plots", "metric", "total".into());

        store.ensure_tab("plots");
        store.ensure_tab("explorer");

        assert_eq!(store.tab_names(), vec!["explorer", "plots"]);
        assert_eq!(
            store.tab("plots").and_then(|tab| tab.get("metric").cloned()),
            Some(StateValue::from("total"))
        );
        assert!(store.tab("explorer").is_some_and(|tab| tab.is_empty()));
    }

    #[test]
    fn clones_share_state() {
        let store = SessionStore::new();
        let other = store.clone();
        set(&other, "plots", "metric", StateValue::from(1_i64));
        assert_eq!(store.snapshot(), other.snapshot());
        assert!(store.tab("plots").is_some());
    }

    #[test]
    fn subscribers_receive_changes() {
        let store = SessionStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);

        let _subscription = store.subscribe(move |change| {
            seen_clone.lock().unwrap().push(change.clone());
        });

        set(&store, "plots", "metric", StateValue::from(1_i64));
        store.clear();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(
            seen[0],
            StateChange::Set {
                tab: "plots".to_string(),
                key: "metric".to_string()
            }
        );
        assert_eq!(seen[1], StateChange::Reset);
    }

    #[test]
    fn no_change_means_no_notification() {
        let store = SessionStore::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        let _subscription = store.subscribe(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(store.update(|_| None).is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn dropping_subscription_stops_delivery() {
        let store = SessionStore::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);

        let subscription = store.subscribe(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(store.subscriber_count(), 1);

        store.clear();
        drop(subscription);
        store.clear();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn subscribers_may_read_the_store() {
        let store = SessionStore::new();
        let reader = store.clone();
        let observed = Arc::new(AtomicUsize::new(0));
        let observed_clone = Arc::clone(&observed);

        let _subscription = store.subscribe(move |_| {
            let count = reader.read(|tabs| tabs.len());
            observed_clone.store(count, Ordering::SeqCst);
        });

        set(&store, "a", "k", StateValue::from(1_i64));
        set(&store, "b", "k", StateValue::from(2_i64));
        assert_eq!(observed.load(Ordering::SeqCst), 2);
    }
}
