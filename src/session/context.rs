use crate::config::StateConfig;
use crate::store::SessionStore;
use std::cell::RefCell;
use std::sync::Arc;

/// One user's session: a store plus the settings that apply to it.
///
/// # Examples
///
/// Using the default global session:
///
/// ```
/// use tabstate::StateManager;
///
/// let state = StateManager::new("docs_global");
/// state.set("answer", 42);
/// assert_eq!(state.get("answer").and_then(|v| v.as_i64()), Some(42));
/// ```
///
/// Using a scoped session for isolation:
///
/// ```
/// use tabstate::{Session, StateManager};
///
/// Session::scope(|| {
///     let state = StateManager::new("explorer");
///     state.set("city", "Barcelona");
/// });
/// // The session and all its tabs are dropped here
/// ```
pub struct Session {
    store: SessionStore,
    config: StateConfig,
}

thread_local! {
    static SESSION_STACK: RefCell<Vec<Arc<Session>>> = const { RefCell::new(Vec::new()) };
}

impl Session {
    /// Create an isolated session with default settings.
    pub fn new() -> Arc<Self> {
        Self::with_config(StateConfig::default())
    }

    /// Create an isolated session with the given settings.
    pub fn with_config(config: StateConfig) -> Arc<Self> {
        log::debug!(
            "event=session_create module=session status=ok default_tab={} state_file={}",
            config.default_tab,
            config.state_file.display()
        );
        Arc::new(Self {
            store: SessionStore::new(),
            config,
        })
    }

    /// Run a function with a fresh isolated session.
    ///
    /// The session and all of its tabs are dropped when the function
    /// returns.
    pub fn scope<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        Self::with_session(Self::new(), f)
    }

    /// Get or create the global session (fallback).
    ///
    /// Its settings come from the environment, see
    /// [`StateConfig::from_env`].
    pub fn global() -> Arc<Self> {
        use std::sync::OnceLock;
        static SESSION: OnceLock<Arc<Session>> = OnceLock::new();
        Arc::clone(SESSION.get_or_init(|| Self::with_config(StateConfig::from_env())))
    }

    /// Get the current session (scoped or global fallback).
    pub fn current() -> Arc<Self> {
        SESSION_STACK
            .with(|stack| stack.borrow().last().cloned())
            .unwrap_or_else(Self::global)
    }

    /// Run a function with a specific session as the current one.
    ///
    /// The session is popped again even if `f` panics.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabstate::{Session, StateManager};
    ///
    /// let session = Session::new();
    /// Session::with_session(session.clone(), || {
    ///     StateManager::new("plots").set("metric", "total_trips");
    /// });
    /// assert_eq!(session.store().tab_names(), vec!["plots"]);
    /// ```
    pub fn with_session<F, R>(session: Arc<Self>, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        SESSION_STACK.with(|stack| {
            stack.borrow_mut().push(session);
        });

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));

        SESSION_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });

        match result {
            Ok(r) => r,
            Err(e) => std::panic::resume_unwind(e),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn config(&self) -> &StateConfig {
        &self.config
    }

    /// Drop every tab of this session.
    pub fn clear(&self) {
        self.store.clear();
        log::debug!("event=session_clear module=session status=ok");
    }
}
