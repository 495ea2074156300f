//! # Tabstate
//!
//! Per-tab namespaced state for rerun-on-every-interaction UIs.
//!
//! Each UI tab gets an isolated namespace inside one session-wide store, so
//! two tabs can use the same key without stepping on each other. Sharing is
//! explicit: a tab reads or copies values from another tab by name.
//!
//! ## Tabs (what views use)
//!
//! - `StateManager` - handle to one tab's namespace: `init`, `get`, `set`,
//!   `reset`, cross-tab reads and copies
//! - `StateValue` - JSON values plus opaque in-memory values
//!
//! ## Sessions (what hosts use)
//!
//! - `Session` - one user's store, with scoped sessions for isolation
//! - `SessionStore` - thread-safe map of tabs with change subscriptions
//! - `persist` - save and load every tab as a JSON file
//! - `DebugView` - dump of all tabs for a debug panel

pub mod config;
pub mod debug;
pub mod error;
pub mod manager;
pub mod persist;
pub mod session;
pub mod store;
pub mod value;

// Re-export main types for convenience
pub use config::StateConfig;
pub use debug::DebugView;
pub use error::{Result, StateError};
pub use manager::StateManager;
pub use session::Session;
pub use store::{SessionStore, StateChange, Subscription};
pub use value::{OpaqueValue, StateValue, TabState, TabsState};
