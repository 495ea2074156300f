//! The session-wide store behind every tab namespace.
//!
//! A store holds the state of all tabs of one session and notifies
//! subscribers after each mutation.

mod change;
mod store;

pub use change::StateChange;
pub use store::{SessionStore, Subscription};
