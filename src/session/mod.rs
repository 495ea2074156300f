//! Session scoping for tab state.
//!
//! Every user session owns one store. A process-wide global session is the
//! fallback; hosts serving several users (and tests) push scoped sessions
//! for the duration of one script run.

mod context;

pub use context::Session;
