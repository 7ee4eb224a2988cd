//! # Server Components
//!
//! Listener set and per-connection sessions.
//!
//! The listener set is a fan-out point only: it binds the configured ports,
//! accepts connections, and spawns one independent [`session::Session`] task
//! per connection. All protocol logic lives in the session; nothing calls
//! back into the listener after spawn, and sessions share no mutable state
//! with each other.

pub mod listener;
pub mod session;

pub use listener::ListenerSet;
pub use session::Session;
