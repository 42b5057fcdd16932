//! Chat storage and session lifecycle.
//!
//! `ChatStore` holds every saved chat in memory and reads/writes them
//! through a `SnapshotStore`; `SessionController` drives the active session.

pub mod session;
pub mod snapshot;
pub mod store;
pub mod summary;

#[cfg(test)]
pub(crate) mod test_support;
