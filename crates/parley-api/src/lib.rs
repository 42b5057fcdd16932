//! Parley application layer: CLI commands, HTTP surface and state wiring.
//!
//! The `parley` binary in `main.rs` is a thin dispatcher over this library,
//! which keeps the router testable without a listening socket.

pub mod cli;
pub mod http;
pub mod state;
