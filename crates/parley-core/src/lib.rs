//! Chat lifecycle logic and port trait definitions for Parley.
//!
//! This crate defines the "ports" (model gateway and snapshot persistence
//! traits) that the infrastructure layer implements, plus the chat store and
//! session controller built on them. It depends only on `parley-types` --
//! never on `parley-infra` or any HTTP/filesystem crate.

pub mod chat;
pub mod llm;
