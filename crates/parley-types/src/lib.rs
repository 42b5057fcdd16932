//! Shared domain types for Parley.
//!
//! This crate contains the data model used across the workspace: chat
//! records, conversation turns, configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
