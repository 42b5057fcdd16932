//! Infrastructure layer for Parley.
//!
//! Contains implementations of the port traits defined in `parley-core`:
//! the JSON file snapshot store and the Gemini model gateway, plus config
//! loading and API key resolution.

pub mod config;
pub mod filesystem;
pub mod llm;
pub mod secret;
