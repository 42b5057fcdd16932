//! HTTP/REST API layer for Parley.
//!
//! Axum-based JSON API at `/api/gemini/` with permissive CORS. Success
//! bodies are bare JSON values; failures are a JSON string.

pub mod error;
pub mod handlers;
pub mod router;
