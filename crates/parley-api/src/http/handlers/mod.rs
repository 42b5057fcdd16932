//! REST API route handlers.

pub mod gemini;
pub mod health;
