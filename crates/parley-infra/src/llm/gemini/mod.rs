//! Google Gemini model gateway.
//!
//! This module provides the [`GeminiGateway`] which implements the
//! [`ModelGateway`](parley_core::llm::gateway::ModelGateway) trait for the
//! Gemini `generateContent` REST endpoint.

pub mod client;
pub mod types;

pub use client::GeminiGateway;
