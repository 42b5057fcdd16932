//! ModelGateway trait definition.
//!
//! The core abstraction every remote model client implements. Uses RPITIT
//! for `generate`; see `BoxModelGateway` for dynamic dispatch.

use parley_types::llm::{GatewayError, Message};

/// Trait for remote text-generation backends (Gemini, test doubles, ...).
///
/// A gateway is stateless with respect to conversations: every call receives
/// the full ordered turn list and returns the model's reply to the last
/// user turn. Model identifier, sampling parameters, safety thresholds and
/// the system instruction are owned by the implementation.
///
/// Implementations live in parley-infra (e.g., `GeminiGateway`).
pub trait ModelGateway: Send + Sync {
    /// Human-readable gateway name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Generate a reply to `contents`, whose last entry is the user turn.
    fn generate(
        &self,
        contents: &[Message],
    ) -> impl std::future::Future<Output = Result<String, GatewayError>> + Send;
}
