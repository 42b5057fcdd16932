//! Model gateway implementations.
//!
//! Contains the Gemini implementation of the [`ModelGateway`] trait defined
//! in `parley-core`, plus a factory ([`create_gateway`]) that builds it from
//! the application configuration.
//!
//! [`ModelGateway`]: parley_core::llm::gateway::ModelGateway

pub mod gemini;

use secrecy::SecretString;

use parley_core::llm::box_gateway::BoxModelGateway;
use parley_types::config::ModelConfig;
use parley_types::llm::GatewayError;

use self::gemini::GeminiGateway;

/// Create a [`BoxModelGateway`] for the model described by `config`.
///
/// # Errors
///
/// Returns [`GatewayError::AuthenticationFailed`] when no API key is available,
/// or a provider error if the HTTP client cannot be built.
pub fn create_gateway(
    config: &ModelConfig,
    api_key: Option<SecretString>,
    system_instruction: Option<String>,
) -> Result<BoxModelGateway, GatewayError> {
    let key = api_key.ok_or(GatewayError::AuthenticationFailed)?;
    let gateway = GeminiGateway::new(key, config, system_instruction)?;
    tracing::info!(model = %config.name, "Gemini gateway ready");
    Ok(BoxModelGateway::new(gateway))
}
