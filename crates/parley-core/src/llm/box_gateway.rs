//! BoxModelGateway -- object-safe dynamic dispatch wrapper for ModelGateway.
//!
//! 1. Define an object-safe `ModelGatewayDyn` trait with boxed futures
//! 2. Blanket-impl `ModelGatewayDyn` for all `T: ModelGateway`
//! 3. `BoxModelGateway` wraps `Box<dyn ModelGatewayDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use parley_types::llm::{GatewayError, Message};

use super::gateway::ModelGateway;

/// Object-safe version of [`ModelGateway`] with boxed futures.
///
/// A blanket implementation is provided for all types implementing `ModelGateway`.
pub trait ModelGatewayDyn: Send + Sync {
    fn name(&self) -> &str;

    fn model(&self) -> &str;

    fn generate_boxed<'a>(
        &'a self,
        contents: &'a [Message],
    ) -> Pin<Box<dyn Future<Output = Result<String, GatewayError>> + Send + 'a>>;
}

impl<T: ModelGateway> ModelGatewayDyn for T {
    fn name(&self) -> &str {
        ModelGateway::name(self)
    }

    fn model(&self) -> &str {
        ModelGateway::model(self)
    }

    fn generate_boxed<'a>(
        &'a self,
        contents: &'a [Message],
    ) -> Pin<Box<dyn Future<Output = Result<String, GatewayError>> + Send + 'a>> {
        Box::pin(self.generate(contents))
    }
}

/// Type-erased model gateway for runtime backend selection.
///
/// Since `ModelGateway` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxModelGateway` provides equivalent methods that delegate to
/// the inner `ModelGatewayDyn` trait object.
pub struct BoxModelGateway {
    inner: Box<dyn ModelGatewayDyn + Send + Sync>,
}

impl BoxModelGateway {
    /// Wrap a concrete `ModelGateway` in a type-erased box.
    pub fn new<T: ModelGateway + 'static>(gateway: T) -> Self {
        Self {
            inner: Box::new(gateway),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn model(&self) -> &str {
        self.inner.model()
    }

    /// Generate a reply to `contents`.
    pub async fn generate(&self, contents: &[Message]) -> Result<String, GatewayError> {
        self.inner.generate_boxed(contents).await
    }
}

impl std::fmt::Debug for BoxModelGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxModelGateway")
            .field("name", &self.name())
            .field("model", &self.model())
            .finish()
    }
}
