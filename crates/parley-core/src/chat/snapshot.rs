//! SnapshotStore trait definition.
//!
//! The persistence port for the chat history document. The chat store only
//! deals in whole documents, so a backend needs nothing more than read and
//! replace.

use parley_types::error::StoreError;

/// Where the serialized chat history lives.
///
/// Implementations live in parley-infra (e.g., `JsonFileStore`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait SnapshotStore: Send + Sync {
    /// Human-readable location, for logs (e.g. a file path).
    fn location(&self) -> String;

    /// Read the whole document. `Ok(None)` means nothing has been saved yet.
    fn read(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Replace the whole document.
    fn write(
        &self,
        document: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
