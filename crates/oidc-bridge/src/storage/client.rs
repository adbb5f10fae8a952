//! Client storage trait.
//!
//! Defines the read side of the relying-party registry. Client
//! administration lives outside the bridge.

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::Client;

// =============================================================================
// Client Storage Trait
// =============================================================================

/// Storage operations for OIDC relying parties.
///
/// # Example
///
/// ```ignore
/// use oidc_bridge::storage::ClientStorage;
///
/// async fn example(storage: &impl ClientStorage) -> AuthResult<()> {
///     if let Some(client) = storage.find_by_client_id("my-app").await? {
///         println!("Auth source override: {:?}", client.auth_source());
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait ClientStorage: Send + Sync {
    /// Find a client by its OAuth client_id.
    ///
    /// Returns `None` if the client doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_client_id(&self, client_id: &str) -> AuthResult<Option<Client>>;

    /// Register a client.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The client validation fails
    /// - A client with the same client_id already exists
    /// - The storage operation fails
    async fn create(&self, client: &Client) -> AuthResult<()>;
}
