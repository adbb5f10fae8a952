//! Authentication bridge service.
//!
//! This module provides the [`AuthenticationService`], which turns an
//! authorization request into a reconciled [`UserRecord`].
//!
//! # Overview
//!
//! One attempt consists of:
//!
//! 1. **Resolve client** - Look up the relying party named by `client_id`
//! 2. **Resolve auth source** - Client override, else the configured default
//! 3. **Authenticate** - Require a session with the upstream source
//! 4. **Assemble state** - Session data plus provider, relying-party, and IdP
//!    metadata and the relevant request parameters
//! 5. **Process** - Run the attribute-release pipeline
//! 6. **Identify** - Read the identifying attribute
//! 7. **Reconcile** - Create or update the user record
//!
//! # Example
//!
//! ```ignore
//! use oidc_bridge::federation::{AuthenticationRequest, AuthenticationService};
//!
//! let service = AuthenticationService::new(config, clients, users, sources)?;
//!
//! let request = AuthenticationRequest::new()
//!     .with_param("client_id", "my-app")
//!     .with_param("scope", "openid profile");
//!
//! let user = service.authenticate(&request).await?;
//! let claims = extractor.extract_for_user(request.scopes(), &user);
//! ```

use std::sync::Arc;

use crate::AuthResult;
use crate::config::{BridgeConfig, ConfigError};
use crate::error::AuthError;
use crate::storage::{ClientStorage, UserRecord, UserStorage};
use crate::types::Client;

use super::metadata::{
    IdpMetadataProvider, OidcProviderMetadata, ProviderMetadataService, StaticIdpMetadata,
};
use super::processing::{AttributeProcessor, ProcessingChain};
use super::provisioning::UserReconciliation;
use super::source::AuthSourceFactory;
use super::state::{AuthenticationRequest, AuthenticationState};

/// Bridges external authentication into OIDC user records.
///
/// Holds no per-attempt state; one instance serves concurrent attempts.
pub struct AuthenticationService {
    config: Arc<BridgeConfig>,
    clients: Arc<dyn ClientStorage>,
    sources: Arc<AuthSourceFactory>,
    processor: Arc<dyn AttributeProcessor>,
    provider_metadata: Arc<dyn ProviderMetadataService>,
    idp_metadata: Arc<dyn IdpMetadataProvider>,
    reconciliation: UserReconciliation,
}

impl AuthenticationService {
    /// Creates the service.
    ///
    /// Provider metadata and IdP metadata are derived from `config`, and
    /// attributes pass through an empty [`ProcessingChain`] until
    /// [`AuthenticationService::with_processor`] installs another one.
    ///
    /// # Errors
    ///
    /// Returns the error of [`BridgeConfig::validate`].
    pub fn new(
        config: Arc<BridgeConfig>,
        clients: Arc<dyn ClientStorage>,
        users: Arc<dyn UserStorage>,
        sources: Arc<AuthSourceFactory>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let provider_metadata = Arc::new(OidcProviderMetadata::from_config(&config));
        let idp_metadata = Arc::new(StaticIdpMetadata::from_config(&config));

        Ok(Self {
            config,
            clients,
            sources,
            processor: Arc::new(ProcessingChain::new()),
            provider_metadata,
            idp_metadata,
            reconciliation: UserReconciliation::new(users),
        })
    }

    /// Sets the attribute-release pipeline.
    #[must_use]
    pub fn with_processor(mut self, processor: Arc<dyn AttributeProcessor>) -> Self {
        self.processor = processor;
        self
    }

    /// Sets the provider metadata service.
    #[must_use]
    pub fn with_provider_metadata(mut self, metadata: Arc<dyn ProviderMetadataService>) -> Self {
        self.provider_metadata = metadata;
        self
    }

    /// Sets the IdP metadata service.
    #[must_use]
    pub fn with_idp_metadata(mut self, metadata: Arc<dyn IdpMetadataProvider>) -> Self {
        self.idp_metadata = metadata;
        self
    }

    /// Runs one authentication attempt.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `AuthError::InvalidClient` if the request names no known, enabled client
    /// - `AuthError::Configuration` if no auth source can be resolved
    /// - `AuthError::Authentication` if the upstream source or the
    ///   attribute-release pipeline rejects the attempt
    /// - `AuthError::AttributeMissing` if the identifying attribute was not released
    /// - `AuthError::Storage` if reconciliation fails
    pub async fn authenticate(&self, request: &AuthenticationRequest) -> AuthResult<UserRecord> {
        let client = self.resolve_client(request).await?;
        let auth_source = self.resolve_auth_source(&client)?;

        tracing::debug!(
            client_id = %client.client_id,
            auth_source = %auth_source,
            "Starting authentication"
        );

        let source = self.sources.build(&auth_source)?;
        if let Err(e) = source.require_auth(request).await {
            tracing::warn!(
                client_id = %client.client_id,
                auth_source = %auth_source,
                error = %e,
                "Upstream authentication failed"
            );
            return Err(e);
        }
        let session = source.auth_data(request).await?;

        let state = AuthenticationState {
            auth_source: auth_source.clone(),
            attributes: session.attributes,
            session_data: session.metadata,
            provider_metadata: self.provider_metadata.metadata().await?,
            relying_party_metadata: client.to_metadata(),
            authorization_request: request.relevant_params(),
            idp_metadata: self.idp_metadata.metadata().await?,
        };

        let state = match self.processor.process_state(state).await {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(
                    client_id = %client.client_id,
                    auth_source = %auth_source,
                    error = %e,
                    "Attribute processing rejected the attempt"
                );
                return Err(e);
            }
        };

        let user_id = self.identify(&state)?;
        tracing::debug!(user_id = %user_id, auth_source = %auth_source, "User identified");

        self.reconciliation.reconcile(&user_id, state.attributes).await
    }

    /// Returns the auth source for `client`: its override, else the
    /// configured default.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` if neither is set.
    pub fn resolve_auth_source(&self, client: &Client) -> AuthResult<String> {
        client
            .auth_source()
            .or(self.config.auth.as_deref())
            .map(str::to_string)
            .ok_or_else(|| {
                AuthError::configuration(format!(
                    "No authentication source configured for client '{}' and no default source set",
                    client.client_id
                ))
            })
    }

    async fn resolve_client(&self, request: &AuthenticationRequest) -> AuthResult<Client> {
        let client_id = request
            .client_id()
            .ok_or_else(|| AuthError::invalid_client("Missing client_id parameter"))?;

        let client = self
            .clients
            .find_by_client_id(client_id)
            .await?
            .ok_or_else(|| AuthError::invalid_client(format!("Unknown client: {}", client_id)))?;

        if !client.active {
            return Err(AuthError::invalid_client(format!(
                "Client is disabled: {}",
                client_id
            )));
        }

        Ok(client)
    }

    fn identify(&self, state: &AuthenticationState) -> AuthResult<String> {
        let attribute = &self.config.user_id_attribute;
        state
            .attributes
            .first(attribute)
            .map(str::to_string)
            .ok_or_else(|| {
                let available = state
                    .attributes
                    .iter()
                    .filter(|(_, values)| !values.is_empty())
                    .map(|(name, _)| name);
                AuthError::attribute_missing(attribute, available)
            })
    }
}

impl std::fmt::Debug for AuthenticationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationService")
            .field("auth", &self.config.auth)
            .field("user_id_attribute", &self.config.user_id_attribute)
            .field("sources", &self.sources)
            .finish_non_exhaustive()
    }
}
