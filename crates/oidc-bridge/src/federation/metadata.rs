//! Provider metadata services.
//!
//! The OpenID provider's own discovery document and the upstream identity
//! provider's metadata are both exposed to attribute-release policies as
//! JSON objects.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::AuthResult;
use crate::config::BridgeConfig;
use crate::error::AuthError;

// =============================================================================
// Service Traits
// =============================================================================

/// Source of this OpenID provider's discovery metadata.
#[async_trait]
pub trait ProviderMetadataService: Send + Sync {
    /// Returns the discovery document.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata cannot be produced.
    async fn metadata(&self) -> AuthResult<Map<String, Value>>;
}

/// Source of the upstream identity provider's metadata.
#[async_trait]
pub trait IdpMetadataProvider: Send + Sync {
    /// Returns the identity provider metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata cannot be produced.
    async fn metadata(&self) -> AuthResult<Map<String, Value>>;
}

// =============================================================================
// OIDC Provider Metadata
// =============================================================================

/// OpenID Connect discovery document of this provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OidcProviderMetadata {
    /// Issuer identifier.
    pub issuer: String,

    /// Authorization endpoint URL.
    pub authorization_endpoint: String,

    /// Token endpoint URL.
    pub token_endpoint: String,

    /// UserInfo endpoint URL.
    pub userinfo_endpoint: String,

    /// JSON Web Key Set URL.
    pub jwks_uri: String,

    /// Supported scopes.
    pub scopes_supported: Vec<String>,

    /// Supported response types.
    pub response_types_supported: Vec<String>,

    /// Supported subject identifier types.
    pub subject_types_supported: Vec<String>,

    /// Supported ID token signing algorithms.
    pub id_token_signing_alg_values_supported: Vec<String>,

    /// Supported PKCE code challenge methods.
    pub code_challenge_methods_supported: Vec<String>,
}

impl OidcProviderMetadata {
    /// Builds the discovery document from configuration.
    #[must_use]
    pub fn from_config(config: &BridgeConfig) -> Self {
        let base = config.endpoint_base();

        Self {
            issuer: config.issuer.clone(),
            authorization_endpoint: format!("{}/authorize", base),
            token_endpoint: format!("{}/token", base),
            userinfo_endpoint: format!("{}/userinfo", base),
            jwks_uri: format!("{}/jwks", base),
            scopes_supported: config.supported_scopes(),
            response_types_supported: vec!["code".to_string(), "token".to_string()],
            subject_types_supported: vec!["public".to_string()],
            id_token_signing_alg_values_supported: vec![config.signing_algorithm.clone()],
            code_challenge_methods_supported: vec!["plain".to_string(), "S256".to_string()],
        }
    }

    /// Returns the document as a JSON object.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Internal` if serialization fails.
    pub fn to_json(&self) -> AuthResult<Map<String, Value>> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(AuthError::internal(
                "Provider metadata did not serialize to an object",
            )),
            Err(e) => Err(AuthError::internal(format!(
                "Failed to serialize provider metadata: {}",
                e
            ))),
        }
    }
}

#[async_trait]
impl ProviderMetadataService for OidcProviderMetadata {
    async fn metadata(&self) -> AuthResult<Map<String, Value>> {
        self.to_json()
    }
}

// =============================================================================
// Static IdP Metadata
// =============================================================================

/// Identity provider metadata taken verbatim from configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticIdpMetadata {
    metadata: Map<String, Value>,
}

impl StaticIdpMetadata {
    /// Wraps a metadata table.
    #[must_use]
    pub fn new(metadata: Map<String, Value>) -> Self {
        Self { metadata }
    }

    /// Uses the `idp_metadata` table of the configuration.
    #[must_use]
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(config.idp_metadata.clone())
    }
}

#[async_trait]
impl IdpMetadataProvider for StaticIdpMetadata {
    async fn metadata(&self) -> AuthResult<Map<String, Value>> {
        Ok(self.metadata.clone())
    }
}
