//! Relying party (OIDC client) domain types.
//!
//! The bridge only reads clients: it needs the optional auth-source
//! override and the client metadata handed to the attribute-processing
//! pipeline, always with the secret removed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Client
// =============================================================================

/// OIDC relying party registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Unique client identifier used in OAuth flows.
    #[serde(rename = "id")]
    pub client_id: String,

    /// Client secret (for confidential clients). Never exposed in metadata.
    #[serde(rename = "secret", skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    /// Human-readable display name.
    pub name: String,

    /// Detailed description of the client application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Authentication source to use instead of the configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_source: Option<String>,

    /// Allowed redirect URIs.
    #[serde(default, rename = "redirect_uri")]
    pub redirect_uris: Vec<String>,

    /// Scopes this client may request.
    #[serde(default)]
    pub scopes: Vec<String>,

    /// Whether this client is currently enabled.
    #[serde(rename = "is_enabled")]
    pub active: bool,

    /// Whether this is a confidential client (has a client secret).
    #[serde(rename = "is_confidential")]
    pub confidential: bool,
}

impl Client {
    /// Creates an enabled public client.
    #[must_use]
    pub fn new(client_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            name: name.into(),
            description: None,
            auth_source: None,
            redirect_uris: Vec::new(),
            scopes: Vec::new(),
            active: true,
            confidential: false,
        }
    }

    /// Sets the client secret and marks the client confidential.
    #[must_use]
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self.confidential = true;
        self
    }

    /// Sets the auth-source override.
    #[must_use]
    pub fn with_auth_source(mut self, auth_source: impl Into<String>) -> Self {
        self.auth_source = Some(auth_source.into());
        self
    }

    /// Adds an allowed redirect URI.
    #[must_use]
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uris.push(uri.into());
        self
    }

    /// Sets the allowed scopes.
    #[must_use]
    pub fn with_scopes(mut self, scopes: Vec<impl Into<String>>) -> Self {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the auth-source override, if any.
    #[must_use]
    pub fn auth_source(&self) -> Option<&str> {
        self.auth_source.as_deref()
    }

    /// Returns the relying-party metadata exposed to attribute-release
    /// policies: the serialized registration with the `secret` key removed.
    #[must_use]
    pub fn to_metadata(&self) -> Map<String, Value> {
        let mut metadata = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        metadata.remove("secret");
        metadata
    }

    /// Validates the client registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the client registration is inconsistent.
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        if self.client_id.is_empty() {
            return Err(ClientValidationError::EmptyClientId);
        }

        if self.name.is_empty() {
            return Err(ClientValidationError::EmptyName);
        }

        if self.confidential && self.client_secret.is_none() {
            return Err(ClientValidationError::MissingSecret);
        }

        if matches!(self.auth_source.as_deref(), Some("")) {
            return Err(ClientValidationError::EmptyAuthSource);
        }

        Ok(())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Errors that can occur during client validation.
#[derive(Debug, thiserror::Error)]
pub enum ClientValidationError {
    /// Client ID cannot be empty.
    #[error("Client ID cannot be empty")]
    EmptyClientId,

    /// Client name cannot be empty.
    #[error("Client name cannot be empty")]
    EmptyName,

    /// Confidential clients require a client secret.
    #[error("Confidential clients require a client secret")]
    MissingSecret,

    /// An auth-source override must name a source.
    #[error("Auth source override cannot be empty")]
    EmptyAuthSource,
}
