//! Bridge configuration.
//!
//! This module provides the configuration types for the authentication
//! bridge: the default auth source, the identifying attribute, attribute
//! translation overrides, private scopes, and the metadata advertised by
//! the OpenID provider.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::claims::STANDARD_SCOPES;

/// Root bridge configuration.
///
/// # Example (TOML)
///
/// ```toml
/// issuer = "https://idp.example.org"
/// base_url = "https://idp.example.org/oidc"
/// auth = "default-sp"
/// user_id_attribute = "uid"
/// multi_valued_claims = ["eduperson_affiliation"]
///
/// [translate]
/// sub = ["eduPersonPrincipalName", "uid"]
///
/// [scopes.eduperson]
/// description = "Academic affiliation"
/// claim_name_prefix = "eduperson_"
/// attributes = ["eduPersonAffiliation"]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// OpenID provider issuer URL (used in the `iss` claim and discovery).
    pub issuer: String,

    /// Base URL under which the provider endpoints are served.
    /// Falls back to `issuer` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Default authentication source, used when a client has no override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,

    /// Source attribute whose first value identifies the user.
    pub user_id_attribute: String,

    /// Translation table overrides, merged over the built-in table by
    /// claim name.
    pub translate: IndexMap<String, Vec<String>>,

    /// Claims that keep every released value instead of only the first.
    pub multi_valued_claims: Vec<String>,

    /// Private scopes, keyed by scope name.
    pub scopes: IndexMap<String, PrivateScopeConfig>,

    /// Metadata of the hosted identity provider, handed to the
    /// attribute-processing pipeline.
    pub idp_metadata: serde_json::Map<String, serde_json::Value>,

    /// ID token signing algorithm advertised in provider metadata.
    pub signing_algorithm: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            issuer: "http://localhost".to_string(),
            base_url: None,
            auth: None,
            user_id_attribute: "uid".to_string(),
            translate: IndexMap::new(),
            multi_valued_claims: Vec::new(),
            scopes: IndexMap::new(),
            idp_metadata: serde_json::Map::new(),
            signing_algorithm: "RS256".to_string(),
        }
    }
}

/// A scope defined by the deployment rather than by OpenID Connect.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PrivateScopeConfig {
    /// Human-readable description shown on consent screens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Prefix prepended to each attribute name to form the claim name.
    pub claim_name_prefix: String,

    /// Whether the claims of this scope keep all released values.
    pub multiple_values: bool,

    /// Source attributes released under this scope.
    pub attributes: Vec<String>,
}

impl PrivateScopeConfig {
    /// Creates a private scope releasing the given attributes.
    #[must_use]
    pub fn new(attributes: Vec<impl Into<String>>) -> Self {
        Self {
            attributes: attributes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets the claim name prefix.
    #[must_use]
    pub fn with_claim_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.claim_name_prefix = prefix.into();
        self
    }

    /// Sets whether the scope's claims are multi-valued.
    #[must_use]
    pub fn with_multiple_values(mut self, enabled: bool) -> Self {
        self.multiple_values = enabled;
        self
    }

    /// Returns `(claim name, source attribute)` pairs for this scope.
    pub fn claim_mappings(&self) -> impl Iterator<Item = (String, &str)> {
        self.attributes
            .iter()
            .map(|attr| (format!("{}{}", self.claim_name_prefix, attr), attr.as_str()))
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// A required configuration value is missing.
    #[error("Missing required configuration: {0}")]
    Missing(String),

    /// A claim set with the same name is already registered.
    #[error("Claim set '{0}' is already registered")]
    DuplicateClaimSet(String),

    /// The claim set name is reserved by OpenID Connect.
    #[error("Claim set '{0}' is reserved and pre-defined by OpenID Connect")]
    ReservedClaimSet(String),

    /// The configuration file could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeConfig {
    /// Parses and validates a TOML configuration document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML and any error
    /// reported by [`BridgeConfig::validate`].
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise
    /// the errors of [`BridgeConfig::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "Loaded bridge configuration file");
        Self::from_toml_str(&content)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The issuer URL is empty
    /// - A private scope shadows a standard OpenID Connect scope
    /// - A private scope releases no attributes
    ///
    /// Returns `ConfigError::Missing` if the identifying attribute is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.issuer.is_empty() {
            return Err(ConfigError::InvalidValue(
                "issuer cannot be empty".to_string(),
            ));
        }

        if self.user_id_attribute.is_empty() {
            return Err(ConfigError::Missing("user_id_attribute".to_string()));
        }

        for (name, scope) in &self.scopes {
            if STANDARD_SCOPES.contains(&name.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "Private scope '{}' collides with a standard scope",
                    name
                )));
            }
            if scope.attributes.is_empty() {
                return Err(ConfigError::InvalidValue(format!(
                    "Private scope '{}' must release at least one attribute",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Returns the base URL for provider endpoints without a trailing slash.
    #[must_use]
    pub fn endpoint_base(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(&self.issuer)
            .trim_end_matches('/')
    }

    /// Returns every scope the provider supports: the standard scopes
    /// followed by the private scopes in declaration order.
    #[must_use]
    pub fn supported_scopes(&self) -> Vec<String> {
        STANDARD_SCOPES
            .iter()
            .map(|s| (*s).to_string())
            .chain(self.scopes.keys().cloned())
            .collect()
    }
}
