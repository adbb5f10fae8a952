//! Upstream authentication sources.
//!
//! An [`AuthSource`] wraps the external mechanism that establishes a
//! federated session (a SAML service provider, an LDAP bind, ...). The
//! bridge never inspects how the session is established; it only requires
//! it and reads the released data afterwards.

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::AuthResult;
use crate::error::AuthError;
use crate::types::SourceAttributes;

use super::state::AuthenticationRequest;

/// Data of an established upstream session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthSession {
    /// Attributes released by the upstream identity provider.
    pub attributes: SourceAttributes,

    /// Additional session data (authentication instant, authority, ...).
    pub metadata: Map<String, Value>,
}

impl AuthSession {
    /// Creates a session with the given attributes and no metadata.
    #[must_use]
    pub fn new(attributes: SourceAttributes) -> Self {
        Self {
            attributes,
            metadata: Map::new(),
        }
    }

    /// Adds a session metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// An external authentication mechanism.
#[async_trait]
pub trait AuthSource: Send + Sync {
    /// Ensures the user behind `request` holds a session with this source,
    /// establishing one if needed. May take human-timescale time.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Authentication` if no session can be established.
    async fn require_auth(&self, request: &AuthenticationRequest) -> AuthResult<()>;

    /// Returns the attributes and metadata of the established session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Authentication` if no session is established.
    async fn auth_data(&self, request: &AuthenticationRequest) -> AuthResult<AuthSession>;
}

/// Resolves auth-source names to configured sources.
#[derive(Default, Clone)]
pub struct AuthSourceFactory {
    sources: IndexMap<String, Arc<dyn AuthSource>>,
}

impl AuthSourceFactory {
    /// Creates a factory with no sources.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a source under `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, source: Arc<dyn AuthSource>) {
        self.sources.insert(name.into(), source);
    }

    /// Builder form of [`AuthSourceFactory::register`].
    #[must_use]
    pub fn with_source(mut self, name: impl Into<String>, source: Arc<dyn AuthSource>) -> Self {
        self.register(name, source);
        self
    }

    /// Returns the source bound to `name`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` if no source has that name.
    pub fn build(&self, name: &str) -> AuthResult<Arc<dyn AuthSource>> {
        self.sources.get(name).cloned().ok_or_else(|| {
            AuthError::configuration(format!("Unknown authentication source '{}'", name))
        })
    }

    /// Returns the registered source names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for AuthSourceFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSourceFactory")
            .field("sources", &self.sources.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource(SourceAttributes);

    #[async_trait]
    impl AuthSource for FixedSource {
        async fn require_auth(&self, _request: &AuthenticationRequest) -> AuthResult<()> {
            Ok(())
        }

        async fn auth_data(&self, _request: &AuthenticationRequest) -> AuthResult<AuthSession> {
            Ok(AuthSession::new(self.0.clone()))
        }
    }

    #[tokio::test]
    async fn test_build_registered_source() {
        let factory = AuthSourceFactory::new().with_source(
            "default-sp",
            Arc::new(FixedSource(SourceAttributes::new().with("uid", ["u1"]))),
        );

        let source = factory.build("default-sp").unwrap();
        let session = source.auth_data(&AuthenticationRequest::new()).await.unwrap();
        assert_eq!(session.attributes.first("uid"), Some("u1"));
        assert_eq!(factory.names().collect::<Vec<_>>(), vec!["default-sp"]);
    }

    #[test]
    fn test_build_unknown_source() {
        let factory = AuthSourceFactory::new();
        let err = factory.build("missing").err().unwrap();
        assert!(matches!(err, AuthError::Configuration { .. }));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_session_metadata() {
        let session = AuthSession::new(SourceAttributes::new())
            .with_metadata("AuthnInstant", 1_700_000_000);
        assert_eq!(session.metadata["AuthnInstant"], 1_700_000_000);
    }
}
