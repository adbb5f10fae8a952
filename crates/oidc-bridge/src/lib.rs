//! # oidc-bridge
//!
//! Bridges federated authentication into an OpenID Connect provider.
//!
//! This crate provides:
//! - Attribute-to-claim translation filtered by requested scopes
//! - An authentication service turning an authorization request into a
//!   reconciled user record
//! - User reconciliation against pluggable storage
//!
//! ## Overview
//!
//! An upstream identity provider releases attributes (`cn`, `mail`,
//! `eduPersonPrincipalName`, ...). The [`federation::AuthenticationService`]
//! resolves the auth source for the requesting client, requires a session,
//! runs the attribute-release pipeline, and persists the user. The
//! [`claims::ClaimTranslatorExtractor`] later turns the stored attributes
//! into the claims released for the requested scopes.
//!
//! ## Modules
//!
//! - [`config`] - Bridge configuration
//! - [`claims`] - Translation table, claim sets, and claim extraction
//! - [`federation`] - Auth sources, metadata, attribute processing, and the
//!   authentication service
//! - [`storage`] - Storage traits and in-memory backends
//! - [`types`] - Attribute, claim, and client types

pub mod claims;
pub mod config;
pub mod error;
pub mod federation;
pub mod storage;
pub mod types;

pub use claims::{ClaimExtractorBuilder, ClaimTranslatorExtractor};
pub use config::{BridgeConfig, ConfigError, PrivateScopeConfig};
pub use error::{AuthError, ErrorCategory};
pub use federation::{
    AuthSession, AuthSource, AuthSourceFactory, AuthenticationRequest, AuthenticationService,
    AuthenticationState, UserReconciliation,
};
pub use storage::{ClientStorage, UserRecord, UserStorage};
pub use types::{ClaimValue, Claims, Client, ClientValidationError, SourceAttributes};

/// Type alias for bridge results.
pub type AuthResult<T> = Result<T, AuthError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use oidc_bridge::prelude::*;
/// ```
pub mod prelude {
    pub use crate::AuthResult;
    pub use crate::claims::{
        ClaimExtractorBuilder, ClaimSet, ClaimTranslatorExtractor, MultiValuePolicy,
        TranslationTable,
    };
    pub use crate::config::{BridgeConfig, ConfigError, PrivateScopeConfig};
    pub use crate::error::{AuthError, ErrorCategory};
    pub use crate::federation::{
        AttributeFilter, AttributeLimit, AttributeProcessor, AttributeRename, AuthSession,
        AuthSource, AuthSourceFactory, AuthenticationRequest, AuthenticationService,
        AuthenticationState, IdpMetadataProvider, OidcProviderMetadata, ProcessingChain,
        ProviderMetadataService, StaticIdpMetadata, UserReconciliation,
    };
    pub use crate::storage::{
        ClientStorage, MemoryClientStorage, MemoryUserStorage, UserRecord, UserStorage,
    };
    pub use crate::types::{ClaimValue, Claims, Client, ClientValidationError, SourceAttributes};
}
