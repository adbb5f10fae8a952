//! Federated authentication bridge.
//!
//! This module connects an external authentication source to the OIDC
//! user model:
//!
//! - [`source`] - Upstream authentication sources and their factory
//! - [`state`] - Per-attempt request parameters and assembled state
//! - [`metadata`] - OpenID provider and upstream IdP metadata services
//! - [`processing`] - Attribute-release pipeline
//! - [`auth`] - The authentication service orchestrating one attempt
//! - [`provisioning`] - User record reconciliation

pub mod auth;
pub mod metadata;
pub mod processing;
pub mod provisioning;
pub mod source;
pub mod state;

pub use auth::AuthenticationService;
pub use metadata::{
    IdpMetadataProvider, OidcProviderMetadata, ProviderMetadataService, StaticIdpMetadata,
};
pub use processing::{
    AttributeFilter, AttributeLimit, AttributeProcessor, AttributeRename,
    DEFAULT_FILTER_PRIORITY, ProcessingChain,
};
pub use provisioning::{ReconcileAction, UserReconciliation};
pub use source::{AuthSession, AuthSource, AuthSourceFactory};
pub use state::{AuthenticationRequest, AuthenticationState, RELEVANT_AUTHZ_PARAMS};
