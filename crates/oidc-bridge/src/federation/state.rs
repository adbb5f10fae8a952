//! Per-attempt authentication state.
//!
//! [`AuthenticationRequest`] carries the authorization-request parameters
//! of one attempt. [`AuthenticationState`] is assembled after the upstream
//! session is established and handed to the attribute-processing pipeline.
//! Both are created fresh for every attempt and dropped afterwards.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::{Map, Value};

use crate::types::SourceAttributes;

/// Authorization-request parameters forwarded to attribute-release policies.
pub const RELEVANT_AUTHZ_PARAMS: [&str; 5] = [
    "response_type",
    "client_id",
    "redirect_uri",
    "scope",
    "code_challenge_method",
];

// =============================================================================
// Authentication Request
// =============================================================================

/// Parameters of an incoming authorization request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthenticationRequest {
    params: IndexMap<String, String>,
}

impl AuthenticationRequest {
    /// Creates a request without parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Returns a parameter value.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Returns the `client_id` parameter.
    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        self.param("client_id").filter(|id| !id.is_empty())
    }

    /// Returns the requested scopes, split on whitespace.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.param("scope").unwrap_or_default().split_whitespace()
    }

    /// Returns only the parameters relevant to attribute release, in
    /// request order.
    #[must_use]
    pub fn relevant_params(&self) -> IndexMap<String, String> {
        self.params
            .iter()
            .filter(|(name, _)| RELEVANT_AUTHZ_PARAMS.contains(&name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for AuthenticationRequest
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// =============================================================================
// Authentication State
// =============================================================================

/// Context handed to the attribute-processing pipeline.
///
/// Serialized keys follow the names attribute-release policies expect:
/// the upstream IdP metadata appears under both `Source` and
/// `IdPMetadata`, and the auth-source id under `AuthSource`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthenticationState {
    /// The auth source that established the session.
    pub auth_source: String,

    /// Attributes released by the upstream identity provider.
    pub attributes: SourceAttributes,

    /// Additional session data reported by the auth source.
    pub session_data: Map<String, Value>,

    /// Discovery document of this OpenID provider.
    pub provider_metadata: Map<String, Value>,

    /// Relying-party metadata, secret removed.
    pub relying_party_metadata: Map<String, Value>,

    /// Authorization-request parameters relevant to attribute release.
    pub authorization_request: IndexMap<String, String>,

    /// Metadata of the upstream identity provider.
    pub idp_metadata: Map<String, Value>,
}

impl Serialize for AuthenticationState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("AuthenticationState", 8)?;
        state.serialize_field("AuthSource", &self.auth_source)?;
        state.serialize_field("Attributes", &self.attributes)?;
        state.serialize_field("SessionData", &self.session_data)?;
        state.serialize_field("OidcProviderMetadata", &self.provider_metadata)?;
        state.serialize_field("OidcRelyingPartyMetadata", &self.relying_party_metadata)?;
        state.serialize_field(
            "OidcAuthorizationRequestParameters",
            &self.authorization_request,
        )?;
        state.serialize_field("IdPMetadata", &self.idp_metadata)?;
        state.serialize_field("Source", &self.idp_metadata)?;
        state.end()
    }
}

impl AuthenticationState {
    /// Returns the requesting client's identifier, if forwarded.
    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        self.authorization_request.get("client_id").map(String::as_str)
    }
}
