//! Claim sets bound to scopes.
//!
//! A claim is released only when it belongs to a claim set whose scope was
//! requested. The OpenID Connect standard sets are seeded at construction;
//! the `openid` set (holding `sub`) is reserved.

use indexmap::IndexMap;

use crate::config::ConfigError;

/// The scope that marks a request as an OpenID Connect request.
pub const OPENID_SCOPE: &str = "openid";

/// Scopes defined by OpenID Connect Core.
pub const STANDARD_SCOPES: [&str; 5] = [OPENID_SCOPE, "profile", "email", "address", "phone"];

const PROFILE_CLAIMS: &[&str] = &[
    "name",
    "family_name",
    "given_name",
    "middle_name",
    "nickname",
    "preferred_username",
    "profile",
    "picture",
    "website",
    "gender",
    "birthdate",
    "zoneinfo",
    "locale",
    "updated_at",
];

/// A named group of claims released together for one scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimSet {
    scope: String,
    claims: Vec<String>,
}

impl ClaimSet {
    /// Creates a claim set for a scope.
    #[must_use]
    pub fn new(scope: impl Into<String>, claims: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            scope: scope.into(),
            claims: claims.into_iter().map(Into::into).collect(),
        }
    }

    /// The scope that releases this set.
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// The claims in this set.
    #[must_use]
    pub fn claims(&self) -> &[String] {
        &self.claims
    }

    /// Returns `true` if the claim belongs to this set.
    #[must_use]
    pub fn contains(&self, claim: &str) -> bool {
        self.claims.iter().any(|c| c == claim)
    }
}

/// Registered claim sets keyed by scope name.
#[derive(Debug, Clone)]
pub struct ClaimSetRegistry {
    sets: IndexMap<String, ClaimSet>,
}

impl Default for ClaimSetRegistry {
    fn default() -> Self {
        Self::with_standard_sets()
    }
}

impl ClaimSetRegistry {
    /// Creates a registry seeded with the OpenID Connect standard sets.
    #[must_use]
    pub fn with_standard_sets() -> Self {
        let seeded = [
            ClaimSet::new(OPENID_SCOPE, ["sub"]),
            ClaimSet::new("profile", PROFILE_CLAIMS.iter().copied()),
            ClaimSet::new("email", ["email", "email_verified"]),
            ClaimSet::new("address", ["address"]),
            ClaimSet::new("phone", ["phone_number", "phone_number_verified"]),
        ];

        Self {
            sets: seeded
                .into_iter()
                .map(|set| (set.scope.clone(), set))
                .collect(),
        }
    }

    /// Registers a caller-defined claim set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReservedClaimSet` for `openid` and
    /// `ConfigError::DuplicateClaimSet` if the scope is already registered.
    pub fn register(&mut self, set: ClaimSet) -> Result<(), ConfigError> {
        if set.scope == OPENID_SCOPE {
            return Err(ConfigError::ReservedClaimSet(set.scope));
        }
        if self.sets.contains_key(&set.scope) {
            return Err(ConfigError::DuplicateClaimSet(set.scope));
        }
        self.sets.insert(set.scope.clone(), set);
        Ok(())
    }

    /// Returns the claim set bound to a scope.
    #[must_use]
    pub fn get(&self, scope: &str) -> Option<&ClaimSet> {
        self.sets.get(scope)
    }

    /// Iterates over the registered sets in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ClaimSet> {
        self.sets.values()
    }

    /// Returns the number of registered sets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns `true` if no sets are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
