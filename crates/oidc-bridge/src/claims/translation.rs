//! Attribute-to-claim translation table.
//!
//! The table declares, per claim, an ordered list of source attributes to
//! consult. The first source attribute that was released with at least one
//! value determines the claim; later entries are ignored.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::types::{ClaimValue, Claims, SourceAttributes};

/// Built-in mapping from OpenID Connect standard claims to LDAP/eduPerson
/// attribute names. Claims with an empty list are never produced unless a
/// caller maps them.
const BUILTIN_TRANSLATIONS: &[(&str, &[&str])] = &[
    (
        "sub",
        &[
            "eduPersonPrincipalName",
            "eduPersonTargetedID",
            "eduPersonUniqueId",
        ],
    ),
    ("name", &["cn", "displayName"]),
    ("family_name", &["sn"]),
    ("given_name", &["givenName"]),
    ("middle_name", &[]),
    ("nickname", &["eduPersonNickname"]),
    ("preferred_username", &["uid"]),
    ("profile", &["labeledURI", "description"]),
    ("picture", &["jpegPhoto"]),
    ("website", &[]),
    ("gender", &[]),
    ("birthdate", &[]),
    ("zoneinfo", &[]),
    ("locale", &["preferredLanguage"]),
    ("updated_at", &[]),
    ("email", &["mail"]),
    ("email_verified", &[]),
    ("address", &["postalAddress"]),
    ("phone_number", &["mobile", "telephoneNumber", "homePhone"]),
    ("phone_number_verified", &[]),
];

/// Ordered mapping from claim name to candidate source attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTable {
    entries: IndexMap<String, Vec<String>>,
}

impl Default for TranslationTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TranslationTable {
    /// Creates the built-in table.
    #[must_use]
    pub fn builtin() -> Self {
        let entries = BUILTIN_TRANSLATIONS
            .iter()
            .map(|(claim, sources)| {
                (
                    (*claim).to_string(),
                    sources.iter().map(|s| (*s).to_string()).collect(),
                )
            })
            .collect();
        Self { entries }
    }

    /// Creates a table with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Sets the source list for a claim, replacing any previous list.
    ///
    /// A replaced claim keeps its position; a new claim is appended.
    pub fn insert(
        &mut self,
        claim: impl Into<String>,
        sources: impl IntoIterator<Item = impl Into<String>>,
    ) {
        self.entries.insert(
            claim.into(),
            sources.into_iter().map(Into::into).collect(),
        );
    }

    /// Merges caller-supplied entries; the last entry for a claim wins.
    pub fn merge<K, I>(&mut self, overrides: impl IntoIterator<Item = (K, I)>)
    where
        K: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        for (claim, sources) in overrides {
            self.insert(claim, sources);
        }
    }

    /// Returns the source list declared for a claim.
    #[must_use]
    pub fn sources(&self, claim: &str) -> Option<&[String]> {
        self.entries.get(claim).map(Vec::as_slice)
    }

    /// Returns `true` if the claim has an entry, even an empty one.
    #[must_use]
    pub fn contains(&self, claim: &str) -> bool {
        self.entries.contains_key(claim)
    }

    /// Iterates over `(claim, sources)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(claim, sources)| (claim.as_str(), sources.as_slice()))
    }

    /// Returns the number of claims in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Translates source attributes into claims, without scope filtering.
    ///
    /// Claims whose sources were all absent are omitted, never emitted
    /// empty. An attribute released with no values counts as absent.
    #[must_use]
    pub fn translate(&self, attributes: &SourceAttributes, policy: &MultiValuePolicy) -> Claims {
        let mut claims = Claims::new();

        for (claim, sources) in &self.entries {
            let Some(values) = sources
                .iter()
                .filter_map(|source| attributes.get(source))
                .find(|values| !values.is_empty())
            else {
                continue;
            };

            let value = if policy.is_multi_valued(claim) {
                ClaimValue::Multiple(values.to_vec())
            } else {
                ClaimValue::Single(values[0].clone())
            };
            claims.insert(claim.clone(), value);
        }

        claims
    }
}

/// Claims that keep every matched value instead of only the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiValuePolicy {
    claims: HashSet<String>,
}

impl MultiValuePolicy {
    /// Creates an empty policy: every claim is single-valued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a claim as multi-valued.
    pub fn allow(&mut self, claim: impl Into<String>) {
        self.claims.insert(claim.into());
    }

    /// Returns `true` if the claim keeps all values.
    #[must_use]
    pub fn is_multi_valued(&self, claim: &str) -> bool {
        self.claims.contains(claim)
    }
}

impl<S: Into<String>> FromIterator<S> for MultiValuePolicy {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            claims: iter.into_iter().map(Into::into).collect(),
        }
    }
}
