//! Claim extraction for identity tokens.
//!
//! [`ClaimTranslatorExtractor`] translates source attributes through the
//! [`TranslationTable`], applies the [`MultiValuePolicy`], and releases
//! only the claims whose claim set was requested.
//!
//! # Example
//!
//! ```ignore
//! use oidc_bridge::claims::{ClaimSet, ClaimTranslatorExtractor};
//!
//! let extractor = ClaimTranslatorExtractor::builder()
//!     .with_translation("sub", ["uid"])
//!     .with_multi_valued_claim("eduperson_affiliation")
//!     .with_translation("eduperson_affiliation", ["eduPersonAffiliation"])
//!     .with_claim_set(ClaimSet::new("eduperson", ["eduperson_affiliation"]))
//!     .build()?;
//!
//! let claims = extractor.extract(["openid", "eduperson"], &attributes);
//! ```

use crate::config::{BridgeConfig, ConfigError};
use crate::storage::UserRecord;
use crate::types::{Claims, SourceAttributes};

use super::claim_set::{ClaimSet, ClaimSetRegistry};
use super::translation::{MultiValuePolicy, TranslationTable};

/// Translates upstream attributes into scope-filtered OIDC claims.
///
/// Immutable after construction, so one instance can be shared across
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct ClaimTranslatorExtractor {
    table: TranslationTable,
    multi_value: MultiValuePolicy,
    claim_sets: ClaimSetRegistry,
}

impl Default for ClaimTranslatorExtractor {
    fn default() -> Self {
        Self {
            table: TranslationTable::builtin(),
            multi_value: MultiValuePolicy::new(),
            claim_sets: ClaimSetRegistry::with_standard_sets(),
        }
    }
}

impl ClaimTranslatorExtractor {
    /// Creates a builder seeded with the built-in translation table.
    #[must_use]
    pub fn builder() -> ClaimExtractorBuilder {
        ClaimExtractorBuilder::new()
    }

    /// Builds an extractor from the bridge configuration.
    ///
    /// Translation overrides are merged over the built-in table. Each
    /// private scope registers a claim set; its claims translate from the
    /// same-named source attribute unless the table already maps them.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a private scope collides with an
    /// already registered claim set.
    pub fn from_config(config: &BridgeConfig) -> Result<Self, ConfigError> {
        let mut table = TranslationTable::builtin();
        table.merge(config.translate.clone());

        let mut builder = Self::builder();
        for claim in &config.multi_valued_claims {
            builder = builder.with_multi_valued_claim(claim.clone());
        }

        for (scope_name, scope) in &config.scopes {
            let mut claims = Vec::with_capacity(scope.attributes.len());
            for (claim, attribute) in scope.claim_mappings() {
                if !table.contains(&claim) {
                    table.insert(claim.clone(), [attribute]);
                }
                if scope.multiple_values {
                    builder = builder.with_multi_valued_claim(claim.clone());
                }
                claims.push(claim);
            }
            builder = builder.with_claim_set(ClaimSet::new(scope_name.clone(), claims));
        }

        let extractor = builder.with_translation_table(table).build()?;
        tracing::debug!(
            claims = extractor.table.len(),
            claim_sets = extractor.claim_sets.len(),
            "Built claim translator"
        );
        Ok(extractor)
    }

    /// Translates attributes into claims without scope filtering.
    #[must_use]
    pub fn translate(&self, attributes: &SourceAttributes) -> Claims {
        self.table.translate(attributes, &self.multi_value)
    }

    /// Produces the claims released for the requested scopes.
    ///
    /// Unknown scopes are ignored. Claims outside every requested claim
    /// set are dropped. Never fails: missing attributes only omit claims.
    pub fn extract<I, S>(&self, scopes: I, attributes: &SourceAttributes) -> Claims
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let translated = self.translate(attributes);
        let mut released = Claims::new();

        for scope in scopes {
            let Some(set) = self.claim_sets.get(scope.as_ref()) else {
                continue;
            };
            for (claim, value) in &translated {
                if set.contains(claim) && !released.contains_key(claim) {
                    released.insert(claim.clone(), value.clone());
                }
            }
        }

        released
    }

    /// Produces the claims released for a stored user.
    pub fn extract_for_user<I, S>(&self, scopes: I, user: &UserRecord) -> Claims
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extract(scopes, &user.attributes)
    }

    /// Returns the claim set bound to a scope.
    #[must_use]
    pub fn claim_set(&self, scope: &str) -> Option<&ClaimSet> {
        self.claim_sets.get(scope)
    }

    /// Returns the effective translation table.
    #[must_use]
    pub fn translation_table(&self) -> &TranslationTable {
        &self.table
    }

    /// Returns `true` if the claim keeps all matched values.
    #[must_use]
    pub fn is_multi_valued(&self, claim: &str) -> bool {
        self.multi_value.is_multi_valued(claim)
    }
}

/// Builder for [`ClaimTranslatorExtractor`].
///
/// Claim-set conflicts surface from [`ClaimExtractorBuilder::build`], never
/// from extraction.
#[derive(Debug, Clone)]
pub struct ClaimExtractorBuilder {
    table: TranslationTable,
    multi_value: MultiValuePolicy,
    claim_sets: Vec<ClaimSet>,
}

impl Default for ClaimExtractorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimExtractorBuilder {
    /// Creates a builder with the built-in table and no extra claim sets.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: TranslationTable::builtin(),
            multi_value: MultiValuePolicy::new(),
            claim_sets: Vec::new(),
        }
    }

    /// Replaces the translation table.
    #[must_use]
    pub fn with_translation_table(mut self, table: TranslationTable) -> Self {
        self.table = table;
        self
    }

    /// Sets the source list for one claim, overriding the built-in entry.
    #[must_use]
    pub fn with_translation(
        mut self,
        claim: impl Into<String>,
        sources: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.table.insert(claim, sources);
        self
    }

    /// Marks a claim as multi-valued.
    #[must_use]
    pub fn with_multi_valued_claim(mut self, claim: impl Into<String>) -> Self {
        self.multi_value.allow(claim);
        self
    }

    /// Adds a caller-defined claim set.
    #[must_use]
    pub fn with_claim_set(mut self, set: ClaimSet) -> Self {
        self.claim_sets.push(set);
        self
    }

    /// Builds the extractor.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReservedClaimSet` if a set is named `openid`
    /// and `ConfigError::DuplicateClaimSet` if two sets share a name or a
    /// set reuses a standard scope name.
    pub fn build(self) -> Result<ClaimTranslatorExtractor, ConfigError> {
        let mut claim_sets = ClaimSetRegistry::with_standard_sets();
        for set in self.claim_sets {
            claim_sets.register(set)?;
        }

        Ok(ClaimTranslatorExtractor {
            table: self.table,
            multi_value: self.multi_value,
            claim_sets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrivateScopeConfig;
    use crate::types::ClaimValue;

    fn single(value: &str) -> ClaimValue {
        ClaimValue::from(value)
    }

    #[test]
    fn test_openid_profile_scenario() {
        let extractor = ClaimTranslatorExtractor::default();
        let attrs = SourceAttributes::new()
            .with("eduPersonPrincipalName", ["u1@example.org"])
            .with("cn", ["User One"])
            .with("sn", ["One"]);

        let claims = extractor.extract(["openid", "profile"], &attrs);

        let mut expected = Claims::new();
        expected.insert("sub".to_string(), single("u1@example.org"));
        expected.insert("name".to_string(), single("User One"));
        expected.insert("family_name".to_string(), single("One"));
        assert_eq!(claims, expected);
    }

    #[test]
    fn test_unrequested_scopes_are_filtered() {
        let extractor = ClaimTranslatorExtractor::default();
        let attrs = SourceAttributes::new()
            .with("uid", ["u1"])
            .with("eduPersonPrincipalName", ["u1@example.org"])
            .with("mail", ["u1@example.org"])
            .with("cn", ["User One"]);

        let claims = extractor.extract(["openid"], &attrs);
        assert_eq!(claims.len(), 1);
        assert_eq!(claims["sub"], single("u1@example.org"));

        let claims = extractor.extract(["email"], &attrs);
        assert_eq!(claims.len(), 1);
        assert_eq!(claims["email"], single("u1@example.org"));
        assert!(!claims.contains_key("sub"));
    }

    #[test]
    fn test_claims_without_claim_set_are_dropped() {
        let extractor = ClaimTranslatorExtractor::builder()
            .with_translation("orphan", ["uid"])
            .build()
            .unwrap();
        let attrs = SourceAttributes::new().with("uid", ["u1"]);

        let translated = extractor.translate(&attrs);
        assert!(translated.contains_key("orphan"));

        let claims = extractor.extract(["openid", "profile", "email", "address", "phone"], &attrs);
        assert!(!claims.contains_key("orphan"));
        assert_eq!(claims["preferred_username"], single("u1"));
    }

    #[test]
    fn test_unknown_and_empty_scopes() {
        let extractor = ClaimTranslatorExtractor::default();
        let attrs = SourceAttributes::new().with("eduPersonPrincipalName", ["u1"]);

        assert!(extractor.extract(["unknown"], &attrs).is_empty());
        assert!(extractor.extract(Vec::<String>::new(), &attrs).is_empty());
    }

    #[test]
    fn test_empty_attributes_never_fail() {
        let extractor = ClaimTranslatorExtractor::default();
        let claims = extractor.extract(["openid", "profile"], &SourceAttributes::new());
        assert!(claims.is_empty());
    }

    #[test]
    fn test_custom_claim_set_and_multi_value() {
        let extractor = ClaimTranslatorExtractor::builder()
            .with_translation("affiliation", ["eduPersonAffiliation"])
            .with_multi_valued_claim("affiliation")
            .with_claim_set(ClaimSet::new("eduperson", ["affiliation"]))
            .build()
            .unwrap();
        let attrs = SourceAttributes::new()
            .with("eduPersonAffiliation", ["member", "staff", "employee"])
            .with("eduPersonPrincipalName", ["u1@example.org"]);

        let claims = extractor.extract(["openid", "eduperson"], &attrs);
        assert_eq!(
            claims["affiliation"],
            ClaimValue::Multiple(vec![
                "member".to_string(),
                "staff".to_string(),
                "employee".to_string()
            ])
        );
        assert_eq!(claims["sub"], single("u1@example.org"));
    }

    #[test]
    fn test_build_rejects_reserved_openid_set() {
        let err = ClaimTranslatorExtractor::builder()
            .with_claim_set(ClaimSet::new("openid", ["sub", "email"]))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ReservedClaimSet(_)));
    }

    #[test]
    fn test_build_rejects_duplicate_sets() {
        let err = ClaimTranslatorExtractor::builder()
            .with_claim_set(ClaimSet::new("custom", ["a"]))
            .with_claim_set(ClaimSet::new("custom", ["b"]))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateClaimSet(_)));
    }

    #[test]
    fn test_from_config_private_scope() {
        let mut config = BridgeConfig::default();
        config.translate.insert("sub".to_string(), vec!["uid".to_string()]);
        config.scopes.insert(
            "eduperson".to_string(),
            PrivateScopeConfig::new(vec!["eduPersonAffiliation", "eduPersonEntitlement"])
                .with_claim_name_prefix("ep_")
                .with_multiple_values(true),
        );

        let extractor = ClaimTranslatorExtractor::from_config(&config).unwrap();
        assert_eq!(
            extractor.translation_table().sources("ep_eduPersonAffiliation"),
            Some(&["eduPersonAffiliation".to_string()][..])
        );
        assert!(extractor.is_multi_valued("ep_eduPersonEntitlement"));
        assert!(extractor.claim_set("eduperson").unwrap().contains("ep_eduPersonAffiliation"));

        let attrs = SourceAttributes::new()
            .with("uid", ["u1"])
            .with("eduPersonAffiliation", ["member", "staff"]);
        let claims = extractor.extract(["openid", "eduperson"], &attrs);
        assert_eq!(claims["sub"], single("u1"));
        assert_eq!(
            claims["ep_eduPersonAffiliation"],
            ClaimValue::Multiple(vec!["member".to_string(), "staff".to_string()])
        );
        assert!(!claims.contains_key("ep_eduPersonEntitlement"));
    }

    #[test]
    fn test_from_config_multi_valued_claims() {
        let config = BridgeConfig {
            multi_valued_claims: vec!["email".to_string()],
            ..Default::default()
        };

        let extractor = ClaimTranslatorExtractor::from_config(&config).unwrap();
        assert!(extractor.is_multi_valued("email"));
        assert!(!extractor.is_multi_valued("name"));

        let attrs = SourceAttributes::new()
            .with("uid", ["u1"])
            .with("mail", ["first@example.org", "second@example.org"])
            .with("cn", ["User One", "U. One"]);
        let claims = extractor.extract(["openid", "email", "profile"], &attrs);
        assert_eq!(
            claims["email"],
            ClaimValue::Multiple(vec![
                "first@example.org".to_string(),
                "second@example.org".to_string()
            ])
        );
        assert_eq!(claims["name"], single("User One"));
    }

    #[test]
    fn test_from_config_private_scope_keeps_existing_translation() {
        let mut config = BridgeConfig::default();
        config
            .translate
            .insert("affiliation".to_string(), vec!["eduPersonScopedAffiliation".to_string()]);
        config.scopes.insert(
            "eduperson".to_string(),
            PrivateScopeConfig::new(vec!["affiliation"]),
        );

        let extractor = ClaimTranslatorExtractor::from_config(&config).unwrap();
        assert_eq!(
            extractor.translation_table().sources("affiliation"),
            Some(&["eduPersonScopedAffiliation".to_string()][..])
        );
        assert!(!extractor.is_multi_valued("affiliation"));
    }

    #[test]
    fn test_extractor_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ClaimTranslatorExtractor>();

        let extractor = std::sync::Arc::new(ClaimTranslatorExtractor::default());
        let attrs = SourceAttributes::new().with("eduPersonPrincipalName", ["u1"]);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let extractor = extractor.clone();
                let attrs = attrs.clone();
                std::thread::spawn(move || extractor.extract(["openid"], &attrs))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap()["sub"], single("u1"));
        }
    }
}
