//! Attribute-to-claim translation.
//!
//! - [`translation`] - Translation table and multi-value policy
//! - [`claim_set`] - Scope-bound claim sets
//! - [`extractor`] - Scope-filtered claim extraction

pub mod claim_set;
pub mod extractor;
pub mod translation;

pub use claim_set::{ClaimSet, ClaimSetRegistry, OPENID_SCOPE, STANDARD_SCOPES};
pub use extractor::{ClaimExtractorBuilder, ClaimTranslatorExtractor};
pub use translation::{MultiValuePolicy, TranslationTable};
