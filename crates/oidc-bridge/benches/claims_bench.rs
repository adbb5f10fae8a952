//! Performance benchmarks for attribute-to-claim extraction.
//!
//! Extraction runs once per issued token, so these benchmarks cover the
//! default table, private scopes, and attribute sets of realistic size.
//!
//! Run with: `cargo bench -p oidc-bridge claims`

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use oidc_bridge::claims::ClaimTranslatorExtractor;
use oidc_bridge::config::{BridgeConfig, PrivateScopeConfig};
use oidc_bridge::types::SourceAttributes;

/// Attributes a typical research-and-education IdP releases.
fn create_typical_attributes() -> SourceAttributes {
    SourceAttributes::new()
        .with("eduPersonPrincipalName", ["u1@example.org"])
        .with("uid", ["u1"])
        .with("cn", ["User One"])
        .with("sn", ["One"])
        .with("givenName", ["User"])
        .with("mail", ["u1@example.org", "user.one@example.org"])
        .with("preferredLanguage", ["en"])
        .with("telephoneNumber", ["+1 555 0100"])
        .with(
            "eduPersonAffiliation",
            ["member", "staff", "employee", "library-walk-in"],
        )
}

/// Attribute set padded with many attributes no claim consults.
fn create_large_attributes() -> SourceAttributes {
    let mut attributes = create_typical_attributes();
    for i in 0..200 {
        attributes.insert(format!("urn:oid:1.3.6.1.4.1.5923.1.1.1.{}", i), [format!("v{}", i)]);
    }
    attributes
}

fn create_private_scope_extractor() -> ClaimTranslatorExtractor {
    let mut config = BridgeConfig::default();
    config.scopes.insert(
        "eduperson".to_string(),
        PrivateScopeConfig::new(vec!["eduPersonAffiliation", "eduPersonEntitlement"])
            .with_claim_name_prefix("eduperson_")
            .with_multiple_values(true),
    );
    ClaimTranslatorExtractor::from_config(&config).unwrap()
}

fn bench_extractor_creation(c: &mut Criterion) {
    c.bench_function("claims_extractor_creation", |b| {
        b.iter(|| black_box(ClaimTranslatorExtractor::default()));
    });
}

fn bench_openid_only(c: &mut Criterion) {
    let extractor = ClaimTranslatorExtractor::default();
    let attributes = create_typical_attributes();

    c.bench_function("claims_openid_only", |b| {
        b.iter(|| black_box(extractor.extract(["openid"], &attributes)));
    });
}

fn bench_all_standard_scopes(c: &mut Criterion) {
    let extractor = ClaimTranslatorExtractor::default();
    let attributes = create_typical_attributes();

    c.bench_function("claims_all_standard_scopes", |b| {
        b.iter(|| {
            black_box(extractor.extract(
                ["openid", "profile", "email", "address", "phone"],
                &attributes,
            ))
        });
    });
}

fn bench_private_scope(c: &mut Criterion) {
    let extractor = create_private_scope_extractor();
    let attributes = create_typical_attributes();

    c.bench_function("claims_private_scope", |b| {
        b.iter(|| black_box(extractor.extract(["openid", "eduperson"], &attributes)));
    });
}

fn bench_large_attribute_set(c: &mut Criterion) {
    let extractor = ClaimTranslatorExtractor::default();
    let attributes = create_large_attributes();

    c.bench_function("claims_large_attribute_set", |b| {
        b.iter(|| black_box(extractor.extract(["openid", "profile", "email"], &attributes)));
    });
}

criterion_group!(
    benches,
    bench_extractor_creation,
    bench_openid_only,
    bench_all_standard_scopes,
    bench_private_scope,
    bench_large_attribute_set,
);
criterion_main!(benches);
