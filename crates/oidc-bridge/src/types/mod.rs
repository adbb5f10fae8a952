//! Common types used across the bridge modules.
//!
//! ## Domain Types
//!
//! - [`SourceAttributes`] - Attributes asserted by the upstream identity provider
//! - [`ClaimValue`] / [`Claims`] - Translated OpenID Connect claims
//! - [`Client`] - Relying party registration, consumed read-only

pub mod attributes;
pub mod client;

pub use attributes::{ClaimValue, Claims, SourceAttributes};
pub use client::{Client, ClientValidationError};
