//! Storage traits for bridge data.
//!
//! This module defines storage interfaces for:
//!
//! - Users reconciled after each authentication
//! - OIDC relying-party registrations
//!
//! # Implementations
//!
//! [`memory`] provides concurrent in-memory backends. Persistent backends
//! implement the same traits in their own crates.

pub mod client;
pub mod memory;
pub mod user;

pub use client::ClientStorage;
pub use memory::{MemoryClientStorage, MemoryUserStorage};
pub use user::{UserRecord, UserStorage};
