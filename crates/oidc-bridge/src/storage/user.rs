//! User storage trait.
//!
//! Defines the user record persisted after each successful authentication
//! and the interface for user persistence operations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::AuthResult;
use crate::types::SourceAttributes;

/// Default datetime value for deserialization when field is missing.
fn default_datetime() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

// =============================================================================
// User Record
// =============================================================================

/// A user known to the OpenID provider.
///
/// Keyed by the first value of the configured identifying attribute and
/// holding the attributes released at the most recent login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Stable user identifier.
    pub id: String,

    /// Attributes released at the most recent authentication.
    #[serde(default)]
    pub attributes: SourceAttributes,

    /// When the user was first seen.
    #[serde(default = "default_datetime", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// When the attributes were last replaced.
    #[serde(default = "default_datetime", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl UserRecord {
    /// Creates a record for a newly seen user.
    #[must_use]
    pub fn new(id: impl Into<String>, attributes: SourceAttributes) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: id.into(),
            attributes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the stored attributes wholesale.
    pub fn replace_attributes(&mut self, attributes: SourceAttributes) {
        self.attributes = attributes;
        self.updated_at = OffsetDateTime::now_utc();
    }
}

// =============================================================================
// User Storage Trait
// =============================================================================

/// Storage operations for users.
///
/// Implementations own their locking and transaction discipline; callers
/// issue a read followed by a create or update with no isolation between
/// the two.
///
/// # Example
///
/// ```ignore
/// use oidc_bridge::storage::UserStorage;
///
/// async fn example(storage: &impl UserStorage) -> AuthResult<()> {
///     if let Some(user) = storage.find_by_id("u1@example.org").await? {
///         println!("Last seen attributes: {:?}", user.attributes);
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Find a user by identifier.
    ///
    /// Returns `None` if the user doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_id(&self, user_id: &str) -> AuthResult<Option<UserRecord>>;

    /// Persist a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A user with the same identifier already exists
    /// - The storage operation fails
    async fn create(&self, user: &UserRecord) -> AuthResult<()>;

    /// Persist changes to an existing user.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The user doesn't exist
    /// - The storage operation fails
    async fn update(&self, user: &UserRecord) -> AuthResult<()>;

    /// Delete a user. Administrative operation, never called by the bridge.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The user doesn't exist
    /// - The storage operation fails
    async fn delete(&self, user_id: &str) -> AuthResult<()>;
}
