//! User reconciliation for bridged authentication.
//!
//! This module provides [`UserReconciliation`], which maps an identified
//! user and the attributes released at login onto the persisted
//! [`UserRecord`].
//!
//! # Overview
//!
//! 1. **Find by id** - Look up the record keyed by the user identifier
//! 2. **Create** - Persist a new record on first sight
//! 3. **Replace** - Otherwise overwrite the stored attributes wholesale
//!
//! The lookup and the write are separate storage calls. Two concurrent
//! attempts for the same identifier may both observe an absent record;
//! the storage accepts one create and the other attempt falls back to an
//! update. Updates are last-write-wins.
//!
//! # Example
//!
//! ```ignore
//! use oidc_bridge::federation::UserReconciliation;
//!
//! let reconciliation = UserReconciliation::new(user_storage);
//! let user = reconciliation.reconcile("u1@example.org", attributes).await?;
//! println!("User {} reconciled", user.id);
//! ```

use std::sync::Arc;

use crate::AuthResult;
use crate::storage::{UserRecord, UserStorage};
use crate::types::SourceAttributes;

/// The action taken during reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    /// A new record was created.
    Created,

    /// An existing record's attributes were replaced.
    Updated,
}

impl std::fmt::Display for ReconcileAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Updated => write!(f, "updated"),
        }
    }
}

/// Keeps persisted user records in step with released attributes.
#[derive(Clone)]
pub struct UserReconciliation {
    users: Arc<dyn UserStorage>,
}

impl UserReconciliation {
    /// Creates a reconciliation service over `users`.
    #[must_use]
    pub fn new(users: Arc<dyn UserStorage>) -> Self {
        Self { users }
    }

    /// Creates or updates the record for `user_id`.
    ///
    /// # Errors
    ///
    /// Propagates storage errors. A create rejected because another attempt
    /// created the same identifier in between is retried as an update.
    pub async fn reconcile(
        &self,
        user_id: &str,
        attributes: SourceAttributes,
    ) -> AuthResult<UserRecord> {
        let (user, action) = self.reconcile_with_action(user_id, attributes).await?;
        tracing::info!(user_id = %user.id, action = %action, "User reconciled");
        Ok(user)
    }

    /// Like [`UserReconciliation::reconcile`], also reporting whether the
    /// record was created or updated.
    ///
    /// # Errors
    ///
    /// Propagates storage errors.
    pub async fn reconcile_with_action(
        &self,
        user_id: &str,
        attributes: SourceAttributes,
    ) -> AuthResult<(UserRecord, ReconcileAction)> {
        match self.users.find_by_id(user_id).await? {
            Some(mut user) => {
                user.replace_attributes(attributes);
                self.users.update(&user).await?;
                Ok((user, ReconcileAction::Updated))
            }
            None => {
                let user = UserRecord::new(user_id, attributes);
                match self.users.create(&user).await {
                    Ok(()) => Ok((user, ReconcileAction::Created)),
                    Err(create_err) => {
                        // Another attempt may have created the record since the lookup.
                        let Some(mut existing) = self.users.find_by_id(user_id).await? else {
                            return Err(create_err);
                        };
                        tracing::debug!(
                            user_id = %user_id,
                            error = %create_err,
                            "User created concurrently, updating instead"
                        );
                        existing.replace_attributes(user.attributes);
                        self.users.update(&existing).await?;
                        Ok((existing, ReconcileAction::Updated))
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for UserReconciliation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserReconciliation").finish_non_exhaustive()
    }
}
