//! Attribute-release processing.
//!
//! After the upstream session is established the assembled
//! [`AuthenticationState`] passes through an [`AttributeProcessor`], which
//! may enrich, filter, or rename attributes, or reject the attempt.
//!
//! [`ProcessingChain`] is the built-in processor: an ordered list of
//! [`AttributeFilter`]s run by ascending priority.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;

use crate::AuthResult;

use super::state::AuthenticationState;

/// Priority assigned to built-in filters unless overridden.
pub const DEFAULT_FILTER_PRIORITY: i32 = 50;

// =============================================================================
// Traits
// =============================================================================

/// Runs attribute-release policies over an authentication state.
#[async_trait]
pub trait AttributeProcessor: Send + Sync {
    /// Processes the state and returns the resulting state.
    ///
    /// # Errors
    ///
    /// Returns an error if a policy rejects the attempt.
    async fn process_state(&self, state: AuthenticationState) -> AuthResult<AuthenticationState>;
}

/// A single step of a [`ProcessingChain`].
#[async_trait]
pub trait AttributeFilter: Send + Sync {
    /// Lower priorities run first.
    fn priority(&self) -> i32 {
        DEFAULT_FILTER_PRIORITY
    }

    /// Applies the filter in place.
    ///
    /// # Errors
    ///
    /// Returns an error to abort the attempt.
    async fn process(&self, state: &mut AuthenticationState) -> AuthResult<()>;
}

// =============================================================================
// Processing Chain
// =============================================================================

/// Ordered list of attribute filters.
///
/// Filters with equal priority run in the order they were added.
#[derive(Default, Clone)]
pub struct ProcessingChain {
    filters: Vec<Arc<dyn AttributeFilter>>,
}

impl ProcessingChain {
    /// Creates an empty chain, which passes state through unchanged.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a filter, keeping the chain sorted by priority.
    pub fn push(&mut self, filter: Arc<dyn AttributeFilter>) {
        self.filters.push(filter);
        self.filters.sort_by_key(|f| f.priority());
    }

    /// Builder form of [`ProcessingChain::push`].
    #[must_use]
    pub fn with_filter(mut self, filter: Arc<dyn AttributeFilter>) -> Self {
        self.push(filter);
        self
    }

    /// Returns the number of filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns `true` if the chain has no filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl std::fmt::Debug for ProcessingChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessingChain")
            .field(
                "priorities",
                &self.filters.iter().map(|f| f.priority()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[async_trait]
impl AttributeProcessor for ProcessingChain {
    async fn process_state(
        &self,
        mut state: AuthenticationState,
    ) -> AuthResult<AuthenticationState> {
        for filter in &self.filters {
            filter.process(&mut state).await?;
        }
        Ok(state)
    }
}

// =============================================================================
// Built-in Filters
// =============================================================================

/// Releases only the listed attributes.
#[derive(Debug, Clone)]
pub struct AttributeLimit {
    allowed: HashSet<String>,
    priority: i32,
}

impl AttributeLimit {
    /// Creates a limit releasing only `allowed`.
    #[must_use]
    pub fn new(allowed: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
            priority: DEFAULT_FILTER_PRIORITY,
        }
    }

    /// Sets the filter priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

#[async_trait]
impl AttributeFilter for AttributeLimit {
    fn priority(&self) -> i32 {
        self.priority
    }

    async fn process(&self, state: &mut AuthenticationState) -> AuthResult<()> {
        state.attributes.retain(|name| self.allowed.contains(name));
        Ok(())
    }
}

/// Renames attributes, keeping their values.
///
/// A renamed attribute replaces any attribute already holding the target
/// name.
#[derive(Debug, Clone)]
pub struct AttributeRename {
    renames: IndexMap<String, String>,
    priority: i32,
}

impl AttributeRename {
    /// Creates an empty rename filter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            renames: IndexMap::new(),
            priority: DEFAULT_FILTER_PRIORITY,
        }
    }

    /// Adds a rename from `from` to `to`.
    #[must_use]
    pub fn with_rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.renames.insert(from.into(), to.into());
        self
    }

    /// Sets the filter priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl Default for AttributeRename {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AttributeFilter for AttributeRename {
    fn priority(&self) -> i32 {
        self.priority
    }

    async fn process(&self, state: &mut AuthenticationState) -> AuthResult<()> {
        for (from, to) in &self.renames {
            if let Some(values) = state.attributes.remove(from) {
                state.attributes.insert(to.clone(), values);
            }
        }
        Ok(())
    }
}
