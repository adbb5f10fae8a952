//! Authentication bridge error types.
//!
//! This module defines all error types that can surface from an
//! authentication attempt, from service construction, or from the user
//! repository.

use std::fmt;

use crate::config::ConfigError;

/// Errors that can occur while bridging an external authentication into
/// an OIDC user record.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The bridge or one of its collaborators is misconfigured.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// The relying party could not be resolved from the request.
    #[error("Invalid client: {message}")]
    InvalidClient {
        /// Description of why the client is invalid.
        message: String,
    },

    /// The upstream mechanism could not establish or reuse a session, or
    /// the attribute-processing pipeline rejected the attempt.
    #[error("Authentication failed for source '{source_name}': {message}")]
    Authentication {
        /// The auth source that was used.
        source_name: String,
        /// Description of the failure.
        message: String,
    },

    /// The configured user-identifying attribute was not released.
    #[error(
        "Attribute '{attribute}' does not exist in the released attributes. Available attributes are: {}",
        available.join(", ")
    )]
    AttributeMissing {
        /// The configured identifying attribute.
        attribute: String,
        /// The attribute names that were present.
        available: Vec<String>,
    },

    /// An error occurred while storing or retrieving records.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidClient` error.
    #[must_use]
    pub fn invalid_client(message: impl Into<String>) -> Self {
        Self::InvalidClient {
            message: message.into(),
        }
    }

    /// Creates a new `Authentication` error.
    #[must_use]
    pub fn authentication(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Authentication {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Creates a new `AttributeMissing` error.
    #[must_use]
    pub fn attribute_missing(
        attribute: impl Into<String>,
        available: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self::AttributeMissing {
            attribute: attribute.into(),
            available: available.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this error should be rendered to the end user
    /// (typically as an error page) rather than treated as an outage.
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::InvalidClient { .. } | Self::Authentication { .. } | Self::AttributeMissing { .. }
        )
    }

    /// Returns `true` if this is a server-side error (5xx category).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::Storage { .. } | Self::Internal { .. }
        )
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::InvalidClient { .. } => ErrorCategory::Validation,
            Self::Authentication { .. } => ErrorCategory::Authentication,
            Self::AttributeMissing { .. } => ErrorCategory::Validation,
            Self::Storage { .. } => ErrorCategory::Infrastructure,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

impl From<ConfigError> for AuthError {
    fn from(err: ConfigError) -> Self {
        Self::configuration(err.to_string())
    }
}

/// Categories of bridge errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Missing or inconsistent configuration.
    Configuration,
    /// Upstream authentication failures.
    Authentication,
    /// Request or released-attribute validation errors.
    Validation,
    /// Infrastructure/storage errors.
    Infrastructure,
    /// Internal errors.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Authentication => write!(f, "authentication"),
            Self::Validation => write!(f, "validation"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Internal => write!(f, "internal"),
        }
    }
}
