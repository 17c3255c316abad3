//! Error types for scope resolution

use thiserror::Error;

/// Scope resolution errors
///
/// Every variant aborts the modifier call that produced it. The access check
/// downstream must treat any of them as a deny.
#[derive(Debug, Error)]
pub enum AccessControlError {
    /// A registered keyword or attribute resolver failed
    #[error("could not resolve \"{scope}\": {source}")]
    Resolution {
        /// Scope or keyword that was being resolved
        scope: String,
        /// Underlying cause
        #[source]
        source: Box<AccessControlError>,
    },

    /// External store call failed
    #[error("Lookup failed: {0}")]
    Lookup(String),

    /// External store has no such resource
    #[error("Not found: {0}")]
    NotFound(String),

    /// Scope does not have the shape a resolver expects
    #[error("Invalid scope: {0}")]
    InvalidScope(String),

    /// The request context was cancelled while resolving
    #[error("Resolution cancelled")]
    Cancelled,

    /// The request deadline passed while resolving
    #[error("Resolution deadline exceeded")]
    DeadlineExceeded,

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl AccessControlError {
    /// Wrap a resolver failure with the scope it was resolving
    pub fn resolution(scope: impl Into<String>, source: AccessControlError) -> Self {
        Self::Resolution {
            scope: scope.into(),
            source: Box::new(source),
        }
    }

    /// Whether this error originates from an external store lookup
    pub fn is_lookup_failure(&self) -> bool {
        match self {
            Self::Lookup(_) | Self::NotFound(_) | Self::DatabaseError(_) => true,
            Self::Resolution { source, .. } => source.is_lookup_failure(),
            _ => false,
        }
    }

    /// Whether the request was aborted rather than a resolver failing
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

/// Result type for scope resolution
pub type Result<T> = std::result::Result<T, AccessControlError>;
