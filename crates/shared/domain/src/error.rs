//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (HTTP, database).
//! Every message is meant to be shown to the end user as-is.

use thiserror::Error;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed for a field or input
    #[error("{0}")]
    Validation(String),

    /// Password-related errors
    #[error("{0}")]
    Password(String),

    /// Entity not found
    #[error("{0}")]
    NotFound(String),

    /// Entity already exists (conflict)
    #[error("{0}")]
    Conflict(String),

    /// No authenticated actor
    #[error("{0}")]
    Unauthenticated(String),

    /// Actor lacks the capability for this action
    #[error("{0}")]
    Forbidden(String),

    /// Invalid credentials provided
    #[error("{0}")]
    InvalidCredentials(String),

    /// Tier quota reached
    #[error("{0}")]
    QuotaExceeded(String),

    /// State machine refused the requested transition
    #[error("{0}")]
    IllegalTransition(String),

    /// Internal domain error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    /// Create a password error
    pub fn password(msg: impl Into<String>) -> Self {
        DomainError::Password(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        DomainError::NotFound(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        DomainError::Conflict(msg.into())
    }

    /// Create a forbidden error
    pub fn forbidden(msg: impl Into<String>) -> Self {
        DomainError::Forbidden(msg.into())
    }

    pub fn quota(msg: impl Into<String>) -> Self {
        DomainError::QuotaExceeded(msg.into())
    }

    pub fn illegal_transition(msg: impl Into<String>) -> Self {
        DomainError::IllegalTransition(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
