//! Unified error system for the memo service
//!
//! A single error type shared by the store, service and transport layers. The
//! visibility policy keeps its own narrow [`PolicyError`] so callers can match
//! on policy rejections without caring about storage failures.

use serde::{Deserialize, Serialize};

/// Errors raised by the visibility resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum PolicyError {
    /// An anonymous requester listed scoped memos without naming an owner.
    #[error("Missing user id to find memo")]
    AmbiguousOwner,
}

/// Unified error type for all memo operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum MemoError {
    /// Invalid input
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// Memo not found
    #[error("Not found: {message}")]
    NotFound {
        /// Error message describing what was not found
        message: String,
    },

    /// Operation requires an authenticated requester
    #[error("Unauthenticated: {message}")]
    Unauthenticated {
        /// Error message naming the guarded operation
        message: String,
    },

    /// Request rejected by the visibility policy
    #[error("Policy: {0}")]
    Policy(#[from] PolicyError),

    /// Storage operation failed
    #[error("Storage error: {message}")]
    Storage {
        /// Error message describing the storage failure
        message: String,
    },
}

impl MemoError {
    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an unauthenticated error
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Standard Result type for memo operations
pub type MemoResult<T> = std::result::Result<T, MemoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_error_converts_into_memo_error() {
        let err: MemoError = PolicyError::AmbiguousOwner.into();
        assert_eq!(err, MemoError::Policy(PolicyError::AmbiguousOwner));
        assert_eq!(err.to_string(), "Policy: Missing user id to find memo");
    }
}
