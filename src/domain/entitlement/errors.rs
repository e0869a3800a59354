//! Entitlement-specific error types.
//!
//! # Recovery Policy
//!
//! | Error | Handling |
//! |-------|----------|
//! | InvalidTier | Rejected, previous tier kept |
//! | StorageCorrupt | Treated as absent, falls back to free |
//! | StorageUnavailable | Surfaced on writes, falls back to free on reads |
//! | PaymentFailed | Surfaced, tier unchanged |
//! | NotSignedIn | Surfaced, nothing persisted |

use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors raised by tier resolution, persistence and upgrade flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntitlementError {
    /// A tier name outside `free | premium | admin`.
    InvalidTier(String),

    /// A persisted tier value that could not be interpreted.
    StorageCorrupt { key: String, value: String },

    /// The storage capability failed.
    StorageUnavailable(String),

    /// The external purchase step was rejected.
    PaymentFailed { reason: String },

    /// A mutation was attempted without an authenticated user.
    NotSignedIn,
}

impl EntitlementError {
    pub fn invalid_tier(tier: impl Into<String>) -> Self {
        EntitlementError::InvalidTier(tier.into())
    }

    pub fn storage_corrupt(key: impl Into<String>, value: impl Into<String>) -> Self {
        EntitlementError::StorageCorrupt {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        EntitlementError::StorageUnavailable(message.into())
    }

    pub fn payment_failed(reason: impl Into<String>) -> Self {
        EntitlementError::PaymentFailed {
            reason: reason.into(),
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EntitlementError::InvalidTier(_) => ErrorCode::InvalidTier,
            EntitlementError::StorageCorrupt { .. } => ErrorCode::StorageCorrupt,
            EntitlementError::StorageUnavailable(_) => ErrorCode::StorageUnavailable,
            EntitlementError::PaymentFailed { .. } => ErrorCode::PaymentFailed,
            EntitlementError::NotSignedIn => ErrorCode::NotSignedIn,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            EntitlementError::InvalidTier(tier) => format!("Invalid tier: '{}'", tier),
            EntitlementError::StorageCorrupt { key, value } => {
                format!("Stored value for '{}' is not a valid tier: '{}'", key, value)
            }
            EntitlementError::StorageUnavailable(msg) => format!("Storage unavailable: {}", msg),
            EntitlementError::PaymentFailed { reason } => format!("Payment failed: {}", reason),
            EntitlementError::NotSignedIn => "No user is signed in".to_string(),
        }
    }

    /// Returns true if the caller may retry the same operation.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EntitlementError::StorageUnavailable(_) | EntitlementError::PaymentFailed { .. }
        )
    }
}

impl std::fmt::Display for EntitlementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for EntitlementError {}

impl From<EntitlementError> for DomainError {
    fn from(err: EntitlementError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
