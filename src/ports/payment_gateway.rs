//! Payment gateway port for the opaque purchase step.
//!
//! The core does not process payments. It asks the gateway to complete a
//! purchase and only cares whether that resolved or rejected.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entitlement::Tier;
use crate::domain::foundation::{ReceiptId, Timestamp, UserId};

/// Port for the external purchase step of the upgrade flow.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Complete a purchase of `request.tier` for `request.user_id`.
    ///
    /// Implementations must be idempotent for a repeated `idempotency_key`.
    async fn purchase(&self, request: PurchaseRequest) -> Result<PurchaseReceipt, PaymentError>;
}

/// Request to buy a tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub user_id: UserId,
    pub tier: Tier,
    /// Idempotency key for safe retries.
    pub idempotency_key: Option<String>,
}

/// Proof of a completed purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub receipt_id: ReceiptId,
    pub user_id: UserId,
    pub tier: Tier,
    pub purchased_at: Timestamp,
}

/// Payment error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    CardDeclined,
    Cancelled,
    NetworkError,
    ProviderError,
}

impl PaymentErrorCode {
    /// Whether errors with this code can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError | PaymentErrorCode::ProviderError
        )
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::CardDeclined => "card_declined",
            PaymentErrorCode::Cancelled => "cancelled",
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}

/// Error returned by the payment gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code.is_retryable(),
        }
    }

    pub fn card_declined(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::CardDeclined, message)
    }

    pub fn cancelled() -> Self {
        Self::new(PaymentErrorCode::Cancelled, "Purchase cancelled by user")
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declines_are_not_retryable() {
        let err = PaymentError::card_declined("insufficient funds");
        assert!(!err.retryable);
        assert_eq!(err.to_string(), "card_declined: insufficient funds");
    }

    #[test]
    fn network_errors_are_retryable() {
        assert!(PaymentError::network("timeout").retryable);
    }

    #[test]
    fn cancelled_has_fixed_message() {
        assert_eq!(PaymentError::cancelled().code, PaymentErrorCode::Cancelled);
    }
}
