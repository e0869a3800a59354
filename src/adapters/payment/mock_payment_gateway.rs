//! Mock payment gateway.
//!
//! Stands in for the external checkout. Approves every purchase unless an
//! error has been injected. Supports:
//! - Error injection (next call, or every call)
//! - Simulated latency
//! - Idempotent replays keyed by `idempotency_key`
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::foundation::{ReceiptId, Timestamp};
use crate::ports::{PaymentError, PaymentGateway, PurchaseReceipt, PurchaseRequest};

/// Mock payment gateway.
///
/// # Example
///
/// ```ignore
/// let gateway = MockPaymentGateway::new();
/// gateway.set_error(PaymentError::card_declined("Test decline"));
///
/// let result = gateway.purchase(request).await;
/// assert!(result.is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockPaymentGateway {
    inner: Arc<Mutex<MockState>>,
    delay: Duration,
}

#[derive(Debug, Default)]
struct MockState {
    /// Error to return on the next purchase.
    next_error: Option<PaymentError>,

    /// Error returned on every purchase until cleared.
    persistent_error: Option<PaymentError>,

    /// Receipts already issued, by idempotency key.
    receipts: HashMap<String, PurchaseReceipt>,

    /// Requests in call order.
    call_log: Vec<PurchaseRequest>,
}

impl MockPaymentGateway {
    /// Create a gateway that approves every purchase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a gateway that declines every purchase.
    pub fn declining(reason: impl Into<String>) -> Self {
        let gateway = Self::new();
        gateway.state().persistent_error = Some(PaymentError::card_declined(reason));
        gateway
    }

    /// Simulated latency per purchase.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set an error to return on the next purchase only.
    pub fn set_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.next_error = None;
        state.persistent_error = None;
    }

    /// All purchase requests received.
    pub fn calls(&self) -> Vec<PurchaseRequest> {
        self.state().call_log.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state().call_log.len()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn purchase(&self, request: PurchaseRequest) -> Result<PurchaseReceipt, PaymentError> {
        self.state().call_log.push(request.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let mut state = self.state();
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        if let Some(error) = &state.persistent_error {
            return Err(error.clone());
        }

        if let Some(key) = &request.idempotency_key {
            if let Some(receipt) = state.receipts.get(key) {
                return Ok(receipt.clone());
            }
        }

        let receipt = PurchaseReceipt {
            receipt_id: ReceiptId::new(),
            user_id: request.user_id.clone(),
            tier: request.tier,
            purchased_at: Timestamp::now(),
        };
        if let Some(key) = request.idempotency_key {
            state.receipts.insert(key, receipt.clone());
        }
        Ok(receipt)
    }
}
