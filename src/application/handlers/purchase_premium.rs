//! PurchasePremiumHandler - Command handler for the paid upgrade flow.

use std::sync::Arc;

use tracing::info;

use crate::application::TierStore;
use crate::domain::entitlement::{EntitlementError, Tier};
use crate::domain::foundation::UserId;
use crate::ports::{PaymentGateway, PurchaseReceipt, PurchaseRequest};

/// Command to buy the premium tier.
#[derive(Debug, Clone)]
pub struct PurchasePremiumCommand {
    pub user_id: UserId,
    /// Forwarded to the gateway so a retried purchase is not charged twice.
    pub idempotency_key: Option<String>,
}

/// Result of a completed upgrade.
#[derive(Debug, Clone)]
pub struct PurchasePremiumResult {
    /// Tier after the command.
    pub tier: Tier,
    /// `None` when the user already had a paid tier and nothing was bought.
    pub receipt: Option<PurchaseReceipt>,
}

/// Handler for the purchase-then-upgrade flow.
///
/// The purchase step is opaque: it either resolves, after which the tier is
/// upgraded, or rejects, in which case the tier is left unchanged.
pub struct PurchasePremiumHandler {
    tiers: TierStore,
    payments: Arc<dyn PaymentGateway>,
}

impl PurchasePremiumHandler {
    pub fn new(tiers: TierStore, payments: Arc<dyn PaymentGateway>) -> Self {
        Self { tiers, payments }
    }

    pub async fn handle(
        &self,
        cmd: PurchasePremiumCommand,
    ) -> Result<PurchasePremiumResult, EntitlementError> {
        // 1. Users on a paid tier have nothing to buy; admin must not be
        //    downgraded to premium. An unreadable tier aborts before any
        //    charge; a missing or corrupt one counts as free.
        let current = match self.tiers.load_checked(&cmd.user_id).await {
            Ok(tier) => tier.unwrap_or_default(),
            Err(EntitlementError::StorageCorrupt { .. }) => Tier::Free,
            Err(e) => return Err(e),
        };
        if current.is_paid() {
            return Ok(PurchasePremiumResult {
                tier: current,
                receipt: None,
            });
        }

        // 2. Opaque purchase step
        let receipt = self
            .payments
            .purchase(PurchaseRequest {
                user_id: cmd.user_id.clone(),
                tier: Tier::Premium,
                idempotency_key: cmd.idempotency_key,
            })
            .await
            .map_err(|e| EntitlementError::payment_failed(e.message))?;

        // 3. Upgrade only after the purchase resolved
        self.tiers.upgrade(&cmd.user_id).await?;

        info!(
            user_id = %cmd.user_id,
            receipt_id = %receipt.receipt_id,
            "Premium purchased"
        );

        Ok(PurchasePremiumResult {
            tier: Tier::Premium,
            receipt: Some(receipt),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryKeyValueStore, MockPaymentGateway};
    use crate::ports::{KeyValueStore, PaymentError};

    fn alice() -> UserId {
        UserId::new("alice@example.com").unwrap()
    }

    fn handler(gateway: MockPaymentGateway) -> (TierStore, PurchasePremiumHandler) {
        handler_on(InMemoryKeyValueStore::new(), gateway)
    }

    fn handler_on(
        kv: InMemoryKeyValueStore,
        gateway: MockPaymentGateway,
    ) -> (TierStore, PurchasePremiumHandler) {
        let tiers = TierStore::new(Arc::new(kv));
        let handler = PurchasePremiumHandler::new(tiers.clone(), Arc::new(gateway));
        (tiers, handler)
    }

    fn command() -> PurchasePremiumCommand {
        PurchasePremiumCommand {
            user_id: alice(),
            idempotency_key: Some("upgrade-alice".to_string()),
        }
    }

    #[tokio::test]
    async fn approved_purchase_upgrades() {
        let gateway = MockPaymentGateway::new();
        let (tiers, handler) = handler(gateway.clone());

        let result = handler.handle(command()).await.unwrap();

        assert_eq!(result.tier, Tier::Premium);
        assert!(result.receipt.is_some());
        assert_eq!(tiers.load(Some(&alice())).await, Tier::Premium);
        assert_eq!(
            gateway.calls()[0].idempotency_key.as_deref(),
            Some("upgrade-alice")
        );
    }

    #[tokio::test]
    async fn declined_purchase_leaves_tier_unchanged() {
        let (tiers, handler) = handler(MockPaymentGateway::declining("card expired"));

        let err = handler.handle(command()).await.unwrap_err();

        assert_eq!(err, EntitlementError::payment_failed("card expired"));
        assert_eq!(tiers.load(Some(&alice())).await, Tier::Free);
    }

    #[tokio::test]
    async fn cancelled_purchase_is_a_payment_failure() {
        let gateway = MockPaymentGateway::new();
        gateway.set_error(PaymentError::cancelled());
        let (tiers, handler) = handler(gateway);

        let err = handler.handle(command()).await.unwrap_err();

        assert!(matches!(err, EntitlementError::PaymentFailed { .. }));
        assert_eq!(tiers.load(Some(&alice())).await, Tier::Free);
    }

    #[tokio::test]
    async fn paid_user_is_not_charged_again() {
        let gateway = MockPaymentGateway::new();
        let (tiers, handler) = handler(gateway.clone());
        tiers.set_tier(&alice(), Tier::Admin).await.unwrap();

        let result = handler.handle(command()).await.unwrap();

        assert_eq!(result.tier, Tier::Admin);
        assert!(result.receipt.is_none());
        assert_eq!(gateway.call_count(), 0);
        assert_eq!(tiers.load(Some(&alice())).await, Tier::Admin);
    }

    #[tokio::test]
    async fn unreadable_tier_aborts_before_charging() {
        let kv = InMemoryKeyValueStore::new();
        let gateway = MockPaymentGateway::new();
        let (tiers, handler) = handler_on(kv.clone(), gateway.clone());
        tiers.set_tier(&alice(), Tier::Admin).await.unwrap();
        kv.set_unavailable(true).await;

        let err = handler.handle(command()).await.unwrap_err();

        assert!(matches!(err, EntitlementError::StorageUnavailable(_)));
        assert_eq!(gateway.call_count(), 0);

        kv.set_unavailable(false).await;
        assert_eq!(tiers.load(Some(&alice())).await, Tier::Admin);
    }

    #[tokio::test]
    async fn corrupt_tier_is_treated_as_free() {
        let kv = InMemoryKeyValueStore::new();
        let gateway = MockPaymentGateway::new();
        let (tiers, handler) = handler_on(kv.clone(), gateway.clone());
        kv.set("tier:alice@example.com", "platinum").await.unwrap();

        let result = handler.handle(command()).await.unwrap();

        assert_eq!(result.tier, Tier::Premium);
        assert_eq!(gateway.call_count(), 1);
        assert_eq!(tiers.load(Some(&alice())).await, Tier::Premium);
    }
}
