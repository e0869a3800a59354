//! UserSession - Session-scoped entitlement and sync state.
//!
//! Created when a user session starts and consumed on sign-out. Everything
//! a UI collaborator needs goes through here: the current tier and its
//! feature flags, tier mutations, the purchase flow and synchronization.
//!
//! # Example
//!
//! ```ignore
//! let session = UserSession::start(Some(user_id), deps).await;
//! if session.features().cloud_sync() {
//!     session.sync().await?;
//! }
//! session.sign_out();
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::application::handlers::{
    PurchasePremiumCommand, PurchasePremiumHandler, PurchasePremiumResult,
};
use crate::application::{SyncEngine, TierStore, DEFAULT_LOCAL_KEY_PREFIX};
use crate::domain::entitlement::{
    check_feature, check_operator_console, resolve, AccessResult, EntitlementError, Feature,
    FeatureFlags, Tier,
};
use crate::domain::foundation::UserId;
use crate::domain::sync::{SyncError, SyncState};
use crate::ports::{KeyValueStore, PaymentGateway, RemoteStore};

/// Tuning for a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// When set, `sync()` gives up waiting after this long.
    pub sync_timeout: Option<Duration>,
    /// Prefix of the local sync payload key.
    pub local_key_prefix: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            sync_timeout: None,
            local_key_prefix: DEFAULT_LOCAL_KEY_PREFIX.to_string(),
        }
    }
}

/// Capabilities a session is built from.
#[derive(Clone)]
pub struct SessionDeps {
    pub storage: Arc<dyn KeyValueStore>,
    pub remote: Arc<dyn RemoteStore>,
    pub payments: Arc<dyn PaymentGateway>,
    pub options: SessionOptions,
}

/// Per-user session state.
pub struct UserSession {
    identity: Option<UserId>,
    tiers: TierStore,
    /// `None` while the tier is loading.
    tier: watch::Sender<Option<Tier>>,
    engine: Option<Arc<SyncEngine>>,
    purchases: PurchasePremiumHandler,
    sync_timeout: Option<Duration>,
}

impl UserSession {
    /// Creates a session whose tier has not been loaded yet.
    ///
    /// Until [`refresh`](Self::refresh) completes the session reports
    /// `is_loading() == true` and the least-privileged feature set.
    pub fn new(identity: Option<UserId>, deps: SessionDeps) -> Self {
        let tiers = TierStore::new(Arc::clone(&deps.storage));
        let engine = identity.as_ref().map(|owner| {
            Arc::new(SyncEngine::with_key_prefix(
                owner.clone(),
                Arc::clone(&deps.storage),
                Arc::clone(&deps.remote),
                &deps.options.local_key_prefix,
            ))
        });
        let purchases = PurchasePremiumHandler::new(tiers.clone(), deps.payments);
        let (tier, _) = watch::channel(None);

        Self {
            identity,
            tiers,
            tier,
            engine,
            purchases,
            sync_timeout: deps.options.sync_timeout,
        }
    }

    /// Creates a session and loads its tier.
    pub async fn start(identity: Option<UserId>, deps: SessionDeps) -> Self {
        let session = Self::new(identity, deps);
        session.refresh().await;
        info!(
            user_id = ?session.identity.as_ref().map(UserId::as_str),
            tier = %session.current_tier(),
            "Session started"
        );
        session
    }

    /// Ends the session. Subscribers observe `free` before the channel closes.
    pub fn sign_out(self) {
        self.tier.send_replace(Some(Tier::Free));
        info!(
            user_id = ?self.identity.as_ref().map(UserId::as_str),
            "Session ended"
        );
    }

    /// Reloads the tier from storage and publishes it.
    pub async fn refresh(&self) -> Tier {
        let tier = self.tiers.load(self.identity.as_ref()).await;
        self.tier.send_replace(Some(tier));
        tier
    }

    // ════════════════════════════════════════════════════════════════════════
    // Entitlements
    // ════════════════════════════════════════════════════════════════════════

    pub fn identity(&self) -> Option<&UserId> {
        self.identity.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.tier.borrow().is_none()
    }

    /// The current tier; `free` while loading.
    pub fn current_tier(&self) -> Tier {
        self.tier.borrow().unwrap_or_default()
    }

    /// Flags for the current tier.
    pub fn features(&self) -> FeatureFlags {
        resolve(self.current_tier())
    }

    /// Flags for the current tier, or `None` while loading.
    pub fn loaded_features(&self) -> Option<FeatureFlags> {
        self.tier.borrow().map(resolve)
    }

    /// Receiver that observes every tier change. `None` means loading.
    pub fn subscribe_tier(&self) -> watch::Receiver<Option<Tier>> {
        self.tier.subscribe()
    }

    pub fn check_feature(&self, feature: Feature) -> AccessResult {
        check_feature(self.signed_in_tier(), feature)
    }

    pub fn check_operator_console(&self) -> AccessResult {
        check_operator_console(self.signed_in_tier())
    }

    pub async fn upgrade(&self) -> Result<(), EntitlementError> {
        self.set_tier(Tier::Premium).await
    }

    pub async fn downgrade(&self) -> Result<(), EntitlementError> {
        self.set_tier(Tier::Free).await
    }

    /// Persists `tier` and publishes it on success.
    pub async fn set_tier(&self, tier: Tier) -> Result<(), EntitlementError> {
        let user_id = self.require_identity()?;
        self.tiers.set_tier(user_id, tier).await?;
        self.tier.send_replace(Some(tier));
        Ok(())
    }

    /// Runs the opaque purchase step, then upgrades.
    ///
    /// A rejected purchase leaves the tier unchanged.
    pub async fn purchase_premium(
        &self,
        idempotency_key: Option<String>,
    ) -> Result<PurchasePremiumResult, EntitlementError> {
        let user_id = self.require_identity()?;
        let result = self
            .purchases
            .handle(PurchasePremiumCommand {
                user_id: user_id.clone(),
                idempotency_key,
            })
            .await?;
        self.tier.send_replace(Some(result.tier));
        Ok(result)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Synchronization
    // ════════════════════════════════════════════════════════════════════════

    /// Current sync state; idle when signed out.
    pub fn sync_state(&self) -> SyncState {
        self.engine
            .as_ref()
            .map(|engine| engine.sync_state())
            .unwrap_or_default()
    }

    /// Receiver for sync state changes, if signed in.
    pub fn subscribe_sync(&self) -> Option<watch::Receiver<SyncState>> {
        self.engine.as_ref().map(|engine| engine.subscribe())
    }

    /// The engine behind `sync()`, for push/pull/clear and local records.
    pub fn sync_engine(&self) -> Option<&Arc<SyncEngine>> {
        self.engine.as_ref()
    }

    /// Runs a full sync.
    ///
    /// With a configured timeout the sync runs on its own task and this
    /// call stops waiting after the deadline, reporting a network error.
    /// The task keeps running and settles the sync state when it finishes.
    pub async fn sync(&self) -> Result<(), SyncError> {
        let engine = self.engine.as_ref().ok_or(SyncError::NotSignedIn)?;

        let Some(limit) = self.sync_timeout else {
            return engine.sync().await;
        };

        let engine = Arc::clone(engine);
        let task = tokio::spawn(async move { engine.sync().await });

        match tokio::time::timeout(limit, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => {
                warn!(error = %join_err, "Sync task failed");
                Err(SyncError::network(format!("sync task failed: {}", join_err)))
            }
            Err(_) => {
                debug!(timeout = ?limit, "Stopped waiting for sync");
                Err(SyncError::network(format!(
                    "sync timed out after {} ms",
                    limit.as_millis()
                )))
            }
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════

    fn require_identity(&self) -> Result<&UserId, EntitlementError> {
        self.identity.as_ref().ok_or(EntitlementError::NotSignedIn)
    }

    fn signed_in_tier(&self) -> Option<Tier> {
        self.identity.as_ref().map(|_| self.current_tier())
    }
}
