//! TierStore - Persists and loads a user's tier through the key-value port.
//!
//! Reads fail closed: absent, unreadable or corrupt values resolve to
//! `Tier::Free`. Writes surface storage failures to the caller.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::entitlement::{EntitlementError, Tier};
use crate::domain::foundation::UserId;
use crate::ports::KeyValueStore;

/// Key prefix for persisted tiers.
pub const TIER_KEY_PREFIX: &str = "tier:";

/// Owns the persisted tier for each user.
#[derive(Clone)]
pub struct TierStore {
    storage: Arc<dyn KeyValueStore>,
}

impl TierStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Storage key for `user_id`'s tier.
    pub fn key_for(user_id: &UserId) -> String {
        format!("{}{}", TIER_KEY_PREFIX, user_id)
    }

    /// Returns the tier for `user_id`, or `Tier::Free` on any doubt.
    ///
    /// With no user, storage is not touched.
    pub async fn load(&self, user_id: Option<&UserId>) -> Tier {
        let Some(user_id) = user_id else {
            return Tier::Free;
        };

        match self.load_checked(user_id).await {
            Ok(Some(tier)) => tier,
            Ok(None) => Tier::Free,
            Err(err) => {
                warn!(user_id = %user_id, error = %err, "Falling back to free tier");
                Tier::Free
            }
        }
    }

    /// Reads the stored tier without the fail-closed fallback.
    ///
    /// # Errors
    ///
    /// - `StorageCorrupt` if the stored value is not a known tier
    /// - `StorageUnavailable` if the storage read failed
    pub async fn load_checked(&self, user_id: &UserId) -> Result<Option<Tier>, EntitlementError> {
        let key = Self::key_for(user_id);
        let raw = self
            .storage
            .get(&key)
            .await
            .map_err(|e| EntitlementError::storage_unavailable(e.to_string()))?;

        match raw {
            None => Ok(None),
            Some(value) => value
                .parse::<Tier>()
                .map(Some)
                .map_err(|_| EntitlementError::storage_corrupt(key, value)),
        }
    }

    /// Persists `tier` for `user_id`. Last write wins.
    pub async fn set_tier(&self, user_id: &UserId, tier: Tier) -> Result<(), EntitlementError> {
        self.storage
            .set(&Self::key_for(user_id), tier.as_str())
            .await
            .map_err(|e| EntitlementError::storage_unavailable(e.to_string()))?;

        info!(user_id = %user_id, tier = %tier, "Tier updated");
        Ok(())
    }

    /// Parses `name` and persists it. An unknown name is rejected before
    /// storage is touched, so the previous tier stays in place.
    pub async fn set_tier_named(
        &self,
        user_id: &UserId,
        name: &str,
    ) -> Result<Tier, EntitlementError> {
        let tier: Tier = name.parse()?;
        self.set_tier(user_id, tier).await?;
        Ok(tier)
    }

    pub async fn upgrade(&self, user_id: &UserId) -> Result<(), EntitlementError> {
        self.set_tier(user_id, Tier::Premium).await
    }

    pub async fn downgrade(&self, user_id: &UserId) -> Result<(), EntitlementError> {
        self.set_tier(user_id, Tier::Free).await
    }
}
