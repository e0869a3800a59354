//! Entitlement domain module.
//!
//! Maps a user's subscription tier to the product capabilities it unlocks.
//!
//! # Module Structure
//!
//! - `tier` - Tier subscription levels
//! - `feature_flags` - Feature flags and the `resolve` table
//! - `access` - Allow/deny decisions with reasons
//! - `gate` - Stateless rendering gate for presentation code
//! - `errors` - Entitlement error taxonomy

mod access;
mod errors;
mod feature_flags;
mod gate;
mod tier;

pub use access::{check_feature, check_operator_console, AccessDeniedReason, AccessResult};
pub use errors::EntitlementError;
pub use feature_flags::{resolve, Feature, FeatureFlags};
pub use gate::{FeatureGate, GateView};
pub use tier::Tier;
