//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `entitlement` - Tiers, feature flags and access decisions
//! - `sync` - Sync status, snapshots and the merge rule
//! - `advisory` - Rule-based habit coaching

pub mod advisory;
pub mod entitlement;
pub mod foundation;
pub mod sync;
