//! Application layer - Stores, engines, handlers and the user session.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Nothing here knows which adapters are plugged in.

pub mod handlers;
mod session;
mod sync_engine;
mod tier_store;

pub use handlers::{PurchasePremiumCommand, PurchasePremiumHandler, PurchasePremiumResult};
pub use session::{SessionDeps, SessionOptions, UserSession};
pub use sync_engine::{SyncEngine, DEFAULT_LOCAL_KEY_PREFIX};
pub use tier_store::{TierStore, TIER_KEY_PREFIX};
