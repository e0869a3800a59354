//! Application handlers.
//!
//! Command handlers that orchestrate domain operations across ports.

mod purchase_premium;

pub use purchase_premium::{PurchasePremiumCommand, PurchasePremiumHandler, PurchasePremiumResult};
