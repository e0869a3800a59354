//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the core and the outside world. Adapters implement these ports.
//!
//! - `KeyValueStore` - Local keyed storage for tiers and sync payloads
//! - `RemoteStore` - Remote copy of a user's data (upload/download/delete)
//! - `PaymentGateway` - Opaque purchase step of the upgrade flow

mod key_value_store;
mod payment_gateway;
mod remote_store;

pub use key_value_store::{KeyValueStore, StorageError};
pub use payment_gateway::{
    PaymentError, PaymentErrorCode, PaymentGateway, PurchaseReceipt, PurchaseRequest,
};
pub use remote_store::{RemoteError, RemoteStore};
