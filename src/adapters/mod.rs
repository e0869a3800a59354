//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the core to concrete capabilities:
//! - `storage` - Local key-value stores (in-memory, file)
//! - `remote` - Revisioned remote store (in-memory)
//! - `payment` - Mock checkout

pub mod payment;
pub mod remote;
pub mod storage;

pub use payment::MockPaymentGateway;
pub use remote::InMemoryRemoteStore;
pub use storage::{FileKeyValueStore, InMemoryKeyValueStore};
