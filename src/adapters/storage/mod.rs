//! Local storage adapters.
//!
//! Implementations of the `KeyValueStore` port:
//! - `InMemoryKeyValueStore` - For testing and ephemeral sessions
//! - `FileKeyValueStore` - One file per key under a data directory

mod file_key_value_store;
mod in_memory_key_value_store;

pub use file_key_value_store::FileKeyValueStore;
pub use in_memory_key_value_store::InMemoryKeyValueStore;
