//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `KeyValueStore` - Durable string-keyed storage used by the poll store

mod key_value_store;

pub use key_value_store::{KeyValueStore, StorageError};
