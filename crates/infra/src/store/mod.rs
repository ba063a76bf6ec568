//! Keyed in-memory storage shared by the dev/test adapters.

pub mod kv_store;

pub use kv_store::{InMemoryKvStore, KvStore};
