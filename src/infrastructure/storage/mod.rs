//! In-memory data store

mod memory;

pub use memory::{InMemoryStore, MemoryTransaction};
