//! Process-local store provider.

pub mod store;

pub use store::MemoryStore;
