//! # blog-database
//!
//! Store providers and repository implementations. The PostgreSQL provider
//! runs on an sqlx pool with embedded migrations; the memory provider keeps
//! everything in a process-local map and enforces the same constraints.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::Store;
