//! # blog-core
//!
//! Core crate for the blog backend. Contains configuration schemas,
//! pagination types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other blog crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
