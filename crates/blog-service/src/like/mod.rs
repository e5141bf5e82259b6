//! Post reactions.

pub mod service;

pub use service::LikeService;
