//! Like/dislike domain entities.

pub mod model;

pub use model::{Like, LikeStats, ToggleOutcome};
