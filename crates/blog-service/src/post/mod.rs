//! Post authoring and visibility.

pub mod service;

pub use service::{NewPost, PostService};
