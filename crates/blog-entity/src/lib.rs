//! # blog-entity
//!
//! Domain entity models. Every struct in this crate represents a database
//! table row or a domain value object. Database entities derive
//! `sqlx::FromRow`.

pub mod comment;
pub mod like;
pub mod post;
pub mod user;
