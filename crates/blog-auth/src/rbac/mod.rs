//! Role and ownership checks.

pub mod gate;
pub mod principal;

pub use gate::{AuthorizationGate, Decision};
pub use principal::Principal;
