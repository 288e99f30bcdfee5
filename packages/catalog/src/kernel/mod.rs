//! Kernel module - infrastructure traits and their concrete adapters.

pub mod deps;
pub mod traits;

pub use deps::{GoTrueAuthService, PgMemberStore};
pub use traits::*;
