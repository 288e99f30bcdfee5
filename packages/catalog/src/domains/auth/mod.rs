//! Auth domain - reconciles the external login with the family-member roster
//!
//! The external auth service owns credentials and sessions; the family-member
//! table is the allow-list. This domain keeps the two consistent:
//!
//! - a returning session is re-fetched by its stored external user id
//! - a fresh sign-in may auto-link a pre-registered member by email
//! - a login matching no member is rejected and signed out remotely
//!
//! Responsibilities:
//! - Session lifecycle event handling (initial, signed-in, refresh, sign-out)
//! - Member lookup / auto-link resolution
//! - Derived authorization flags exposed to consumers

pub mod events;
pub mod models;
pub mod reconciler;

pub use events::AuthEvent;
pub use models::{Identity, SessionState};
pub use reconciler::{Resolution, SessionReconciler, UnauthorizedReason};
