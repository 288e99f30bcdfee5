//! Member domain - the pre-registered family roster
//!
//! Members are provisioned out of band (by an admin, directly in the
//! database); the application never creates them. The auth domain links a
//! member to an external login at most once, via `auth_user_id`.

pub mod models;

pub use models::FamilyMember;
