//! Infrastructure traits
//!
//! External services used by the domains, abstracted behind traits so the
//! session reconciler can be tested without a database or a live auth
//! service.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domains::auth::models::Identity;
use crate::domains::member::FamilyMember;

// =============================================================================
// Auth Service Trait (Infrastructure - external sessions)
// =============================================================================

#[async_trait]
pub trait BaseAuthService: Send + Sync {
    /// Identity behind the currently stored session, if any
    async fn current_identity(&self) -> Result<Option<Identity>>;

    /// URL the client should open to start an OAuth sign-in
    fn oauth_authorize_url(&self, provider: &str) -> String;

    /// Send a magic-link sign-in email
    async fn send_magic_link(&self, email: &str) -> Result<()>;

    /// Terminate the session on the auth service side
    async fn sign_out(&self) -> Result<()>;
}

// =============================================================================
// Member Store Trait (Infrastructure - family roster)
// =============================================================================

#[async_trait]
pub trait BaseMemberStore: Send + Sync {
    /// Member already linked to this external user id
    async fn find_by_auth_user_id(&self, auth_user_id: &str) -> Result<Option<FamilyMember>>;

    /// Pre-registered member matching this email (at most one)
    async fn find_by_email(&self, email: &str) -> Result<Option<FamilyMember>>;

    /// Record the external user id on a not-yet-linked member.
    ///
    /// Targeted single-row update; returns None if the member was already
    /// linked (lost a concurrent link race) or no longer exists.
    async fn link_auth_user(
        &self,
        member_id: Uuid,
        auth_user_id: &str,
    ) -> Result<Option<FamilyMember>>;
}
