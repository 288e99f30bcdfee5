//! Concrete adapters behind the kernel traits
//!
//! `GoTrueAuthService` wraps the gotrue client and carries the access token
//! for the current session; `PgMemberStore` delegates to the `FamilyMember`
//! query methods.

use std::sync::{Arc, RwLock};

use anyhow::Result;
use async_trait::async_trait;
use gotrue::{GoTrueError, GoTrueService};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domains::auth::models::Identity;
use crate::domains::member::FamilyMember;
use crate::kernel::traits::{BaseAuthService, BaseMemberStore};

// =============================================================================
// GoTrue Adapter (implements BaseAuthService trait)
// =============================================================================

/// Auth service adapter holding the access token of the active session.
///
/// The token is set by whatever completed the credential exchange (OAuth
/// redirect handler, magic-link landing, stored session restore) and taken
/// on sign-out.
pub struct GoTrueAuthService {
    service: Arc<GoTrueService>,
    access_token: RwLock<Option<String>>,
}

impl GoTrueAuthService {
    pub fn new(service: Arc<GoTrueService>) -> Self {
        Self {
            service,
            access_token: RwLock::new(None),
        }
    }

    pub fn with_access_token(service: Arc<GoTrueService>, access_token: String) -> Self {
        Self {
            service,
            access_token: RwLock::new(Some(access_token)),
        }
    }

    pub fn set_access_token(&self, access_token: Option<String>) {
        let mut token = self
            .access_token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *token = access_token;
    }

    fn current_token(&self) -> Option<String> {
        self.access_token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl BaseAuthService for GoTrueAuthService {
    async fn current_identity(&self) -> Result<Option<Identity>> {
        let Some(token) = self.current_token() else {
            return Ok(None);
        };

        match self.service.get_user(&token).await {
            Ok(user) => Ok(Some(Identity {
                id: user.id,
                email: user.email,
            })),
            // An expired token is "no session", not an error
            Err(GoTrueError::InvalidSession) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn oauth_authorize_url(&self, provider: &str) -> String {
        self.service.authorize_url(provider)
    }

    async fn send_magic_link(&self, email: &str) -> Result<()> {
        self.service
            .send_magic_link(email)
            .await
            .map_err(Into::into)
    }

    async fn sign_out(&self) -> Result<()> {
        let token = {
            let mut token = self
                .access_token
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            token.take()
        };

        if let Some(token) = token {
            self.service.sign_out(&token).await?;
        }
        Ok(())
    }
}

// =============================================================================
// Postgres Member Store (implements BaseMemberStore trait)
// =============================================================================

#[derive(Clone)]
pub struct PgMemberStore {
    pool: PgPool,
}

impl PgMemberStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseMemberStore for PgMemberStore {
    async fn find_by_auth_user_id(&self, auth_user_id: &str) -> Result<Option<FamilyMember>> {
        FamilyMember::find_by_auth_user_id(auth_user_id, &self.pool).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<FamilyMember>> {
        FamilyMember::find_by_email(email, &self.pool).await
    }

    async fn link_auth_user(
        &self,
        member_id: Uuid,
        auth_user_id: &str,
    ) -> Result<Option<FamilyMember>> {
        FamilyMember::link_auth_user(member_id, auth_user_id, &self.pool).await
    }
}
