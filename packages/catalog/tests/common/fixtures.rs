//! In-memory doubles for the kernel traits, with call recording.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use catalog_core::domains::auth::Identity;
use catalog_core::domains::member::FamilyMember;
use catalog_core::kernel::{BaseAuthService, BaseMemberStore};
use chrono::Utc;
use uuid::Uuid;

pub fn identity(id: &str, email: Option<&str>) -> Identity {
    Identity {
        id: id.to_string(),
        email: email.map(str::to_string),
    }
}

pub fn family_member(
    email: &str,
    auth_user_id: Option<&str>,
    is_admin: bool,
) -> FamilyMember {
    FamilyMember {
        id: Uuid::new_v4(),
        auth_user_id: auth_user_id.map(str::to_string),
        email: email.to_string(),
        name: email.split('@').next().unwrap_or("member").to_string(),
        avatar_url: None,
        is_admin,
        created_at: Utc::now(),
    }
}

/// In-memory member store recording link calls, with fault injection.
#[derive(Default)]
pub struct MemoryMemberStore {
    members: Mutex<Vec<FamilyMember>>,
    pub link_calls: AtomicUsize,
    pub fail_lookups: AtomicBool,
}

impl MemoryMemberStore {
    pub fn with_members(members: Vec<FamilyMember>) -> Self {
        Self {
            members: Mutex::new(members),
            ..Default::default()
        }
    }

    pub fn fail_lookups(&self) {
        self.fail_lookups.store(true, Ordering::SeqCst);
    }

    pub fn link_calls(&self) -> usize {
        self.link_calls.load(Ordering::SeqCst)
    }

    fn check_fault(&self) -> Result<()> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            bail!("injected store failure");
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<FamilyMember>> {
        self.members
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl BaseMemberStore for MemoryMemberStore {
    async fn find_by_auth_user_id(&self, auth_user_id: &str) -> Result<Option<FamilyMember>> {
        self.check_fault()?;
        Ok(self
            .lock()
            .iter()
            .find(|m| m.auth_user_id.as_deref() == Some(auth_user_id))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<FamilyMember>> {
        self.check_fault()?;
        Ok(self.lock().iter().find(|m| m.email == email).cloned())
    }

    async fn link_auth_user(
        &self,
        member_id: Uuid,
        auth_user_id: &str,
    ) -> Result<Option<FamilyMember>> {
        self.check_fault()?;
        self.link_calls.fetch_add(1, Ordering::SeqCst);

        let mut members = self.lock();
        let Some(member) = members.iter_mut().find(|m| m.id == member_id) else {
            return Ok(None);
        };
        // Conditional update: already-linked rows are left alone
        if member.auth_user_id.is_some() {
            return Ok(None);
        }
        member.auth_user_id = Some(auth_user_id.to_string());
        Ok(Some(member.clone()))
    }
}

/// Auth service double recording sign-outs and magic-link sends.
#[derive(Default)]
pub struct MockAuthService {
    pub stored_identity: Mutex<Option<Identity>>,
    pub sign_out_calls: AtomicUsize,
    pub fail_sign_out: AtomicBool,
    pub magic_links_sent: Mutex<Vec<String>>,
}

impl MockAuthService {
    pub fn with_identity(identity: Identity) -> Self {
        Self {
            stored_identity: Mutex::new(Some(identity)),
            ..Default::default()
        }
    }

    pub fn fail_sign_out(&self) {
        self.fail_sign_out.store(true, Ordering::SeqCst);
    }

    pub fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BaseAuthService for MockAuthService {
    async fn current_identity(&self) -> Result<Option<Identity>> {
        Ok(self
            .stored_identity
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn oauth_authorize_url(&self, provider: &str) -> String {
        format!("https://auth.test/authorize?provider={provider}")
    }

    async fn send_magic_link(&self, email: &str) -> Result<()> {
        self.magic_links_sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(email.to_string());
        Ok(())
    }

    async fn sign_out(&self) -> Result<()> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(anyhow!("injected sign-out failure"));
        }
        self.stored_identity
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        Ok(())
    }
}
