//! Session reconciler - the single writer of [`SessionState`]
//!
//! Consumes the auth service's lifecycle events and keeps the local session
//! consistent with the family-member roster:
//!
//! - `SignedIn` runs the full resolution: lookup by external user id, then
//!   auto-link by email, then reject-and-sign-out for unknown logins.
//! - `InitialSession` / `TokenRefreshed` only re-fetch by external user id;
//!   the email handshake happens exclusively on a fresh sign-in.
//! - `SignedOut` clears everything without touching the store.
//!
//! Resolution is split into a pure step ([`SessionReconciler::resolve_sign_in`],
//! returning a [`Resolution`]) and an effect step that performs the forced
//! sign-out, so the branching is testable without a live auth service.
//!
//! Events are tagged with a monotonic sequence number; a lookup result is
//! discarded if a newer event committed while it was in flight, so a slow
//! lookup can never overwrite fresher state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::domains::auth::events::AuthEvent;
use crate::domains::auth::models::{Identity, SessionState};
use crate::domains::member::FamilyMember;
use crate::kernel::{BaseAuthService, BaseMemberStore};

/// Why a sign-in was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthorizedReason {
    /// Identity carries no email and has no existing link
    MissingEmail,
    /// No family member registered under this external id or email
    NoMatchingMember,
}

/// Outcome of the pure sign-in resolution step
#[derive(Debug)]
pub enum Resolution {
    /// Member already linked to this external user id
    Linked(FamilyMember),
    /// Member matched by email; external user id recorded on it
    AutoLinked(FamilyMember),
    /// No member for this identity
    Unauthorized(UnauthorizedReason),
    /// Store lookup or update failed
    Failed(anyhow::Error),
}

/// Reconciles the external session with the family-member roster.
///
/// Single writer of [`SessionState`]; consumers read snapshots via
/// [`state`](Self::state) or watch changes via [`subscribe`](Self::subscribe).
pub struct SessionReconciler {
    members: Arc<dyn BaseMemberStore>,
    auth: Arc<dyn BaseAuthService>,
    state_tx: watch::Sender<SessionState>,
    state_rx: watch::Receiver<SessionState>,
    /// Sequence number of the most recently accepted event
    event_seq: AtomicU64,
    /// Sequence number of the most recently committed state
    committed_seq: AtomicU64,
}

impl SessionReconciler {
    pub fn new(members: Arc<dyn BaseMemberStore>, auth: Arc<dyn BaseAuthService>) -> Self {
        let (state_tx, state_rx) = watch::channel(SessionState::loading());
        Self {
            members,
            auth,
            state_tx,
            state_rx,
            event_seq: AtomicU64::new(0),
            committed_seq: AtomicU64::new(0),
        }
    }

    /// Current snapshot, synchronous.
    pub fn state(&self) -> SessionState {
        self.state_rx.borrow().clone()
    }

    /// Watch channel for state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_rx.clone()
    }

    /// Check the stored session once at startup and feed it through the
    /// normal event path.
    pub async fn bootstrap(&self) {
        match self.auth.current_identity().await {
            Ok(identity) => {
                debug!(
                    has_session = identity.is_some(),
                    "initial session check complete"
                );
                self.handle_event(AuthEvent::InitialSession(identity)).await;
            }
            Err(e) => {
                error!("failed to fetch initial session: {e:#}");
                let seq = self.next_seq();
                self.commit(seq, SessionState::signed_out());
            }
        }
    }

    /// Consume one auth lifecycle event. Never panics and never returns an
    /// error: every failure degrades to a definite logged-out state.
    pub async fn handle_event(&self, event: AuthEvent) {
        let seq = self.next_seq();

        match event {
            AuthEvent::SignedOut => {
                debug!("signed out, clearing session state");
                self.commit(seq, SessionState::signed_out());
            }
            AuthEvent::InitialSession(None) => {
                debug!("no stored session");
                self.commit(seq, SessionState::signed_out());
            }
            AuthEvent::InitialSession(Some(identity)) | AuthEvent::TokenRefreshed(identity) => {
                self.commit(
                    seq,
                    SessionState {
                        identity: Some(identity.clone()),
                        member: None,
                        is_loading: true,
                    },
                );
                let member = self.refetch_member(&identity).await;
                self.commit(
                    seq,
                    SessionState {
                        identity: Some(identity),
                        member,
                        is_loading: false,
                    },
                );
            }
            AuthEvent::SignedIn(identity) => {
                self.commit(
                    seq,
                    SessionState {
                        identity: Some(identity.clone()),
                        member: None,
                        is_loading: true,
                    },
                );
                let resolution = self.resolve_sign_in(&identity).await;
                let member = self.apply_resolution(resolution).await;
                self.commit(
                    seq,
                    SessionState {
                        identity: Some(identity),
                        member,
                        is_loading: false,
                    },
                );
            }
        }
    }

    /// Pure resolution step for a fresh sign-in. Reads the store and performs
    /// at most the one auto-link write; the forced sign-out effect is applied
    /// separately in [`apply_resolution`](Self::apply_resolution).
    pub async fn resolve_sign_in(&self, identity: &Identity) -> Resolution {
        let existing = match self.members.find_by_auth_user_id(&identity.id).await {
            Ok(existing) => existing,
            Err(e) => return Resolution::Failed(e),
        };
        if let Some(member) = existing {
            return Resolution::Linked(member);
        }

        let Some(email) = identity.email.as_deref() else {
            return Resolution::Unauthorized(UnauthorizedReason::MissingEmail);
        };

        match self.members.find_by_email(email).await {
            Ok(Some(member)) => match self.members.link_auth_user(member.id, &identity.id).await {
                Ok(Some(linked)) => Resolution::AutoLinked(linked),
                Ok(None) => Resolution::Failed(anyhow!(
                    "family member {} was linked to another login concurrently",
                    member.id
                )),
                Err(e) => Resolution::Failed(e),
            },
            Ok(None) => Resolution::Unauthorized(UnauthorizedReason::NoMatchingMember),
            Err(e) => Resolution::Failed(e),
        }
    }

    /// Request external sign-out, then clear local state unconditionally.
    /// The external error is still returned so callers can surface it.
    pub async fn sign_out(&self) -> Result<()> {
        let result = self.auth.sign_out().await;
        if let Err(e) = &result {
            error!("external sign-out failed, clearing local session anyway: {e:#}");
        }

        let seq = self.next_seq();
        self.commit(seq, SessionState::signed_out());
        result
    }

    /// URL the client should open to start an OAuth sign-in.
    pub fn oauth_authorize_url(&self, provider: &str) -> String {
        self.auth.oauth_authorize_url(provider)
    }

    /// Send a magic-link sign-in email.
    pub async fn send_magic_link(&self, email: &str) -> Result<()> {
        self.auth.send_magic_link(email).await
    }

    /// Apply the effect of a resolution and reduce it to the member slot.
    /// Only the no-matching-member rejection forces an external sign-out:
    /// that identity would otherwise stay authenticated upstream while
    /// unusable here.
    async fn apply_resolution(&self, resolution: Resolution) -> Option<FamilyMember> {
        match resolution {
            Resolution::Linked(member) => {
                debug!(member_id = %member.id, "existing link found for sign-in");
                Some(member)
            }
            Resolution::AutoLinked(member) => {
                info!(member_id = %member.id, "auto-linked family member by email");
                Some(member)
            }
            Resolution::Unauthorized(UnauthorizedReason::MissingEmail) => {
                warn!("sign-in identity has no email and no existing link; treating as unregistered");
                None
            }
            Resolution::Unauthorized(UnauthorizedReason::NoMatchingMember) => {
                warn!("no family member registered for this login; forcing external sign-out");
                if let Err(e) = self.auth.sign_out().await {
                    error!("forced sign-out of unregistered login failed: {e:#}");
                }
                None
            }
            Resolution::Failed(e) => {
                error!("family member resolution failed: {e:#}");
                None
            }
        }
    }

    /// Plain re-fetch path (returning session or token refresh): lookup by
    /// external user id only, never auto-link.
    async fn refetch_member(&self, identity: &Identity) -> Option<FamilyMember> {
        match self.members.find_by_auth_user_id(&identity.id).await {
            Ok(Some(member)) => Some(member),
            Ok(None) => {
                debug!(auth_user_id = %identity.id, "no family member linked to session");
                None
            }
            Err(e) => {
                error!("family member fetch failed: {e:#}");
                None
            }
        }
    }

    fn next_seq(&self) -> u64 {
        self.event_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Publish a state transition unless a newer event already committed.
    fn commit(&self, seq: u64, state: SessionState) {
        let committed = self.committed_seq.load(Ordering::SeqCst);
        if seq < committed {
            debug!(seq, committed, "discarding stale session state");
            return;
        }
        self.committed_seq.store(seq, Ordering::SeqCst);
        // Send only fails with no receivers; we always hold one.
        let _ = self.state_tx.send(state);
    }
}
