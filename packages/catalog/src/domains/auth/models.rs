use serde::{Deserialize, Serialize};

use crate::common::AuthError;
use crate::domains::member::FamilyMember;

/// External authenticated identity, as reported by the auth service.
///
/// Read-only here: the auth service owns it for the lifetime of the session.
/// `email` is optional — some OAuth providers withhold it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: Option<String>,
}

/// Current session snapshot exposed to consumers.
///
/// Rebuilt on every auth event; never persisted. `member` is only set when
/// the identity resolved to a registered family member, so a failed or
/// unauthorized resolution reads as logged-out for authorization purposes
/// even while `identity` is still present.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub identity: Option<Identity>,
    pub member: Option<FamilyMember>,
    pub is_loading: bool,
}

impl SessionState {
    /// Initial state, before the stored session has been checked.
    pub fn loading() -> Self {
        Self {
            identity: None,
            member: None,
            is_loading: true,
        }
    }

    /// Fully cleared state (after sign-out or an empty initial session).
    pub fn signed_out() -> Self {
        Self {
            identity: None,
            member: None,
            is_loading: false,
        }
    }

    /// Whether the identity resolved to a registered family member.
    pub fn is_member(&self) -> bool {
        self.member.is_some()
    }

    /// Whether the resolved member has admin privileges.
    /// Always false while loading or when no member is resolved.
    pub fn is_admin(&self) -> bool {
        self.member.as_ref().is_some_and(|m| m.is_admin)
    }

    /// Require a resolved family member.
    pub fn require_member(&self) -> Result<&FamilyMember, AuthError> {
        match &self.member {
            Some(member) => Ok(member),
            None if self.identity.is_some() => Err(AuthError::UnregisteredIdentity),
            None => Err(AuthError::AuthenticationRequired),
        }
    }

    /// Require a resolved family member with admin privileges.
    pub fn require_admin(&self) -> Result<&FamilyMember, AuthError> {
        let member = self.require_member()?;
        if !member.is_admin {
            return Err(AuthError::AdminRequired);
        }
        Ok(member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn member(is_admin: bool) -> FamilyMember {
        FamilyMember {
            id: Uuid::new_v4(),
            auth_user_id: Some("ext-1".to_string()),
            email: "a@x.com".to_string(),
            name: "Alex".to_string(),
            avatar_url: None,
            is_admin,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn admin_flag_requires_resolved_member() {
        assert!(!SessionState::loading().is_admin());
        assert!(!SessionState::signed_out().is_admin());

        let state = SessionState {
            identity: Some(Identity {
                id: "ext-1".to_string(),
                email: None,
            }),
            member: None,
            is_loading: false,
        };
        assert!(!state.is_admin());

        let state = SessionState {
            member: Some(member(true)),
            ..state
        };
        assert!(state.is_admin());
    }

    #[test]
    fn require_admin_distinguishes_error_cases() {
        let signed_out = SessionState::signed_out();
        assert!(matches!(
            signed_out.require_admin(),
            Err(AuthError::AuthenticationRequired)
        ));

        let unlinked = SessionState {
            identity: Some(Identity {
                id: "ext-2".to_string(),
                email: Some("b@x.com".to_string()),
            }),
            member: None,
            is_loading: false,
        };
        assert!(matches!(
            unlinked.require_admin(),
            Err(AuthError::UnregisteredIdentity)
        ));

        let non_admin = SessionState {
            member: Some(member(false)),
            ..unlinked
        };
        assert!(matches!(
            non_admin.require_admin(),
            Err(AuthError::AdminRequired)
        ));
        assert!(non_admin.require_member().is_ok());
    }
}
