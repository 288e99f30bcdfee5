use crate::domains::auth::models::Identity;

/// Auth lifecycle events emitted by the external auth service
///
/// Delivered in order by the subscription that owns the reconciler. Each
/// event carries the identity the service currently holds, not a diff.
#[derive(Debug, Clone)]
pub enum AuthEvent {
    /// First observation of the stored session at startup (may be empty)
    InitialSession(Option<Identity>),

    /// A fresh credential exchange completed (OAuth redirect or magic link)
    SignedIn(Identity),

    /// The session was terminated, locally or remotely
    SignedOut,

    /// The access token was refreshed for an existing session
    TokenRefreshed(Identity),
}
