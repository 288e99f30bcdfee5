use thiserror::Error;

/// Authorization errors for the family bookshelf
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Admin access required")]
    AdminRequired,

    #[error("This login is not registered as a family member")]
    UnregisteredIdentity,

    #[error("Auth service error: {0}")]
    Provider(#[from] anyhow::Error),
}
