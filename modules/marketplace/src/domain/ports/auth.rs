use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Who the auth provider says is signed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdentity {
    pub id: Uuid,
    pub email: String,
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email already registered")]
    AlreadyRegistered,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Managed authentication. Implementations keep the session themselves
/// (token or identity), the domain only asks who is signed in.
#[async_trait]
pub trait AuthPort: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthIdentity, AuthError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthIdentity, AuthError>;
    async fn sign_out(&self) -> Result<(), AuthError>;
    async fn current_user(&self) -> Result<Option<AuthIdentity>, AuthError>;
}
