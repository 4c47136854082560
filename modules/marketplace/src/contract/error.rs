use thiserror::Error;
use uuid::Uuid;

/// Errors that are safe to expose to front-ends.
///
/// Three families: validation (bad input), authorization
/// (`Unauthenticated`, `InvalidCredentials`, `NotOwner`) and external-service
/// failure (`Unavailable`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketplaceError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("You need to sign in first")]
    Unauthenticated,

    #[error("Invalid credentials or unregistered user")]
    InvalidCredentials,

    #[error("An account with email '{email}' already exists")]
    EmailTaken { email: String },

    #[error("Not found: {id}")]
    NotFound { id: Uuid },

    #[error("Offer {offer_id} belongs to another user")]
    NotOwner { offer_id: Uuid },

    #[error("Service unavailable: {message}")]
    Unavailable { message: String },
}

impl MarketplaceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

impl From<crate::domain::error::DomainError> for MarketplaceError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            Validation { field, message } => Self::validation(format!("{field}: {message}")),
            InvalidCredentials => Self::InvalidCredentials,
            EmailAlreadyExists { email } => Self::EmailTaken { email },
            UserNotFound { id } | OfferNotFound { id } => Self::not_found(id),
            NotOwner { offer_id, .. } => Self::NotOwner { offer_id },
            OwnOffer { .. } => Self::validation("You cannot rate your own offer"),
            Backend { message } => Self::unavailable(message),
        }
    }
}
