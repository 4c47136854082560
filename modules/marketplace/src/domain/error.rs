use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User with email '{email}' already exists")]
    EmailAlreadyExists { email: String },

    #[error("User not found: {id}")]
    UserNotFound { id: Uuid },

    #[error("Offer not found: {id}")]
    OfferNotFound { id: Uuid },

    #[error("User {actor} does not own offer {offer_id}")]
    NotOwner { offer_id: Uuid, actor: Uuid },

    #[error("User cannot rate own offer {offer_id}")]
    OwnOffer { offer_id: Uuid },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn email_already_exists(email: impl Into<String>) -> Self {
        Self::EmailAlreadyExists {
            email: email.into(),
        }
    }

    pub fn user_not_found(id: Uuid) -> Self {
        Self::UserNotFound { id }
    }

    pub fn offer_not_found(id: Uuid) -> Self {
        Self::OfferNotFound { id }
    }

    pub fn not_owner(offer_id: Uuid, actor: Uuid) -> Self {
        Self::NotOwner { offer_id, actor }
    }

    /// External-service failure; keeps the full `anyhow` chain in the message.
    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend {
            message: format!("{err:#}"),
        }
    }
}
