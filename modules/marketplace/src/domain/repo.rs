use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::contract::model::{NewOffer, Offer, Rating, User};

/// Ports for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    /// Check uniqueness by (normalized) email.
    async fn email_exists(&self, email: &str) -> anyhow::Result<bool>;
    /// Insert a fully-formed profile; the id comes from the auth provider.
    async fn insert(&self, user: User) -> anyhow::Result<()>;
}

/// Offer as the service hands it to storage. Storage assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferDraft {
    pub user_id: Uuid,
    pub fields: NewOffer,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

#[async_trait]
pub trait OffersRepository: Send + Sync {
    /// Active offers, newest first, with the owner's name joined in.
    async fn list_active(&self) -> anyhow::Result<Vec<Offer>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Offer>>;
    /// Persist a new offer and return the stored record.
    async fn insert(&self, draft: OfferDraft) -> anyhow::Result<Offer>;
    /// Write the editable fields of `offer`, matching on id *and* owner.
    /// `None` when no row matched.
    async fn update(&self, offer: &Offer) -> anyhow::Result<Option<Offer>>;
    /// Ids of every offer (active or not) owned by `user_id`.
    async fn list_ids_by_owner(&self, user_id: Uuid) -> anyhow::Result<Vec<Uuid>>;
}

#[async_trait]
pub trait RatingsRepository: Send + Sync {
    async fn list_for_offer(&self, offer_id: Uuid) -> anyhow::Result<Vec<Rating>>;
    async fn list_for_offers(&self, offer_ids: &[Uuid]) -> anyhow::Result<Vec<Rating>>;
    async fn find(&self, offer_id: Uuid, user_id: Uuid) -> anyhow::Result<Option<Rating>>;
    /// Insert or replace the vote keyed by (offer_id, user_id).
    async fn upsert(&self, rating: Rating) -> anyhow::Result<()>;
}
