use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::{
    error::MarketplaceError,
    model::{
        Credentials, ImageUpload, NewOffer, Offer, RatingSummary, RatingValue, SignupRequest, User,
    },
};

/// Public API of the marketplace. The live (hosted backend) and demo
/// (in-memory) configurations both sit behind this one trait.
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// Resume an existing auth session, if the backend still has one.
    async fn restore_session(&self) -> Result<Option<User>, MarketplaceError>;

    async fn login(&self, credentials: Credentials) -> Result<User, MarketplaceError>;

    /// Register a new member and sign them in.
    async fn signup(&self, request: SignupRequest) -> Result<User, MarketplaceError>;

    async fn logout(&self) -> Result<(), MarketplaceError>;

    /// Active offers, newest first, each carrying its owner's display name.
    async fn fetch_offers(&self) -> Result<Vec<Offer>, MarketplaceError>;

    /// Publish an offer owned by `actor`.
    async fn add_offer(&self, actor: &User, offer: NewOffer) -> Result<Offer, MarketplaceError>;

    /// Persist edits to an offer `actor` owns.
    async fn update_offer(&self, actor: &User, offer: Offer) -> Result<Offer, MarketplaceError>;

    /// Average of the votes on one offer.
    async fn average_rating(&self, offer_id: Uuid) -> Result<RatingSummary, MarketplaceError>;

    /// Average of the votes on every offer authored by `user_id`.
    async fn average_rating_by_user_id(
        &self,
        user_id: Uuid,
    ) -> Result<RatingSummary, MarketplaceError>;

    /// The vote `user_id` gave `offer_id`, if any.
    async fn user_rating(
        &self,
        offer_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<RatingValue>, MarketplaceError>;

    /// Create or replace `actor`'s vote; returns the refreshed summary.
    async fn submit_rating(
        &self,
        actor: &User,
        offer_id: Uuid,
        value: RatingValue,
    ) -> Result<RatingSummary, MarketplaceError>;

    /// Store an offer image; returns its public URL.
    async fn upload_image(
        &self,
        actor: &User,
        image: ImageUpload,
    ) -> Result<String, MarketplaceError>;

    /// Messaging deep link for contacting the offer's owner.
    fn contact_link(&self, offer: &Offer) -> Result<String, MarketplaceError>;
}
