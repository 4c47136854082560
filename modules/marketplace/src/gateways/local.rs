use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{
    client::MarketplaceApi,
    error::MarketplaceError,
    model::{
        Credentials, ImageUpload, NewOffer, Offer, RatingSummary, RatingValue, SignupRequest, User,
    },
};
use crate::domain::service::Service;

/// Local implementation of the MarketplaceApi trait that delegates to the domain service
pub struct MarketplaceLocalClient {
    service: Arc<Service>,
}

impl MarketplaceLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl MarketplaceApi for MarketplaceLocalClient {
    async fn restore_session(&self) -> Result<Option<User>, MarketplaceError> {
        self.service.restore_session().await.map_err(Into::into)
    }

    async fn login(&self, credentials: Credentials) -> Result<User, MarketplaceError> {
        self.service.login(credentials).await.map_err(Into::into)
    }

    async fn signup(&self, request: SignupRequest) -> Result<User, MarketplaceError> {
        self.service.signup(request).await.map_err(Into::into)
    }

    async fn logout(&self) -> Result<(), MarketplaceError> {
        self.service.logout().await.map_err(Into::into)
    }

    async fn fetch_offers(&self) -> Result<Vec<Offer>, MarketplaceError> {
        self.service.fetch_offers().await.map_err(Into::into)
    }

    async fn add_offer(&self, actor: &User, offer: NewOffer) -> Result<Offer, MarketplaceError> {
        self.service.add_offer(actor, offer).await.map_err(Into::into)
    }

    async fn update_offer(&self, actor: &User, offer: Offer) -> Result<Offer, MarketplaceError> {
        self.service
            .update_offer(actor, offer)
            .await
            .map_err(Into::into)
    }

    async fn average_rating(&self, offer_id: Uuid) -> Result<RatingSummary, MarketplaceError> {
        self.service
            .average_rating(offer_id)
            .await
            .map_err(Into::into)
    }

    async fn average_rating_by_user_id(
        &self,
        user_id: Uuid,
    ) -> Result<RatingSummary, MarketplaceError> {
        self.service
            .average_rating_by_user_id(user_id)
            .await
            .map_err(Into::into)
    }

    async fn user_rating(
        &self,
        offer_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<RatingValue>, MarketplaceError> {
        self.service
            .user_rating(offer_id, user_id)
            .await
            .map_err(Into::into)
    }

    async fn submit_rating(
        &self,
        actor: &User,
        offer_id: Uuid,
        value: RatingValue,
    ) -> Result<RatingSummary, MarketplaceError> {
        self.service
            .submit_rating(actor, offer_id, value)
            .await
            .map_err(Into::into)
    }

    async fn upload_image(
        &self,
        actor: &User,
        image: ImageUpload,
    ) -> Result<String, MarketplaceError> {
        self.service
            .upload_image(actor, image)
            .await
            .map_err(Into::into)
    }

    fn contact_link(&self, offer: &Offer) -> Result<String, MarketplaceError> {
        self.service.contact_link(offer).map_err(Into::into)
    }
}
