use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::contract::model::{
    Credentials, ImageUpload, NewOffer, Offer, Rating, RatingSummary, RatingValue, SignupRequest,
    User,
};
use crate::domain::contact::{self, ContactTemplate};
use crate::domain::error::DomainError;
use crate::domain::events::MarketplaceEvent;
use crate::domain::ports::{AuthError, AuthPort, EventPublisher, ImageStore};
use crate::domain::rating;
use crate::domain::repo::{OfferDraft, OffersRepository, RatingsRepository, UsersRepository};

/// Domain service with business rules for members, offers and ratings.
/// Depends only on the repository and provider ports.
#[derive(Clone)]
pub struct Service {
    users: Arc<dyn UsersRepository>,
    offers: Arc<dyn OffersRepository>,
    ratings: Arc<dyn RatingsRepository>,
    auth: Arc<dyn AuthPort>,
    images: Arc<dyn ImageStore>,
    events: Arc<dyn EventPublisher<MarketplaceEvent>>,
    config: ServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub min_name_len: usize,
    pub min_password_len: usize,
    /// Points credited to every new member.
    pub signup_points: i64,
    pub contact: ContactTemplate,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            min_name_len: 2,
            min_password_len: 6,
            signup_points: 100,
            contact: ContactTemplate::default(),
        }
    }
}

impl Service {
    pub fn new(
        users: Arc<dyn UsersRepository>,
        offers: Arc<dyn OffersRepository>,
        ratings: Arc<dyn RatingsRepository>,
        auth: Arc<dyn AuthPort>,
        images: Arc<dyn ImageStore>,
        events: Arc<dyn EventPublisher<MarketplaceEvent>>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            users,
            offers,
            ratings,
            auth,
            images,
            events,
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    #[instrument(name = "marketplace.service.restore_session", skip(self))]
    pub async fn restore_session(&self) -> Result<Option<User>, DomainError> {
        let Some(identity) = self
            .auth
            .current_user()
            .await
            .map_err(auth_backend_error)?
        else {
            debug!("No active session");
            return Ok(None);
        };

        let user = self
            .users
            .find_by_id(identity.id)
            .await
            .map_err(DomainError::backend)?;
        if user.is_none() {
            warn!(user_id = %identity.id, "Session has no matching profile");
        }
        Ok(user)
    }

    #[instrument(
        name = "marketplace.service.login",
        skip(self, credentials),
        fields(email = %credentials.email)
    )]
    pub async fn login(&self, credentials: Credentials) -> Result<User, DomainError> {
        let email = normalize_email(&credentials.email);
        if email.is_empty() || credentials.password.is_empty() {
            return Err(DomainError::validation(
                "credentials",
                "email and password are required",
            ));
        }

        let identity = self
            .auth
            .sign_in(&email, &credentials.password)
            .await
            .map_err(|e| match e {
                AuthError::InvalidCredentials => DomainError::InvalidCredentials,
                other => auth_backend_error(other),
            })?;

        let user = self
            .users
            .find_by_id(identity.id)
            .await
            .map_err(DomainError::backend)?
            .ok_or_else(|| DomainError::user_not_found(identity.id))?;

        info!(user_id = %user.id, "Signed in");
        Ok(user)
    }

    #[instrument(
        name = "marketplace.service.signup",
        skip(self, request),
        fields(email = %request.email)
    )]
    pub async fn signup(&self, request: SignupRequest) -> Result<User, DomainError> {
        let name = request.name.trim().to_string();
        let email = normalize_email(&request.email);
        self.validate_signup(&name, &email, &request.password)?;

        if self
            .users
            .email_exists(&email)
            .await
            .map_err(DomainError::backend)?
        {
            return Err(DomainError::email_already_exists(email));
        }

        let identity = self
            .auth
            .sign_up(&email, &request.password)
            .await
            .map_err(|e| match e {
                AuthError::AlreadyRegistered => DomainError::email_already_exists(email.clone()),
                other => auth_backend_error(other),
            })?;

        let user = User {
            id: identity.id,
            name,
            email,
            points: self.config.signup_points,
            reputation: 0.0,
            created_at: Utc::now(),
        };
        if let Err(e) = self.users.insert(user.clone()).await {
            // No profile means no usable session.
            if let Err(sign_out) = self.auth.sign_out().await {
                warn!(error = %sign_out, "Sign-out after failed profile insert failed");
            }
            return Err(DomainError::backend(e));
        }

        self.events.publish(&MarketplaceEvent::UserRegistered {
            id: user.id,
            at: user.created_at,
        });
        info!(user_id = %user.id, "Registered new member");
        Ok(user)
    }

    #[instrument(name = "marketplace.service.logout", skip(self))]
    pub async fn logout(&self) -> Result<(), DomainError> {
        self.auth.sign_out().await.map_err(auth_backend_error)?;
        debug!("Signed out");
        Ok(())
    }

    #[instrument(name = "marketplace.service.fetch_offers", skip(self))]
    pub async fn fetch_offers(&self) -> Result<Vec<Offer>, DomainError> {
        let offers = self
            .offers
            .list_active()
            .await
            .map_err(DomainError::backend)?;
        debug!(count = offers.len(), "Fetched active offers");
        Ok(offers)
    }

    #[instrument(
        name = "marketplace.service.add_offer",
        skip(self, actor, offer),
        fields(user_id = %actor.id)
    )]
    pub async fn add_offer(&self, actor: &User, offer: NewOffer) -> Result<Offer, DomainError> {
        let fields = normalize_offer(offer)?;
        let draft = OfferDraft {
            user_id: actor.id,
            fields,
            created_at: Utc::now(),
            is_active: true,
        };

        let created = self
            .offers
            .insert(draft)
            .await
            .map_err(DomainError::backend)?;

        self.events.publish(&MarketplaceEvent::OfferCreated {
            id: created.id,
            owner: created.user_id,
            at: created.created_at,
        });
        info!(offer_id = %created.id, "Published offer");
        Ok(created)
    }

    #[instrument(
        name = "marketplace.service.update_offer",
        skip(self, actor, offer),
        fields(user_id = %actor.id, offer_id = %offer.id)
    )]
    pub async fn update_offer(&self, actor: &User, offer: Offer) -> Result<Offer, DomainError> {
        let stored = self
            .offers
            .find_by_id(offer.id)
            .await
            .map_err(DomainError::backend)?
            .ok_or_else(|| DomainError::offer_not_found(offer.id))?;
        if stored.user_id != actor.id {
            return Err(DomainError::not_owner(offer.id, actor.id));
        }

        let fields = normalize_offer(NewOffer::from(&offer))?;
        let mut edited = stored;
        fields.apply_to(&mut edited);

        let updated = self
            .offers
            .update(&edited)
            .await
            .map_err(DomainError::backend)?
            .ok_or_else(|| DomainError::offer_not_found(offer.id))?;

        self.events.publish(&MarketplaceEvent::OfferUpdated {
            id: updated.id,
            owner: updated.user_id,
            at: Utc::now(),
        });
        info!("Updated offer");
        Ok(updated)
    }

    #[instrument(name = "marketplace.service.average_rating", skip(self))]
    pub async fn average_rating(&self, offer_id: Uuid) -> Result<RatingSummary, DomainError> {
        let votes = self
            .ratings
            .list_for_offer(offer_id)
            .await
            .map_err(DomainError::backend)?;
        Ok(rating::summarize(&votes))
    }

    /// Aggregates the votes received by every offer `user_id` authored.
    #[instrument(name = "marketplace.service.average_rating_by_user_id", skip(self))]
    pub async fn average_rating_by_user_id(
        &self,
        user_id: Uuid,
    ) -> Result<RatingSummary, DomainError> {
        let offer_ids = self
            .offers
            .list_ids_by_owner(user_id)
            .await
            .map_err(DomainError::backend)?;
        if offer_ids.is_empty() {
            return Ok(RatingSummary::default());
        }

        let votes = self
            .ratings
            .list_for_offers(&offer_ids)
            .await
            .map_err(DomainError::backend)?;
        Ok(rating::summarize(&votes))
    }

    #[instrument(name = "marketplace.service.user_rating", skip(self))]
    pub async fn user_rating(
        &self,
        offer_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<RatingValue>, DomainError> {
        let vote = self
            .ratings
            .find(offer_id, user_id)
            .await
            .map_err(DomainError::backend)?;
        Ok(vote.map(|r| r.value))
    }

    #[instrument(
        name = "marketplace.service.submit_rating",
        skip(self, actor),
        fields(user_id = %actor.id, value = value.get())
    )]
    pub async fn submit_rating(
        &self,
        actor: &User,
        offer_id: Uuid,
        value: RatingValue,
    ) -> Result<RatingSummary, DomainError> {
        let offer = self
            .offers
            .find_by_id(offer_id)
            .await
            .map_err(DomainError::backend)?
            .ok_or_else(|| DomainError::offer_not_found(offer_id))?;
        if offer.user_id == actor.id {
            return Err(DomainError::OwnOffer { offer_id });
        }

        self.ratings
            .upsert(Rating {
                offer_id,
                user_id: actor.id,
                value,
            })
            .await
            .map_err(DomainError::backend)?;

        self.events.publish(&MarketplaceEvent::RatingSubmitted {
            offer_id,
            rater: actor.id,
            value,
            at: Utc::now(),
        });
        info!("Rating saved");
        self.average_rating(offer_id).await
    }

    #[instrument(
        name = "marketplace.service.upload_image",
        skip(self, actor, image),
        fields(user_id = %actor.id, file_name = %image.file_name, size = image.bytes.len())
    )]
    pub async fn upload_image(
        &self,
        actor: &User,
        image: ImageUpload,
    ) -> Result<String, DomainError> {
        if !image.content_type.starts_with("image/") {
            return Err(DomainError::validation(
                "image",
                format!("unsupported content type '{}'", image.content_type),
            ));
        }
        if image.bytes.is_empty() {
            return Err(DomainError::validation("image", "file is empty"));
        }

        let path = format!(
            "{}/{}.{}",
            actor.id,
            Uuid::new_v4(),
            file_extension(&image.file_name)
        );
        let url = self
            .images
            .upload(&path, &image)
            .await
            .map_err(DomainError::backend)?;
        debug!(%path, "Stored image");
        Ok(url)
    }

    pub fn contact_link(&self, offer: &Offer) -> Result<String, DomainError> {
        contact::whatsapp_link(&self.config.contact, offer)
    }

    fn validate_signup(&self, name: &str, email: &str, password: &str) -> Result<(), DomainError> {
        if name.chars().count() < self.config.min_name_len {
            return Err(DomainError::validation(
                "name",
                format!(
                    "must be at least {} characters long",
                    self.config.min_name_len
                ),
            ));
        }
        if !email.contains('@') || !email.contains('.') {
            return Err(DomainError::validation("email", "invalid email address"));
        }
        if password.chars().count() < self.config.min_password_len {
            return Err(DomainError::validation(
                "password",
                format!(
                    "must be at least {} characters long",
                    self.config.min_password_len
                ),
            ));
        }
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn auth_backend_error(err: AuthError) -> DomainError {
    match err {
        AuthError::Backend(e) => DomainError::backend(e),
        other => DomainError::backend(other),
    }
}

/// Trim author-supplied fields and reject blanks.
fn normalize_offer(mut offer: NewOffer) -> Result<NewOffer, DomainError> {
    for (field, value) in [
        ("title", &mut offer.title),
        ("description", &mut offer.description),
        ("location", &mut offer.location),
        ("exchange_value", &mut offer.exchange_value),
        ("whatsapp_number", &mut offer.whatsapp_number),
    ] {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation(field, "is required"));
        }
        *value = trimmed.to_string();
    }
    if contact::phone_digits(&offer.whatsapp_number).is_empty() {
        return Err(DomainError::validation(
            "whatsapp_number",
            "must contain digits",
        ));
    }
    offer.image_url = offer
        .image_url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());
    Ok(offer)
}

/// Lower-cased extension of `file_name`, `bin` when there is none.
fn file_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "bin".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::OfferCategory;

    fn form() -> NewOffer {
        NewOffer {
            category: OfferCategory::Producto,
            title: "  Bicicleta  ".into(),
            description: "Rodado 26".into(),
            location: "Cusco".into(),
            image_url: Some("   ".into()),
            exchange_value: "Libros".into(),
            whatsapp_number: "+51 999 111 222".into(),
        }
    }

    #[test]
    fn extension_from_file_name() {
        assert_eq!(file_extension("photo.JPG"), "jpg");
        assert_eq!(file_extension("archive.tar.gz"), "gz");
        assert_eq!(file_extension("noext"), "bin");
        assert_eq!(file_extension("weird.!?"), "bin");
    }

    #[test]
    fn offer_fields_are_trimmed() {
        let offer = normalize_offer(form()).unwrap();
        assert_eq!(offer.title, "Bicicleta");
        assert_eq!(offer.image_url, None);
    }

    #[test]
    fn blank_required_field_is_rejected() {
        let mut bad = form();
        bad.location = "   ".into();
        match normalize_offer(bad) {
            Err(DomainError::Validation { field, .. }) => assert_eq!(field, "location"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn phone_without_digits_is_rejected() {
        let mut bad = form();
        bad.whatsapp_number = "call me".into();
        assert!(normalize_offer(bad).is_err());
    }

    #[test]
    fn email_is_normalized() {
        assert_eq!(normalize_email("  Ana@X.com "), "ana@x.com");
    }
}
