use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::page::{route, Page};
use crate::contract::{
    client::MarketplaceApi,
    error::MarketplaceError,
    model::{
        Credentials, ImageUpload, NewOffer, Offer, OfferFilter, RatingSummary, RatingValue,
        SignupRequest, User,
    },
};
use crate::domain::browse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// User-facing message left by the last command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub current_user: Option<User>,
    pub page: Page,
    pub offers: Vec<Offer>,
    pub selected_offer: Option<Offer>,
    pub notice: Option<Notice>,
}

/// Session context handed to every view. Views read snapshots and send
/// commands; the snapshot only changes when a command succeeds.
pub struct AppContext {
    api: Arc<dyn MarketplaceApi>,
    state: RwLock<SessionSnapshot>,
    signup_in_flight: AtomicBool,
}

/// Clears the sign-up flag when the attempt finishes, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl AppContext {
    pub fn new(api: Arc<dyn MarketplaceApi>) -> Self {
        Self {
            api,
            state: RwLock::new(SessionSnapshot::default()),
            signup_in_flight: AtomicBool::new(false),
        }
    }

    pub fn api(&self) -> &Arc<dyn MarketplaceApi> {
        &self.api
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.read().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.read().current_user.clone()
    }

    pub fn selected_offer(&self) -> Option<Offer> {
        self.state.read().selected_offer.clone()
    }

    /// The stored page after routing rules are applied.
    pub fn current_page(&self) -> Page {
        let s = self.state.read();
        route(
            s.page,
            s.current_user.is_some(),
            s.selected_offer.is_some(),
        )
    }

    pub fn navigate(&self, page: Page) -> Page {
        let mut s = self.state.write();
        s.page = route(page, s.current_user.is_some(), s.selected_offer.is_some());
        debug!(page = %s.page, "Navigated");
        s.page
    }

    pub fn select_offer(&self, offer: Offer) {
        let mut s = self.state.write();
        s.selected_offer = Some(offer);
        s.page = route(Page::OfferDetail, s.current_user.is_some(), true);
    }

    /// Open the editor with an empty form.
    pub fn start_new_offer(&self) {
        let mut s = self.state.write();
        s.selected_offer = None;
        s.page = route(Page::CreateOffer, s.current_user.is_some(), false);
    }

    /// Open the editor on one of the signed-in member's offers.
    pub fn edit_offer(&self, offer: Offer) -> Result<(), MarketplaceError> {
        let user = self.require_user()?;
        if offer.user_id != user.id {
            return Err(self.fail(MarketplaceError::NotOwner { offer_id: offer.id }));
        }
        let mut s = self.state.write();
        s.selected_offer = Some(offer);
        s.page = Page::CreateOffer;
        Ok(())
    }

    /// True when the editor page is showing an existing offer.
    pub fn is_editing(&self) -> bool {
        let s = self.state.read();
        match (&s.current_user, &s.selected_offer) {
            (Some(user), Some(offer)) => offer.user_id == user.id,
            _ => false,
        }
    }

    pub fn take_notice(&self) -> Option<Notice> {
        self.state.write().notice.take()
    }

    fn notify(&self, notice: Notice) {
        self.state.write().notice = Some(notice);
    }

    /// Record `err` as the session notice and hand it back.
    fn fail(&self, err: MarketplaceError) -> MarketplaceError {
        warn!(error = %err, "Command failed");
        self.notify(Notice::error(err.to_string()));
        err
    }

    fn require_user(&self) -> Result<User, MarketplaceError> {
        self.current_user()
            .ok_or_else(|| self.fail(MarketplaceError::Unauthenticated))
    }

    fn enter_session(&self, user: User) {
        let mut s = self.state.write();
        s.current_user = Some(user);
        s.selected_offer = None;
        s.page = Page::Dashboard;
    }

    /// Resume a session the backend still holds, e.g. on start-up.
    pub async fn restore_session(&self) -> Result<Option<User>, MarketplaceError> {
        match self.api.restore_session().await {
            Ok(Some(user)) => {
                info!(user_id = %user.id, "Session restored");
                self.enter_session(user.clone());
                self.fetch_offers().await;
                Ok(Some(user))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn login(&self, credentials: Credentials) -> Result<User, MarketplaceError> {
        let user = self.api.login(credentials).await.map_err(|e| self.fail(e))?;
        self.enter_session(user.clone());
        self.fetch_offers().await;
        Ok(user)
    }

    pub async fn signup(&self, request: SignupRequest) -> Result<User, MarketplaceError> {
        if self
            .signup_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(self.fail(MarketplaceError::validation(
                "A registration is already in progress",
            )));
        }
        let _guard = InFlight(&self.signup_in_flight);

        let user = self.api.signup(request).await.map_err(|e| self.fail(e))?;
        self.enter_session(user.clone());
        self.notify(Notice::info(format!(
            "Welcome, {}! You start with {} points.",
            user.name, user.points
        )));
        self.fetch_offers().await;
        Ok(user)
    }

    /// End the session. Local state is cleared even when the backend
    /// sign-out fails.
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "Backend sign-out failed");
        }
        let mut s = self.state.write();
        s.current_user = None;
        s.offers.clear();
        s.selected_offer = None;
        s.page = Page::Login;
    }

    /// Reload active offers. On failure the previous list stays in the
    /// snapshot, a notice is set and an empty list is returned.
    pub async fn fetch_offers(&self) -> Vec<Offer> {
        match self.api.fetch_offers().await {
            Ok(offers) => {
                let mut s = self.state.write();
                if let Some(selected) = s.selected_offer.as_ref().map(|o| o.id) {
                    if let Some(fresh) = offers.iter().find(|o| o.id == selected) {
                        s.selected_offer = Some(fresh.clone());
                    }
                }
                s.offers = offers.clone();
                offers
            }
            Err(e) => {
                self.fail(e);
                Vec::new()
            }
        }
    }

    pub async fn add_offer(&self, offer: NewOffer) -> Result<Offer, MarketplaceError> {
        let user = self.require_user()?;
        let created = self
            .api
            .add_offer(&user, offer)
            .await
            .map_err(|e| self.fail(e))?;

        let mut s = self.state.write();
        s.offers.insert(0, created.clone());
        s.selected_offer = Some(created.clone());
        s.page = Page::OfferDetail;
        s.notice = Some(Notice::info("Offer published"));
        Ok(created)
    }

    pub async fn update_offer(&self, offer: Offer) -> Result<Offer, MarketplaceError> {
        let user = self.require_user()?;
        let updated = self
            .api
            .update_offer(&user, offer)
            .await
            .map_err(|e| self.fail(e))?;

        let mut s = self.state.write();
        match s.offers.iter().position(|o| o.id == updated.id) {
            Some(i) => s.offers[i] = updated.clone(),
            None => s.offers.insert(0, updated.clone()),
        }
        s.selected_offer = Some(updated.clone());
        s.page = Page::OfferDetail;
        s.notice = Some(Notice::info("Offer updated"));
        Ok(updated)
    }

    /// Summary for one offer; an empty summary when the backend fails.
    pub async fn average_rating(&self, offer_id: Uuid) -> RatingSummary {
        self.api
            .average_rating(offer_id)
            .await
            .unwrap_or_else(|e| {
                self.fail(e);
                RatingSummary::default()
            })
    }

    /// Summary across every offer `user_id` authored.
    pub async fn average_rating_by_user_id(&self, user_id: Uuid) -> RatingSummary {
        self.api
            .average_rating_by_user_id(user_id)
            .await
            .unwrap_or_else(|e| {
                self.fail(e);
                RatingSummary::default()
            })
    }

    /// The signed-in member's vote on `offer_id`.
    pub async fn my_rating(&self, offer_id: Uuid) -> Option<RatingValue> {
        let user = self.current_user()?;
        self.api
            .user_rating(offer_id, user.id)
            .await
            .unwrap_or_else(|e| {
                self.fail(e);
                None
            })
    }

    pub async fn submit_rating(
        &self,
        offer_id: Uuid,
        value: u8,
    ) -> Result<RatingSummary, MarketplaceError> {
        let user = self.require_user()?;
        let value = RatingValue::new(value).map_err(|e| self.fail(e))?;
        let summary = self
            .api
            .submit_rating(&user, offer_id, value)
            .await
            .map_err(|e| self.fail(e))?;
        self.notify(Notice::info("Thanks for rating!"));
        Ok(summary)
    }

    pub async fn upload_image(&self, image: ImageUpload) -> Result<String, MarketplaceError> {
        let user = self.require_user()?;
        self.api
            .upload_image(&user, image)
            .await
            .map_err(|e| self.fail(e))
    }

    /// Loaded offers matching `filter`.
    pub fn browse(&self, filter: &OfferFilter) -> Vec<Offer> {
        browse::filter_offers(&self.state.read().offers, filter)
    }

    /// Loaded offers owned by the signed-in member.
    pub fn my_offers(&self) -> Vec<Offer> {
        let s = self.state.read();
        match &s.current_user {
            Some(user) => browse::offers_by_owner(&s.offers, user.id),
            None => Vec::new(),
        }
    }

    pub fn contact_link(&self, offer: &Offer) -> Result<String, MarketplaceError> {
        self.api.contact_link(offer).map_err(|e| self.fail(e))
    }
}
