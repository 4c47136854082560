use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

use crate::contract::model::{ImageUpload, Offer, Rating, RatingValue, User};
use crate::domain::ports::{AuthError, AuthIdentity, AuthPort, ImageStore};
use crate::domain::repo::{OfferDraft, OffersRepository, RatingsRepository, UsersRepository};

const UNKNOWN_AUTHOR: &str = "Unknown";

/// Image URLs handed out by the memory store start with this prefix.
pub const IMAGE_URL_PREFIX: &str = "memory://images/";

#[derive(Debug, Clone)]
struct Account {
    id: Uuid,
    password: String,
}

#[derive(Default)]
struct Tables {
    /// Keyed by normalized email.
    accounts: HashMap<String, Account>,
    users: HashMap<Uuid, User>,
    /// Insertion order.
    offers: Vec<Offer>,
    ratings: HashMap<(Uuid, Uuid), RatingValue>,
    images: HashMap<String, ImageUpload>,
    session: Option<AuthIdentity>,
}

/// All marketplace ports over one set of locked tables.
#[derive(Default)]
pub struct MemoryBackend {
    tables: RwLock<Tables>,
    offline: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail as if the service were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> anyhow::Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            anyhow::bail!("memory backend is offline");
        }
        Ok(())
    }

    /// Register an account and its profile directly, bypassing the service.
    /// The email is stored trimmed and lower-cased, as sign-in looks it up.
    pub fn add_member(&self, name: &str, email: &str, password: &str, points: i64) -> User {
        let email = email.trim().to_lowercase();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.clone(),
            points,
            reputation: 0.0,
            created_at: Utc::now(),
        };
        let mut t = self.tables.write();
        t.accounts.insert(
            email,
            Account {
                id: user.id,
                password: password.to_string(),
            },
        );
        t.users.insert(user.id, user.clone());
        user
    }

    pub fn put_offer(&self, draft: OfferDraft) -> Offer {
        let mut t = self.tables.write();
        let offer = Offer {
            id: Uuid::new_v4(),
            user_id: draft.user_id,
            user_name: author_name(&t.users, draft.user_id),
            category: draft.fields.category,
            title: draft.fields.title,
            description: draft.fields.description,
            location: draft.fields.location,
            image_url: draft.fields.image_url,
            exchange_value: draft.fields.exchange_value,
            whatsapp_number: draft.fields.whatsapp_number,
            created_at: draft.created_at,
            is_active: draft.is_active,
        };
        t.offers.push(offer.clone());
        offer
    }

    pub fn put_rating(&self, rating: Rating) {
        self.tables
            .write()
            .ratings
            .insert((rating.offer_id, rating.user_id), rating.value);
    }

    /// Stored image behind a URL returned by [`ImageStore::upload`].
    pub fn image(&self, url: &str) -> Option<ImageUpload> {
        let path = url.strip_prefix(IMAGE_URL_PREFIX)?;
        self.tables.read().images.get(path).cloned()
    }

    pub fn session(&self) -> Option<AuthIdentity> {
        self.tables.read().session.clone()
    }
}

fn author_name(users: &HashMap<Uuid, User>, id: Uuid) -> String {
    users
        .get(&id)
        .map(|u| u.name.clone())
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
}

fn with_author(users: &HashMap<Uuid, User>, offer: &Offer) -> Offer {
    Offer {
        user_name: author_name(users, offer.user_id),
        ..offer.clone()
    }
}

#[async_trait]
impl UsersRepository for MemoryBackend {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        self.ensure_online()?;
        Ok(self.tables.read().users.get(&id).cloned())
    }

    async fn email_exists(&self, email: &str) -> anyhow::Result<bool> {
        self.ensure_online()?;
        Ok(self.tables.read().users.values().any(|u| u.email == email))
    }

    async fn insert(&self, user: User) -> anyhow::Result<()> {
        self.ensure_online()?;
        let mut t = self.tables.write();
        if t.users.contains_key(&user.id) {
            anyhow::bail!("profile {} already exists", user.id);
        }
        t.users.insert(user.id, user);
        Ok(())
    }
}

#[async_trait]
impl OffersRepository for MemoryBackend {
    async fn list_active(&self) -> anyhow::Result<Vec<Offer>> {
        self.ensure_online()?;
        let t = self.tables.read();
        let mut offers: Vec<Offer> = t
            .offers
            .iter()
            .rev()
            .filter(|o| o.is_active)
            .map(|o| with_author(&t.users, o))
            .collect();
        // Stable sort keeps later inserts first among equal timestamps.
        offers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(offers)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Offer>> {
        self.ensure_online()?;
        let t = self.tables.read();
        Ok(t
            .offers
            .iter()
            .find(|o| o.id == id)
            .map(|o| with_author(&t.users, o)))
    }

    async fn insert(&self, draft: OfferDraft) -> anyhow::Result<Offer> {
        self.ensure_online()?;
        Ok(self.put_offer(draft))
    }

    async fn update(&self, offer: &Offer) -> anyhow::Result<Option<Offer>> {
        self.ensure_online()?;
        let mut t = self.tables.write();
        let Some(slot) = t
            .offers
            .iter_mut()
            .find(|o| o.id == offer.id && o.user_id == offer.user_id)
        else {
            return Ok(None);
        };
        slot.category = offer.category;
        slot.title = offer.title.clone();
        slot.description = offer.description.clone();
        slot.location = offer.location.clone();
        slot.image_url = offer.image_url.clone();
        slot.exchange_value = offer.exchange_value.clone();
        slot.whatsapp_number = offer.whatsapp_number.clone();
        let updated = slot.clone();
        Ok(Some(with_author(&t.users, &updated)))
    }

    async fn list_ids_by_owner(&self, user_id: Uuid) -> anyhow::Result<Vec<Uuid>> {
        self.ensure_online()?;
        Ok(self
            .tables
            .read()
            .offers
            .iter()
            .filter(|o| o.user_id == user_id)
            .map(|o| o.id)
            .collect())
    }
}

#[async_trait]
impl RatingsRepository for MemoryBackend {
    async fn list_for_offer(&self, offer_id: Uuid) -> anyhow::Result<Vec<Rating>> {
        self.list_for_offers(&[offer_id]).await
    }

    async fn list_for_offers(&self, offer_ids: &[Uuid]) -> anyhow::Result<Vec<Rating>> {
        self.ensure_online()?;
        Ok(self
            .tables
            .read()
            .ratings
            .iter()
            .filter(|((offer_id, _), _)| offer_ids.contains(offer_id))
            .map(|(&(offer_id, user_id), &value)| Rating {
                offer_id,
                user_id,
                value,
            })
            .collect())
    }

    async fn find(&self, offer_id: Uuid, user_id: Uuid) -> anyhow::Result<Option<Rating>> {
        self.ensure_online()?;
        Ok(self
            .tables
            .read()
            .ratings
            .get(&(offer_id, user_id))
            .map(|&value| Rating {
                offer_id,
                user_id,
                value,
            }))
    }

    async fn upsert(&self, rating: Rating) -> anyhow::Result<()> {
        self.ensure_online()?;
        self.put_rating(rating);
        Ok(())
    }
}

#[async_trait]
impl AuthPort for MemoryBackend {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthIdentity, AuthError> {
        self.ensure_online()?;
        let mut t = self.tables.write();
        if t.accounts.contains_key(email) {
            return Err(AuthError::AlreadyRegistered);
        }
        let identity = AuthIdentity {
            id: Uuid::new_v4(),
            email: email.to_string(),
        };
        t.accounts.insert(
            email.to_string(),
            Account {
                id: identity.id,
                password: password.to_string(),
            },
        );
        t.session = Some(identity.clone());
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthIdentity, AuthError> {
        self.ensure_online()?;
        let mut t = self.tables.write();
        let identity = match t.accounts.get(email) {
            Some(account) if account.password == password => AuthIdentity {
                id: account.id,
                email: email.to_string(),
            },
            _ => return Err(AuthError::InvalidCredentials),
        };
        t.session = Some(identity.clone());
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.ensure_online()?;
        self.tables.write().session = None;
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<AuthIdentity>, AuthError> {
        self.ensure_online()?;
        Ok(self.session())
    }
}

#[async_trait]
impl ImageStore for MemoryBackend {
    async fn upload(&self, path: &str, image: &ImageUpload) -> anyhow::Result<String> {
        self.ensure_online()?;
        let mut t = self.tables.write();
        if t.images.contains_key(path) {
            anyhow::bail!("object '{path}' already exists");
        }
        t.images.insert(path.to_string(), image.clone());
        Ok(format!("{IMAGE_URL_PREFIX}{path}"))
    }
}
