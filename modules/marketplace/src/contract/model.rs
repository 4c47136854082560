use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::contract::error::MarketplaceError;

/// Registered member profile. Credentials never live here.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub points: i64,
    pub reputation: f64,
    pub created_at: DateTime<Utc>,
}

/// Kind of thing being offered. Closed set; the wire values are the
/// lower-case Spanish names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OfferCategory {
    Producto,
    Servicio,
    Conocimiento,
}

impl OfferCategory {
    pub const ALL: [OfferCategory; 3] = [Self::Producto, Self::Servicio, Self::Conocimiento];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Producto => "producto",
            Self::Servicio => "servicio",
            Self::Conocimiento => "conocimiento",
        }
    }
}

impl fmt::Display for OfferCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OfferCategory {
    type Err = MarketplaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| MarketplaceError::validation(format!("Unknown category: '{s}'")))
    }
}

/// A published listing available for barter.
#[derive(Debug, Clone, PartialEq)]
pub struct Offer {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Display name of the owner, joined in when offers are listed.
    pub user_name: String,
    pub category: OfferCategory,
    pub title: String,
    pub description: String,
    pub location: String,
    pub image_url: Option<String>,
    /// What the author wants in return.
    pub exchange_value: String,
    pub whatsapp_number: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Fields an author supplies when publishing (or editing) an offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOffer {
    pub category: OfferCategory,
    pub title: String,
    pub description: String,
    pub location: String,
    pub image_url: Option<String>,
    pub exchange_value: String,
    pub whatsapp_number: String,
}

impl NewOffer {
    /// Overwrite the author-editable fields of `offer` with this form.
    pub fn apply_to(self, offer: &mut Offer) {
        offer.category = self.category;
        offer.title = self.title;
        offer.description = self.description;
        offer.location = self.location;
        offer.image_url = self.image_url;
        offer.exchange_value = self.exchange_value;
        offer.whatsapp_number = self.whatsapp_number;
    }
}

impl From<&Offer> for NewOffer {
    fn from(offer: &Offer) -> Self {
        Self {
            category: offer.category,
            title: offer.title.clone(),
            description: offer.description.clone(),
            location: offer.location.clone(),
            image_url: offer.image_url.clone(),
            exchange_value: offer.exchange_value.clone(),
            whatsapp_number: offer.whatsapp_number.clone(),
        }
    }
}

/// Star rating, 1 to 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RatingValue(u8);

impl RatingValue {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, MarketplaceError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(MarketplaceError::validation(format!(
                "Rating must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for RatingValue {
    type Error = MarketplaceError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| MarketplaceError::validation(format!("Rating out of range: {value}")))
            .and_then(Self::new)
    }
}

/// One member's vote on one offer. Unique per (offer_id, user_id).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rating {
    pub offer_id: Uuid,
    pub user_id: Uuid,
    pub value: RatingValue,
}

/// Average and count of a set of ratings. `average` is 0 when `count` is 0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RatingSummary {
    pub average: f64,
    pub count: usize,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Raw image file picked by the author for an offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Browse filter: free-text search over title/description plus an optional
/// category (`None` means every category).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OfferFilter {
    pub search: String,
    pub category: Option<OfferCategory>,
}
