//! Row shapes of the hosted tables and their mapping to the contract model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contract::model::{NewOffer, Offer, OfferCategory, Rating, RatingValue, User};

/// Columns requested for offers, with the author's name joined in.
pub const OFFER_SELECT: &str = "id,user_id,title,description,category,location,image_url,\
whatsapp,exchange_value,created_at,is_active,users(name)";

pub const RATING_SELECT: &str = "offer_id,user_id,rating";

const UNKNOWN_AUTHOR: &str = "Unknown";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Null until the profile is credited.
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub reputation: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            points: row.points.unwrap_or_default(),
            reputation: row.reputation.unwrap_or_default(),
            created_at: row.created_at,
        }
    }
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            points: Some(user.points),
            reputation: Some(user.reputation),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdRow {
    pub id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorRow {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OfferRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    // Nullable columns: absent and null both decode to `None`.
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub exchange_value: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub users: Option<AuthorRow>,
}

impl TryFrom<OfferRow> for Offer {
    type Error = anyhow::Error;

    fn try_from(row: OfferRow) -> Result<Self, Self::Error> {
        let category: OfferCategory = row
            .category
            .parse()
            .map_err(|e| anyhow::anyhow!("offer {}: {e}", row.id))?;
        let user_name = row
            .users
            .and_then(|a| a.name)
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            user_name,
            category,
            title: row.title,
            description: row.description.unwrap_or_default(),
            location: row.location.unwrap_or_default(),
            image_url: row.image_url.filter(|u| !u.is_empty()),
            exchange_value: row.exchange_value.unwrap_or_default(),
            whatsapp_number: row.whatsapp.unwrap_or_default(),
            created_at: row.created_at,
            is_active: row.is_active.unwrap_or(true),
        })
    }
}

/// Body of an offer insert.
#[derive(Debug, Clone, Serialize)]
pub struct OfferInsertRow<'a> {
    pub user_id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'static str,
    pub location: &'a str,
    pub image_url: Option<&'a str>,
    pub whatsapp: &'a str,
    pub exchange_value: &'a str,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

impl<'a> OfferInsertRow<'a> {
    pub fn new(
        user_id: Uuid,
        fields: &'a NewOffer,
        created_at: DateTime<Utc>,
        is_active: bool,
    ) -> Self {
        Self {
            user_id,
            title: &fields.title,
            description: &fields.description,
            category: fields.category.as_str(),
            location: &fields.location,
            image_url: fields.image_url.as_deref(),
            whatsapp: &fields.whatsapp_number,
            exchange_value: &fields.exchange_value,
            created_at,
            is_active,
        }
    }
}

/// Body of an offer update: author-editable columns only.
#[derive(Debug, Clone, Serialize)]
pub struct OfferUpdateRow<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'static str,
    pub location: &'a str,
    pub image_url: Option<&'a str>,
    pub whatsapp: &'a str,
    pub exchange_value: &'a str,
}

impl<'a> From<&'a Offer> for OfferUpdateRow<'a> {
    fn from(offer: &'a Offer) -> Self {
        Self {
            title: &offer.title,
            description: &offer.description,
            category: offer.category.as_str(),
            location: &offer.location,
            image_url: offer.image_url.as_deref(),
            whatsapp: &offer.whatsapp_number,
            exchange_value: &offer.exchange_value,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingRow {
    pub offer_id: Uuid,
    pub user_id: Uuid,
    pub rating: i64,
}

impl TryFrom<RatingRow> for Rating {
    type Error = anyhow::Error;

    fn try_from(row: RatingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            offer_id: row.offer_id,
            user_id: row.user_id,
            value: RatingValue::try_from(row.rating)?,
        })
    }
}

impl From<Rating> for RatingRow {
    fn from(r: Rating) -> Self {
        Self {
            offer_id: r.offer_id,
            user_id: r.user_id,
            rating: i64::from(r.value.get()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthUserRow {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Password grant response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub user: AuthUserRow,
}

/// Sign-up answers with a session when e-mail confirmation is off, and with
/// the bare user otherwise.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user: Option<AuthUserRow>,
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordCredentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn offer_json(users: serde_json::Value) -> serde_json::Value {
        json!({
            "id": "6f2c1c8e-8d7e-4a5b-9a57-2f0f1f7e2a10",
            "user_id": "0b8f1c2e-1111-4a5b-9a57-2f0f1f7e2a10",
            "title": "Bicicleta",
            "description": "Rodado 26",
            "category": "producto",
            "location": "Cusco",
            "image_url": null,
            "whatsapp": "+51 999",
            "exchange_value": "Libros",
            "created_at": "2024-05-01T10:00:00+00:00",
            "is_active": true,
            "users": users
        })
    }

    #[test]
    fn offer_row_maps_author_name() {
        let row: OfferRow = serde_json::from_value(offer_json(json!({ "name": "Ana" }))).unwrap();
        let offer = Offer::try_from(row).unwrap();
        assert_eq!(offer.user_name, "Ana");
        assert_eq!(offer.category, OfferCategory::Producto);
        assert_eq!(offer.whatsapp_number, "+51 999");
    }

    #[test]
    fn missing_author_is_unknown() {
        let row: OfferRow = serde_json::from_value(offer_json(json!(null))).unwrap();
        assert_eq!(Offer::try_from(row).unwrap().user_name, "Unknown");
    }

    #[test]
    fn bad_category_is_rejected() {
        let mut value = offer_json(json!(null));
        value["category"] = json!("otro");
        let row: OfferRow = serde_json::from_value(value).unwrap();
        assert!(Offer::try_from(row).is_err());
    }

    #[test]
    fn null_offer_columns_fall_back_to_defaults() {
        let mut value = offer_json(json!({ "name": "Ana" }));
        for column in ["description", "location", "whatsapp", "exchange_value", "is_active"] {
            value[column] = json!(null);
        }
        let row: OfferRow = serde_json::from_value(value).unwrap();
        let offer = Offer::try_from(row).unwrap();
        assert_eq!(offer.description, "");
        assert_eq!(offer.whatsapp_number, "");
        assert!(offer.is_active);
    }

    #[test]
    fn null_profile_counters_read_as_zero() {
        let row: UserRow = serde_json::from_value(json!({
            "id": "0b8f1c2e-1111-4a5b-9a57-2f0f1f7e2a10",
            "name": "Ana",
            "email": "ana@x.com",
            "points": null,
            "reputation": null,
            "created_at": "2024-05-01T10:00:00+00:00"
        }))
        .unwrap();
        let user = User::from(row);
        assert_eq!(user.points, 0);
        assert_eq!(user.reputation, 0.0);
    }

    #[test]
    fn rating_row_out_of_range_is_rejected() {
        let row = RatingRow {
            offer_id: Uuid::nil(),
            user_id: Uuid::nil(),
            rating: 9,
        };
        assert!(Rating::try_from(row).is_err());
    }
}
