use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::contract::model::RatingValue;

/// Transport-agnostic domain event.
#[derive(Debug, Clone, PartialEq)]
pub enum MarketplaceEvent {
    UserRegistered {
        id: Uuid,
        at: DateTime<Utc>,
    },
    OfferCreated {
        id: Uuid,
        owner: Uuid,
        at: DateTime<Utc>,
    },
    OfferUpdated {
        id: Uuid,
        owner: Uuid,
        at: DateTime<Utc>,
    },
    RatingSubmitted {
        offer_id: Uuid,
        rater: Uuid,
        value: RatingValue,
        at: DateTime<Utc>,
    },
}
