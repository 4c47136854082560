//! Client-side views over the fetched offer list.

use uuid::Uuid;

use crate::contract::model::{Offer, OfferFilter};

/// Offers matching `filter`: case-insensitive substring on title or
/// description, optional category, active only. Order is preserved.
pub fn filter_offers(offers: &[Offer], filter: &OfferFilter) -> Vec<Offer> {
    let needle = filter.search.trim().to_lowercase();
    offers
        .iter()
        .filter(|o| o.is_active)
        .filter(|o| filter.category.map_or(true, |c| o.category == c))
        .filter(|o| {
            needle.is_empty()
                || o.title.to_lowercase().contains(&needle)
                || o.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// The dashboard's "my offers" list.
pub fn offers_by_owner(offers: &[Offer], owner: Uuid) -> Vec<Offer> {
    offers.iter().filter(|o| o.user_id == owner).cloned().collect()
}
