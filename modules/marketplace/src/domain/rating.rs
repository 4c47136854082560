use crate::contract::model::{Rating, RatingSummary};

/// Mean of `ratings`; 0 for an empty slice. Every input is 1..=5, so the
/// result stays within [0, 5].
pub fn summarize(ratings: &[Rating]) -> RatingSummary {
    if ratings.is_empty() {
        return RatingSummary::default();
    }
    let total: u32 = ratings.iter().map(|r| u32::from(r.value.get())).sum();
    RatingSummary {
        average: f64::from(total) / ratings.len() as f64,
        count: ratings.len(),
    }
}
