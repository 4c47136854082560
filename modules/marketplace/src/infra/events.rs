use tracing::info;

use crate::domain::events::MarketplaceEvent;
use crate::domain::ports::EventPublisher;

/// Publishes domain events to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventPublisher;

impl EventPublisher<MarketplaceEvent> for TracingEventPublisher {
    fn publish(&self, event: &MarketplaceEvent) {
        match event {
            MarketplaceEvent::UserRegistered { id, at } => {
                info!(target: "marketplace::events", user_id = %id, %at, "user_registered");
            }
            MarketplaceEvent::OfferCreated { id, owner, at } => {
                info!(target: "marketplace::events", offer_id = %id, owner = %owner, %at, "offer_created");
            }
            MarketplaceEvent::OfferUpdated { id, owner, at } => {
                info!(target: "marketplace::events", offer_id = %id, owner = %owner, %at, "offer_updated");
            }
            MarketplaceEvent::RatingSubmitted {
                offer_id,
                rater,
                value,
                at,
            } => {
                info!(
                    target: "marketplace::events",
                    offer_id = %offer_id,
                    rater = %rater,
                    value = value.get(),
                    %at,
                    "rating_submitted"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tracing_test::traced_test;
    use uuid::Uuid;

    #[test]
    #[traced_test]
    fn events_are_logged() {
        TracingEventPublisher.publish(&MarketplaceEvent::UserRegistered {
            id: Uuid::nil(),
            at: Utc::now(),
        });
        assert!(logs_contain("user_registered"));
    }
}
