use chrono::{Duration, Utc};

use crate::contract::model::{NewOffer, OfferCategory, Rating, RatingValue};
use crate::domain::repo::OfferDraft;

use super::MemoryBackend;

/// Password shared by every demo member.
pub const DEMO_PASSWORD: &str = "trueque123";

/// Two members, three offers and a handful of votes, so the demo has
/// something to browse on first start.
pub fn seed_demo_data(backend: &MemoryBackend, signup_points: i64) {
    let maria = backend.add_member(
        "María Quispe",
        "maria@trueque.demo",
        DEMO_PASSWORD,
        signup_points,
    );
    let carlos = backend.add_member(
        "Carlos Rojas",
        "carlos@trueque.demo",
        DEMO_PASSWORD,
        signup_points,
    );

    let now = Utc::now();

    let weaving = backend.put_offer(OfferDraft {
        user_id: maria.id,
        fields: offer(
            OfferCategory::Conocimiento,
            "Clases de tejido en telar",
            "Enseño técnicas básicas de tejido andino, cuatro sesiones.",
            "Cusco",
            "Verduras orgánicas",
            "+51 984 000 111",
        ),
        created_at: now - Duration::days(3),
        is_active: true,
    });
    let bike = backend.put_offer(OfferDraft {
        user_id: carlos.id,
        fields: offer(
            OfferCategory::Producto,
            "Bicicleta de montaña",
            "Rodado 26, frenos nuevos, poco uso.",
            "Arequipa",
            "Herramientas de carpintería",
            "+51 959 222 333",
        ),
        created_at: now - Duration::days(2),
        is_active: true,
    });
    backend.put_offer(OfferDraft {
        user_id: carlos.id,
        fields: offer(
            OfferCategory::Servicio,
            "Reparación de computadoras",
            "Formateo, limpieza y cambio de piezas a domicilio.",
            "Arequipa",
            "Clases de inglés",
            "+51 959 222 333",
        ),
        created_at: now - Duration::hours(6),
        is_active: true,
    });

    for (offer_id, rater, value) in [(weaving.id, carlos.id, 5), (bike.id, maria.id, 4)] {
        if let Ok(value) = RatingValue::new(value) {
            backend.put_rating(Rating {
                offer_id,
                user_id: rater,
                value,
            });
        }
    }
}

fn offer(
    category: OfferCategory,
    title: &str,
    description: &str,
    location: &str,
    wants: &str,
    phone: &str,
) -> NewOffer {
    NewOffer {
        category,
        title: title.to_string(),
        description: description.to_string(),
        location: location.to_string(),
        image_url: None,
        exchange_value: wants.to_string(),
        whatsapp_number: phone.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repo::{OffersRepository, RatingsRepository};

    #[tokio::test]
    async fn seeds_browsable_data() {
        let backend = MemoryBackend::new();
        seed_demo_data(&backend, 100);

        let offers = backend.list_active().await.unwrap();
        assert_eq!(offers.len(), 3);
        assert_eq!(offers[0].title, "Reparación de computadoras");
        assert!(offers.iter().all(|o| o.user_name != "Unknown"));

        let votes = backend.list_for_offer(offers[2].id).await.unwrap();
        assert_eq!(votes.len(), 1);
    }
}
