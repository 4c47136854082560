//! Outbound deep link to the messaging app, pre-filled with a greeting.

use crate::contract::model::Offer;
use crate::domain::error::DomainError;

/// Link template. `{title}` and `{app}` are substituted in `message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactTemplate {
    pub base_url: String,
    pub app_name: String,
    pub message: String,
}

impl Default for ContactTemplate {
    fn default() -> Self {
        Self {
            base_url: "https://web.whatsapp.com/send".to_string(),
            app_name: "TruequeAndo".to_string(),
            message: "¡Hola! Vi tu oferta \"{title}\" en {app} y me interesa hacer un \
                      intercambio. ¿Podríamos coordinar los detalles?"
                .to_string(),
        }
    }
}

/// Digits of a phone number as typed by the author: separators, spaces and
/// the leading `+` are dropped.
pub fn phone_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

pub fn whatsapp_link(template: &ContactTemplate, offer: &Offer) -> Result<String, DomainError> {
    let phone = phone_digits(&offer.whatsapp_number);
    if phone.is_empty() {
        return Err(DomainError::validation(
            "whatsapp_number",
            "offer has no contact number",
        ));
    }

    let text = template
        .message
        .replace("{title}", &offer.title)
        .replace("{app}", &template.app_name);
    let sep = if template.base_url.contains('?') { '&' } else { '?' };

    Ok(format!(
        "{}{sep}phone={phone}&text={}",
        template.base_url,
        urlencoding::encode(&text)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::OfferCategory;
    use chrono::Utc;
    use uuid::Uuid;

    fn offer_with_phone(phone: &str) -> Offer {
        Offer {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            user_name: "Ana".into(),
            category: OfferCategory::Servicio,
            title: "Clases de guitarra".into(),
            description: "Nivel inicial".into(),
            location: "Lima".into(),
            image_url: None,
            exchange_value: "Verduras".into(),
            whatsapp_number: phone.into(),
            created_at: Utc::now(),
            is_active: true,
        }
    }

    #[test]
    fn phone_keeps_digits_only() {
        assert_eq!(phone_digits("+51 987 654 321"), "51987654321");
        assert_eq!(phone_digits("(01) 234-5678"), "012345678");
    }

    #[test]
    fn link_carries_phone_and_encoded_message() {
        let link =
            whatsapp_link(&ContactTemplate::default(), &offer_with_phone("+51 987 654 321"))
                .unwrap();

        assert!(link.starts_with("https://web.whatsapp.com/send?phone=51987654321&text="));
        assert!(link.contains("Clases%20de%20guitarra"));
        assert!(link.contains("TruequeAndo"));
        assert!(!link.contains(' '));
    }

    #[test]
    fn custom_template_and_base_with_query() {
        let template = ContactTemplate {
            base_url: "https://wa.example/send?lang=es".into(),
            app_name: "Demo".into(),
            message: "{title} @ {app}".into(),
        };
        let link = whatsapp_link(&template, &offer_with_phone("999")).unwrap();
        assert_eq!(
            link,
            "https://wa.example/send?lang=es&phone=999&text=Clases%20de%20guitarra%20%40%20Demo"
        );
    }

    #[test]
    fn missing_phone_is_a_validation_error() {
        let err = whatsapp_link(&ContactTemplate::default(), &offer_with_phone("+ ")).unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}
