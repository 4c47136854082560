use std::sync::Arc;

use anyhow::Result;
use uuid::Uuid;

use marketplace::{
    contract::{
        client::MarketplaceApi,
        error::MarketplaceError,
        model::{Credentials, ImageUpload, NewOffer, OfferCategory, RatingValue, SignupRequest, User},
    },
    domain::service::ServiceConfig,
    infra::memory::MemoryBackend,
    module::memory_client,
};

/// Empty backend plus a client over it.
fn create_test_client() -> (Arc<MemoryBackend>, Arc<dyn MarketplaceApi>) {
    let backend = Arc::new(MemoryBackend::new());
    let client = memory_client(backend.clone(), ServiceConfig::default());
    (backend, client)
}

fn signup_request(name: &str, email: &str, password: &str) -> SignupRequest {
    SignupRequest {
        name: name.into(),
        email: email.into(),
        password: password.into(),
    }
}

fn form(title: &str) -> NewOffer {
    NewOffer {
        category: OfferCategory::Servicio,
        title: title.into(),
        description: "Clases a domicilio".into(),
        location: "Lima".into(),
        image_url: None,
        exchange_value: "Frutas".into(),
        whatsapp_number: "+51 987 654 321".into(),
    }
}

async fn member(client: &Arc<dyn MarketplaceApi>, name: &str, email: &str) -> Result<User> {
    Ok(client.signup(signup_request(name, email, "secret1")).await?)
}

fn stars(v: u8) -> RatingValue {
    RatingValue::new(v).unwrap()
}

#[tokio::test]
async fn signup_creates_profile_with_points() -> Result<()> {
    let (backend, client) = create_test_client();

    let ana = client
        .signup(signup_request("Ana", "ana@x.com", "secret1"))
        .await?;
    assert_eq!(ana.name, "Ana");
    assert_eq!(ana.email, "ana@x.com");
    assert_eq!(ana.points, 100);
    assert_eq!(ana.reputation, 0.0);

    // Signed in right away.
    assert_eq!(backend.session().map(|s| s.id), Some(ana.id));
    assert_eq!(client.restore_session().await?, Some(ana));
    Ok(())
}

#[tokio::test]
async fn signup_with_taken_email_fails() -> Result<()> {
    let (_, client) = create_test_client();
    member(&client, "Ana", "ana@x.com").await?;

    let err = client
        .signup(signup_request("Ana Bis", " ANA@x.com ", "secret2"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        MarketplaceError::EmailTaken {
            email: "ana@x.com".into()
        }
    );
    Ok(())
}

#[tokio::test]
async fn signup_validates_fields() {
    let (_, client) = create_test_client();
    for request in [
        signup_request("A", "ana@x.com", "secret1"),
        signup_request("Ana", "ana-at-x", "secret1"),
        signup_request("Ana", "ana@x.com", "12345"),
    ] {
        let err = client.signup(request).await.unwrap_err();
        assert!(matches!(err, MarketplaceError::Validation { .. }), "{err:?}");
    }
}

#[tokio::test]
async fn login_matches_stored_credentials_only() -> Result<()> {
    let (backend, client) = create_test_client();
    let ana = member(&client, "Ana", "ana@x.com").await?;
    client.logout().await?;
    assert!(backend.session().is_none());

    let err = client
        .login(Credentials {
            email: "ana@x.com".into(),
            password: "wrong!".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err, MarketplaceError::InvalidCredentials);
    assert!(backend.session().is_none());

    let err = client
        .login(Credentials {
            email: "nobody@x.com".into(),
            password: "secret1".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err, MarketplaceError::InvalidCredentials);

    let user = client
        .login(Credentials {
            email: "Ana@X.com".into(),
            password: "secret1".into(),
        })
        .await?;
    assert_eq!(user.id, ana.id);
    Ok(())
}

#[tokio::test]
async fn add_offer_is_owned_and_active() -> Result<()> {
    let (_, client) = create_test_client();
    let ana = member(&client, "Ana", "ana@x.com").await?;

    let offer = client.add_offer(&ana, form("Clases de guitarra")).await?;
    assert_eq!(offer.user_id, ana.id);
    assert!(offer.is_active);
    assert_eq!(offer.user_name, "Ana");

    let listed = client.fetch_offers().await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], offer);
    Ok(())
}

#[tokio::test]
async fn add_offer_rejects_blank_fields() -> Result<()> {
    let (_, client) = create_test_client();
    let ana = member(&client, "Ana", "ana@x.com").await?;

    let mut bad = form("  ");
    bad.description = String::new();
    let err = client.add_offer(&ana, bad).await.unwrap_err();
    assert!(matches!(err, MarketplaceError::Validation { .. }));
    assert!(client.fetch_offers().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn offers_are_listed_newest_first() -> Result<()> {
    let (_, client) = create_test_client();
    let ana = member(&client, "Ana", "ana@x.com").await?;
    for title in ["uno", "dos", "tres"] {
        client.add_offer(&ana, form(title)).await?;
    }

    let titles: Vec<_> = client
        .fetch_offers()
        .await?
        .into_iter()
        .map(|o| o.title)
        .collect();
    assert_eq!(titles, ["tres", "dos", "uno"]);
    Ok(())
}

#[tokio::test]
async fn owner_can_update_offer() -> Result<()> {
    let (_, client) = create_test_client();
    let ana = member(&client, "Ana", "ana@x.com").await?;
    let offer = client.add_offer(&ana, form("Guitarra")).await?;

    let mut edited = offer.clone();
    edited.title = "Guitarra acústica".into();
    edited.category = OfferCategory::Producto;
    // Ignored: ownership, creation time and the active flag come from storage.
    edited.user_id = Uuid::new_v4();
    edited.is_active = false;

    let updated = client.update_offer(&ana, edited).await?;
    assert_eq!(updated.title, "Guitarra acústica");
    assert_eq!(updated.category, OfferCategory::Producto);
    assert_eq!(updated.user_id, ana.id);
    assert_eq!(updated.created_at, offer.created_at);
    assert!(updated.is_active);
    Ok(())
}

#[tokio::test]
async fn non_owner_update_is_rejected_and_changes_nothing() -> Result<()> {
    let (_, client) = create_test_client();
    let ana = member(&client, "Ana", "ana@x.com").await?;
    let bruno = member(&client, "Bruno", "bruno@x.com").await?;
    let offer = client.add_offer(&bruno, form("Bicicleta")).await?;

    let mut hijacked = offer.clone();
    hijacked.title = "Mía".into();
    let err = client.update_offer(&ana, hijacked).await.unwrap_err();
    assert_eq!(err, MarketplaceError::NotOwner { offer_id: offer.id });

    let stored = client.fetch_offers().await?;
    assert_eq!(stored, vec![offer]);
    Ok(())
}

#[tokio::test]
async fn update_of_missing_offer_is_not_found() -> Result<()> {
    let (_, client) = create_test_client();
    let ana = member(&client, "Ana", "ana@x.com").await?;
    let mut ghost = client.add_offer(&ana, form("Real")).await?;
    ghost.id = Uuid::new_v4();

    let err = client.update_offer(&ana, ghost.clone()).await.unwrap_err();
    assert_eq!(err, MarketplaceError::NotFound { id: ghost.id });
    Ok(())
}

#[tokio::test]
async fn average_rating_scenarios() -> Result<()> {
    let (_, client) = create_test_client();
    let owner = member(&client, "Olga", "olga@x.com").await?;
    let offer = client.add_offer(&owner, form("Pan casero")).await?;

    let empty = client.average_rating(offer.id).await?;
    assert_eq!(empty.average, 0.0);
    assert_eq!(empty.count, 0);

    let ana = member(&client, "Ana", "ana@x.com").await?;
    let bruno = member(&client, "Bruno", "bruno@x.com").await?;
    client.submit_rating(&ana, offer.id, stars(3)).await?;
    let summary = client.submit_rating(&bruno, offer.id, stars(5)).await?;
    assert_eq!(summary.average, 4.0);
    assert_eq!(summary.count, 2);
    Ok(())
}

#[tokio::test]
async fn second_vote_replaces_the_first() -> Result<()> {
    let (_, client) = create_test_client();
    let owner = member(&client, "Olga", "olga@x.com").await?;
    let offer = client.add_offer(&owner, form("Pan casero")).await?;
    let ana = member(&client, "Ana", "ana@x.com").await?;

    client.submit_rating(&ana, offer.id, stars(2)).await?;
    let summary = client.submit_rating(&ana, offer.id, stars(5)).await?;
    assert_eq!(summary.count, 1);
    assert_eq!(summary.average, 5.0);
    assert_eq!(client.user_rating(offer.id, ana.id).await?, Some(stars(5)));
    Ok(())
}

#[tokio::test]
async fn authors_cannot_rate_their_own_offer() -> Result<()> {
    let (_, client) = create_test_client();
    let owner = member(&client, "Olga", "olga@x.com").await?;
    let offer = client.add_offer(&owner, form("Pan casero")).await?;

    let err = client
        .submit_rating(&owner, offer.id, stars(5))
        .await
        .unwrap_err();
    assert!(matches!(err, MarketplaceError::Validation { .. }));
    assert_eq!(client.average_rating(offer.id).await?.count, 0);
    Ok(())
}

#[tokio::test]
async fn rating_by_user_aggregates_their_offers() -> Result<()> {
    let (_, client) = create_test_client();
    let owner = member(&client, "Olga", "olga@x.com").await?;
    let first = client.add_offer(&owner, form("Pan")).await?;
    let second = client.add_offer(&owner, form("Queso")).await?;
    let ana = member(&client, "Ana", "ana@x.com").await?;
    let other = client.add_offer(&ana, form("Miel")).await?;

    client.submit_rating(&ana, first.id, stars(2)).await?;
    client.submit_rating(&ana, second.id, stars(4)).await?;
    // Olga's vote on Ana's offer does not count towards Olga.
    client.submit_rating(&owner, other.id, stars(1)).await?;

    let by_owner = client.average_rating_by_user_id(owner.id).await?;
    assert_eq!(by_owner.count, 2);
    assert_eq!(by_owner.average, 3.0);

    let nobody = client.average_rating_by_user_id(Uuid::new_v4()).await?;
    assert_eq!(nobody.count, 0);
    Ok(())
}

#[tokio::test]
async fn upload_image_stores_under_member_folder() -> Result<()> {
    let (backend, client) = create_test_client();
    let ana = member(&client, "Ana", "ana@x.com").await?;

    let image = ImageUpload {
        file_name: "foto.PNG".into(),
        content_type: "image/png".into(),
        bytes: vec![0x89, 0x50, 0x4e, 0x47],
    };
    let url = client.upload_image(&ana, image.clone()).await?;
    assert!(url.contains(&ana.id.to_string()));
    assert!(url.ends_with(".png"));
    assert_eq!(backend.image(&url), Some(image));

    let err = client
        .upload_image(
            &ana,
            ImageUpload {
                file_name: "notes.txt".into(),
                content_type: "text/plain".into(),
                bytes: b"hola".to_vec(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, MarketplaceError::Validation { .. }));
    Ok(())
}

#[tokio::test]
async fn backend_outage_is_unavailable() -> Result<()> {
    let (backend, client) = create_test_client();
    backend.set_offline(true);

    let err = client.fetch_offers().await.unwrap_err();
    assert!(matches!(err, MarketplaceError::Unavailable { .. }));
    Ok(())
}

#[tokio::test]
async fn contact_link_uses_owner_phone() -> Result<()> {
    let (_, client) = create_test_client();
    let ana = member(&client, "Ana", "ana@x.com").await?;
    let offer = client.add_offer(&ana, form("Guitarra")).await?;

    let link = client.contact_link(&offer)?;
    assert!(link.starts_with("https://web.whatsapp.com/send?phone=51987654321&text="));
    Ok(())
}
