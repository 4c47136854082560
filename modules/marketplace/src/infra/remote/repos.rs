use async_trait::async_trait;
use reqwest::Method;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use super::client::BackendClient;
use super::rows::{
    IdRow, OfferInsertRow, OfferRow, OfferUpdateRow, RatingRow, UserRow, OFFER_SELECT,
    RATING_SELECT,
};
use crate::contract::model::{Offer, Rating, User};
use crate::domain::repo::{OfferDraft, OffersRepository, RatingsRepository, UsersRepository};

const PREFER: &str = "Prefer";

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

pub struct RemoteUsersRepository {
    client: Arc<BackendClient>,
}

impl RemoteUsersRepository {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UsersRepository for RemoteUsersRepository {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let mut url = self.client.table("users")?;
        url.query_pairs_mut()
            .append_pair("select", "id,name,email,points,reputation,created_at")
            .append_pair("id", &eq(id));
        let rows: Vec<UserRow> = self
            .client
            .send_json(self.client.request(Method::GET, url), "load profile")
            .await?;
        Ok(rows.into_iter().next().map(User::from))
    }

    async fn email_exists(&self, email: &str) -> anyhow::Result<bool> {
        let mut url = self.client.table("users")?;
        url.query_pairs_mut()
            .append_pair("select", "id")
            .append_pair("email", &eq(email))
            .append_pair("limit", "1");
        let rows: Vec<IdRow> = self
            .client
            .send_json(self.client.request(Method::GET, url), "check email")
            .await?;
        Ok(!rows.is_empty())
    }

    async fn insert(&self, user: User) -> anyhow::Result<()> {
        let url = self.client.table("users")?;
        let builder = self
            .client
            .request(Method::POST, url)
            .header(PREFER, "return=minimal")
            .json(&UserRow::from(&user));
        self.client.send(builder, "create profile").await?;
        Ok(())
    }
}

pub struct RemoteOffersRepository {
    client: Arc<BackendClient>,
}

impl RemoteOffersRepository {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }
}

/// Rows that fail to map are logged and skipped so one bad record does not
/// hide the rest of the listing.
fn offers_from_rows(rows: Vec<OfferRow>) -> Vec<Offer> {
    rows.into_iter()
        .filter_map(|row| match Offer::try_from(row) {
            Ok(offer) => Some(offer),
            Err(e) => {
                warn!(error = %e, "Skipping malformed offer row");
                None
            }
        })
        .collect()
}

#[async_trait]
impl OffersRepository for RemoteOffersRepository {
    async fn list_active(&self) -> anyhow::Result<Vec<Offer>> {
        let mut url = self.client.table("offers")?;
        url.query_pairs_mut()
            .append_pair("select", OFFER_SELECT)
            .append_pair("is_active", "eq.true")
            .append_pair("order", "created_at.desc");
        let rows: Vec<OfferRow> = self
            .client
            .send_json(self.client.request(Method::GET, url), "list offers")
            .await?;
        Ok(offers_from_rows(rows))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Offer>> {
        let mut url = self.client.table("offers")?;
        url.query_pairs_mut()
            .append_pair("select", OFFER_SELECT)
            .append_pair("id", &eq(id));
        let rows: Vec<OfferRow> = self
            .client
            .send_json(self.client.request(Method::GET, url), "load offer")
            .await?;
        rows.into_iter().next().map(Offer::try_from).transpose()
    }

    async fn insert(&self, draft: OfferDraft) -> anyhow::Result<Offer> {
        let mut url = self.client.table("offers")?;
        url.query_pairs_mut().append_pair("select", OFFER_SELECT);
        let body = OfferInsertRow::new(
            draft.user_id,
            &draft.fields,
            draft.created_at,
            draft.is_active,
        );
        let builder = self
            .client
            .request(Method::POST, url)
            .header(PREFER, "return=representation")
            .json(&body);
        let rows: Vec<OfferRow> = self.client.send_json(builder, "create offer").await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("create offer: empty representation"))?;
        Offer::try_from(row)
    }

    async fn update(&self, offer: &Offer) -> anyhow::Result<Option<Offer>> {
        let mut url = self.client.table("offers")?;
        url.query_pairs_mut()
            .append_pair("id", &eq(offer.id))
            .append_pair("user_id", &eq(offer.user_id))
            .append_pair("select", OFFER_SELECT);
        let builder = self
            .client
            .request(Method::PATCH, url)
            .header(PREFER, "return=representation")
            .json(&OfferUpdateRow::from(offer));
        let rows: Vec<OfferRow> = self.client.send_json(builder, "update offer").await?;
        rows.into_iter().next().map(Offer::try_from).transpose()
    }

    async fn list_ids_by_owner(&self, user_id: Uuid) -> anyhow::Result<Vec<Uuid>> {
        let mut url = self.client.table("offers")?;
        url.query_pairs_mut()
            .append_pair("select", "id")
            .append_pair("user_id", &eq(user_id));
        let rows: Vec<IdRow> = self
            .client
            .send_json(self.client.request(Method::GET, url), "list own offers")
            .await?;
        Ok(rows.into_iter().map(|r| r.id).collect())
    }
}

pub struct RemoteRatingsRepository {
    client: Arc<BackendClient>,
}

impl RemoteRatingsRepository {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }

    async fn query(&self, filters: &[(&str, String)]) -> anyhow::Result<Vec<Rating>> {
        let mut url = self.client.table("ratings")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("select", RATING_SELECT);
            for (column, filter) in filters {
                query.append_pair(column, filter);
            }
        }
        let rows: Vec<RatingRow> = self
            .client
            .send_json(self.client.request(Method::GET, url), "list ratings")
            .await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| match Rating::try_from(row) {
                Ok(rating) => Some(rating),
                Err(e) => {
                    warn!(error = %e, "Dropping out-of-range rating row");
                    None
                }
            })
            .collect())
    }
}

#[async_trait]
impl RatingsRepository for RemoteRatingsRepository {
    async fn list_for_offer(&self, offer_id: Uuid) -> anyhow::Result<Vec<Rating>> {
        self.query(&[("offer_id", eq(offer_id))]).await
    }

    async fn list_for_offers(&self, offer_ids: &[Uuid]) -> anyhow::Result<Vec<Rating>> {
        if offer_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = offer_ids.iter().map(Uuid::to_string).collect();
        self.query(&[("offer_id", format!("in.({})", ids.join(",")))])
            .await
    }

    async fn find(&self, offer_id: Uuid, user_id: Uuid) -> anyhow::Result<Option<Rating>> {
        let votes = self
            .query(&[("offer_id", eq(offer_id)), ("user_id", eq(user_id))])
            .await?;
        Ok(votes.into_iter().next())
    }

    async fn upsert(&self, rating: Rating) -> anyhow::Result<()> {
        let mut url = self.client.table("ratings")?;
        url.query_pairs_mut()
            .append_pair("on_conflict", "offer_id,user_id");
        let builder = self
            .client
            .request(Method::POST, url)
            .header(PREFER, "resolution=merge-duplicates,return=minimal")
            .json(&[RatingRow::from(rating)]);
        self.client.send(builder, "save rating").await?;
        Ok(())
    }
}
