use modkit::TracedClient;
use parking_lot::RwLock;
use reqwest::{header, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("{what}: request failed: {source}")]
    Transport {
        what: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{what}: backend answered {status}: {body}")]
    Status {
        what: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("{what}: unexpected response body: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid backend url: {0}")]
    Url(String),
}

/// Connection to the hosted backend. Holds the access token of the signed-in
/// member; requests fall back to the anonymous key when there is none.
pub struct BackendClient {
    base: Url,
    anon_key: String,
    bucket: String,
    http: TracedClient,
    access_token: RwLock<Option<String>>,
}

impl BackendClient {
    pub fn new(
        base_url: &str,
        anon_key: impl Into<String>,
        bucket: impl Into<String>,
        http: TracedClient,
    ) -> Result<Self, RemoteError> {
        let base = Url::parse(base_url).map_err(|e| RemoteError::Url(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(RemoteError::Url(base_url.to_string()));
        }
        Ok(Self {
            base,
            anon_key: anon_key.into(),
            bucket: bucket.into(),
            http,
            access_token: RwLock::new(None),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn set_access_token(&self, token: Option<String>) {
        *self.access_token.write() = token;
    }

    pub fn access_token(&self) -> Option<String> {
        self.access_token.read().clone()
    }

    /// `base` joined with `segments`; each segment is escaped individually.
    pub fn endpoint<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, RemoteError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::Url(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Table endpoint under `/rest/v1`.
    pub fn table(&self, name: &str) -> Result<Url, RemoteError> {
        self.endpoint(["rest", "v1", name])
    }

    /// Request with the key and bearer headers every endpoint expects.
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let bearer = self
            .access_token()
            .unwrap_or_else(|| self.anon_key.clone());
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .header(header::AUTHORIZATION, format!("Bearer {bearer}"))
    }

    /// Send and turn non-success statuses into [`RemoteError::Status`].
    pub async fn send(
        &self,
        builder: RequestBuilder,
        what: &'static str,
    ) -> Result<Response, RemoteError> {
        let response = self
            .http
            .send(builder)
            .await
            .map_err(|source| RemoteError::Transport { what, source })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::Status { what, status, body })
    }

    pub async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        what: &'static str,
    ) -> Result<T, RemoteError> {
        self.send(builder, what)
            .await?
            .json::<T>()
            .await
            .map_err(|source| RemoteError::Decode { what, source })
    }

    /// Public URL of an object in the image bucket.
    pub fn public_object_url(&self, path: &str) -> Result<Url, RemoteError> {
        self.endpoint(
            ["storage", "v1", "object", "public", self.bucket.as_str()]
                .into_iter()
                .chain(path.split('/')),
        )
    }
}
