use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use std::sync::Arc;
use tracing::{debug, warn};

use super::client::{BackendClient, RemoteError};
use super::rows::{AuthUserRow, PasswordCredentials, SignupResponse, TokenResponse};
use crate::domain::ports::{AuthError, AuthIdentity, AuthPort};

/// Password authentication against the hosted auth service. The access
/// token of the signed-in member is kept on the shared [`BackendClient`].
pub struct RemoteAuth {
    client: Arc<BackendClient>,
}

impl RemoteAuth {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }
}

fn identity(row: AuthUserRow, fallback_email: &str) -> AuthIdentity {
    AuthIdentity {
        id: row.id,
        email: row.email.unwrap_or_else(|| fallback_email.to_string()),
    }
}

fn is_already_registered(status: StatusCode, body: &str) -> bool {
    status == StatusCode::UNPROCESSABLE_ENTITY
        || body.to_ascii_lowercase().contains("already registered")
}

#[async_trait]
impl AuthPort for RemoteAuth {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthIdentity, AuthError> {
        let url = self.client.endpoint(["auth", "v1", "signup"]).map_err(anyhow::Error::from)?;
        let builder = self
            .client
            .request(Method::POST, url)
            .json(&PasswordCredentials { email, password });

        let response: SignupResponse = match self.client.send_json(builder, "sign up").await {
            Ok(r) => r,
            Err(RemoteError::Status { status, body, .. }) if is_already_registered(status, &body) => {
                return Err(AuthError::AlreadyRegistered)
            }
            Err(e) => return Err(AuthError::Backend(e.into())),
        };

        let user = match (response.user, response.id) {
            (Some(user), _) => user,
            (None, Some(id)) => AuthUserRow {
                id,
                email: response.email,
            },
            (None, None) => {
                return Err(AuthError::Backend(anyhow::anyhow!(
                    "sign up: response carries no user"
                )))
            }
        };
        if response.access_token.is_none() {
            debug!("Sign-up returned no session; confirmation may be pending");
        }
        self.client.set_access_token(response.access_token);
        Ok(identity(user, email))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthIdentity, AuthError> {
        let mut url = self.client.endpoint(["auth", "v1", "token"]).map_err(anyhow::Error::from)?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let builder = self
            .client
            .request(Method::POST, url)
            .json(&PasswordCredentials { email, password });

        let response: TokenResponse = match self.client.send_json(builder, "sign in").await {
            Ok(r) => r,
            Err(RemoteError::Status { status, .. })
                if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED =>
            {
                return Err(AuthError::InvalidCredentials)
            }
            Err(e) => return Err(AuthError::Backend(e.into())),
        };

        self.client.set_access_token(Some(response.access_token));
        Ok(identity(response.user, email))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if self.client.access_token().is_none() {
            return Ok(());
        }
        let url = self.client.endpoint(["auth", "v1", "logout"]).map_err(anyhow::Error::from)?;
        let result = self
            .client
            .send(self.client.request(Method::POST, url), "sign out")
            .await;
        // The local session ends either way.
        self.client.set_access_token(None);
        result.map(|_| ()).map_err(|e| AuthError::Backend(e.into()))
    }

    async fn current_user(&self) -> Result<Option<AuthIdentity>, AuthError> {
        if self.client.access_token().is_none() {
            return Ok(None);
        }
        let url = self.client.endpoint(["auth", "v1", "user"]).map_err(anyhow::Error::from)?;
        match self
            .client
            .send_json::<AuthUserRow>(self.client.request(Method::GET, url), "current user")
            .await
        {
            Ok(row) => Ok(Some(identity(row, ""))),
            Err(RemoteError::Status { status, .. }) if status == StatusCode::UNAUTHORIZED => {
                warn!("Stored session is no longer valid");
                self.client.set_access_token(None);
                Ok(None)
            }
            Err(e) => Err(AuthError::Backend(e.into())),
        }
    }
}
