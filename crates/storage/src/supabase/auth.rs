use async_trait::async_trait;
use chrono::Utc;
use rollcall_core::model::Credentials;
use serde_json::{Value, json};

use super::mapping::{TokenResponse, auth_status_error};
use super::{SupabaseBackend, decode, transport};
use crate::repository::{AuthGateway, AuthSession, StorageError};

impl SupabaseBackend {
    /// Exchange a GoTrue grant for a session and remember it.
    async fn grant(&self, grant_type: &str, body: Value) -> Result<AuthSession, StorageError> {
        let url = self.config().endpoint("auth/v1/token");
        let response = self
            .client
            .post(url)
            .query(&[("grant_type", grant_type)])
            .header("apikey", &self.config().anon_key)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::info!(status = status.as_u16(), grant_type, "token grant rejected");
            return Err(auth_status_error(status.as_u16(), &body));
        }

        let token: TokenResponse = response.json().await.map_err(decode)?;
        let session = AuthSession::from(token);
        self.set_session(Some(session.clone()))?;
        Ok(session)
    }

    /// The stored session, refreshed first when it is about to expire.
    ///
    /// A session that cannot be refreshed is dropped, so callers see `None`.
    pub(super) async fn active_session(&self) -> Result<Option<AuthSession>, StorageError> {
        let Some(session) = self.session()? else {
            return Ok(None);
        };
        if !session.needs_refresh(Utc::now()) {
            return Ok(Some(session));
        }
        let Some(refresh_token) = session.refresh_token.clone() else {
            tracing::info!(user_id = %session.user_id, "session expired");
            self.set_session(None)?;
            return Ok(None);
        };

        match self
            .grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
        {
            Ok(fresh) => {
                tracing::debug!(user_id = %fresh.user_id, "session refreshed");
                Ok(Some(fresh))
            }
            Err(StorageError::Unauthorized(message)) => {
                tracing::info!(%message, "session refresh rejected");
                self.set_session(None)?;
                Ok(None)
            }
            Err(other) => Err(other),
        }
    }
}

#[async_trait]
impl AuthGateway for SupabaseBackend {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, StorageError> {
        let session = self
            .grant(
                "password",
                json!({
                    "email": credentials.email(),
                    "password": credentials.password(),
                }),
            )
            .await?;
        tracing::info!(user_id = %session.user_id, "signed in");
        Ok(session)
    }

    async fn current_session(&self) -> Result<Option<AuthSession>, StorageError> {
        self.active_session().await
    }

    async fn sign_out(&self) -> Result<(), StorageError> {
        let Some(session) = self.session()? else {
            return Ok(());
        };
        let url = self.config().endpoint("auth/v1/logout");
        let result = self
            .client
            .post(url)
            .header("apikey", &self.config().anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await;
        // The local session is dropped even if the server call fails.
        self.set_session(None)?;
        match result {
            Ok(response) if !response.status().is_success() => {
                tracing::warn!(status = response.status().as_u16(), "logout rejected");
            }
            Err(e) => tracing::warn!(error = %e, "logout request failed"),
            Ok(_) => tracing::info!("signed out"),
        }
        Ok(())
    }
}
