//! Backend adapter for a hosted Supabase project (GoTrue auth + PostgREST).

use std::env;
use std::sync::{Arc, RwLock};

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::repository::{
    AttendanceRepository, AuthGateway, AuthSession, ClassRepository, StaffRepository, Storage,
    StorageError, StudentRepository,
};

mod attendance_repo;
mod auth;
mod class_repo;
pub(crate) mod mapping;
mod staff_repo;
mod student_repo;

pub const URL_ENV: &str = "ROLLCALL_SUPABASE_URL";
pub const ANON_KEY_ENV: &str = "ROLLCALL_SUPABASE_ANON_KEY";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SupabaseConfigError {
    #[error("invalid Supabase URL: {0}")]
    InvalidUrl(String),
    #[error("Supabase anon key is empty")]
    MissingAnonKey,
}

#[derive(Clone, Debug)]
pub struct SupabaseConfig {
    pub url: Url,
    pub anon_key: String,
}

impl SupabaseConfig {
    /// Validate a project URL and anon key.
    ///
    /// # Errors
    ///
    /// Returns `SupabaseConfigError` if the URL does not parse as http(s) or the key is blank.
    pub fn new(url: &str, anon_key: impl Into<String>) -> Result<Self, SupabaseConfigError> {
        let parsed = Url::parse(url.trim())
            .map_err(|_| SupabaseConfigError::InvalidUrl(url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SupabaseConfigError::InvalidUrl(url.to_string()));
        }
        let anon_key = anon_key.into();
        if anon_key.trim().is_empty() {
            return Err(SupabaseConfigError::MissingAnonKey);
        }
        Ok(Self {
            url: parsed,
            anon_key: anon_key.trim().to_string(),
        })
    }

    /// Read `ROLLCALL_SUPABASE_URL` / `ROLLCALL_SUPABASE_ANON_KEY`.
    ///
    /// Returns `Ok(None)` when the URL is not set.
    ///
    /// # Errors
    ///
    /// Returns `SupabaseConfigError` if the variables are set but invalid.
    pub fn from_env() -> Result<Option<Self>, SupabaseConfigError> {
        let Ok(url) = env::var(URL_ENV) else {
            return Ok(None);
        };
        let anon_key = env::var(ANON_KEY_ENV).unwrap_or_default();
        Self::new(&url, anon_key).map(Some)
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.url.as_str().trim_end_matches('/'), path)
    }
}

/// Shared HTTP client plus the session obtained at sign-in.
#[derive(Clone)]
pub struct SupabaseBackend {
    client: Client,
    config: Arc<SupabaseConfig>,
    session: Arc<RwLock<Option<AuthSession>>>,
}

impl SupabaseBackend {
    #[must_use]
    pub fn new(config: SupabaseConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
            session: Arc::new(RwLock::new(None)),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }

    fn session(&self) -> Result<Option<AuthSession>, StorageError> {
        self.session
            .read()
            .map(|guard| guard.clone())
            .map_err(|e| StorageError::Connection(e.to_string()))
    }

    fn set_session(&self, session: Option<AuthSession>) -> Result<(), StorageError> {
        let mut guard = self
            .session
            .write()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = session;
        Ok(())
    }

    // Signed-in requests run as the user; everything else as the anon role.
    async fn bearer(&self) -> Result<String, StorageError> {
        Ok(self
            .active_session()
            .await?
            .map_or_else(|| self.config.anon_key.clone(), |s| s.access_token))
    }

    async fn rest(&self, method: Method, table: &str) -> Result<RequestBuilder, StorageError> {
        let url = self.config.endpoint(&format!("rest/v1/{table}"));
        Ok(self
            .client
            .request(method, url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(self.bearer().await?))
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, StorageError> {
        tracing::debug!(table, "select");
        let response = self
            .rest(Method::GET, table)
            .await?
            .query(query)
            .send()
            .await
            .map_err(transport)?;
        let response = check(response).await?;
        response.json::<Vec<T>>().await.map_err(decode)
    }

    async fn insert<B: serde::Serialize + ?Sized>(
        &self,
        table: &str,
        body: &B,
        query: &[(&str, String)],
        prefer: &str,
    ) -> Result<Response, StorageError> {
        tracing::debug!(table, "insert");
        let response = self
            .rest(Method::POST, table)
            .await?
            .query(query)
            .header("Prefer", prefer)
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        check(response).await
    }

    async fn delete(&self, table: &str, query: &[(&str, String)]) -> Result<(), StorageError> {
        tracing::debug!(table, "delete");
        let response = self
            .rest(Method::DELETE, table)
            .await?
            .query(query)
            .send()
            .await
            .map_err(transport)?;
        check(response).await?;
        Ok(())
    }

    async fn count(&self, table: &str, query: &[(&str, String)]) -> Result<u32, StorageError> {
        tracing::debug!(table, "count");
        let response = self
            .rest(Method::HEAD, table)
            .await?
            .query(query)
            .header("Prefer", "count=exact")
            .send()
            .await
            .map_err(transport)?;
        let response = check(response).await?;
        let range = response
            .headers()
            .get(reqwest::header::CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| StorageError::Serialization("missing Content-Range".into()))?;
        mapping::content_range_total(range)
            .ok_or_else(|| StorageError::Serialization(format!("bad Content-Range: {range}")))
    }
}

fn transport(e: reqwest::Error) -> StorageError {
    tracing::warn!(error = %e, "backend request failed");
    StorageError::Connection(e.to_string())
}

fn decode(e: reqwest::Error) -> StorageError {
    StorageError::Serialization(e.to_string())
}

async fn check(response: Response) -> Result<Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let err = mapping::status_error(status.as_u16(), &body);
    tracing::warn!(status = status.as_u16(), error = %err, "backend rejected request");
    Err(err)
}

impl Storage {
    /// Build a `Storage` backed by a hosted Supabase project.
    #[must_use]
    pub fn supabase(config: SupabaseConfig) -> Self {
        let backend = SupabaseBackend::new(config);
        let auth: Arc<dyn AuthGateway> = Arc::new(backend.clone());
        let staff: Arc<dyn StaffRepository> = Arc::new(backend.clone());
        let classes: Arc<dyn ClassRepository> = Arc::new(backend.clone());
        let students: Arc<dyn StudentRepository> = Arc::new(backend.clone());
        let attendance: Arc<dyn AttendanceRepository> = Arc::new(backend);
        Self {
            auth,
            staff,
            classes,
            students,
            attendance,
        }
    }
}
