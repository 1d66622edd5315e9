use std::sync::Arc;

use rollcall_core::model::{LoginDraft, StaffProfile};
use storage::repository::{AuthGateway, AuthSession, StaffRepository, StorageError};

use crate::error::AuthError;

/// Sign-in, sign-out, and resolving the signed-in staff member.
#[derive(Clone)]
pub struct AuthService {
    auth: Arc<dyn AuthGateway>,
    staff: Arc<dyn StaffRepository>,
}

impl AuthService {
    #[must_use]
    pub fn new(auth: Arc<dyn AuthGateway>, staff: Arc<dyn StaffRepository>) -> Self {
        Self { auth, staff }
    }

    /// Validate the login form and sign in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` before any backend call if the form is invalid.
    /// Returns `AuthError::InvalidCredentials` if the backend rejects the credentials.
    pub async fn sign_in(&self, draft: LoginDraft) -> Result<AuthSession, AuthError> {
        let credentials = draft.validate()?;
        let session = self.auth.sign_in(&credentials).await?;
        tracing::info!(user_id = %session.user_id, "staff signed in");
        Ok(session)
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the session store is unavailable.
    pub async fn current_session(&self) -> Result<Option<AuthSession>, AuthError> {
        Ok(self.auth.current_session().await?)
    }

    /// The staff profile linked to the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotSignedIn` without a session or when the backend
    /// rejects the session token, and `AuthError::StaffProfileMissing` if the
    /// user has no staff row.
    pub async fn current_staff(&self) -> Result<StaffProfile, AuthError> {
        let session = self
            .auth
            .current_session()
            .await?
            .ok_or(AuthError::NotSignedIn)?;
        match self.staff.find_staff_by_user(&session.user_id).await {
            Ok(staff) => staff.ok_or(AuthError::StaffProfileMissing),
            Err(StorageError::Unauthorized(message)) => {
                tracing::info!(%message, "session rejected by the backend");
                Err(AuthError::NotSignedIn)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the session cannot be cleared.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.auth.sign_out().await?;
        Ok(())
    }
}
