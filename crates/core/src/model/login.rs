use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EmailError {
    #[error("Email is required")]
    Required,
    #[error("Please enter a valid email address")]
    Invalid,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PasswordError {
    #[error("Password is required")]
    Required,
    #[error("Password must be at least 6 characters")]
    TooShort,
}

/// Field-level validation failures for the login form.
#[derive(Debug, Error, Clone, Copy, Default, PartialEq, Eq)]
#[error("login form is invalid")]
pub struct LoginValidation {
    pub email: Option<EmailError>,
    pub password: Option<PasswordError>,
}

/// Raw login form input.
#[derive(Debug, Clone, Default)]
pub struct LoginDraft {
    pub email: String,
    pub password: String,
}

/// Validated credentials, ready to send to the auth backend.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl LoginDraft {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Validate both fields, reporting every failing field at once.
    ///
    /// # Errors
    ///
    /// Returns `LoginValidation` when either field is missing or malformed.
    pub fn validate(self) -> Result<Credentials, LoginValidation> {
        let email = self.email.trim().to_string();
        let email_error = if email.is_empty() {
            Some(EmailError::Required)
        } else if !looks_like_email(&email) {
            Some(EmailError::Invalid)
        } else {
            None
        };

        let password_error = if self.password.is_empty() {
            Some(PasswordError::Required)
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            Some(PasswordError::TooShort)
        } else {
            None
        };

        if email_error.is_some() || password_error.is_some() {
            return Err(LoginValidation {
                email: email_error,
                password: password_error,
            });
        }

        Ok(Credentials {
            email,
            password: self.password,
        })
    }
}

// local@domain.tld with no whitespace and exactly one '@'
fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
