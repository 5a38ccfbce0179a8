//! Operator authentication primitives.
//!
//! Only clinic administrators use the API; a successful login yields the
//! [`UserId`] stored in the session cookie.

use zeroize::Zeroizing;

use super::identifiers::define_uuid_id;

define_uuid_id! {
    /// Identifier of an authenticated operator.
    UserId
}

/// Why a login payload was rejected before reaching the login service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("password must not be empty")]
    EmptyPassword,
}

impl LoginValidationError {
    /// Payload field the error refers to.
    pub fn field(self) -> &'static str {
        match self {
            Self::EmptyUsername => "username",
            Self::EmptyPassword => "password",
        }
    }
}

/// Username and password submitted to `POST /api/v1/login`.
///
/// The username is trimmed; the password is kept verbatim and wiped from
/// memory on drop.
///
/// # Examples
/// ```
/// use rota::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" admin ", "password").unwrap();
/// assert_eq!(creds.username(), "admin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}
