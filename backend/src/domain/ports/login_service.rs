//! Driving port for operator login.
//!
//! Inbound adapters authenticate through this trait so handler tests can
//! swap in a double without any credential store.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, LoginCredentials, UserId};

/// Identifier returned for the fixture administrator.
pub const FIXTURE_ADMIN_ID: Uuid = Uuid::from_u128(0x123e_4567_e89b_12d3_a456_4266_1417_4000);

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the operator's id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// Single built-in administrator: `admin` / `password`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        if credentials.username() == "admin" && credentials.password() == "password" {
            Ok(UserId::from_uuid(FIXTURE_ADMIN_ID))
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}
