//! Operator sessions carried in the encrypted `session` cookie.
//!
//! Handlers take a [`SessionContext`] and never touch `actix_session`
//! directly. The cookie holds a single entry: the signed-in operator's
//! [`UserId`].

use std::future::{Ready, ready};

use actix_session::{Session, SessionExt};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use tracing::warn;

use crate::domain::{Error, UserId};

pub(crate) const OPERATOR_KEY: &str = "operator";

/// Request-scoped view of the operator session.
#[derive(Clone)]
pub struct SessionContext {
    session: Session,
}

impl SessionContext {
    /// Record `operator` as signed in, rotating the session cookie.
    pub fn sign_in(&self, operator: &UserId) -> Result<(), Error> {
        self.session.renew();
        self.session
            .insert(OPERATOR_KEY, operator.to_string())
            .map_err(|err| Error::internal(format!("failed to write session: {err}")))
    }

    /// The signed-in operator, if any. An unreadable id counts as signed out.
    pub fn operator(&self) -> Result<Option<UserId>, Error> {
        let raw = self
            .session
            .get::<String>(OPERATOR_KEY)
            .map_err(|err| Error::internal(format!("failed to read session: {err}")))?;
        Ok(raw.and_then(|value| {
            value
                .parse::<UserId>()
                .inspect_err(|err| warn!(error = %err, "discarding malformed operator id"))
                .ok()
        }))
    }

    /// The signed-in operator, or `401 Unauthorized`.
    pub fn require_operator(&self) -> Result<UserId, Error> {
        self.operator()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Forget the operator and expire the cookie.
    pub fn sign_out(&self) {
        self.session.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self {
            session: req.get_session(),
        }))
    }
}
