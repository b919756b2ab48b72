//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie carries the caller's [`SessionClaims`]: user id, role and the
//! linked alumni profile. Handlers only persist, read or clear them.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, SessionClaims};

pub(crate) const CLAIMS_KEY: &str = "claims";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist freshly issued claims, rotating the session identifier.
    pub fn persist_claims(&self, claims: &SessionClaims) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(CLAIMS_KEY, claims)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current claims, if any. Undecodable cookies count as anonymous.
    pub fn claims(&self) -> Result<Option<SessionClaims>, Error> {
        match self.0.get::<SessionClaims>(CLAIMS_KEY) {
            Ok(claims) => Ok(claims),
            Err(error) => {
                warn!(%error, "discarding unreadable session claims");
                self.0.remove(CLAIMS_KEY);
                Ok(None)
            }
        }
    }

    /// Require an authenticated session or return `401 Unauthorized`.
    pub fn require_claims(&self) -> Result<SessionClaims, Error> {
        self.claims()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop every value held by the session.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
