//! Session helpers that keep handlers free of cookie details.
//!
//! The session stores only the account id; the caller's admin flag and
//! active status are re-read on every request so revocations apply at once.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{AccountId, Error, Principal};
use crate::domain::ports::LoginService;

pub(crate) const ACCOUNT_ID_KEY: &str = "account_id";

/// Wrapper exposing account-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap an Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Remember `id` as the logged-in account.
    pub fn persist_account(&self, id: AccountId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(ACCOUNT_ID_KEY, id.get())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Account id stored in the cookie, if any.
    pub fn account_id(&self) -> Result<Option<AccountId>, Error> {
        match self.0.get::<i64>(ACCOUNT_ID_KEY) {
            Ok(id) => Ok(id.filter(|raw| *raw > 0).map(AccountId::new)),
            Err(error) => {
                warn!(%error, "unreadable account id in session cookie");
                Ok(None)
            }
        }
    }

    /// Forget the logged-in account.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// Resolve the caller against current account state.
    ///
    /// A missing cookie, an unreadable id or a deleted or deactivated
    /// account all yield [`Principal::Anonymous`].
    pub async fn principal(&self, login: &dyn LoginService) -> Result<Principal, Error> {
        match self.account_id()? {
            Some(id) => login.resolve_principal(id).await,
            None => Ok(Principal::Anonymous),
        }
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
