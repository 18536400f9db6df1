//! Browser authentication state.
//!
//! The session is persisted twice: as JSON in the signed session cookie under
//! [`SESSION_KEY`] and as a plain token cookie [`AUTH_COOKIE`]. Both live for
//! [`AUTH_COOKIE_DAYS`]. The state is restored once per request, before any
//! protected handler runs, and cached in the request extensions.

use std::future::{Ready, ready};

use actix_session::{Session, SessionExt, SessionInsertError};
use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::account::AuthSession;
use crate::domain::configuration::WebConfig;
use crate::wizard::DRAFT_SESSION_KEY;

pub const SESSION_KEY: &str = "app_auth";
pub const AUTH_COOKIE: &str = "auth_token";
pub const AUTH_COOKIE_DAYS: i64 = 30;
pub const WEB_CONFIG_KEY: &str = "web_config";
pub const WEB_CONFIG_TTL_MINUTES: i64 = 60;

/// Authentication state of the current browser.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    auth: Option<AuthSession>,
    initialized: bool,
}

impl SessionState {
    /// Rebuilds the state from both stores. The cookie token takes precedence
    /// over the stored one; a cookie alone yields a session without a user
    /// name.
    pub fn restore(stored: Option<AuthSession>, cookie_token: Option<String>) -> Self {
        let cookie_token = cookie_token.filter(|token| !token.is_empty());
        let auth = match stored {
            Some(stored) => cookie_token
                .or_else(|| Some(stored.token.clone()).filter(|token| !token.is_empty()))
                .map(|token| AuthSession { token, ..stored }),
            None => cookie_token.map(|token| AuthSession {
                token,
                user_name: None,
                full_name: None,
            }),
        };
        Self {
            auth,
            initialized: true,
        }
    }

    pub fn load(req: &HttpRequest) -> Self {
        if let Some(state) = req
            .extensions()
            .get::<SessionState>()
            .filter(|state| state.is_initialized())
        {
            return state.clone();
        }

        let stored = match req.get_session().get::<AuthSession>(SESSION_KEY) {
            Ok(stored) => stored,
            Err(err) => {
                log::warn!("Ignoring unreadable session state: {err}");
                None
            }
        };
        let cookie_token = req.cookie(AUTH_COOKIE).map(|c| c.value().to_string());
        let state = Self::restore(stored, cookie_token);
        req.extensions_mut().insert(state.clone());
        state
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn auth(&self) -> Option<&AuthSession> {
        self.auth.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.auth.as_ref().map(|auth| auth.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// The back-office account, when both a token and the user name it was
    /// issued to are known. A token cookie without the stored session is not
    /// enough: audit fields and password changes need the user name.
    pub fn admin(&self) -> Option<AdminSession> {
        self.auth
            .as_ref()
            .filter(|auth| {
                auth.user_name
                    .as_deref()
                    .is_some_and(|name| !name.trim().is_empty())
            })
            .cloned()
            .map(AdminSession)
    }

    /// Persists `auth` in the session and returns the token cookie to set.
    pub fn login(
        &mut self,
        session: &Session,
        auth: AuthSession,
    ) -> Result<Cookie<'static>, SessionInsertError> {
        session.insert(SESSION_KEY, &auth)?;
        session.renew();
        let cookie = Cookie::build(AUTH_COOKIE, auth.token.clone())
            .path("/")
            .same_site(SameSite::Lax)
            .max_age(CookieDuration::days(AUTH_COOKIE_DAYS))
            .finish();
        self.auth = Some(auth);
        self.initialized = true;
        Ok(cookie)
    }

    /// Clears both stores; the returned cookie removes the token cookie.
    pub fn logout(&mut self, session: &Session) -> Cookie<'static> {
        session.purge();
        self.auth = None;
        let mut cookie = Cookie::build(AUTH_COOKIE, "").path("/").finish();
        cookie.make_removal();
        cookie
    }
}

impl FromRequest for SessionState {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(SessionState::load(req)))
    }
}

/// Signed-in back-office account, see [`SessionState::admin`]. Extraction
/// fails with `401 Unauthorized` otherwise, which
/// [`crate::middleware::RedirectUnauthorized`] turns into a redirect to the
/// login page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminSession(pub AuthSession);

impl AdminSession {
    pub fn token(&self) -> &str {
        &self.0.token
    }

    /// Never empty for an extracted session.
    pub fn user_name(&self) -> &str {
        self.0.user_name.as_deref().unwrap_or_default()
    }
}

impl FromRequest for AdminSession {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let state = SessionState::load(req);
        ready(
            state
                .admin()
                .ok_or_else(|| actix_web::error::ErrorUnauthorized("not signed in")),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedWebConfig {
    config: WebConfig,
    cached_at: DateTime<Utc>,
}

impl CachedWebConfig {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        let ttl = chrono::Duration::minutes(WEB_CONFIG_TTL_MINUTES);
        now.signed_duration_since(self.cached_at) < ttl
    }
}

/// Site settings cached in the session, reloaded after
/// [`WEB_CONFIG_TTL_MINUTES`].
pub fn cached_web_config(session: &Session) -> Option<WebConfig> {
    let cached = session
        .get::<CachedWebConfig>(WEB_CONFIG_KEY)
        .unwrap_or_else(|err| {
            log::warn!("Ignoring unreadable cached web config: {err}");
            None
        })?;
    cached.is_fresh(Utc::now()).then_some(cached.config)
}

pub fn cache_web_config(session: &Session, config: &WebConfig) {
    let cached = CachedWebConfig {
        config: config.clone(),
        cached_at: Utc::now(),
    };
    if let Err(err) = session.insert(WEB_CONFIG_KEY, cached) {
        log::warn!("Failed to cache web config: {err}");
    }
}

pub fn forget_web_config(session: &Session) {
    session.remove(WEB_CONFIG_KEY);
}

/// Id of this browser's loan draft, assigned on first use.
pub fn draft_id(session: &Session) -> Uuid {
    if let Ok(Some(id)) = session.get::<Uuid>(DRAFT_SESSION_KEY) {
        return id;
    }
    let id = Uuid::new_v4();
    if let Err(err) = session.insert(DRAFT_SESSION_KEY, id) {
        log::warn!("Failed to store loan draft id: {err}");
    }
    id
}
