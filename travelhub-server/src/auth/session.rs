//! Server-side login sessions
//!
//! The browser only holds an opaque random token in the
//! `travelhub_session` cookie; identity lives in the store and expires
//! after the configured TTL.

use std::sync::Arc;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use cookie::CookieBuilder;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use rand::RngCore;

use crate::store::{Session, Store, StoreError, User};

pub const SESSION_COOKIE: &str = "travelhub_session";

const TOKEN_BYTES: usize = 32;

/// Session token carried by the request cookies, if any.
pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value_trimmed().to_owned())
        .filter(|token| !token.is_empty())
}

fn base_cookie(value: String) -> CookieBuilder<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
}

#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn Store>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(store: Arc<dyn Store>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Start a session for `user_id` and return its token.
    pub async fn issue(&self, user_id: i64) -> Result<Session, StoreError> {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);

        let now = Utc::now();
        let session = Session {
            token: URL_SAFE_NO_PAD.encode(bytes),
            user_id,
            created_at: now,
            expires_at: now + self.ttl,
        };
        self.store.create_session(session.clone()).await?;
        tracing::debug!(user_id, "session issued");
        Ok(session)
    }

    /// User behind a live token. Expired sessions are deleted on sight.
    pub async fn resolve(&self, token: &str) -> Result<Option<User>, StoreError> {
        let Some(session) = self.store.session(token).await? else {
            return Ok(None);
        };
        if session.is_expired(Utc::now()) {
            self.store.delete_session(token).await?;
            return Ok(None);
        }
        self.store.user_by_id(session.user_id).await
    }

    pub async fn revoke(&self, token: &str) -> Result<(), StoreError> {
        self.store.delete_session(token).await
    }

    pub async fn purge_expired(&self) -> Result<u64, StoreError> {
        let purged = self.store.purge_expired_sessions(Utc::now()).await?;
        if purged > 0 {
            tracing::info!(purged, "expired sessions removed");
        }
        Ok(purged)
    }

    /// Cookie carrying the token, living as long as the session.
    pub fn cookie(&self, session: &Session) -> Cookie<'static> {
        base_cookie(session.token.clone())
            .max_age(time::Duration::seconds(self.ttl.num_seconds()))
            .build()
    }

    /// Removal cookie: empty value, `Max-Age=0` and an expiry in the past.
    pub fn clear_cookie(&self) -> Cookie<'static> {
        let mut cookie = base_cookie(String::new()).build();
        cookie.make_removal();
        cookie
    }
}
