//! Cookie-backed sessions.
//!
//! A session holds only the authenticated account id, in a signed cookie.
//! Flash messages (one-shot notices for the next rendered page) live in a
//! second signed cookie and are removed once displayed.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponseParts, ResponseParts},
};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};

use crate::core::config::SessionConfig;
use crate::core::error::AppError;

pub const SESSION_COOKIE: &str = "medivault_session";
pub const FLASH_COOKIE: &str = "medivault_flash";

/// Signing key and cookie flags, installed as a request extension
#[derive(Clone)]
pub struct SessionKeys {
    key: Key,
    cookie_secure: bool,
}

impl SessionKeys {
    pub fn new(key: Key, cookie_secure: bool) -> Self {
        Self { key, cookie_secure }
    }

    pub fn from_config(config: &SessionConfig) -> Result<Self, String> {
        let key = match config.secret {
            Some(ref secret) => Key::try_from(secret.as_bytes())
                .map_err(|e| format!("Invalid SESSION_SECRET: {}", e))?,
            None => {
                tracing::warn!(
                    "SESSION_SECRET not set, generated a random key; sessions will not survive a restart"
                );
                Key::generate()
            }
        };

        Ok(Self::new(key, config.cookie_secure))
    }
}

/// Request-scoped session state.
///
/// Extract it in a handler, derive the updated session with `login`,
/// `logout` or `flash`, and return it as part of the response so the
/// cookie changes are written back.
pub struct Session {
    jar: SignedCookieJar,
    cookie_secure: bool,
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let keys = parts
            .extensions
            .get::<SessionKeys>()
            .cloned()
            .ok_or_else(|| AppError::Internal("Session keys are not installed".to_string()))?;

        Ok(Self {
            jar: SignedCookieJar::from_headers(&parts.headers, keys.key),
            cookie_secure: keys.cookie_secure,
        })
    }
}

impl Session {
    /// Account id bound to this session, if any
    pub fn account_id(&self) -> Option<i64> {
        self.jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| cookie.value().parse().ok())
    }

    /// Bind the session to an account
    pub fn login(self, account_id: i64) -> Self {
        let cookie = self.build_cookie(SESSION_COOKIE, account_id.to_string());
        Self {
            jar: self.jar.add(cookie),
            cookie_secure: self.cookie_secure,
        }
    }

    /// Drop the account binding and any pending flash messages
    pub fn logout(self) -> Self {
        let jar = self
            .jar
            .remove(Cookie::build(SESSION_COOKIE).path("/"))
            .remove(Cookie::build(FLASH_COOKIE).path("/"));
        Self {
            jar,
            cookie_secure: self.cookie_secure,
        }
    }

    /// Queue a message for the next rendered page
    pub fn flash(self, message: impl Into<String>) -> Self {
        let mut messages = self.pending_flashes();
        messages.push(message.into());

        let value = match serde_json::to_vec(&messages) {
            Ok(bytes) => hex::encode(bytes),
            Err(e) => {
                tracing::warn!("Failed to encode flash messages: {}", e);
                return self;
            }
        };

        let cookie = self.build_cookie(FLASH_COOKIE, value);
        Self {
            jar: self.jar.add(cookie),
            cookie_secure: self.cookie_secure,
        }
    }

    /// Take queued messages, clearing them from the client
    pub fn take_flashes(self) -> (Self, Vec<String>) {
        let messages = self.pending_flashes();
        if messages.is_empty() {
            return (self, messages);
        }

        let jar = self.jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
        (
            Self {
                jar,
                cookie_secure: self.cookie_secure,
            },
            messages,
        )
    }

    fn pending_flashes(&self) -> Vec<String> {
        self.jar
            .get(FLASH_COOKIE)
            .and_then(|cookie| hex::decode(cookie.value()).ok())
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .unwrap_or_default()
    }

    fn build_cookie(&self, name: &'static str, value: String) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .secure(self.cookie_secure)
            .same_site(SameSite::Lax)
            .build()
    }
}

impl IntoResponseParts for Session {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        self.jar.into_response_parts(res)
    }
}
