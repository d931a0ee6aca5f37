//! Signed, client-held session.
//!
//! The cookie value is `base64(json).hex(hmac_sha256(base64(json)))`. Anything
//! that fails to decode or verify is treated as an empty session.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{
        header::{COOKIE, REFERER, SET_COOKIE},
        request::Parts,
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Redirect, Response},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::convert::Infallible;
use std::sync::Arc;

pub const COOKIE_NAME: &str = "linkboard_session";
const UNAUTHENTICATED_MESSAGE: &str = "Must be signed in to perform this action";

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone)]
pub struct SessionKey {
    secret: Arc<Vec<u8>>,
}

impl SessionKey {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: Arc::new(secret.as_bytes().to_vec()),
        }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts keys of any length")
    }

    fn sign(&self, data: &SessionData) -> String {
        let json = serde_json::to_vec(data).unwrap_or_default();
        let payload = URL_SAFE_NO_PAD.encode(json);
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        let tag = hex::encode(mac.finalize().into_bytes());
        format!("{}.{}", payload, tag)
    }

    fn open(&self, value: &str) -> Option<SessionData> {
        let (payload, tag) = value.rsplit_once('.')?;
        let tag = hex::decode(tag).ok()?;
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.verify_slice(&tag).ok()?;
        let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
        serde_json::from_slice(&json).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "lowercase")]
pub enum Flash {
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub user_name: Option<String>,
    pub flash: Option<Flash>,
}

/// The caller's session. Changes only reach the client through
/// [`Session::cookie`].
pub struct Session {
    key: SessionKey,
    data: SessionData,
}

impl Session {
    pub fn user_name(&self) -> Option<&str> {
        self.data.user_name.as_deref()
    }

    pub fn sign_in(&mut self, user_name: &str) {
        self.data.user_name = Some(user_name.to_string());
    }

    pub fn sign_out(&mut self) {
        self.data.user_name = None;
    }

    pub fn flash_success(&mut self, message: impl Into<String>) {
        self.data.flash = Some(Flash::Success(message.into()));
    }

    pub fn flash_error(&mut self, message: impl Into<String>) {
        self.data.flash = Some(Flash::Error(message.into()));
    }

    pub fn take_flash(&mut self) -> Option<Flash> {
        self.data.flash.take()
    }

    pub fn cookie(&self) -> [(axum::http::HeaderName, HeaderValue); 1] {
        let value = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            COOKIE_NAME,
            self.key.sign(&self.data)
        );
        // base64url, hex and the fixed attributes are all valid header bytes
        let value = HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static(""));
        [(SET_COOKIE, value)]
    }

    /// Stores the session and redirects to `to`.
    pub fn redirect(&self, to: &str) -> Response {
        (self.cookie(), Redirect::to(to)).into_response()
    }
}

fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

pub fn is_xhr(headers: &HeaderMap) -> bool {
    headers
        .get("X-Requested-With")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "XMLHttpRequest")
        .unwrap_or(false)
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    SessionKey: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let key = SessionKey::from_ref(state);
        let data = read_cookie(&parts.headers, COOKIE_NAME)
            .and_then(|value| key.open(value))
            .unwrap_or_default();
        Ok(Self { key, data })
    }
}

/// A session that is known to belong to a signed in user.
///
/// Extraction fails with `401` for XHR callers and with a redirect back to
/// the referring page for everyone else.
pub struct SignedIn {
    pub user_name: String,
    pub session: Session,
}

#[async_trait]
impl<S> FromRequestParts<S> for SignedIn
where
    SessionKey: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let mut session = match Session::from_request_parts(parts, state).await {
            Ok(session) => session,
            Err(never) => match never {},
        };
        if let Some(user_name) = session.user_name().map(str::to_string) {
            return Ok(Self { user_name, session });
        }

        if is_xhr(&parts.headers) {
            return Err(StatusCode::UNAUTHORIZED.into_response());
        }
        tracing::debug!("Unauthenticated request to {}", parts.uri);
        let back = parts
            .headers
            .get(REFERER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("/")
            .to_string();
        session.flash_error(UNAUTHENTICATED_MESSAGE);
        Err(session.redirect(&back))
    }
}
