//! Session extractors.
//!
//! The session JWT is read from the `vitrine_session` cookie and validated
//! with the [`SessionKey`] taken from router state.

use axum::Json;
use axum::extract::{FromRef, FromRequestParts};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use http::StatusCode;
use http::request::Parts;

use vitrine_domain::user::UserRole;

use crate::cookie::VITRINE_SESSION;
use crate::token::{Session, validate_session_token};

/// HMAC secret used to sign and validate session tokens.
#[derive(Clone)]
pub struct SessionKey(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRejection {
    /// No cookie, or the token failed validation.
    Unauthenticated,
    /// Valid session with the wrong role.
    Forbidden,
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            Self::Unauthenticated => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "unauthorized"),
            Self::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN", "forbidden"),
        };
        let body = serde_json::json!({ "error": kind, "message": message });
        (status, Json(body)).into_response()
    }
}

fn session_from_parts(parts: &Parts, secret: &str) -> Option<Session> {
    let jar = CookieJar::from_headers(&parts.headers);
    let token = jar.get(VITRINE_SESSION)?.value().to_owned();
    if token.is_empty() {
        return None;
    }
    match validate_session_token(&token, secret) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::debug!(error = %e, "rejected session cookie");
            None
        }
    }
}

fn require_role(
    session: Option<Session>,
    role: UserRole,
) -> Result<Session, SessionRejection> {
    let session = session.ok_or(SessionRejection::Unauthenticated)?;
    if session.role != role {
        return Err(SessionRejection::Forbidden);
    }
    Ok(session)
}

/// Any signed-in user, or `None`.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Session>);

/// Signed-in customer. Admin sessions are rejected with 403.
#[derive(Debug, Clone)]
pub struct CustomerSession(pub Session);

/// Signed-in admin. Customer sessions are rejected with 403.
#[derive(Debug, Clone)]
pub struct AdminSession(pub Session);

// axum-core 0.5 declares `from_request_parts` as `fn -> impl Future + Send`.
// Values are extracted synchronously and moved into a 'static async block.

impl<S> FromRequestParts<S> for MaybeSession
where
    S: Send + Sync,
    SessionKey: FromRef<S>,
{
    type Rejection = SessionRejection;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let key = SessionKey::from_ref(state);
        let session = session_from_parts(parts, &key.0);
        async move { Ok(Self(session)) }
    }
}

impl<S> FromRequestParts<S> for CustomerSession
where
    S: Send + Sync,
    SessionKey: FromRef<S>,
{
    type Rejection = SessionRejection;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let key = SessionKey::from_ref(state);
        let result = require_role(session_from_parts(parts, &key.0), UserRole::Customer);
        async move { result.map(Self) }
    }
}

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    SessionKey: FromRef<S>,
{
    type Rejection = SessionRejection;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let key = SessionKey::from_ref(state);
        let result = require_role(session_from_parts(parts, &key.0), UserRole::Admin);
        async move { result.map(Self) }
    }
}
