//! Session cookies for integration tests.

use ::http::{HeaderValue, header};
use uuid::Uuid;

use vitrine_auth_types::cookie::VITRINE_SESSION;
use vitrine_auth_types::token::issue_session_token;
use vitrine_domain::user::UserRole;

/// A signed-in user for test requests.
pub struct MockSession {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl MockSession {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn customer() -> Self {
        Self::new(Uuid::new_v4(), UserRole::Customer)
    }

    pub fn admin() -> Self {
        Self::new(Uuid::new_v4(), UserRole::Admin)
    }

    /// `Cookie` header value carrying a session signed with `secret`.
    pub fn cookie(&self, secret: &str) -> String {
        let (token, _) = issue_session_token(self.user_id, self.role, secret)
            .expect("sign test session token");
        format!("{VITRINE_SESSION}={token}")
    }

    /// `(name, value)` pair ready for a request builder.
    pub fn header(&self, secret: &str) -> (header::HeaderName, HeaderValue) {
        let value = HeaderValue::from_str(&self.cookie(secret)).expect("cookie header value");
        (header::COOKIE, value)
    }
}
