use axum_extra::extract::CookieJar;
use serde::Serialize;
use uuid::Uuid;

use vitrine_auth_types::cookie::set_session_cookie;
use vitrine_auth_types::token::issue_session_token;
use vitrine_domain::user::UserRole;

use crate::error::StoreError;
use crate::state::AppState;
use crate::usecase::account::LoginOutcome;

/// Sign a session for `user_id` and attach it to `jar`.
pub(crate) fn start_session(
    state: &AppState,
    jar: CookieJar,
    user_id: Uuid,
    role: UserRole,
) -> Result<CookieJar, StoreError> {
    let (token, _) = issue_session_token(user_id, role, &state.session_secret)
        .map_err(|e| StoreError::Internal(e.into()))?;
    Ok(set_session_cookie(jar, token, state.cookie_domain.clone()))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub mfa_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

/// Session cookie for an authenticated login; the challenge token otherwise.
pub(crate) fn login_response(
    state: &AppState,
    jar: CookieJar,
    outcome: LoginOutcome,
) -> Result<(CookieJar, LoginResponse), StoreError> {
    match outcome {
        LoginOutcome::Authenticated { user_id, role } => {
            let jar = start_session(state, jar, user_id, role)?;
            tracing::info!(%user_id, role = role.as_str(), "signed in");
            Ok((
                jar,
                LoginResponse {
                    mfa_required: false,
                    token: None,
                    role: Some(role),
                },
            ))
        }
        LoginOutcome::MfaRequired { token } => Ok((
            jar,
            LoginResponse {
                mfa_required: true,
                token: Some(token),
                role: None,
            },
        )),
    }
}
