use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::{CookieJar, WithRejection};
use serde::{Deserialize, Serialize};

use vitrine_auth_types::cookie::clear_session_cookie;
use vitrine_auth_types::identity::AdminSession;
use vitrine_domain::user::UserRole;

use crate::error::StoreError;
use crate::handlers::response::{OrderResponse, ProductResponse};
use crate::handlers::session::{login_response, start_session};
use crate::infra::db::DbUserRepository;
use crate::state::AppState;
use crate::usecase::admin_auth::{
    AdminLoginUseCase, EnsureAdminUseCase, ManageMfaUseCase, VerifyMfaUseCase,
};
use crate::usecase::admin_products::AdminDashboardUseCase;

// ── POST /admin/login ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(body), _): WithRejection<Json<AdminLoginRequest>, StoreError>,
) -> Result<impl IntoResponse, StoreError> {
    if let Some(admin) = &state.bootstrap_admin {
        EnsureAdminUseCase {
            users: state.user_repo(),
        }
        .execute(admin)
        .await?;
    }

    let usecase = AdminLoginUseCase {
        users: state.user_repo(),
        challenges: state.mfa_challenges(),
    };
    let outcome = usecase.execute(&body.email, &body.password).await?;
    let (jar, body) = login_response(&state, jar, outcome)?;
    Ok((jar, Json(body)))
}

// ── POST /admin/mfa ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyMfaRequest {
    pub token: String,
    pub code: String,
}

pub async fn verify_mfa(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(body), _): WithRejection<Json<VerifyMfaRequest>, StoreError>,
) -> Result<impl IntoResponse, StoreError> {
    let usecase = VerifyMfaUseCase {
        users: state.user_repo(),
        challenges: state.mfa_challenges(),
    };
    let user = usecase.execute(&body.token, &body.code).await?;
    let jar = start_session(&state, jar, user.id, UserRole::Admin)?;
    Ok((StatusCode::NO_CONTENT, jar))
}

// ── POST /admin/logout ───────────────────────────────────────────────────────

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = clear_session_cookie(jar, state.cookie_domain.clone());
    (StatusCode::NO_CONTENT, jar)
}

// ── GET /admin ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub active_products: Vec<ProductResponse>,
    pub paused_products: Vec<ProductResponse>,
    pub recent_orders: Vec<OrderResponse>,
}

pub async fn dashboard(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<DashboardResponse>, StoreError> {
    let usecase = AdminDashboardUseCase {
        products: state.product_repo(),
        orders: state.order_repo(),
    };
    let dashboard = usecase.execute().await?;
    Ok(Json(DashboardResponse {
        active_products: dashboard.active.into_iter().map(Into::into).collect(),
        paused_products: dashboard.paused.into_iter().map(Into::into).collect(),
        recent_orders: dashboard.recent_orders.into_iter().map(Into::into).collect(),
    }))
}

// ── MFA management ───────────────────────────────────────────────────────────

fn manage_mfa(state: &AppState) -> ManageMfaUseCase<DbUserRepository> {
    ManageMfaUseCase {
        users: state.user_repo(),
        issuer: state.mfa_issuer.clone(),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MfaSetupResponse {
    pub secret: String,
    pub otpauth_url: String,
    pub enabled: bool,
}

pub async fn mfa_setup(
    State(state): State<AppState>,
    AdminSession(session): AdminSession,
) -> Result<Json<MfaSetupResponse>, StoreError> {
    let setup = manage_mfa(&state).setup(session.user_id).await?;
    Ok(Json(MfaSetupResponse {
        secret: setup.secret,
        otpauth_url: setup.otpauth_url,
        enabled: setup.enabled,
    }))
}

#[derive(Deserialize)]
pub struct EnableMfaRequest {
    pub code: String,
}

pub async fn mfa_enable(
    State(state): State<AppState>,
    AdminSession(session): AdminSession,
    WithRejection(Json(body), _): WithRejection<Json<EnableMfaRequest>, StoreError>,
) -> Result<StatusCode, StoreError> {
    manage_mfa(&state)
        .enable(session.user_id, &body.code)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Turning MFA off also ends the current session.
pub async fn mfa_disable(
    State(state): State<AppState>,
    AdminSession(session): AdminSession,
    jar: CookieJar,
) -> Result<impl IntoResponse, StoreError> {
    manage_mfa(&state).disable(session.user_id).await?;
    let jar = clear_session_cookie(jar, state.cookie_domain.clone());
    Ok((StatusCode::NO_CONTENT, jar))
}
