use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use axum_extra::extract::{CookieJar, WithRejection};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vitrine_auth_types::cookie::clear_session_cookie;
use vitrine_auth_types::identity::CustomerSession;
use vitrine_domain::user::UserRole;

use crate::error::StoreError;
use crate::handlers::cart::cart_id;
use crate::handlers::response::{OrderResponse, UserResponse};
use crate::handlers::session::{login_response, start_session};
use crate::state::AppState;
use crate::usecase::account::{
    CustomerOrdersUseCase, GetCustomerUseCase, LoginUseCase, ProfileInput, RECENT_ORDERS,
    RegisterInput, RegisterUseCase, UpdateProfileUseCase,
};
use crate::usecase::receipt::build_receipt_html;

// ── POST /account/register ───────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub user: UserResponse,
    /// `checkout` when the visitor already has items in the cart.
    pub next: &'static str,
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(body), _): WithRejection<Json<RegisterRequest>, StoreError>,
) -> Result<impl IntoResponse, StoreError> {
    let usecase = RegisterUseCase {
        users: state.user_repo(),
        carts: state.cart_store(),
    };
    let cart = cart_id(&jar);
    let registered = usecase
        .execute(
            RegisterInput {
                name: body.name,
                email: body.email,
                password: body.password,
                password_confirmation: body.password_confirmation,
            },
            cart.as_deref(),
        )
        .await?;

    let jar = start_session(&state, jar, registered.user.id, UserRole::Customer)?;
    let next = if registered.has_cart_items {
        "checkout"
    } else {
        "account"
    };
    let body = RegisterResponse {
        user: registered.user.into(),
        next,
    };
    Ok((StatusCode::CREATED, jar, Json(body)))
}

// ── POST /account/login ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(body), _): WithRejection<Json<LoginRequest>, StoreError>,
) -> Result<impl IntoResponse, StoreError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        challenges: state.mfa_challenges(),
    };
    let outcome = usecase.execute(&body.email, &body.password).await?;
    let (jar, body) = login_response(&state, jar, outcome)?;
    Ok((jar, Json(body)))
}

// ── POST /account/logout ─────────────────────────────────────────────────────

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = clear_session_cookie(jar, state.cookie_domain.clone());
    (StatusCode::NO_CONTENT, jar)
}

// ── GET /account ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub user: UserResponse,
    pub recent_orders: Vec<OrderResponse>,
}

pub async fn get_account(
    State(state): State<AppState>,
    CustomerSession(session): CustomerSession,
) -> Result<Json<AccountResponse>, StoreError> {
    let user = GetCustomerUseCase {
        users: state.user_repo(),
    }
    .execute(session.user_id)
    .await?;
    let orders = CustomerOrdersUseCase {
        orders: state.order_repo(),
    }
    .list(user.id, Some(RECENT_ORDERS))
    .await?;

    Ok(Json(AccountResponse {
        user: user.into(),
        recent_orders: orders.into_iter().map(Into::into).collect(),
    }))
}

// ── Orders ───────────────────────────────────────────────────────────────────

pub async fn list_orders(
    State(state): State<AppState>,
    CustomerSession(session): CustomerSession,
) -> Result<Json<Vec<OrderResponse>>, StoreError> {
    let usecase = CustomerOrdersUseCase {
        orders: state.order_repo(),
    };
    let orders = usecase.list(session.user_id, None).await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

pub async fn get_order(
    State(state): State<AppState>,
    CustomerSession(session): CustomerSession,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderResponse>, StoreError> {
    let usecase = CustomerOrdersUseCase {
        orders: state.order_repo(),
    };
    Ok(Json(usecase.get(session.user_id, order_id).await?.into()))
}

/// Printable receipt, the same document that is emailed.
pub async fn get_order_receipt(
    State(state): State<AppState>,
    CustomerSession(session): CustomerSession,
    Path(order_id): Path<Uuid>,
) -> Result<Html<String>, StoreError> {
    let usecase = CustomerOrdersUseCase {
        orders: state.order_repo(),
    };
    let order = usecase.get(session.user_id, order_id).await?;
    Ok(Html(build_receipt_html(&order)))
}

// ── Profile ──────────────────────────────────────────────────────────────────

pub async fn get_profile(
    State(state): State<AppState>,
    CustomerSession(session): CustomerSession,
) -> Result<Json<UserResponse>, StoreError> {
    let usecase = GetCustomerUseCase {
        users: state.user_repo(),
    };
    Ok(Json(usecase.execute(session.user_id).await?.into()))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub cpf: Option<String>,
    pub birth_date: Option<String>,
    pub phone: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

pub async fn update_profile(
    State(state): State<AppState>,
    CustomerSession(session): CustomerSession,
    WithRejection(Json(body), _): WithRejection<Json<UpdateProfileRequest>, StoreError>,
) -> Result<Json<UserResponse>, StoreError> {
    let usecase = UpdateProfileUseCase {
        users: state.user_repo(),
    };
    let user = usecase
        .execute(
            session.user_id,
            ProfileInput {
                full_name: body.full_name,
                cpf: body.cpf,
                birth_date: body.birth_date,
                phone: body.phone,
                address_line1: body.address_line1,
                address_line2: body.address_line2,
                city: body.city,
                state: body.state,
                zip: body.zip,
            },
        )
        .await?;
    Ok(Json(user.into()))
}
