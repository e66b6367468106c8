use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::{CookieJar, WithRejection};
use serde::Deserialize;
use uuid::Uuid;

use vitrine_auth_types::cookie::{VITRINE_CART, set_cart_cookie};

use crate::error::StoreError;
use crate::handlers::response::CartResponse;
use crate::state::AppState;

/// Cart id carried by the visitor, if any.
pub(crate) fn cart_id(jar: &CookieJar) -> Option<String> {
    jar.get(VITRINE_CART)
        .map(|c| c.value().trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Cart id of the visitor, issuing a new cookie on first use.
fn ensure_cart(jar: CookieJar, state: &AppState) -> (CookieJar, String) {
    match cart_id(&jar) {
        Some(id) => (jar, id),
        None => {
            let id = Uuid::new_v4().to_string();
            let jar = set_cart_cookie(jar, id.clone(), state.cookie_domain.clone());
            (jar, id)
        }
    }
}

async fn cart_body(state: &AppState, cart_id: &str) -> Result<Json<CartResponse>, StoreError> {
    let view = state.cart_service().view(cart_id).await?;
    Ok(Json(view.into()))
}

// ── GET /cart ────────────────────────────────────────────────────────────────

pub async fn get_cart(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, StoreError> {
    let (jar, id) = ensure_cart(jar, &state);
    let body = cart_body(&state, &id).await?;
    Ok((jar, body))
}

// ── POST /cart/items ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AddItemRequest {
    pub id: String,
    pub quantity: Option<i64>,
}

pub async fn add_item(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(body), _): WithRejection<Json<AddItemRequest>, StoreError>,
) -> Result<impl IntoResponse, StoreError> {
    let (jar, id) = ensure_cart(jar, &state);
    state
        .cart_service()
        .add(&id, &body.id, body.quantity)
        .await?;
    let cart = cart_body(&state, &id).await?;
    Ok((StatusCode::CREATED, jar, cart))
}

// ── PATCH /cart/items ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SetItemRequest {
    pub id: String,
    pub quantity: i64,
}

pub async fn set_item(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(body), _): WithRejection<Json<SetItemRequest>, StoreError>,
) -> Result<impl IntoResponse, StoreError> {
    let (jar, id) = ensure_cart(jar, &state);
    state
        .cart_service()
        .set(&id, &body.id, body.quantity)
        .await?;
    let cart = cart_body(&state, &id).await?;
    Ok((jar, cart))
}

// ── DELETE /cart/items/{id} ──────────────────────────────────────────────────

pub async fn remove_item(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, StoreError> {
    let (jar, id) = ensure_cart(jar, &state);
    state.cart_service().remove(&id, &code).await?;
    let cart = cart_body(&state, &id).await?;
    Ok((jar, cart))
}

// ── DELETE /cart ─────────────────────────────────────────────────────────────

pub async fn clear_cart(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<StatusCode, StoreError> {
    if let Some(id) = cart_id(&jar) {
        state.cart_service().clear(&id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}
