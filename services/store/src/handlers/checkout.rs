use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
};
use axum_extra::extract::{CookieJar, WithRejection};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vitrine_auth_types::identity::CustomerSession;

use crate::error::StoreError;
use crate::handlers::cart::cart_id;
use crate::handlers::response::{CartResponse, UserResponse};
use crate::state::AppState;
use crate::usecase::account::GetCustomerUseCase;
use crate::usecase::checkout::{CartCheckoutUseCase, CheckoutOutcome, CheckoutUrls};

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Origin of the request as seen by the client, from `Host` and the proxy's
/// `x-forwarded-proto`.
pub(crate) fn request_origin(headers: &HeaderMap) -> String {
    let scheme = headers
        .get(X_FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("{scheme}://{host}")
}

pub(crate) fn checkout_urls(state: &AppState, headers: &HeaderMap) -> CheckoutUrls {
    CheckoutUrls::resolve(
        state.app_url.as_deref(),
        state.webhook_base_url.as_deref(),
        &request_origin(headers),
    )
}

// ── GET /checkout ────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummaryResponse {
    pub cart: CartResponse,
    pub customer: UserResponse,
    pub payment_method: Option<&'static str>,
}

pub async fn get_checkout(
    State(state): State<AppState>,
    CustomerSession(session): CustomerSession,
    jar: CookieJar,
) -> Result<Json<CheckoutSummaryResponse>, StoreError> {
    let customer = GetCustomerUseCase {
        users: state.user_repo(),
    }
    .execute(session.user_id)
    .await?;
    if !customer.has_checkout_profile() {
        return Err(StoreError::ProfileIncomplete);
    }

    let cart = match cart_id(&jar) {
        Some(id) => state.cart_service().checkout_view(&id).await?,
        None => Default::default(),
    };
    let settings = state.payment_config().resolve().await?;

    Ok(Json(CheckoutSummaryResponse {
        cart: cart.into(),
        customer: customer.into(),
        payment_method: settings.normalized_method().map(|m| m.as_str()),
    }))
}

// ── POST /checkout ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub payment_method: Option<String>,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CheckoutResponse {
    Free {
        #[serde(rename = "orderId")]
        order_id: Uuid,
    },
    Pix {
        #[serde(rename = "orderId")]
        order_id: Uuid,
        #[serde(rename = "qrCodeBase64")]
        qr_code_base64: Option<String>,
        #[serde(rename = "qrCode")]
        qr_code: Option<String>,
    },
    Redirect {
        #[serde(rename = "orderId")]
        order_id: Uuid,
        #[serde(rename = "initPoint")]
        init_point: String,
    },
}

impl From<CheckoutOutcome> for CheckoutResponse {
    fn from(outcome: CheckoutOutcome) -> Self {
        match outcome {
            CheckoutOutcome::Free { order_id } => Self::Free { order_id },
            CheckoutOutcome::Pix {
                order_id,
                qr_code_base64,
                qr_code,
            } => Self::Pix {
                order_id,
                qr_code_base64,
                qr_code,
            },
            CheckoutOutcome::Redirect {
                order_id,
                init_point,
            } => Self::Redirect {
                order_id,
                init_point,
            },
        }
    }
}

pub async fn create_checkout(
    State(state): State<AppState>,
    CustomerSession(session): CustomerSession,
    headers: HeaderMap,
    jar: CookieJar,
    WithRejection(Json(body), _): WithRejection<Json<CheckoutRequest>, StoreError>,
) -> Result<Json<CheckoutResponse>, StoreError> {
    let customer = GetCustomerUseCase {
        users: state.user_repo(),
    }
    .execute(session.user_id)
    .await?;
    let cart_id = cart_id(&jar).ok_or(if customer.has_checkout_profile() {
        StoreError::CartEmpty
    } else {
        StoreError::ProfileIncomplete
    })?;

    let usecase = CartCheckoutUseCase {
        cart: state.cart_service(),
        orders: state.order_repo(),
        config: state.payment_config(),
        gateway: state.payment_gateway(),
        dispatcher: state.hook_dispatcher(),
        receipts: state.receipts(),
    };
    let outcome = usecase
        .execute(
            &cart_id,
            &customer,
            body.payment_method.as_deref(),
            &checkout_urls(&state, &headers),
        )
        .await?;
    Ok(Json(outcome.into()))
}
