use std::collections::HashMap;

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::HeaderMap,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use vitrine_auth_types::identity::MaybeSession;
use vitrine_domain::user::UserRole;

use crate::error::StoreError;
use crate::handlers::checkout::checkout_urls;
use crate::infra::db::{
    DbOrderRepository, DbPaymentHookRepository, DbProductRepository, DbSettingsRepository,
};
use crate::infra::hooks::HttpHookTransport;
use crate::infra::mercadopago::MercadoPagoGateway;
use crate::state::AppState;
use crate::usecase::checkout::{ApiCheckoutInput, ApiCheckoutUseCase, PixBuyer, RequestedItem};
use crate::usecase::webhook::{HandleWebhookUseCase, WebhookInput};

const X_SIGNATURE: &str = "x-signature";
const X_REQUEST_ID: &str = "x-request-id";

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

type ApiCheckout = ApiCheckoutUseCase<
    DbProductRepository,
    DbOrderRepository,
    DbSettingsRepository,
    MercadoPagoGateway,
    DbPaymentHookRepository,
    HttpHookTransport,
>;

fn api_checkout_usecase(state: &AppState) -> ApiCheckout {
    ApiCheckoutUseCase {
        products: state.product_repo(),
        orders: state.order_repo(),
        config: state.payment_config(),
        gateway: state.payment_gateway(),
        dispatcher: state.hook_dispatcher(),
    }
}

/// Signed-in customers get the order linked to their account.
fn customer_id(session: &MaybeSession) -> Option<Uuid> {
    session
        .0
        .as_ref()
        .filter(|s| s.role == UserRole::Customer)
        .map(|s| s.user_id)
}

// ── GET /api/mercadopago/public-key ──────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyResponse {
    pub public_key: Option<String>,
}

pub async fn public_key(
    State(state): State<AppState>,
) -> Result<Json<PublicKeyResponse>, StoreError> {
    let settings = state.payment_config().resolve().await?;
    Ok(Json(PublicKeyResponse {
        public_key: settings.public_key,
    }))
}

// ── POST /api/mercadopago/preference ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct ItemRequest {
    pub id: String,
    pub quantity: i64,
}

#[derive(Deserialize)]
pub struct PreferenceRequest {
    #[serde(default)]
    pub items: Vec<ItemRequest>,
    #[serde(default)]
    pub email: String,
}

fn requested(items: Vec<ItemRequest>) -> Vec<RequestedItem> {
    items
        .into_iter()
        .map(|i| RequestedItem {
            id: i.id,
            quantity: i.quantity,
        })
        .collect()
}

pub async fn create_preference(
    State(state): State<AppState>,
    session: MaybeSession,
    headers: HeaderMap,
    WithRejection(Json(body), _): WithRejection<Json<PreferenceRequest>, StoreError>,
) -> Result<Json<Value>, StoreError> {
    let input = ApiCheckoutInput {
        items: requested(body.items),
        email: body.email,
        customer_id: customer_id(&session),
    };
    let urls = checkout_urls(&state, &headers);
    let preference = api_checkout_usecase(&state)
        .preference(input, &urls)
        .await?;
    Ok(Json(preference))
}

// ── POST /api/mercadopago/pix ────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixRequest {
    #[serde(default)]
    pub items: Vec<ItemRequest>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub cpf: String,
}

pub async fn create_pix(
    State(state): State<AppState>,
    session: MaybeSession,
    headers: HeaderMap,
    WithRejection(Json(body), _): WithRejection<Json<PixRequest>, StoreError>,
) -> Result<Json<Value>, StoreError> {
    let input = ApiCheckoutInput {
        items: requested(body.items),
        email: body.email,
        customer_id: customer_id(&session),
    };
    let buyer = PixBuyer {
        first_name: body.first_name,
        last_name: body.last_name,
        cpf: body.cpf,
    };
    let urls = checkout_urls(&state, &headers);
    let payment = api_checkout_usecase(&state)
        .pix(input, buyer, &urls)
        .await?;
    Ok(Json(payment))
}

// ── POST /api/mercadopago/webhook ────────────────────────────────────────────

pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<Json<Value>, StoreError> {
    // Providers retry on non-2xx, so an unreadable body is treated as empty.
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let query_data_id = query
        .get("data.id")
        .or_else(|| query.get("id"))
        .cloned();

    let usecase = HandleWebhookUseCase {
        config: state.payment_config(),
        orders: state.order_repo(),
        gateway: state.payment_gateway(),
        dispatcher: state.hook_dispatcher(),
        receipts: state.receipts(),
        environment: state.environment,
    };
    let outcome = usecase
        .execute(WebhookInput {
            signature: header_value(&headers, X_SIGNATURE),
            request_id: header_value(&headers, X_REQUEST_ID),
            query_data_id,
            body,
        })
        .await?;
    tracing::debug!(?outcome, "webhook handled");

    Ok(Json(json!({ "received": true })))
}
