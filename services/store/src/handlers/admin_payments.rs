use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vitrine_auth_types::identity::AdminSession;

use crate::domain::types::PaymentSettings;
use crate::error::StoreError;
use crate::handlers::response::{DeliveryResponse, HookResponse};
use crate::state::AppState;
use crate::usecase::admin_payments::{
    CreateHookUseCase, DeleteHookUseCase, HookInput, ListDeliveriesUseCase,
    PaymentsOverviewUseCase, TestHookUseCase,
};
use crate::usecase::settings::UpdatePaymentSettingsUseCase;

/// Resolved settings. Secrets are reported as configured or not, never echoed.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub access_token_configured: bool,
    pub webhook_secret_configured: bool,
    pub public_key: Option<String>,
    pub api_base_url: String,
    pub payment_method: Option<String>,
}

impl From<PaymentSettings> for SettingsResponse {
    fn from(s: PaymentSettings) -> Self {
        Self {
            access_token_configured: s.access_token.is_some(),
            webhook_secret_configured: s.webhook_secret.is_some(),
            public_key: s.public_key,
            api_base_url: s.api_base_url,
            payment_method: s.payment_method,
        }
    }
}

// ── GET /admin/payments ──────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct PaymentsResponse {
    pub settings: SettingsResponse,
    pub hooks: Vec<HookResponse>,
}

pub async fn overview(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<PaymentsResponse>, StoreError> {
    let usecase = PaymentsOverviewUseCase {
        config: state.payment_config(),
        hooks: state.hook_repo(),
    };
    let overview = usecase.execute().await?;
    Ok(Json(PaymentsResponse {
        settings: overview.settings.into(),
        hooks: overview.hooks.into_iter().map(Into::into).collect(),
    }))
}

// ── PUT /admin/payments/settings ─────────────────────────────────────────────

pub async fn update_settings(
    State(state): State<AppState>,
    _admin: AdminSession,
    WithRejection(Json(body), _): WithRejection<Json<HashMap<String, String>>, StoreError>,
) -> Result<Json<SettingsResponse>, StoreError> {
    let usecase = UpdatePaymentSettingsUseCase {
        settings: state.settings_repo(),
    };
    usecase.execute(body).await?;
    let settings = state.payment_config().resolve().await?;
    Ok(Json(settings.into()))
}

// ── POST /admin/payments/hooks ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateHookRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    pub provider: Option<String>,
    #[serde(default)]
    pub event: String,
    #[serde(default = "enabled")]
    pub active: bool,
}

fn enabled() -> bool {
    true
}

pub async fn create_hook(
    State(state): State<AppState>,
    _admin: AdminSession,
    WithRejection(Json(body), _): WithRejection<Json<CreateHookRequest>, StoreError>,
) -> Result<(StatusCode, Json<HookResponse>), StoreError> {
    let usecase = CreateHookUseCase {
        hooks: state.hook_repo(),
    };
    let hook = usecase
        .execute(HookInput {
            name: body.name,
            url: body.url,
            provider: body.provider,
            event: body.event,
            active: body.active,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(hook.into())))
}

// ── DELETE /admin/payments/hooks/{id} ────────────────────────────────────────

pub async fn delete_hook(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(hook_id): Path<Uuid>,
) -> Result<StatusCode, StoreError> {
    let usecase = DeleteHookUseCase {
        hooks: state.hook_repo(),
    };
    usecase.execute(hook_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /admin/payments/hooks/{id}/test ─────────────────────────────────────

pub async fn test_hook(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(hook_id): Path<Uuid>,
) -> Result<Json<Vec<DeliveryResponse>>, StoreError> {
    let usecase = TestHookUseCase {
        dispatcher: state.hook_dispatcher(),
    };
    let deliveries = usecase.execute(hook_id).await?;
    Ok(Json(deliveries.into_iter().map(Into::into).collect()))
}

// ── GET /admin/payments/hooks/{id}/deliveries ────────────────────────────────

pub async fn list_deliveries(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(hook_id): Path<Uuid>,
) -> Result<Json<Vec<DeliveryResponse>>, StoreError> {
    let usecase = ListDeliveriesUseCase {
        hooks: state.hook_repo(),
    };
    let deliveries = usecase.execute(hook_id).await?;
    Ok(Json(deliveries.into_iter().map(Into::into).collect()))
}
