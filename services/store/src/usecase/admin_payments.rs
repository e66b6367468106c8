use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use vitrine_domain::hook::PaymentEvent;
use vitrine_domain::payment::PROVIDER_MERCADOPAGO;

use crate::domain::repository::{HookTransport, PaymentHookRepository, SettingsRepository};
use crate::domain::types::{HookDelivery, PaymentHook, PaymentSettings};
use crate::error::StoreError;
use crate::usecase::hooks::HookDispatcher;
use crate::usecase::input::required;
use crate::usecase::settings::PaymentConfigResolver;

/// Delivery rows shown per hook.
pub const DELIVERY_PAGE: u64 = 50;

const TEST_MESSAGE: &str = "Teste de webhook";

// ── Overview ─────────────────────────────────────────────────────────────────

pub struct PaymentsOverview {
    pub settings: PaymentSettings,
    pub hooks: Vec<PaymentHook>,
}

pub struct PaymentsOverviewUseCase<S, H>
where
    S: SettingsRepository,
    H: PaymentHookRepository,
{
    pub config: PaymentConfigResolver<S>,
    pub hooks: H,
}

impl<S, H> PaymentsOverviewUseCase<S, H>
where
    S: SettingsRepository,
    H: PaymentHookRepository,
{
    pub async fn execute(&self) -> Result<PaymentsOverview, StoreError> {
        Ok(PaymentsOverview {
            settings: self.config.resolve().await?,
            hooks: self.hooks.list_all().await?,
        })
    }
}

// ── Hooks ────────────────────────────────────────────────────────────────────

pub struct HookInput {
    pub name: String,
    pub url: String,
    pub provider: Option<String>,
    pub event: String,
    pub active: bool,
}

pub struct CreateHookUseCase<H: PaymentHookRepository> {
    pub hooks: H,
}

impl<H: PaymentHookRepository> CreateHookUseCase<H> {
    pub async fn execute(&self, input: HookInput) -> Result<PaymentHook, StoreError> {
        let name = required("name", &input.name)?;
        let event = required("event", &input.event)?;
        let url = required("url", &input.url)?;
        let parsed = url::Url::parse(&url)
            .map_err(|_| StoreError::Validation("url must be an absolute URL".into()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(StoreError::Validation("url must use http or https".into()));
        }
        let provider = input
            .provider
            .map(|p| p.trim().to_owned())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| PROVIDER_MERCADOPAGO.to_owned());

        let hook = PaymentHook {
            id: Uuid::now_v7(),
            name,
            url,
            provider,
            event,
            active: input.active,
            created_at: Utc::now(),
        };
        self.hooks.create(&hook).await?;
        tracing::info!(hook_id = %hook.id, event = %hook.event, "payment hook created");
        Ok(hook)
    }
}

pub struct DeleteHookUseCase<H: PaymentHookRepository> {
    pub hooks: H,
}

impl<H: PaymentHookRepository> DeleteHookUseCase<H> {
    pub async fn execute(&self, hook_id: Uuid) -> Result<(), StoreError> {
        if !self.hooks.delete(hook_id).await? {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

pub struct TestHookUseCase<H, T>
where
    H: PaymentHookRepository,
    T: HookTransport,
{
    pub dispatcher: HookDispatcher<H, T>,
}

impl<H, T> TestHookUseCase<H, T>
where
    H: PaymentHookRepository,
    T: HookTransport,
{
    /// Dispatch a `payment.test` event filtered by the hook's provider. Only
    /// hooks registered for `payment.test` receive it.
    pub async fn execute(&self, hook_id: Uuid) -> Result<Vec<HookDelivery>, StoreError> {
        let hook = self
            .dispatcher
            .hooks
            .find_by_id(hook_id)
            .await?
            .ok_or(StoreError::NotFound)?;
        let payload = json!({ "hookId": hook.id, "message": TEST_MESSAGE });
        Ok(self
            .dispatcher
            .dispatch(PaymentEvent::Test, &payload, Some(&hook.provider))
            .await)
    }
}

pub struct ListDeliveriesUseCase<H: PaymentHookRepository> {
    pub hooks: H,
}

impl<H: PaymentHookRepository> ListDeliveriesUseCase<H> {
    pub async fn execute(&self, hook_id: Uuid) -> Result<Vec<HookDelivery>, StoreError> {
        if self.hooks.find_by_id(hook_id).await?.is_none() {
            return Err(StoreError::NotFound);
        }
        self.hooks.list_deliveries(hook_id, DELIVERY_PAGE).await
    }
}
