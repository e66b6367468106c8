use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use vitrine_domain::hook::PaymentEvent;

use crate::domain::repository::{HookTransport, PaymentHookRepository};
use crate::domain::types::{HookDelivery, HookEnvelope, PaymentHook};

/// Fans payment events out to the registered hooks.
///
/// Delivery is sequential, single-attempt and never fails the caller: every
/// attempt is recorded as a delivery row, and listing or recording failures
/// are only logged.
pub struct HookDispatcher<H, T>
where
    H: PaymentHookRepository,
    T: HookTransport,
{
    pub hooks: H,
    pub transport: T,
}

impl<H, T> HookDispatcher<H, T>
where
    H: PaymentHookRepository,
    T: HookTransport,
{
    /// Deliver `event` to every active hook registered for it. With a
    /// provider filter, only hooks for that provider or the catch-all are hit.
    pub async fn dispatch(
        &self,
        event: PaymentEvent,
        payload: &Value,
        provider: Option<&str>,
    ) -> Vec<HookDelivery> {
        let candidates = match self.hooks.list_active_for_event(event.as_str()).await {
            Ok(hooks) => hooks,
            Err(e) => {
                tracing::warn!(event = %event, error = %e, "failed to list payment hooks");
                return vec![];
            }
        };

        let mut deliveries = Vec::new();
        for hook in candidates
            .iter()
            .filter(|h| h.accepts(event.as_str(), provider))
        {
            deliveries.push(self.deliver(hook, event, payload).await);
        }
        deliveries
    }

    /// Deliver to one hook regardless of its event registration.
    pub async fn deliver(
        &self,
        hook: &PaymentHook,
        event: PaymentEvent,
        payload: &Value,
    ) -> HookDelivery {
        let envelope = HookEnvelope {
            event: event.as_str(),
            payload,
        };
        let body = serde_json::to_value(&envelope).unwrap_or(Value::Null);

        let (status_code, error) = match self.transport.post_json(&hook.url, &body).await {
            Ok(code) => {
                tracing::info!(hook_id = %hook.id, event = %event, status_code = code, "hook delivered");
                (Some(i32::from(code)), None)
            }
            Err(e) => {
                tracing::warn!(hook_id = %hook.id, event = %event, error = %e, "hook delivery failed");
                (None, Some(format!("{e:#}")))
            }
        };

        let delivery = HookDelivery {
            id: Uuid::now_v7(),
            hook_id: hook.id,
            event: event.as_str().to_owned(),
            payload: payload.clone(),
            status_code,
            error,
            created_at: Utc::now(),
        };
        if let Err(e) = self.hooks.record_delivery(&delivery).await {
            tracing::warn!(hook_id = %hook.id, event = %event, error = %e, "failed to record hook delivery");
        }
        delivery
    }
}
