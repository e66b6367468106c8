use serde_json::Value;
use uuid::Uuid;

use vitrine_domain::hook::PaymentEvent;
use vitrine_domain::order::OrderStatus;

use crate::config::Environment;
use crate::domain::repository::{
    HookTransport, Mailer, OrderRepository, PaymentGateway, PaymentHookRepository,
    SettingsRepository,
};
use crate::domain::signature::verify_signature;
use crate::domain::types::{Order, ProviderCredentials, ProviderPaymentUpdate, scalar_to_string};
use crate::error::StoreError;
use crate::usecase::hooks::HookDispatcher;
use crate::usecase::receipt::ReceiptNotifier;
use crate::usecase::settings::PaymentConfigResolver;

/// An inbound provider notification.
#[derive(Debug, Clone, Default)]
pub struct WebhookInput {
    /// `x-signature` header.
    pub signature: Option<String>,
    /// `x-request-id` header.
    pub request_id: Option<String>,
    /// `data.id` (or `id`) query parameter, the value that is signed.
    pub query_data_id: Option<String>,
    pub body: Value,
}

/// What a notification did. The HTTP response is the same for every outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// No payment id in the body.
    NoPaymentId,
    /// Payment fetched but no matching order.
    OrderNotFound,
    /// Order updated to this status.
    Applied(OrderStatus),
    /// A failure after authentication, logged and swallowed.
    Failed,
}

pub struct HandleWebhookUseCase<S, O, G, H, T, R, M>
where
    S: SettingsRepository,
    O: OrderRepository,
    G: PaymentGateway,
    H: PaymentHookRepository,
    T: HookTransport,
    R: OrderRepository,
    M: Mailer,
{
    pub config: PaymentConfigResolver<S>,
    pub orders: O,
    pub gateway: G,
    pub dispatcher: HookDispatcher<H, T>,
    pub receipts: ReceiptNotifier<R, M>,
    pub environment: Environment,
}

impl<S, O, G, H, T, R, M> HandleWebhookUseCase<S, O, G, H, T, R, M>
where
    S: SettingsRepository,
    O: OrderRepository,
    G: PaymentGateway,
    H: PaymentHookRepository,
    T: HookTransport,
    R: OrderRepository,
    M: Mailer,
{
    pub async fn execute(&self, input: WebhookInput) -> Result<WebhookOutcome, StoreError> {
        let settings = self.config.resolve().await?;

        let body_payment_id = scalar_to_string(input.body.get("data").and_then(|d| d.get("id")));

        // 1. Authenticate
        match settings.webhook_secret.as_deref() {
            Some(secret) => {
                let (Some(signature), Some(request_id), Some(data_id)) = (
                    non_empty(input.signature.as_deref()),
                    non_empty(input.request_id.as_deref()),
                    non_empty(input.query_data_id.as_deref()),
                ) else {
                    return Err(StoreError::InvalidSignatureHeaders);
                };
                if !verify_signature(signature, request_id, data_id, secret) {
                    return Err(StoreError::InvalidSignature);
                }
                // The signature only covers the query id.
                if body_payment_id.as_deref().is_some_and(|id| id != data_id) {
                    return Err(StoreError::InvalidSignature);
                }
            }
            None if self.environment.is_production() => {
                return Err(StoreError::WebhookSecretMissing);
            }
            None => {}
        }

        // 2. Payment id from the body
        let Some(payment_id) = body_payment_id else {
            return Ok(WebhookOutcome::NoPaymentId);
        };

        // 3. Credentials
        let credentials = settings.credentials().ok_or(StoreError::AccessTokenMissing)?;

        // 4. From here on nothing fails the request
        match self.settle(&payment_id, &credentials).await {
            Ok(Some(order)) => Ok(WebhookOutcome::Applied(order.status)),
            Ok(None) => Ok(WebhookOutcome::OrderNotFound),
            Err(e) => {
                if !self.environment.is_production() {
                    tracing::warn!(
                        payment_id = %payment_id,
                        error = %e,
                        kind = e.kind(),
                        "webhook processing failed"
                    );
                }
                Ok(WebhookOutcome::Failed)
            }
        }
    }

    async fn settle(
        &self,
        payment_id: &str,
        credentials: &ProviderCredentials,
    ) -> Result<Option<Order>, StoreError> {
        let payment = self.gateway.fetch_payment(payment_id, credentials).await?;

        // 5. Order by external reference
        let Some(order_id) = payment
            .external_reference
            .as_deref()
            .and_then(|r| Uuid::parse_str(r).ok())
        else {
            return Ok(None);
        };

        let Some(previous) = self.orders.find_by_id(order_id).await? else {
            return Ok(None);
        };

        // 6. Map and persist
        let status = OrderStatus::from_provider_status(payment.status.as_deref());
        let update = ProviderPaymentUpdate {
            status: Some(status),
            payment_id: payment.id.clone(),
            provider_status: payment.status.clone(),
            provider_status_detail: payment.status_detail.clone(),
        };
        let Some(order) = self.orders.apply_provider_update(order_id, &update).await? else {
            return Ok(None);
        };
        tracing::info!(
            order_id = %order.id,
            status = %order.status,
            payment_id,
            "order updated from webhook"
        );

        // 7. Fan out. Redeliveries of the same status only announce the update.
        let payload = order.settlement_payload();
        let provider = order.provider.as_deref();
        self.dispatcher
            .dispatch(PaymentEvent::Updated, &payload, provider)
            .await;
        if previous.status == order.status {
            return Ok(Some(order));
        }
        match order.status {
            OrderStatus::Paid => {
                self.dispatcher
                    .dispatch(PaymentEvent::Paid, &payload, provider)
                    .await;
                if let (Some(email), None) =
                    (order.customer_email.as_deref(), previous.receipt_sent_at)
                {
                    self.receipts.send(order.id, email).await;
                }
            }
            OrderStatus::Canceled => {
                self.dispatcher
                    .dispatch(PaymentEvent::Failed, &payload, provider)
                    .await;
            }
            OrderStatus::Pending | OrderStatus::Refunded => {}
        }

        Ok(Some(order))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
