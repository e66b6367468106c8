use anyhow::Context as _;
use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

use vitrine_domain::payment::excluded_payment_types;

use crate::domain::repository::PaymentGateway;
use crate::domain::types::{
    PixPaymentRequest, PreferenceRequest, ProviderCredentials, ProviderPayment,
};
use crate::error::StoreError;

const IDEMPOTENCY_KEY: &str = "X-Idempotency-Key";

/// Mercado Pago REST client. Credentials are passed per call since they can
/// change at runtime through the admin settings.
#[derive(Clone)]
pub struct MercadoPagoGateway {
    pub client: Client,
}

fn endpoint(credentials: &ProviderCredentials, path: &str) -> String {
    format!("{}{path}", credentials.api_base_url.trim_end_matches('/'))
}

pub(crate) fn preference_body(request: &PreferenceRequest) -> Value {
    let excluded: Vec<Value> = excluded_payment_types(request.payment_method)
        .iter()
        .map(|id| json!({ "id": id }))
        .collect();
    json!({
        "items": request.items,
        "payer": { "email": request.payer_email },
        "back_urls": request.back_urls,
        "auto_return": "approved",
        "notification_url": request.notification_url,
        "external_reference": request.external_reference,
        "payment_methods": { "excluded_payment_types": excluded },
    })
}

pub(crate) fn pix_body(request: &PixPaymentRequest) -> Value {
    json!({
        "transaction_amount": request.amount,
        "description": request.description,
        "payment_method_id": "pix",
        "payer": {
            "email": request.payer.email,
            "first_name": request.payer.first_name,
            "last_name": request.payer.last_name,
            "identification": { "type": "CPF", "number": request.payer.cpf },
        },
        "notification_url": request.notification_url,
        "external_reference": request.external_reference,
    })
}

/// Read a provider response, mapping non-2xx to `PaymentProvider`.
async fn read_json(response: reqwest::Response) -> Result<Value, StoreError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(StoreError::PaymentProvider {
            status: status.as_u16(),
            body,
        });
    }
    let value = response
        .json::<Value>()
        .await
        .context("decode payment provider response")?;
    Ok(value)
}

impl PaymentGateway for MercadoPagoGateway {
    async fn create_preference(
        &self,
        request: &PreferenceRequest,
        credentials: &ProviderCredentials,
    ) -> Result<Value, StoreError> {
        let response = self
            .client
            .post(endpoint(credentials, "/checkout/preferences"))
            .bearer_auth(&credentials.access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&preference_body(request))
            .send()
            .await
            .context("send preference request")?;
        read_json(response).await
    }

    async fn create_pix_payment(
        &self,
        request: &PixPaymentRequest,
        credentials: &ProviderCredentials,
    ) -> Result<Value, StoreError> {
        let response = self
            .client
            .post(endpoint(credentials, "/v1/payments"))
            .bearer_auth(&credentials.access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(IDEMPOTENCY_KEY, Uuid::new_v4().to_string())
            .json(&pix_body(request))
            .send()
            .await
            .context("send pix payment request")?;
        read_json(response).await
    }

    async fn fetch_payment(
        &self,
        payment_id: &str,
        credentials: &ProviderCredentials,
    ) -> Result<ProviderPayment, StoreError> {
        let response = self
            .client
            .get(endpoint(credentials, &format!("/v1/payments/{payment_id}")))
            .bearer_auth(&credentials.access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .context("send payment lookup")?;
        let value = read_json(response).await?;
        Ok(ProviderPayment::from_value(&value))
    }
}
