use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use vitrine_domain::hook::provider_matches;
use vitrine_domain::order::OrderStatus;
use vitrine_domain::payment::PaymentMethod;
use vitrine_domain::user::UserRole;

// ── Catalog ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub price_text: Option<String>,
    pub price_cents: i64,
    pub images: Vec<String>,
    pub cta_label: Option<String>,
    pub cta_href: Option<String>,
    pub file_url: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── Users ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub profile: CustomerProfile,
    pub mfa_enabled: bool,
    pub mfa_secret: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Customers need a full name and CPF before paying.
    pub fn has_checkout_profile(&self) -> bool {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        filled(&self.profile.full_name) && filled(&self.profile.cpf)
    }

    /// Name used for the Pix payer: full name, then display name, then "Cliente".
    pub fn payer_name(&self) -> String {
        [self.profile.full_name.as_deref(), Some(self.name.as_str())]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or(DEFAULT_CUSTOMER_NAME)
            .to_owned()
    }
}

/// Personal and billing details a customer may edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerProfile {
    pub full_name: Option<String>,
    pub cpf: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

pub const DEFAULT_CUSTOMER_NAME: &str = "Cliente";

/// Minimum password length for new accounts.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Lifetime of an admin MFA challenge in seconds.
pub const MFA_CHALLENGE_TTL_SECS: u64 = 600;

// ── Orders ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub status: OrderStatus,
    pub total_cents: i64,
    pub currency: String,
    pub customer_email: Option<String>,
    pub customer_id: Option<Uuid>,
    pub provider: Option<String>,
    pub provider_preference_id: Option<String>,
    pub provider_payment_id: Option<String>,
    pub provider_status: Option<String>,
    pub provider_status_detail: Option<String>,
    pub receipt_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Hook payload sent on creation and on free settlement.
    pub fn event_payload(&self) -> Value {
        json!({
            "orderId": self.id,
            "status": self.status,
            "totalCents": self.total_cents,
            "currency": self.currency,
            "provider": self.provider,
        })
    }

    /// Hook payload sent after a provider notification.
    pub fn settlement_payload(&self) -> Value {
        json!({
            "orderId": self.id,
            "status": self.status,
            "totalCents": self.total_cents,
            "currency": self.currency,
            "provider": self.provider,
            "providerPaymentId": self.provider_payment_id,
            "providerStatus": self.provider_status,
        })
    }
}

#[derive(Debug, Clone)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Option<Uuid>,
    pub name: String,
    pub quantity: i32,
    pub unit_price_cents: i64,
}

#[derive(Debug, Clone)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Provider correlation fields written after a provider call or notification.
/// `status: None` leaves the order status untouched.
#[derive(Debug, Clone, Default)]
pub struct ProviderPaymentUpdate {
    pub status: Option<OrderStatus>,
    pub payment_id: Option<String>,
    pub provider_status: Option<String>,
    pub provider_status_detail: Option<String>,
}

// ── Payment hooks ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PaymentHook {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub provider: String,
    pub event: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl PaymentHook {
    /// Active, registered for `event`, and matching the provider filter.
    pub fn accepts(&self, event: &str, provider: Option<&str>) -> bool {
        self.active && self.event == event && provider_matches(&self.provider, provider)
    }
}

/// One recorded delivery attempt. Exactly one of `status_code` / `error` is set.
#[derive(Debug, Clone)]
pub struct HookDelivery {
    pub id: Uuid,
    pub hook_id: Uuid,
    pub event: String,
    pub payload: Value,
    pub status_code: Option<i32>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body posted to hook endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct HookEnvelope<'a> {
    pub event: &'a str,
    pub payload: &'a Value,
}

// ── Cart ─────────────────────────────────────────────────────────────────────

/// Stored cart line. `id` is the product code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: String,
    pub quantity: u32,
}

/// Cart line resolved against the catalog.
#[derive(Debug, Clone)]
pub struct PricedLine {
    pub product: Product,
    pub quantity: u32,
    pub line_total_cents: i64,
}

#[derive(Debug, Clone, Default)]
pub struct CartView {
    pub lines: Vec<PricedLine>,
    pub total_cents: i64,
    /// Sum of stored quantities, including lines whose product is gone.
    pub total_items: u64,
}

/// Redis TTL of a cart, matching the cart cookie lifetime.
pub use vitrine_auth_types::cookie::CART_TTL_SECS;

// ── Payment configuration ────────────────────────────────────────────────────

pub const SETTING_ACCESS_TOKEN: &str = "mp_access_token";
pub const SETTING_PUBLIC_KEY: &str = "mp_public_key";
pub const SETTING_WEBHOOK_SECRET: &str = "mp_webhook_secret";
pub const SETTING_API_BASE_URL: &str = "mp_api_base_url";
pub const SETTING_PAYMENT_METHOD: &str = "mp_payment_method";

pub const PAYMENT_SETTING_KEYS: [&str; 5] = [
    SETTING_ACCESS_TOKEN,
    SETTING_PUBLIC_KEY,
    SETTING_WEBHOOK_SECRET,
    SETTING_API_BASE_URL,
    SETTING_PAYMENT_METHOD,
];

pub const DEFAULT_API_BASE_URL: &str = "https://api.mercadopago.com";

/// Resolved Mercado Pago configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSettings {
    pub access_token: Option<String>,
    pub public_key: Option<String>,
    pub webhook_secret: Option<String>,
    pub api_base_url: String,
    pub payment_method: Option<String>,
}

impl PaymentSettings {
    pub fn normalized_method(&self) -> Option<PaymentMethod> {
        PaymentMethod::normalize(self.payment_method.as_deref())
    }

    /// Access token and API base for provider calls.
    pub fn credentials(&self) -> Option<ProviderCredentials> {
        self.access_token.as_ref().map(|token| ProviderCredentials {
            access_token: token.clone(),
            api_base_url: self.api_base_url.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    pub access_token: String,
    pub api_base_url: String,
}

// ── Mercado Pago wire types ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct PreferenceItem {
    pub id: String,
    pub title: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub currency_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BackUrls {
    pub success: String,
    pub pending: String,
    pub failure: String,
}

/// Input for a hosted-checkout preference.
#[derive(Debug, Clone)]
pub struct PreferenceRequest {
    pub items: Vec<PreferenceItem>,
    pub payer_email: String,
    pub back_urls: BackUrls,
    pub notification_url: String,
    pub external_reference: String,
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Clone)]
pub struct PixPayer {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub cpf: String,
}

/// Input for a direct Pix payment.
#[derive(Debug, Clone)]
pub struct PixPaymentRequest {
    pub amount: f64,
    pub description: String,
    pub payer: PixPayer,
    pub notification_url: String,
    pub external_reference: String,
}

/// The fields of a provider payment object the store acts on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderPayment {
    pub id: Option<String>,
    pub status: Option<String>,
    pub status_detail: Option<String>,
    pub external_reference: Option<String>,
}

impl ProviderPayment {
    /// Read a provider payment object. `id` may be a number or a string.
    pub fn from_value(value: &Value) -> Self {
        Self {
            id: scalar_to_string(value.get("id")),
            status: scalar_to_string(value.get("status")),
            status_detail: scalar_to_string(value.get("status_detail")),
            external_reference: scalar_to_string(value.get("external_reference")),
        }
    }
}

/// Render a JSON string or number as text. Other types and empty strings are `None`.
pub fn scalar_to_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ── Email ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}
