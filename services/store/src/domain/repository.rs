#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use vitrine_domain::user::UserRole;

use crate::domain::types::{
    CartLine, CustomerProfile, HookDelivery, Order, OrderItem, OrderWithItems, OutgoingEmail,
    PaymentHook, PixPaymentRequest, PreferenceRequest, Product, ProviderCredentials,
    ProviderPayment, ProviderPaymentUpdate, User,
};
use crate::error::StoreError;

// ── Persistence ──────────────────────────────────────────────────────────────

pub trait ProductRepository: Send + Sync {
    /// Every product, most recently updated first.
    async fn list_all(&self) -> Result<Vec<Product>, StoreError>;

    /// Products with the given `active` flag, most recently updated first.
    async fn list_by_active(&self, active: bool) -> Result<Vec<Product>, StoreError>;

    async fn find_by_code(&self, code: &str) -> Result<Option<Product>, StoreError>;

    /// Products whose code is in `codes`, any state.
    async fn find_by_codes(&self, codes: &[String]) -> Result<Vec<Product>, StoreError>;

    async fn create(&self, product: &Product) -> Result<(), StoreError>;

    /// Replace every editable field of the product with `product.id`.
    async fn update(&self, product: &Product) -> Result<(), StoreError>;

    async fn set_active(&self, id: Uuid, active: bool) -> Result<(), StoreError>;

    /// Returns `true` if deleted, `false` if not found.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// `email` must already be lower-cased.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn create(&self, user: &User) -> Result<(), StoreError>;

    async fn update_profile(&self, id: Uuid, profile: &CustomerProfile) -> Result<(), StoreError>;

    /// Replace role and password hash (admin bootstrap).
    async fn update_credentials(
        &self,
        id: Uuid,
        role: UserRole,
        password_hash: &str,
    ) -> Result<(), StoreError>;

    async fn set_mfa(
        &self,
        id: Uuid,
        enabled: bool,
        secret: Option<&str>,
    ) -> Result<(), StoreError>;
}

pub trait OrderRepository: Send + Sync {
    /// Insert the order and its items in one transaction.
    async fn create(&self, order: &Order, items: &[OrderItem]) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreError>;

    async fn find_with_items(&self, id: Uuid) -> Result<Option<OrderWithItems>, StoreError>;

    /// Order with items only if it belongs to `customer_id`.
    async fn find_for_customer(
        &self,
        id: Uuid,
        customer_id: Uuid,
    ) -> Result<Option<OrderWithItems>, StoreError>;

    /// A customer's orders with items, newest first.
    async fn list_by_customer(
        &self,
        customer_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<OrderWithItems>, StoreError>;

    /// Latest orders across all customers.
    async fn list_recent(&self, limit: u64) -> Result<Vec<Order>, StoreError>;

    async fn set_preference_id(&self, id: Uuid, preference_id: &str) -> Result<(), StoreError>;

    /// Write provider correlation fields and return the updated order.
    async fn apply_provider_update(
        &self,
        id: Uuid,
        update: &ProviderPaymentUpdate,
    ) -> Result<Option<Order>, StoreError>;

    async fn mark_receipt_sent(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError>;
}

pub trait PaymentHookRepository: Send + Sync {
    /// Active hooks registered for `event`.
    async fn list_active_for_event(&self, event: &str) -> Result<Vec<PaymentHook>, StoreError>;

    /// Every hook, newest first.
    async fn list_all(&self) -> Result<Vec<PaymentHook>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PaymentHook>, StoreError>;

    async fn create(&self, hook: &PaymentHook) -> Result<(), StoreError>;

    /// Delete a hook and its deliveries. Returns `false` if not found.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn record_delivery(&self, delivery: &HookDelivery) -> Result<(), StoreError>;

    /// Latest deliveries of a hook, newest first.
    async fn list_deliveries(
        &self,
        hook_id: Uuid,
        limit: u64,
    ) -> Result<Vec<HookDelivery>, StoreError>;
}

/// Key/value overrides for payment configuration.
pub trait SettingsRepository: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

// ── Ephemeral state (Redis) ──────────────────────────────────────────────────

pub trait CartStore: Send + Sync {
    /// Lines in insertion order. Unknown carts are empty.
    async fn load(&self, cart_id: &str) -> Result<Vec<CartLine>, StoreError>;

    async fn save(&self, cart_id: &str, lines: &[CartLine]) -> Result<(), StoreError>;

    async fn clear(&self, cart_id: &str) -> Result<(), StoreError>;
}

/// Pending admin MFA logins, keyed by an opaque token.
pub trait MfaChallengeStore: Send + Sync {
    async fn create(&self, token: &str, user_id: Uuid) -> Result<(), StoreError>;

    /// User id of an unexpired challenge.
    async fn find(&self, token: &str) -> Result<Option<Uuid>, StoreError>;

    async fn delete(&self, token: &str) -> Result<(), StoreError>;
}

// ── Outbound HTTP ────────────────────────────────────────────────────────────

/// Mercado Pago REST API.
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted-checkout preference. Returns the provider object as-is.
    async fn create_preference(
        &self,
        request: &PreferenceRequest,
        credentials: &ProviderCredentials,
    ) -> Result<Value, StoreError>;

    /// Create a Pix payment. Returns the provider object as-is.
    async fn create_pix_payment(
        &self,
        request: &PixPaymentRequest,
        credentials: &ProviderCredentials,
    ) -> Result<Value, StoreError>;

    /// Fetch the authoritative state of a payment.
    async fn fetch_payment(
        &self,
        payment_id: &str,
        credentials: &ProviderCredentials,
    ) -> Result<ProviderPayment, StoreError>;
}

/// POSTs hook envelopes. Any HTTP response is `Ok(status)`; transport failures are `Err`.
pub trait HookTransport: Send + Sync {
    async fn post_json(&self, url: &str, body: &Value) -> Result<u16, anyhow::Error>;
}

pub trait Mailer: Send + Sync {
    /// Whether sending is configured. Unconfigured mailers skip every send.
    fn is_configured(&self) -> bool;

    async fn send(&self, email: &OutgoingEmail) -> Result<(), StoreError>;
}
