//! JSON bodies shared by several handler modules.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use vitrine_core::serde::{option_to_rfc3339_ms, to_rfc3339_ms};
use vitrine_domain::money::format_brl;
use vitrine_domain::order::OrderStatus;
use vitrine_domain::user::UserRole;

use crate::domain::types::{
    CartView, HookDelivery, Order, OrderItem, OrderWithItems, PaymentHook, Product, User,
};

// ── Catalog ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Uuid,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub price_text: Option<String>,
    pub price_cents: i64,
    pub price_formatted: String,
    pub images: Vec<String>,
    pub cta_label: Option<String>,
    pub cta_href: Option<String>,
    pub active: bool,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            price_formatted: format_brl(p.price_cents),
            code: p.code,
            title: p.title,
            description: p.description,
            price_text: p.price_text,
            price_cents: p.price_cents,
            images: p.images,
            cta_label: p.cta_label,
            cta_href: p.cta_href,
            active: p.active,
            updated_at: p.updated_at,
        }
    }
}

/// Admin view of a product, including the delivery file.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProductResponse {
    #[serde(flatten)]
    pub product: ProductResponse,
    pub file_url: Option<String>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Product> for AdminProductResponse {
    fn from(mut p: Product) -> Self {
        let file_url = p.file_url.take();
        let created_at = p.created_at;
        Self {
            product: p.into(),
            file_url,
            created_at,
        }
    }
}

// ── Cart ─────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    pub id: String,
    pub title: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItemResponse>,
    pub total_cents: i64,
    pub total_formatted: String,
    pub total_items: u64,
}

impl From<CartView> for CartResponse {
    fn from(view: CartView) -> Self {
        Self {
            items: view
                .lines
                .into_iter()
                .map(|l| CartItemResponse {
                    id: l.product.code,
                    title: l.product.title,
                    quantity: l.quantity,
                    unit_price_cents: l.product.price_cents,
                    line_total_cents: l.line_total_cents,
                })
                .collect(),
            total_formatted: format_brl(view.total_cents),
            total_cents: view.total_cents,
            total_items: view.total_items,
        }
    }
}

// ── Orders ───────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub product_id: Option<Uuid>,
    pub name: String,
    pub quantity: i32,
    pub unit_price_cents: i64,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            product_id: item.product_id,
            name: item.name,
            quantity: item.quantity,
            unit_price_cents: item.unit_price_cents,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub status: OrderStatus,
    pub total_cents: i64,
    pub total_formatted: String,
    pub currency: String,
    pub customer_email: Option<String>,
    pub provider: Option<String>,
    pub provider_payment_id: Option<String>,
    pub provider_status: Option<String>,
    #[serde(serialize_with = "option_to_rfc3339_ms")]
    pub receipt_sent_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderItemResponse>>,
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            status: o.status,
            total_formatted: format_brl(o.total_cents),
            total_cents: o.total_cents,
            currency: o.currency,
            customer_email: o.customer_email,
            provider: o.provider,
            provider_payment_id: o.provider_payment_id,
            provider_status: o.provider_status,
            receipt_sent_at: o.receipt_sent_at,
            created_at: o.created_at,
            items: None,
        }
    }
}

impl From<OrderWithItems> for OrderResponse {
    fn from(o: OrderWithItems) -> Self {
        Self {
            items: Some(o.items.into_iter().map(Into::into).collect()),
            ..o.order.into()
        }
    }
}

// ── Users ────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
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

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub profile: ProfileResponse,
    pub checkout_ready: bool,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        let checkout_ready = u.has_checkout_profile();
        let p = u.profile;
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            profile: ProfileResponse {
                full_name: p.full_name,
                cpf: p.cpf,
                birth_date: p.birth_date,
                phone: p.phone,
                address_line1: p.address_line1,
                address_line2: p.address_line2,
                city: p.city,
                state: p.state,
                zip: p.zip,
            },
            checkout_ready,
        }
    }
}

// ── Payment hooks ────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookResponse {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub provider: String,
    pub event: String,
    pub active: bool,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<PaymentHook> for HookResponse {
    fn from(h: PaymentHook) -> Self {
        Self {
            id: h.id,
            name: h.name,
            url: h.url,
            provider: h.provider,
            event: h.event,
            active: h.active,
            created_at: h.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResponse {
    pub id: Uuid,
    pub hook_id: Uuid,
    pub event: String,
    pub payload: Value,
    pub status_code: Option<i32>,
    pub error: Option<String>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<HookDelivery> for DeliveryResponse {
    fn from(d: HookDelivery) -> Self {
        Self {
            id: d.id,
            hook_id: d.hook_id,
            event: d.event,
            payload: d.payload,
            status_code: d.status_code,
            error: d.error,
            created_at: d.created_at,
        }
    }
}
