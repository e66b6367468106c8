use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

use vitrine_domain::hook::PaymentEvent;
use vitrine_domain::money::cents_to_decimal;
use vitrine_domain::order::{DEFAULT_CURRENCY, OrderStatus};
use vitrine_domain::payment::{PROVIDER_FREE, PROVIDER_MERCADOPAGO, PaymentMethod};

use crate::domain::repository::{
    CartStore, HookTransport, Mailer, OrderRepository, PaymentGateway, PaymentHookRepository,
    ProductRepository, SettingsRepository,
};
use crate::domain::types::{
    BackUrls, DEFAULT_CUSTOMER_NAME, Order, OrderItem, PixPayer, PixPaymentRequest,
    PreferenceItem, PreferenceRequest, PricedLine, ProviderPayment, ProviderPaymentUpdate, User,
    scalar_to_string,
};
use crate::error::StoreError;
use crate::usecase::cart::{
    CartService, MAX_LINE_QUANTITY, line_quantity, line_total, order_total,
};
use crate::usecase::hooks::HookDispatcher;
use crate::usecase::input::{digits_only, normalize_email, required};
use crate::usecase::receipt::ReceiptNotifier;
use crate::usecase::settings::PaymentConfigResolver;

pub const WEBHOOK_PATH: &str = "/api/mercadopago/webhook";

const PLACEHOLDER_CPF: &str = "00000000000";

// ── URLs ─────────────────────────────────────────────────────────────────────

/// Public URLs handed to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutUrls {
    /// Storefront base, used for the back URLs.
    pub base_url: String,
    /// Base for the notification URL. Falls back to `base_url`.
    pub webhook_base_url: Option<String>,
}

impl CheckoutUrls {
    /// `app_url` wins when it is an absolute URL, else the request origin.
    pub fn resolve(app_url: Option<&str>, webhook_base_url: Option<&str>, origin: &str) -> Self {
        let base_url = app_url
            .map(|u| u.trim().trim_end_matches('/'))
            .filter(|u| url::Url::parse(u).is_ok())
            .unwrap_or_else(|| origin.trim_end_matches('/'))
            .to_owned();
        let webhook_base_url = webhook_base_url
            .map(|u| u.trim().trim_end_matches('/').to_owned())
            .filter(|u| !u.is_empty());
        Self {
            base_url,
            webhook_base_url,
        }
    }

    /// Notification URL. The provider must be able to reach it over HTTPS.
    pub fn webhook_url(&self) -> Result<String, StoreError> {
        let base = self.webhook_base_url.as_deref().unwrap_or(&self.base_url);
        if base.contains("localhost") || base.contains("127.0.0.1") || base.starts_with("http://")
        {
            return Err(StoreError::WebhookUrlNotPublic);
        }
        Ok(format!("{base}{WEBHOOK_PATH}"))
    }

    pub fn back_urls(&self) -> BackUrls {
        BackUrls {
            success: format!("{}/checkout/sucesso", self.base_url),
            pending: format!("{}/checkout/pendente", self.base_url),
            failure: format!("{}/checkout/falha", self.base_url),
        }
    }
}

// ── Order building ───────────────────────────────────────────────────────────

/// A new order for `lines`. Zero totals are settled on the spot.
pub fn build_order(
    lines: &[PricedLine],
    customer_email: Option<String>,
    customer_id: Option<Uuid>,
) -> Result<(Order, Vec<OrderItem>), StoreError> {
    let total_cents = order_total(lines)?;
    let free = total_cents <= 0;
    let (status, provider) = if free {
        (OrderStatus::Paid, PROVIDER_FREE)
    } else {
        (OrderStatus::Pending, PROVIDER_MERCADOPAGO)
    };
    let now = Utc::now();
    let order = Order {
        id: Uuid::now_v7(),
        status,
        total_cents,
        currency: DEFAULT_CURRENCY.to_owned(),
        customer_email,
        customer_id,
        provider: Some(provider.to_owned()),
        provider_preference_id: None,
        provider_payment_id: None,
        provider_status: None,
        provider_status_detail: None,
        receipt_sent_at: None,
        created_at: now,
        updated_at: now,
    };
    let items = lines
        .iter()
        .map(|l| {
            let quantity = i32::try_from(l.quantity).map_err(|_| {
                StoreError::Validation(format!(
                    "quantity must be between 1 and {MAX_LINE_QUANTITY}"
                ))
            })?;
            Ok(OrderItem {
                id: Uuid::now_v7(),
                order_id: order.id,
                product_id: Some(l.product.id),
                name: l.product.title.clone(),
                quantity,
                unit_price_cents: l.product.price_cents,
            })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;
    Ok((order, items))
}

fn preference_items(lines: &[PricedLine]) -> Vec<PreferenceItem> {
    lines
        .iter()
        .map(|l| PreferenceItem {
            id: l.product.code.clone(),
            title: l.product.title.clone(),
            quantity: l.quantity,
            unit_price: cents_to_decimal(l.product.price_cents),
            currency_id: DEFAULT_CURRENCY.to_owned(),
        })
        .collect()
}

fn is_free(order: &Order) -> bool {
    order.provider.as_deref() == Some(PROVIDER_FREE)
}

/// Correlation fields of a freshly created provider payment.
fn payment_update(payment: &Value) -> ProviderPaymentUpdate {
    let payment = ProviderPayment::from_value(payment);
    ProviderPaymentUpdate {
        status: None,
        payment_id: payment.id,
        provider_status: payment.status,
        provider_status_detail: payment.status_detail,
    }
}

/// Split a display name into the payer's first name and the rest.
pub fn split_payer_name(name: &str) -> (String, String) {
    let mut parts = name.split_whitespace();
    let first = parts.next().unwrap_or(DEFAULT_CUSTOMER_NAME).to_owned();
    let rest = parts.collect::<Vec<_>>().join(" ");
    let last = if rest.is_empty() { " ".to_owned() } else { rest };
    (first, last)
}

// ── API checkout ─────────────────────────────────────────────────────────────

/// One requested line of the checkout API.
#[derive(Debug, Clone)]
pub struct RequestedItem {
    pub id: String,
    pub quantity: i64,
}

#[derive(Debug, Clone)]
pub struct PixBuyer {
    pub first_name: String,
    pub last_name: String,
    pub cpf: String,
}

#[derive(Debug, Clone)]
pub struct ApiCheckoutInput {
    pub items: Vec<RequestedItem>,
    pub email: String,
    /// Logged-in customer, if any. The API also serves guests.
    pub customer_id: Option<Uuid>,
}

/// Checkout driven by an explicit item list (hosted checkout or Pix).
pub struct ApiCheckoutUseCase<P, O, S, G, H, T>
where
    P: ProductRepository,
    O: OrderRepository,
    S: SettingsRepository,
    G: PaymentGateway,
    H: PaymentHookRepository,
    T: HookTransport,
{
    pub products: P,
    pub orders: O,
    pub config: PaymentConfigResolver<S>,
    pub gateway: G,
    pub dispatcher: HookDispatcher<H, T>,
}

impl<P, O, S, G, H, T> ApiCheckoutUseCase<P, O, S, G, H, T>
where
    P: ProductRepository,
    O: OrderRepository,
    S: SettingsRepository,
    G: PaymentGateway,
    H: PaymentHookRepository,
    T: HookTransport,
{
    /// Validate the request and price it against active products, keeping
    /// request order and duplicates.
    async fn priced_items(&self, items: &[RequestedItem]) -> Result<Vec<PricedLine>, StoreError> {
        if items.is_empty() {
            return Err(StoreError::Validation("items are required".into()));
        }
        let mut codes = Vec::with_capacity(items.len());
        let mut quantities = Vec::with_capacity(items.len());
        for item in items {
            if item.id.trim().is_empty() {
                return Err(StoreError::Validation("item id is required".into()));
            }
            quantities.push(line_quantity(item.quantity)?);
            codes.push(item.id.clone());
        }

        let products = self.products.find_by_codes(&codes).await?;
        let mut lines = Vec::with_capacity(items.len());
        for (item, quantity) in items.iter().zip(quantities) {
            let Some(product) = products.iter().find(|p| p.code == item.id && p.active) else {
                continue;
            };
            lines.push(PricedLine {
                product: product.clone(),
                quantity,
                line_total_cents: line_total(product.price_cents, quantity)?,
            });
        }
        if lines.is_empty() {
            return Err(StoreError::ItemsInvalid);
        }
        Ok(lines)
    }

    async fn place(
        &self,
        lines: &[PricedLine],
        email: String,
        customer_id: Option<Uuid>,
    ) -> Result<Order, StoreError> {
        let (order, items) = build_order(lines, Some(email), customer_id)?;
        self.orders.create(&order, &items).await?;
        tracing::info!(order_id = %order.id, total_cents = order.total_cents, "order created");
        Ok(order)
    }

    /// Free orders never reach the provider.
    async fn settle_free(&self, order: &Order) -> Value {
        let payload = order.event_payload();
        let provider = order.provider.as_deref();
        self.dispatcher
            .dispatch(PaymentEvent::Created, &payload, provider)
            .await;
        self.dispatcher
            .dispatch(PaymentEvent::Paid, &payload, provider)
            .await;
        json!({
            "id": format!("free-{}", order.id),
            "status": "approved",
            "external_reference": order.id.to_string(),
        })
    }

    /// Create a hosted-checkout preference. Returns the provider object.
    pub async fn preference(
        &self,
        input: ApiCheckoutInput,
        urls: &CheckoutUrls,
    ) -> Result<Value, StoreError> {
        let email = normalize_email(&input.email)?;
        let lines = self.priced_items(&input.items).await?;
        let order = self.place(&lines, email.clone(), input.customer_id).await?;
        if is_free(&order) {
            return Ok(self.settle_free(&order).await);
        }

        let settings = self.config.resolve().await?;
        let credentials = settings.credentials().ok_or(StoreError::AccessTokenMissing)?;
        let notification_url = urls.webhook_url()?;

        let request = PreferenceRequest {
            items: preference_items(&lines),
            payer_email: email,
            back_urls: urls.back_urls(),
            notification_url,
            external_reference: order.id.to_string(),
            payment_method: settings.normalized_method(),
        };
        let preference = self.gateway.create_preference(&request, &credentials).await?;

        if let Some(preference_id) = scalar_to_string(preference.get("id")) {
            self.orders.set_preference_id(order.id, &preference_id).await?;
        }
        self.dispatcher
            .dispatch(
                PaymentEvent::Created,
                &order.event_payload(),
                order.provider.as_deref(),
            )
            .await;
        Ok(preference)
    }

    /// Create a Pix payment. Returns the provider object.
    pub async fn pix(
        &self,
        input: ApiCheckoutInput,
        buyer: PixBuyer,
        urls: &CheckoutUrls,
    ) -> Result<Value, StoreError> {
        let email = normalize_email(&input.email)?;
        let payer = PixPayer {
            email: email.clone(),
            first_name: required("firstName", &buyer.first_name)?,
            last_name: required("lastName", &buyer.last_name)?,
            cpf: required("cpf", &buyer.cpf)?,
        };
        let lines = self.priced_items(&input.items).await?;
        let order = self.place(&lines, email, input.customer_id).await?;
        if is_free(&order) {
            return Ok(self.settle_free(&order).await);
        }

        let settings = self.config.resolve().await?;
        let credentials = settings.credentials().ok_or(StoreError::AccessTokenMissing)?;
        let notification_url = urls.webhook_url()?;

        let request = PixPaymentRequest {
            amount: cents_to_decimal(order.total_cents),
            description: format!("Pedido #{}", order.id),
            payer,
            notification_url,
            external_reference: order.id.to_string(),
        };
        let payment = self.gateway.create_pix_payment(&request, &credentials).await?;

        self.orders
            .apply_provider_update(order.id, &payment_update(&payment))
            .await?;
        self.dispatcher
            .dispatch(
                PaymentEvent::Created,
                &order.event_payload(),
                order.provider.as_deref(),
            )
            .await;
        Ok(payment)
    }
}

// ── Cart checkout ────────────────────────────────────────────────────────────

/// Result of a cart checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Zero total, already paid.
    Free { order_id: Uuid },
    /// Pix payment created; the buyer pays with the QR code.
    Pix {
        order_id: Uuid,
        qr_code_base64: Option<String>,
        qr_code: Option<String>,
    },
    /// Hosted checkout; the buyer is sent to `init_point`.
    Redirect { order_id: Uuid, init_point: String },
}

/// Checkout of a logged-in customer's cart.
pub struct CartCheckoutUseCase<C, P, O, S, G, H, T, R, M>
where
    C: CartStore,
    P: ProductRepository,
    O: OrderRepository,
    S: SettingsRepository,
    G: PaymentGateway,
    H: PaymentHookRepository,
    T: HookTransport,
    R: OrderRepository,
    M: Mailer,
{
    pub cart: CartService<C, P>,
    pub orders: O,
    pub config: PaymentConfigResolver<S>,
    pub gateway: G,
    pub dispatcher: HookDispatcher<H, T>,
    pub receipts: ReceiptNotifier<R, M>,
}

impl<C, P, O, S, G, H, T, R, M> CartCheckoutUseCase<C, P, O, S, G, H, T, R, M>
where
    C: CartStore,
    P: ProductRepository,
    O: OrderRepository,
    S: SettingsRepository,
    G: PaymentGateway,
    H: PaymentHookRepository,
    T: HookTransport,
    R: OrderRepository,
    M: Mailer,
{
    pub async fn execute(
        &self,
        cart_id: &str,
        customer: &User,
        payment_method: Option<&str>,
        urls: &CheckoutUrls,
    ) -> Result<CheckoutOutcome, StoreError> {
        if !customer.has_checkout_profile() {
            return Err(StoreError::ProfileIncomplete);
        }
        let view = self.cart.checkout_view(cart_id).await?;
        if view.lines.is_empty() {
            return Err(StoreError::CartEmpty);
        }

        // 1. Persist the order and announce it
        let (order, items) = build_order(
            &view.lines,
            Some(customer.email.clone()),
            Some(customer.id),
        )?;
        self.orders.create(&order, &items).await?;
        tracing::info!(order_id = %order.id, total_cents = order.total_cents, "order created");

        let payload = order.event_payload();
        let provider = order.provider.as_deref();
        self.dispatcher
            .dispatch(PaymentEvent::Created, &payload, provider)
            .await;

        // 2. Free orders settle immediately
        if is_free(&order) {
            self.dispatcher
                .dispatch(PaymentEvent::Paid, &payload, provider)
                .await;
            self.receipts.send(order.id, &customer.email).await;
            self.cart.clear(cart_id).await?;
            return Ok(CheckoutOutcome::Free { order_id: order.id });
        }

        // 3. Provider checkout
        let settings = self.config.resolve().await?;
        let credentials = settings.credentials().ok_or(StoreError::AccessTokenMissing)?;
        let notification_url = urls.webhook_url()?;
        let method = match PaymentMethod::normalize(payment_method) {
            Some(method) => Some(method),
            None if payment_method.is_some_and(|m| !m.trim().is_empty()) => None,
            None => settings.normalized_method(),
        };

        if method == Some(PaymentMethod::Pix) {
            let (first_name, last_name) = split_payer_name(&customer.payer_name());
            let cpf = customer
                .profile
                .cpf
                .as_deref()
                .map(digits_only)
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_CPF.to_owned());
            let request = PixPaymentRequest {
                amount: cents_to_decimal(order.total_cents),
                description: format!("Pedido #{}", order.id),
                payer: PixPayer {
                    email: customer.email.clone(),
                    first_name,
                    last_name,
                    cpf,
                },
                notification_url,
                external_reference: order.id.to_string(),
            };
            let payment = self.gateway.create_pix_payment(&request, &credentials).await?;
            self.orders
                .apply_provider_update(order.id, &payment_update(&payment))
                .await?;

            let transaction_field = |name: &str| {
                scalar_to_string(
                    payment
                        .get("point_of_interaction")
                        .and_then(|p| p.get("transaction_data"))
                        .and_then(|t| t.get(name)),
                )
            };
            return Ok(CheckoutOutcome::Pix {
                order_id: order.id,
                qr_code_base64: transaction_field("qr_code_base64"),
                qr_code: transaction_field("qr_code"),
            });
        }

        let request = PreferenceRequest {
            items: preference_items(&view.lines),
            payer_email: customer.email.clone(),
            back_urls: urls.back_urls(),
            notification_url,
            external_reference: order.id.to_string(),
            payment_method: method,
        };
        let preference = self.gateway.create_preference(&request, &credentials).await?;
        if let Some(preference_id) = scalar_to_string(preference.get("id")) {
            self.orders.set_preference_id(order.id, &preference_id).await?;
        }

        let init_point = scalar_to_string(preference.get("init_point"))
            .or_else(|| scalar_to_string(preference.get("sandbox_init_point")))
            .ok_or(StoreError::CheckoutFailed)?;
        Ok(CheckoutOutcome::Redirect {
            order_id: order.id,
            init_point,
        })
    }
}
