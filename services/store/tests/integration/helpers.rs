use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use uuid::Uuid;

use vitrine_domain::order::OrderStatus;
use vitrine_domain::user::UserRole;
use vitrine_store::config::{Environment, PaymentDefaults};
use vitrine_store::domain::repository::{
    CartStore, HookTransport, Mailer, MfaChallengeStore, OrderRepository, PaymentGateway,
    PaymentHookRepository, ProductRepository, SettingsRepository, UserRepository,
};
use vitrine_store::domain::types::{
    CartLine, CustomerProfile, HookDelivery, Order, OrderItem, OrderWithItems, OutgoingEmail,
    PaymentHook, PixPaymentRequest, PreferenceRequest, Product, ProviderCredentials,
    ProviderPayment, ProviderPaymentUpdate, User,
};
use vitrine_store::error::StoreError;
use vitrine_store::usecase::hooks::HookDispatcher;
use vitrine_store::usecase::receipt::ReceiptNotifier;
use vitrine_store::usecase::settings::PaymentConfigResolver;

pub const TEST_ACCESS_TOKEN: &str = "TEST-access-token";
pub const TEST_WEBHOOK_SECRET: &str = "whsec-test";

// ── MockProductRepo ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockProductRepo {
    pub products: Arc<Mutex<Vec<Product>>>,
}

impl MockProductRepo {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(Mutex::new(products)),
        }
    }
}

impl ProductRepository for MockProductRepo {
    async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.lock().unwrap().clone())
    }

    async fn list_by_active(&self, active: bool) -> Result<Vec<Product>, StoreError> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.active == active)
            .cloned()
            .collect())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Product>, StoreError> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.code == code)
            .cloned())
    }

    async fn find_by_codes(&self, codes: &[String]) -> Result<Vec<Product>, StoreError> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| codes.contains(&p.code))
            .cloned()
            .collect())
    }

    async fn create(&self, product: &Product) -> Result<(), StoreError> {
        self.products.lock().unwrap().push(product.clone());
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<(), StoreError> {
        let mut products = self.products.lock().unwrap();
        if let Some(p) = products.iter_mut().find(|p| p.id == product.id) {
            *p = product.clone();
        }
        Ok(())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<(), StoreError> {
        let mut products = self.products.lock().unwrap();
        if let Some(p) = products.iter_mut().find(|p| p.id == id) {
            p.active = active;
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() != before)
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<(), StoreError> {
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn update_profile(&self, id: Uuid, profile: &CustomerProfile) -> Result<(), StoreError> {
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.id == id) {
            u.profile = profile.clone();
        }
        Ok(())
    }

    async fn update_credentials(
        &self,
        id: Uuid,
        role: UserRole,
        password_hash: &str,
    ) -> Result<(), StoreError> {
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.id == id) {
            u.role = role;
            u.password_hash = password_hash.to_owned();
        }
        Ok(())
    }

    async fn set_mfa(
        &self,
        id: Uuid,
        enabled: bool,
        secret: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.id == id) {
            u.mfa_enabled = enabled;
            u.mfa_secret = secret.map(str::to_owned);
        }
        Ok(())
    }
}

// ── MockOrderRepo ────────────────────────────────────────────────────────────

/// Clones share storage, so one instance can back both the order writer and
/// the receipt notifier.
#[derive(Clone, Default)]
pub struct MockOrderRepo {
    pub orders: Arc<Mutex<Vec<Order>>>,
    pub items: Arc<Mutex<Vec<OrderItem>>>,
}

impl MockOrderRepo {
    pub fn new(orders: Vec<Order>) -> Self {
        Self {
            orders: Arc::new(Mutex::new(orders)),
            items: Arc::default(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, id: Uuid) -> Option<Order> {
        self.orders.lock().unwrap().iter().find(|o| o.id == id).cloned()
    }

    pub fn all(&self) -> Vec<Order> {
        self.orders.lock().unwrap().clone()
    }

    fn with_items(&self, order: Order) -> OrderWithItems {
        let items = self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.order_id == order.id)
            .cloned()
            .collect();
        OrderWithItems { order, items }
    }
}

impl OrderRepository for MockOrderRepo {
    async fn create(&self, order: &Order, items: &[OrderItem]) -> Result<(), StoreError> {
        self.orders.lock().unwrap().push(order.clone());
        self.items.lock().unwrap().extend_from_slice(items);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        Ok(self.get(id))
    }

    async fn find_with_items(&self, id: Uuid) -> Result<Option<OrderWithItems>, StoreError> {
        Ok(self.get(id).map(|o| self.with_items(o)))
    }

    async fn find_for_customer(
        &self,
        id: Uuid,
        customer_id: Uuid,
    ) -> Result<Option<OrderWithItems>, StoreError> {
        Ok(self
            .get(id)
            .filter(|o| o.customer_id == Some(customer_id))
            .map(|o| self.with_items(o)))
    }

    async fn list_by_customer(
        &self,
        customer_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<OrderWithItems>, StoreError> {
        let mut orders: Vec<Order> = self
            .all()
            .into_iter()
            .filter(|o| o.customer_id == Some(customer_id))
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let limit = limit.map_or(usize::MAX, |l| l as usize);
        Ok(orders
            .into_iter()
            .take(limit)
            .map(|o| self.with_items(o))
            .collect())
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<Order>, StoreError> {
        let mut orders = self.all();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders.truncate(limit as usize);
        Ok(orders)
    }

    async fn set_preference_id(&self, id: Uuid, preference_id: &str) -> Result<(), StoreError> {
        let mut orders = self.orders.lock().unwrap();
        if let Some(o) = orders.iter_mut().find(|o| o.id == id) {
            o.provider_preference_id = Some(preference_id.to_owned());
        }
        Ok(())
    }

    async fn apply_provider_update(
        &self,
        id: Uuid,
        update: &ProviderPaymentUpdate,
    ) -> Result<Option<Order>, StoreError> {
        let mut orders = self.orders.lock().unwrap();
        let Some(order) = orders.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };
        if let Some(status) = update.status {
            order.status = status;
        }
        order.provider_payment_id = update.payment_id.clone();
        order.provider_status = update.provider_status.clone();
        order.provider_status_detail = update.provider_status_detail.clone();
        order.updated_at = Utc::now();
        Ok(Some(order.clone()))
    }

    async fn mark_receipt_sent(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut orders = self.orders.lock().unwrap();
        if let Some(o) = orders.iter_mut().find(|o| o.id == id) {
            o.receipt_sent_at = Some(at);
        }
        Ok(())
    }
}

// ── MockHookRepo ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockHookRepo {
    pub hooks: Arc<Mutex<Vec<PaymentHook>>>,
    pub deliveries: Arc<Mutex<Vec<HookDelivery>>>,
}

impl MockHookRepo {
    pub fn new(hooks: Vec<PaymentHook>) -> Self {
        Self {
            hooks: Arc::new(Mutex::new(hooks)),
            deliveries: Arc::default(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns a shared handle to the recorded deliveries for post-execution inspection.
    pub fn deliveries_handle(&self) -> Arc<Mutex<Vec<HookDelivery>>> {
        Arc::clone(&self.deliveries)
    }
}

impl PaymentHookRepository for MockHookRepo {
    async fn list_active_for_event(&self, event: &str) -> Result<Vec<PaymentHook>, StoreError> {
        Ok(self
            .hooks
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.active && h.event == event)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<PaymentHook>, StoreError> {
        Ok(self.hooks.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PaymentHook>, StoreError> {
        Ok(self
            .hooks
            .lock()
            .unwrap()
            .iter()
            .find(|h| h.id == id)
            .cloned())
    }

    async fn create(&self, hook: &PaymentHook) -> Result<(), StoreError> {
        self.hooks.lock().unwrap().push(hook.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut hooks = self.hooks.lock().unwrap();
        let before = hooks.len();
        hooks.retain(|h| h.id != id);
        self.deliveries.lock().unwrap().retain(|d| d.hook_id != id);
        Ok(hooks.len() != before)
    }

    async fn record_delivery(&self, delivery: &HookDelivery) -> Result<(), StoreError> {
        self.deliveries.lock().unwrap().push(delivery.clone());
        Ok(())
    }

    async fn list_deliveries(
        &self,
        hook_id: Uuid,
        limit: u64,
    ) -> Result<Vec<HookDelivery>, StoreError> {
        Ok(self
            .deliveries
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|d| d.hook_id == hook_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

// ── MockSettingsRepo ─────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockSettingsRepo {
    pub values: Arc<Mutex<HashMap<String, String>>>,
}

impl MockSettingsRepo {
    pub fn with(pairs: &[(&str, &str)]) -> Self {
        let values = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        Self {
            values: Arc::new(Mutex::new(values)),
        }
    }
}

impl SettingsRepository for MockSettingsRepo {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

// ── MockCartStore ────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockCartStore {
    pub carts: Arc<Mutex<HashMap<String, Vec<CartLine>>>>,
}

impl MockCartStore {
    pub fn with(cart_id: &str, lines: &[(&str, u32)]) -> Self {
        let store = Self::default();
        store.carts.lock().unwrap().insert(
            cart_id.to_owned(),
            lines
                .iter()
                .map(|(id, quantity)| CartLine {
                    id: (*id).to_owned(),
                    quantity: *quantity,
                })
                .collect(),
        );
        store
    }

    pub fn lines(&self, cart_id: &str) -> Vec<CartLine> {
        self.carts
            .lock()
            .unwrap()
            .get(cart_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl CartStore for MockCartStore {
    async fn load(&self, cart_id: &str) -> Result<Vec<CartLine>, StoreError> {
        Ok(self.lines(cart_id))
    }

    async fn save(&self, cart_id: &str, lines: &[CartLine]) -> Result<(), StoreError> {
        self.carts
            .lock()
            .unwrap()
            .insert(cart_id.to_owned(), lines.to_vec());
        Ok(())
    }

    async fn clear(&self, cart_id: &str) -> Result<(), StoreError> {
        self.carts.lock().unwrap().remove(cart_id);
        Ok(())
    }
}

// ── MockChallengeStore ───────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockChallengeStore {
    pub challenges: Arc<Mutex<HashMap<String, Uuid>>>,
}

impl MockChallengeStore {
    pub fn contains(&self, token: &str) -> bool {
        self.challenges.lock().unwrap().contains_key(token)
    }
}

impl MfaChallengeStore for MockChallengeStore {
    async fn create(&self, token: &str, user_id: Uuid) -> Result<(), StoreError> {
        self.challenges
            .lock()
            .unwrap()
            .insert(token.to_owned(), user_id);
        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<Uuid>, StoreError> {
        Ok(self.challenges.lock().unwrap().get(token).copied())
    }

    async fn delete(&self, token: &str) -> Result<(), StoreError> {
        self.challenges.lock().unwrap().remove(token);
        Ok(())
    }
}

// ── MockGateway ──────────────────────────────────────────────────────────────

/// Payment provider double. Unknown payment ids answer like the real API, 404.
#[derive(Clone, Default)]
pub struct MockGateway {
    pub payments: Arc<Mutex<HashMap<String, ProviderPayment>>>,
    pub preference: Value,
    pub pix: Value,
    pub preference_requests: Arc<Mutex<Vec<PreferenceRequest>>>,
    pub pix_requests: Arc<Mutex<Vec<PixPaymentRequest>>>,
    pub fetches: Arc<Mutex<Vec<String>>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payment(self, payment: ProviderPayment) -> Self {
        self.set_payment(payment);
        self
    }

    /// Replace what the provider reports for `payment.id`.
    pub fn set_payment(&self, payment: ProviderPayment) {
        let id = payment.id.clone().unwrap_or_default();
        self.payments.lock().unwrap().insert(id, payment);
    }

    pub fn with_preference(mut self, preference: Value) -> Self {
        self.preference = preference;
        self
    }

    pub fn with_pix(mut self, pix: Value) -> Self {
        self.pix = pix;
        self
    }

    pub fn provider_calls(&self) -> usize {
        self.preference_requests.lock().unwrap().len()
            + self.pix_requests.lock().unwrap().len()
            + self.fetches.lock().unwrap().len()
    }
}

impl PaymentGateway for MockGateway {
    async fn create_preference(
        &self,
        request: &PreferenceRequest,
        _credentials: &ProviderCredentials,
    ) -> Result<Value, StoreError> {
        self.preference_requests.lock().unwrap().push(request.clone());
        Ok(self.preference.clone())
    }

    async fn create_pix_payment(
        &self,
        request: &PixPaymentRequest,
        _credentials: &ProviderCredentials,
    ) -> Result<Value, StoreError> {
        self.pix_requests.lock().unwrap().push(request.clone());
        Ok(self.pix.clone())
    }

    async fn fetch_payment(
        &self,
        payment_id: &str,
        _credentials: &ProviderCredentials,
    ) -> Result<ProviderPayment, StoreError> {
        self.fetches.lock().unwrap().push(payment_id.to_owned());
        self.payments
            .lock()
            .unwrap()
            .get(payment_id)
            .cloned()
            .ok_or(StoreError::PaymentProvider {
                status: 404,
                body: "{\"message\":\"Payment not found\"}".into(),
            })
    }
}

// ── MockTransport ────────────────────────────────────────────────────────────

/// Hook endpoint double. Answers every POST with `status`, or fails like a
/// refused connection when `status` is `None`.
#[derive(Clone)]
pub struct MockTransport {
    pub status: Option<u16>,
    pub posts: Arc<Mutex<Vec<(String, Value)>>>,
}

impl MockTransport {
    pub fn responding(status: u16) -> Self {
        Self {
            status: Some(status),
            posts: Arc::default(),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            status: None,
            posts: Arc::default(),
        }
    }

    pub fn posts(&self) -> Vec<(String, Value)> {
        self.posts.lock().unwrap().clone()
    }

    /// Events posted, in order.
    pub fn events(&self) -> Vec<String> {
        self.posts()
            .iter()
            .filter_map(|(_, body)| body["event"].as_str().map(str::to_owned))
            .collect()
    }
}

impl HookTransport for MockTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<u16, anyhow::Error> {
        self.posts
            .lock()
            .unwrap()
            .push((url.to_owned(), body.clone()));
        self.status
            .ok_or_else(|| anyhow::anyhow!("connection refused"))
    }
}

// ── MockMailer ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockMailer {
    pub configured: bool,
    pub sent: Arc<Mutex<Vec<OutgoingEmail>>>,
}

impl MockMailer {
    pub fn configured() -> Self {
        Self {
            configured: true,
            sent: Arc::default(),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            sent: Arc::default(),
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

impl Mailer for MockMailer {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<(), StoreError> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

// ── Wiring ───────────────────────────────────────────────────────────────────

pub fn resolver(settings: MockSettingsRepo) -> PaymentConfigResolver<MockSettingsRepo> {
    PaymentConfigResolver {
        settings,
        defaults: PaymentDefaults::default(),
    }
}

/// Settings with an access token and webhook secret.
pub fn configured_settings() -> MockSettingsRepo {
    MockSettingsRepo::with(&[
        ("mp_access_token", TEST_ACCESS_TOKEN),
        ("mp_webhook_secret", TEST_WEBHOOK_SECRET),
    ])
}

pub fn dispatcher(
    hooks: &MockHookRepo,
    transport: &MockTransport,
) -> HookDispatcher<MockHookRepo, MockTransport> {
    HookDispatcher {
        hooks: hooks.clone(),
        transport: transport.clone(),
    }
}

pub fn receipts(
    orders: &MockOrderRepo,
    mailer: &MockMailer,
) -> ReceiptNotifier<MockOrderRepo, MockMailer> {
    ReceiptNotifier {
        orders: orders.clone(),
        mailer: mailer.clone(),
    }
}

pub fn development() -> Environment {
    Environment::Development
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_product(code: &str, price_cents: i64, active: bool) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::now_v7(),
        code: code.to_owned(),
        title: format!("Produto {code}"),
        description: None,
        price_text: None,
        price_cents,
        images: vec![],
        cta_label: None,
        cta_href: None,
        file_url: None,
        active,
        created_at: now,
        updated_at: now,
    }
}

fn test_user(email: &str, role: UserRole) -> User {
    let now = Utc::now();
    User {
        id: Uuid::now_v7(),
        name: "Ana Souza".into(),
        email: email.to_owned(),
        password_hash: vitrine_auth_types::password::hash_password("s3cret!")
            .expect("hash test password"),
        role,
        profile: CustomerProfile::default(),
        mfa_enabled: false,
        mfa_secret: None,
        created_at: now,
        updated_at: now,
    }
}

/// Customer with password `s3cret!` and a checkout-ready profile.
pub fn test_customer() -> User {
    let mut user = test_user("ana@example.com", UserRole::Customer);
    user.profile.full_name = Some("Ana Maria Souza".into());
    user.profile.cpf = Some("529.982.247-25".into());
    user
}

/// Admin with password `s3cret!`.
pub fn test_admin() -> User {
    test_user("admin@example.com", UserRole::Admin)
}

pub fn test_order(status: OrderStatus, total_cents: i64, email: Option<&str>) -> Order {
    let now = Utc::now();
    Order {
        id: Uuid::now_v7(),
        status,
        total_cents,
        currency: "BRL".into(),
        customer_email: email.map(str::to_owned),
        customer_id: None,
        provider: Some("mercadopago".into()),
        provider_preference_id: None,
        provider_payment_id: None,
        provider_status: None,
        provider_status_detail: None,
        receipt_sent_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_hook(event: &str, provider: &str, active: bool) -> PaymentHook {
    PaymentHook {
        id: Uuid::now_v7(),
        name: format!("{provider} {event}"),
        url: format!("https://erp.example/{}", Uuid::new_v4()),
        provider: provider.to_owned(),
        event: event.to_owned(),
        active,
        created_at: Utc::now(),
    }
}

pub fn provider_payment(id: &str, status: &str, order_id: Uuid) -> ProviderPayment {
    ProviderPayment {
        id: Some(id.to_owned()),
        status: Some(status.to_owned()),
        status_detail: Some(format!("{status}_detail")),
        external_reference: Some(order_id.to_string()),
    }
}

/// `x-signature` header value the provider would send.
pub fn sign(secret: &str, data_id: &str, request_id: &str, ts: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("hmac key");
    mac.update(format!("id:{data_id};request-id:{request_id};ts:{ts};").as_bytes());
    format!("ts={ts},v1={}", hex::encode(mac.finalize().into_bytes()))
}
