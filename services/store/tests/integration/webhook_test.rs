use serde_json::json;

use vitrine_domain::order::OrderStatus;
use vitrine_store::config::Environment;
use vitrine_store::error::StoreError;
use vitrine_store::usecase::webhook::{HandleWebhookUseCase, WebhookInput, WebhookOutcome};

use crate::helpers::{
    MockGateway, MockHookRepo, MockMailer, MockOrderRepo, MockSettingsRepo, MockTransport,
    TEST_ACCESS_TOKEN, TEST_WEBHOOK_SECRET, configured_settings, development, dispatcher,
    provider_payment, receipts, resolver, sign, test_hook, test_order,
};

const REQUEST_ID: &str = "bb56a2f1-6aae-46ac-982e-9dcd3581d08e";
const TS: &str = "1742505638683";

struct Fixture {
    orders: MockOrderRepo,
    gateway: MockGateway,
    hooks: MockHookRepo,
    transport: MockTransport,
    mailer: MockMailer,
}

impl Fixture {
    fn new(orders: MockOrderRepo, gateway: MockGateway) -> Self {
        Self {
            orders,
            gateway,
            hooks: MockHookRepo::new(vec![
                test_hook("payment.updated", "mercadopago", true),
                test_hook("payment.paid", "mercadopago", true),
                test_hook("payment.failed", "outro", true),
            ]),
            transport: MockTransport::responding(200),
            mailer: MockMailer::configured(),
        }
    }

    fn usecase(
        &self,
        settings: MockSettingsRepo,
        environment: Environment,
    ) -> HandleWebhookUseCase<
        MockSettingsRepo,
        MockOrderRepo,
        MockGateway,
        MockHookRepo,
        MockTransport,
        MockOrderRepo,
        MockMailer,
    > {
        HandleWebhookUseCase {
            config: resolver(settings),
            orders: self.orders.clone(),
            gateway: self.gateway.clone(),
            dispatcher: dispatcher(&self.hooks, &self.transport),
            receipts: receipts(&self.orders, &self.mailer),
            environment,
        }
    }
}

fn signed_input(payment_id: &str) -> WebhookInput {
    WebhookInput {
        signature: Some(sign(TEST_WEBHOOK_SECRET, payment_id, REQUEST_ID, TS)),
        request_id: Some(REQUEST_ID.to_owned()),
        query_data_id: Some(payment_id.to_owned()),
        body: json!({ "action": "payment.updated", "data": { "id": payment_id } }),
    }
}

// ── Settlement ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_mark_order_paid_on_approved_payment() {
    let order = test_order(OrderStatus::Pending, 3_980, Some("ana@example.com"));
    let orders = MockOrderRepo::new(vec![order.clone()]);
    let gateway = MockGateway::new().with_payment(provider_payment("123", "approved", order.id));
    let fx = Fixture::new(orders, gateway);

    let outcome = fx
        .usecase(configured_settings(), development())
        .execute(signed_input("123"))
        .await
        .unwrap();

    assert_eq!(outcome, WebhookOutcome::Applied(OrderStatus::Paid));
    let stored = fx.orders.get(order.id).unwrap();
    assert_eq!(stored.status, OrderStatus::Paid);
    assert_eq!(stored.provider_payment_id.as_deref(), Some("123"));
    assert_eq!(stored.provider_status.as_deref(), Some("approved"));
    assert_eq!(stored.provider_status_detail.as_deref(), Some("approved_detail"));
    assert!(stored.receipt_sent_at.is_some());

    assert_eq!(fx.transport.events(), vec!["payment.updated", "payment.paid"]);
    let sent = fx.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ana@example.com");
}

#[tokio::test]
async fn should_end_canceled_when_approved_is_followed_by_rejected() {
    let order = test_order(OrderStatus::Pending, 1_990, None);
    let orders = MockOrderRepo::new(vec![order.clone()]);
    let gateway = MockGateway::new().with_payment(provider_payment("777", "approved", order.id));
    let fx = Fixture::new(orders, gateway);
    let usecase = fx.usecase(configured_settings(), development());

    usecase.execute(signed_input("777")).await.unwrap();
    assert_eq!(fx.orders.get(order.id).unwrap().status, OrderStatus::Paid);

    fx.gateway
        .set_payment(provider_payment("777", "rejected", order.id));
    let outcome = usecase.execute(signed_input("777")).await.unwrap();

    assert_eq!(outcome, WebhookOutcome::Applied(OrderStatus::Canceled));
    assert_eq!(fx.orders.get(order.id).unwrap().status, OrderStatus::Canceled);
    assert_eq!(
        fx.transport.events(),
        vec![
            "payment.updated",
            "payment.paid",
            "payment.updated",
            "payment.failed"
        ]
    );
}

#[tokio::test]
async fn should_not_repeat_paid_effects_on_redelivery() {
    let order = test_order(OrderStatus::Pending, 3_980, Some("ana@example.com"));
    let orders = MockOrderRepo::new(vec![order.clone()]);
    let gateway = MockGateway::new().with_payment(provider_payment("123", "approved", order.id));
    let fx = Fixture::new(orders, gateway);
    let usecase = fx.usecase(configured_settings(), development());

    usecase.execute(signed_input("123")).await.unwrap();
    let outcome = usecase.execute(signed_input("123")).await.unwrap();

    assert_eq!(outcome, WebhookOutcome::Applied(OrderStatus::Paid));
    assert_eq!(fx.orders.get(order.id).unwrap().status, OrderStatus::Paid);
    assert_eq!(
        fx.transport.events(),
        vec!["payment.updated", "payment.paid", "payment.updated"]
    );
    assert_eq!(fx.mailer.sent().len(), 1);
}

#[tokio::test]
async fn should_not_resend_receipt_already_sent() {
    let mut order = test_order(OrderStatus::Canceled, 3_980, Some("ana@example.com"));
    order.receipt_sent_at = Some(chrono::Utc::now());
    let orders = MockOrderRepo::new(vec![order.clone()]);
    let gateway = MockGateway::new().with_payment(provider_payment("123", "approved", order.id));
    let fx = Fixture::new(orders, gateway);

    fx.usecase(configured_settings(), development())
        .execute(signed_input("123"))
        .await
        .unwrap();

    assert_eq!(fx.transport.events(), vec!["payment.updated", "payment.paid"]);
    assert!(fx.mailer.sent().is_empty());
}

#[tokio::test]
async fn should_settle_order_even_when_hooks_fail() {
    for transport in [MockTransport::unreachable(), MockTransport::responding(500)] {
        let order = test_order(OrderStatus::Pending, 3_980, Some("ana@example.com"));
        let orders = MockOrderRepo::new(vec![order.clone()]);
        let gateway =
            MockGateway::new().with_payment(provider_payment("123", "approved", order.id));
        let mut fx = Fixture::new(orders, gateway);
        fx.transport = transport;

        let outcome = fx
            .usecase(configured_settings(), development())
            .execute(signed_input("123"))
            .await
            .unwrap();

        assert_eq!(outcome, WebhookOutcome::Applied(OrderStatus::Paid));
        let stored = fx.orders.get(order.id).unwrap();
        assert_eq!(stored.status, OrderStatus::Paid);
        assert!(stored.receipt_sent_at.is_some());
        assert_eq!(fx.transport.events(), vec!["payment.updated", "payment.paid"]);
        assert_eq!(fx.mailer.sent().len(), 1);
        assert_eq!(fx.hooks.deliveries.lock().unwrap().len(), 2);
    }
}

#[tokio::test]
async fn should_keep_pending_for_in_process_payment() {
    let order = test_order(OrderStatus::Pending, 1_990, Some("ana@example.com"));
    let orders = MockOrderRepo::new(vec![order.clone()]);
    let gateway = MockGateway::new().with_payment(provider_payment("55", "in_process", order.id));
    let fx = Fixture::new(orders, gateway);

    let outcome = fx
        .usecase(configured_settings(), development())
        .execute(signed_input("55"))
        .await
        .unwrap();

    assert_eq!(outcome, WebhookOutcome::Applied(OrderStatus::Pending));
    assert_eq!(fx.transport.events(), vec!["payment.updated"]);
    assert!(fx.mailer.sent().is_empty());
}

#[tokio::test]
async fn should_acknowledge_unknown_payment_without_mutation() {
    let order = test_order(OrderStatus::Pending, 1_990, None);
    let orders = MockOrderRepo::new(vec![order.clone()]);
    let fx = Fixture::new(orders, MockGateway::new());

    let outcome = fx
        .usecase(configured_settings(), development())
        .execute(signed_input("999"))
        .await
        .unwrap();

    assert_eq!(outcome, WebhookOutcome::Failed);
    let stored = fx.orders.get(order.id).unwrap();
    assert_eq!(stored.status, OrderStatus::Pending);
    assert_eq!(stored.provider_payment_id, None);
    assert!(fx.transport.posts().is_empty());
    assert!(fx.hooks.deliveries_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_ignore_payment_for_unknown_order() {
    let known = test_order(OrderStatus::Pending, 1_990, None);
    let orders = MockOrderRepo::new(vec![known.clone()]);
    let stranger = uuid::Uuid::now_v7();
    let gateway = MockGateway::new().with_payment(provider_payment("42", "approved", stranger));
    let fx = Fixture::new(orders, gateway);

    let outcome = fx
        .usecase(configured_settings(), development())
        .execute(signed_input("42"))
        .await
        .unwrap();

    assert_eq!(outcome, WebhookOutcome::OrderNotFound);
    assert_eq!(fx.orders.get(known.id).unwrap().status, OrderStatus::Pending);
    assert!(fx.transport.posts().is_empty());
}

#[tokio::test]
async fn should_acknowledge_body_without_payment_id() {
    let fx = Fixture::new(MockOrderRepo::empty(), MockGateway::new());
    let mut input = signed_input("123");
    input.body = json!({ "action": "test.created" });

    let outcome = fx
        .usecase(configured_settings(), development())
        .execute(input)
        .await
        .unwrap();

    assert_eq!(outcome, WebhookOutcome::NoPaymentId);
    assert_eq!(fx.gateway.provider_calls(), 0);
}

#[tokio::test]
async fn should_accept_numeric_payment_id_in_body() {
    let order = test_order(OrderStatus::Pending, 1_990, None);
    let orders = MockOrderRepo::new(vec![order.clone()]);
    let gateway = MockGateway::new().with_payment(provider_payment("123", "approved", order.id));
    let fx = Fixture::new(orders, gateway);
    let mut input = signed_input("123");
    input.body = json!({ "data": { "id": 123 } });

    let outcome = fx
        .usecase(configured_settings(), development())
        .execute(input)
        .await
        .unwrap();

    assert_eq!(outcome, WebhookOutcome::Applied(OrderStatus::Paid));
}

// ── Signature policy ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_missing_signature_headers() {
    let fx = Fixture::new(MockOrderRepo::empty(), MockGateway::new());
    let mut input = signed_input("123");
    input.request_id = None;

    let result = fx
        .usecase(configured_settings(), development())
        .execute(input)
        .await;

    assert!(
        matches!(result, Err(StoreError::InvalidSignatureHeaders)),
        "expected InvalidSignatureHeaders, got {result:?}"
    );
    assert_eq!(fx.gateway.provider_calls(), 0);
}

#[tokio::test]
async fn should_reject_signature_for_other_data_id() {
    let fx = Fixture::new(MockOrderRepo::empty(), MockGateway::new());
    let mut input = signed_input("123");
    input.query_data_id = Some("124".into());

    let result = fx
        .usecase(configured_settings(), development())
        .execute(input)
        .await;

    assert!(
        matches!(result, Err(StoreError::InvalidSignature)),
        "expected InvalidSignature, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_body_id_that_differs_from_signed_id() {
    let order = test_order(OrderStatus::Pending, 1_990, None);
    let orders = MockOrderRepo::new(vec![order.clone()]);
    let gateway = MockGateway::new().with_payment(provider_payment("999", "approved", order.id));
    let fx = Fixture::new(orders, gateway);
    let mut input = signed_input("123");
    input.body = json!({ "data": { "id": "999" } });

    let result = fx
        .usecase(configured_settings(), development())
        .execute(input)
        .await;

    assert!(
        matches!(result, Err(StoreError::InvalidSignature)),
        "expected InvalidSignature, got {result:?}"
    );
    assert_eq!(fx.orders.get(order.id).unwrap().status, OrderStatus::Pending);
    assert_eq!(fx.gateway.provider_calls(), 0);
}

#[tokio::test]
async fn should_fail_closed_without_secret_in_production() {
    let fx = Fixture::new(MockOrderRepo::empty(), MockGateway::new());
    let settings = MockSettingsRepo::with(&[("mp_access_token", TEST_ACCESS_TOKEN)]);

    let result = fx
        .usecase(settings, Environment::Production)
        .execute(signed_input("123"))
        .await;

    assert!(
        matches!(result, Err(StoreError::WebhookSecretMissing)),
        "expected WebhookSecretMissing, got {result:?}"
    );
}

#[tokio::test]
async fn should_skip_verification_without_secret_outside_production() {
    let order = test_order(OrderStatus::Pending, 1_990, None);
    let orders = MockOrderRepo::new(vec![order.clone()]);
    let gateway = MockGateway::new().with_payment(provider_payment("9", "cancelled", order.id));
    let fx = Fixture::new(orders, gateway);
    let settings = MockSettingsRepo::with(&[("mp_access_token", TEST_ACCESS_TOKEN)]);

    let outcome = fx
        .usecase(settings, development())
        .execute(WebhookInput {
            body: json!({ "data": { "id": "9" } }),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(outcome, WebhookOutcome::Applied(OrderStatus::Canceled));
}

#[tokio::test]
async fn should_require_access_token_after_authentication() {
    let fx = Fixture::new(MockOrderRepo::empty(), MockGateway::new());
    let settings = MockSettingsRepo::with(&[("mp_webhook_secret", TEST_WEBHOOK_SECRET)]);

    let result = fx
        .usecase(settings, development())
        .execute(signed_input("123"))
        .await;

    assert!(
        matches!(result, Err(StoreError::AccessTokenMissing)),
        "expected AccessTokenMissing, got {result:?}"
    );
}
