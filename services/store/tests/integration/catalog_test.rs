use vitrine_domain::order::OrderStatus;
use vitrine_store::domain::types::CartLine;
use vitrine_store::error::StoreError;
use vitrine_store::usecase::admin_products::{
    AdminDashboardUseCase, CreateProductUseCase, DeleteProductUseCase, ProductInput,
    ToggleProductUseCase, UpdateProductUseCase,
};
use vitrine_store::usecase::cart::CartService;
use vitrine_store::usecase::catalog::{GetProductUseCase, ListProductsUseCase};
use vitrine_store::usecase::receipt::ReceiptNotifier;

use crate::helpers::{
    MockCartStore, MockMailer, MockOrderRepo, MockProductRepo, test_order, test_product,
};

const CART: &str = "cart-1";

fn product_input(code: Option<&str>, title: &str, price: &str) -> ProductInput {
    ProductInput {
        code: code.map(str::to_owned),
        title: title.into(),
        price_text: Some(price.into()),
        active: true,
        ..Default::default()
    }
}

// ── Storefront ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_hide_paused_products_from_storefront() {
    let products = MockProductRepo::new(vec![
        test_product("ebook", 1_990, true),
        test_product("pausado", 500, false),
    ]);

    let listed = ListProductsUseCase {
        products: products.clone(),
    }
    .execute()
    .await
    .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].code, "ebook");

    let result = GetProductUseCase { products }.execute("pausado").await;
    assert!(
        matches!(result, Err(StoreError::NotFound)),
        "expected NotFound, got {result:?}"
    );
}

// ── Cart ─────────────────────────────────────────────────────────────────────

fn cart(store: &MockCartStore) -> CartService<MockCartStore, MockProductRepo> {
    CartService {
        store: store.clone(),
        products: MockProductRepo::new(vec![
            test_product("ebook", 1_990, true),
            test_product("curso", 10_000, true),
            test_product("pausado", 500, false),
        ]),
    }
}

#[tokio::test]
async fn should_accumulate_added_quantities() {
    let store = MockCartStore::default();
    let cart = cart(&store);

    cart.add(CART, "ebook", None).await.unwrap();
    cart.add(CART, "ebook", Some(2)).await.unwrap();
    cart.add(CART, "curso", Some(0)).await.unwrap();

    let view = cart.view(CART).await.unwrap();
    assert_eq!(view.total_items, 4);
    assert_eq!(view.total_cents, 3 * 1_990 + 10_000);
    assert_eq!(view.lines[0].product.code, "ebook");
    assert_eq!(view.lines[0].quantity, 3);
}

#[tokio::test]
async fn should_remove_line_when_quantity_set_to_zero() {
    let store = MockCartStore::with(CART, &[("ebook", 2), ("curso", 1)]);
    let cart = cart(&store);

    cart.set(CART, "ebook", 0).await.unwrap();
    cart.set(CART, "curso", 5).await.unwrap();

    let lines = store.lines(CART);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].id, "curso");
    assert_eq!(lines[0].quantity, 5);
}

#[tokio::test]
async fn should_show_paused_items_but_not_charge_for_them() {
    let store = MockCartStore::with(CART, &[("ebook", 1), ("pausado", 2)]);
    let cart = cart(&store);

    let view = cart.view(CART).await.unwrap();
    let checkout = cart.checkout_view(CART).await.unwrap();

    assert_eq!(view.lines.len(), 2);
    assert_eq!(checkout.lines.len(), 1);
    assert_eq!(checkout.total_cents, 1_990);
}

#[tokio::test]
async fn should_reject_blank_product_code() {
    let store = MockCartStore::default();

    let result = cart(&store).add(CART, "  ", Some(1)).await;

    assert!(
        matches!(result, Err(StoreError::Validation(_))),
        "expected Validation, got {result:?}"
    );
}

#[tokio::test]
async fn should_cap_line_quantity() {
    let store = MockCartStore::with(CART, &[("ebook", 9_999)]);
    let cart = cart(&store);

    let oversized = cart.set(CART, "curso", 10_000).await;
    assert!(
        matches!(oversized, Err(StoreError::Validation(_))),
        "expected Validation, got {oversized:?}"
    );

    let accumulated = cart.add(CART, "ebook", Some(1)).await;
    assert!(
        matches!(accumulated, Err(StoreError::Validation(_))),
        "expected Validation, got {accumulated:?}"
    );
    assert_eq!(store.lines(CART), vec![CartLine { id: "ebook".into(), quantity: 9_999 }]);
}

// ── Admin products ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_product_with_parsed_price() {
    let products = MockProductRepo::default();

    let product = CreateProductUseCase {
        products: products.clone(),
    }
    .execute(product_input(Some(" ebook "), " Ebook ", "R$ 19,90"))
    .await
    .unwrap();

    assert_eq!(product.code, "ebook");
    assert_eq!(product.title, "Ebook");
    assert_eq!(product.price_cents, 1_990);
    assert_eq!(products.products.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_generate_code_when_missing() {
    let product = CreateProductUseCase {
        products: MockProductRepo::default(),
    }
    .execute(product_input(None, "Brinde", "Grátis"))
    .await
    .unwrap();

    assert!(uuid::Uuid::parse_str(&product.code).is_ok());
    assert_eq!(product.price_cents, 0);
}

#[tokio::test]
async fn should_reject_duplicate_code() {
    let products = MockProductRepo::new(vec![test_product("ebook", 1_990, true)]);

    let created = CreateProductUseCase {
        products: products.clone(),
    }
    .execute(product_input(Some("ebook"), "Outro", "1,00"))
    .await;
    assert!(
        matches!(created, Err(StoreError::ProductCodeTaken)),
        "expected ProductCodeTaken, got {created:?}"
    );

    products
        .products
        .lock()
        .unwrap()
        .push(test_product("curso", 10_000, true));
    let renamed = UpdateProductUseCase { products }
        .execute("curso", product_input(Some("ebook"), "Curso", "100,00"))
        .await;
    assert!(
        matches!(renamed, Err(StoreError::ProductCodeTaken)),
        "expected ProductCodeTaken, got {renamed:?}"
    );
}

#[tokio::test]
async fn should_update_keeping_identity() {
    let original = test_product("ebook", 1_990, true);
    let products = MockProductRepo::new(vec![original.clone()]);

    let updated = UpdateProductUseCase {
        products: products.clone(),
    }
    .execute("ebook", product_input(None, "Ebook 2ª edição", "29,90"))
    .await
    .unwrap();

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.code, "ebook");
    assert_eq!(updated.price_cents, 2_990);
    assert_eq!(updated.created_at, original.created_at);
}

#[tokio::test]
async fn should_toggle_and_delete_products() {
    let products = MockProductRepo::new(vec![test_product("ebook", 1_990, true)]);

    let toggle = ToggleProductUseCase {
        products: products.clone(),
    };
    assert!(!toggle.execute("ebook").await.unwrap());
    assert!(toggle.execute("ebook").await.unwrap());

    let delete = DeleteProductUseCase {
        products: products.clone(),
    };
    delete.execute("ebook").await.unwrap();
    let result = delete.execute("ebook").await;
    assert!(
        matches!(result, Err(StoreError::NotFound)),
        "expected NotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_split_dashboard_products_by_state() {
    let dashboard = AdminDashboardUseCase {
        products: MockProductRepo::new(vec![
            test_product("a", 100, true),
            test_product("b", 100, false),
            test_product("c", 100, true),
        ]),
        orders: MockOrderRepo::new(
            (0..7)
                .map(|_| test_order(OrderStatus::Pending, 100, None))
                .collect(),
        ),
    }
    .execute()
    .await
    .unwrap();

    assert_eq!(dashboard.active.len(), 2);
    assert_eq!(dashboard.paused.len(), 1);
    assert_eq!(dashboard.recent_orders.len(), 5);
}

// ── Receipts ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_skip_receipt_without_mailer() {
    let order = test_order(OrderStatus::Paid, 1_990, Some("ana@example.com"));
    let orders = MockOrderRepo::new(vec![order.clone()]);
    let mailer = MockMailer::unconfigured();

    let sent = ReceiptNotifier {
        orders: orders.clone(),
        mailer: mailer.clone(),
    }
    .send(order.id, "ana@example.com")
    .await;

    assert!(!sent);
    assert!(mailer.sent().is_empty());
    assert_eq!(orders.get(order.id).unwrap().receipt_sent_at, None);
}

#[tokio::test]
async fn should_not_send_receipt_for_unknown_order() {
    let mailer = MockMailer::configured();

    let sent = ReceiptNotifier {
        orders: MockOrderRepo::empty(),
        mailer: mailer.clone(),
    }
    .send(uuid::Uuid::now_v7(), "ana@example.com")
    .await;

    assert!(!sent);
    assert!(mailer.sent().is_empty());
}
