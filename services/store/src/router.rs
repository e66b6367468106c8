use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};
use tower_http::trace::TraceLayer;

use vitrine_core::health::healthz;
use vitrine_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    account, admin, admin_payments, admin_products, cart, catalog, checkout, health::readyz,
    mercadopago,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Catalog
        .route("/products", get(catalog::list_products))
        .route("/products/{code}", get(catalog::get_product))
        // Cart
        .route("/cart", get(cart::get_cart))
        .route("/cart", delete(cart::clear_cart))
        .route("/cart/items", post(cart::add_item))
        .route("/cart/items", patch(cart::set_item))
        .route("/cart/items/{id}", delete(cart::remove_item))
        // Checkout
        .route("/checkout", get(checkout::get_checkout))
        .route("/checkout", post(checkout::create_checkout))
        // Checkout API
        .route("/api/mercadopago/public-key", get(mercadopago::public_key))
        .route("/api/mercadopago/preference", post(mercadopago::create_preference))
        .route("/api/mercadopago/pix", post(mercadopago::create_pix))
        // Account
        .route("/account/register", post(account::register))
        .route("/account/login", post(account::login))
        .route("/account/logout", post(account::logout))
        .route("/account", get(account::get_account))
        .route("/account/orders", get(account::list_orders))
        .route("/account/orders/{id}", get(account::get_order))
        .route("/account/orders/{id}/receipt", get(account::get_order_receipt))
        .route("/account/profile", get(account::get_profile))
        .route("/account/profile", patch(account::update_profile))
        // Admin
        .route("/admin/login", post(admin::login))
        .route("/admin/mfa", post(admin::verify_mfa))
        .route("/admin/logout", post(admin::logout))
        .route("/admin", get(admin::dashboard))
        .route("/admin/mfa/setup", get(admin::mfa_setup))
        .route("/admin/mfa/enable", post(admin::mfa_enable))
        .route("/admin/mfa/disable", post(admin::mfa_disable))
        // Admin products
        .route("/admin/products", get(admin_products::list_products))
        .route("/admin/products", post(admin_products::create_product))
        .route("/admin/products/{code}", put(admin_products::update_product))
        .route("/admin/products/{code}", delete(admin_products::delete_product))
        .route("/admin/products/{code}/toggle", post(admin_products::toggle_product))
        // Admin payments
        .route("/admin/payments", get(admin_payments::overview))
        .route("/admin/payments/settings", put(admin_payments::update_settings))
        .route("/admin/payments/hooks", post(admin_payments::create_hook))
        .route("/admin/payments/hooks/{id}", delete(admin_payments::delete_hook))
        .route("/admin/payments/hooks/{id}/test", post(admin_payments::test_hook))
        .route(
            "/admin/payments/hooks/{id}/deliveries",
            get(admin_payments::list_deliveries),
        )
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        // Provider webhook. Added after the request-id layers: `x-request-id`
        // is part of the signed manifest and must arrive as the provider sent it.
        .route("/api/mercadopago/webhook", post(mercadopago::webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
