use std::time::Duration;

use sea_orm::Database;
use tracing::info;

use vitrine_core::tracing::init_tracing;
use vitrine_store::config::StoreConfig;
use vitrine_store::router::build_router;
use vitrine_store::state::AppState;
use vitrine_store::usecase::admin_auth::BootstrapAdmin;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = StoreConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("failed to build HTTP client");

    if !config.environment.is_production() && config.payment.webhook_secret.is_none() {
        tracing::warn!("MP_WEBHOOK_SECRET is not set; webhook signatures are not checked");
    }

    let bootstrap_admin = match (config.admin_email, config.admin_password) {
        (Some(email), Some(password)) => Some(BootstrapAdmin { email, password }),
        _ => None,
    };

    let state = AppState {
        db,
        redis,
        http,
        session_secret: config.session_secret,
        cookie_domain: config.cookie_domain,
        environment: config.environment,
        app_url: config.app_url,
        webhook_base_url: config.webhook_base_url,
        payment_defaults: config.payment,
        mail: config.mail,
        mfa_issuer: config.mfa_issuer,
        bootstrap_admin,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.store_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("store service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
