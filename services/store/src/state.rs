use axum::extract::FromRef;
use deadpool_redis::Pool as RedisPool;
use sea_orm::DatabaseConnection;

use vitrine_auth_types::identity::SessionKey;

use crate::config::{Environment, MailConfig, PaymentDefaults};
use crate::infra::cache::{RedisCartStore, RedisMfaChallengeStore};
use crate::infra::db::{
    DbOrderRepository, DbPaymentHookRepository, DbProductRepository, DbSettingsRepository,
    DbUserRepository,
};
use crate::infra::hooks::HttpHookTransport;
use crate::infra::mail::ResendMailer;
use crate::infra::mercadopago::MercadoPagoGateway;
use crate::usecase::admin_auth::BootstrapAdmin;
use crate::usecase::cart::CartService;
use crate::usecase::hooks::HookDispatcher;
use crate::usecase::receipt::ReceiptNotifier;
use crate::usecase::settings::PaymentConfigResolver;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: RedisPool,
    /// Outbound client for the payment provider, hooks and email.
    pub http: reqwest::Client,
    pub session_secret: String,
    pub cookie_domain: String,
    pub environment: Environment,
    pub app_url: Option<String>,
    pub webhook_base_url: Option<String>,
    pub payment_defaults: PaymentDefaults,
    pub mail: MailConfig,
    pub mfa_issuer: String,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl FromRef<AppState> for SessionKey {
    fn from_ref(state: &AppState) -> Self {
        SessionKey(state.session_secret.clone())
    }
}

impl AppState {
    // ── Persistence ──────────────────────────────────────────────────────────

    pub fn product_repo(&self) -> DbProductRepository {
        DbProductRepository {
            db: self.db.clone(),
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn order_repo(&self) -> DbOrderRepository {
        DbOrderRepository {
            db: self.db.clone(),
        }
    }

    pub fn hook_repo(&self) -> DbPaymentHookRepository {
        DbPaymentHookRepository {
            db: self.db.clone(),
        }
    }

    pub fn settings_repo(&self) -> DbSettingsRepository {
        DbSettingsRepository {
            db: self.db.clone(),
        }
    }

    // ── Redis ────────────────────────────────────────────────────────────────

    pub fn cart_store(&self) -> RedisCartStore {
        RedisCartStore {
            pool: self.redis.clone(),
        }
    }

    pub fn mfa_challenges(&self) -> RedisMfaChallengeStore {
        RedisMfaChallengeStore {
            pool: self.redis.clone(),
        }
    }

    // ── Outbound ─────────────────────────────────────────────────────────────

    pub fn payment_gateway(&self) -> MercadoPagoGateway {
        MercadoPagoGateway {
            client: self.http.clone(),
        }
    }

    pub fn hook_transport(&self) -> HttpHookTransport {
        HttpHookTransport {
            client: self.http.clone(),
        }
    }

    pub fn mailer(&self) -> ResendMailer {
        ResendMailer {
            client: self.http.clone(),
            config: self.mail.clone(),
        }
    }

    // ── Composed services ────────────────────────────────────────────────────

    pub fn payment_config(&self) -> PaymentConfigResolver<DbSettingsRepository> {
        PaymentConfigResolver {
            settings: self.settings_repo(),
            defaults: self.payment_defaults.clone(),
        }
    }

    pub fn hook_dispatcher(&self) -> HookDispatcher<DbPaymentHookRepository, HttpHookTransport> {
        HookDispatcher {
            hooks: self.hook_repo(),
            transport: self.hook_transport(),
        }
    }

    pub fn receipts(&self) -> ReceiptNotifier<DbOrderRepository, ResendMailer> {
        ReceiptNotifier {
            orders: self.order_repo(),
            mailer: self.mailer(),
        }
    }

    pub fn cart_service(&self) -> CartService<RedisCartStore, DbProductRepository> {
        CartService {
            store: self.cart_store(),
            products: self.product_repo(),
        }
    }
}
