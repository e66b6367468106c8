/// Deployment environment. `production` turns on fail-closed webhook checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
}

impl Environment {
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        }
    }

    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

/// Mercado Pago values from the environment. Overridden by the settings table.
#[derive(Debug, Clone, Default)]
pub struct PaymentDefaults {
    pub access_token: Option<String>,
    pub public_key: Option<String>,
    pub webhook_secret: Option<String>,
    pub api_base_url: Option<String>,
    pub payment_method: Option<String>,
}

/// Receipt email sender settings.
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Resend API key. Receipts are skipped when absent.
    pub api_key: Option<String>,
    pub api_url: String,
    pub from_address: String,
    pub from_name: String,
}

/// Store service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL (carts and MFA challenges).
    pub redis_url: String,
    /// HMAC secret for signing session tokens.
    pub session_secret: String,
    /// Cookie domain attribute.
    pub cookie_domain: String,
    /// TCP port to listen on (default 3120). Env var: `STORE_PORT`.
    pub store_port: u16,
    /// Env var: `APP_ENV`.
    pub environment: Environment,
    /// Public base URL of the storefront. Env var: `APP_URL`.
    pub app_url: Option<String>,
    /// Public base URL for provider callbacks. Env var: `MP_WEBHOOK_BASE_URL`.
    pub webhook_base_url: Option<String>,
    pub payment: PaymentDefaults,
    pub mail: MailConfig,
    /// Issuer shown in authenticator apps (default "Vitrine").
    pub mfa_issuer: String,
    /// Bootstrap admin credentials. Env vars: `ADMIN_EMAIL`, `ADMIN_PASSWORD`.
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl StoreConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            redis_url: std::env::var("REDIS_URL").expect("REDIS_URL"),
            session_secret: std::env::var("SESSION_SECRET").expect("SESSION_SECRET"),
            cookie_domain: std::env::var("COOKIE_DOMAIN").expect("COOKIE_DOMAIN"),
            store_port: std::env::var("STORE_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3120),
            environment: Environment::parse(
                &std::env::var("APP_ENV").unwrap_or_else(|_| "production".to_owned()),
            ),
            app_url: optional("APP_URL"),
            webhook_base_url: optional("MP_WEBHOOK_BASE_URL"),
            payment: PaymentDefaults {
                access_token: optional("MP_ACCESS_TOKEN"),
                public_key: optional("MP_PUBLIC_KEY"),
                webhook_secret: optional("MP_WEBHOOK_SECRET"),
                api_base_url: optional("MP_API_BASE_URL"),
                payment_method: optional("MP_PAYMENT_METHOD"),
            },
            mail: MailConfig {
                api_key: optional("RESEND_EMAIL_API_KEY"),
                api_url: optional("RESEND_API_URL")
                    .unwrap_or_else(|| "https://api.resend.com/emails".to_owned()),
                from_address: optional("MAIL_FROM_ADDRESS")
                    .unwrap_or_else(|| "contato@example.com".to_owned()),
                from_name: optional("MAIL_FROM_NAME").unwrap_or_else(|| "Loja".to_owned()),
            },
            mfa_issuer: optional("MFA_ISSUER").unwrap_or_else(|| "Vitrine".to_owned()),
            admin_email: optional("ADMIN_EMAIL"),
            admin_password: optional("ADMIN_PASSWORD"),
        }
    }
}
