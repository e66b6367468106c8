use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Store service error variants.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),
    #[error("no purchasable items")]
    ItemsInvalid,
    #[error("cart is empty")]
    CartEmpty,
    #[error("full name and CPF are required before checkout")]
    ProfileIncomplete,
    #[error("webhook URL must be a public https address")]
    WebhookUrlNotPublic,
    #[error("invalid MFA code")]
    InvalidMfaCode,
    #[error("unauthorized")]
    Unauthorized,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("MFA challenge expired")]
    MfaChallengeExpired,
    #[error("missing signature headers")]
    InvalidSignatureHeaders,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("email already registered")]
    EmailTaken,
    #[error("product code already in use")]
    ProductCodeTaken,
    #[error("webhook secret is not configured")]
    WebhookSecretMissing,
    #[error("payment access token is not configured")]
    AccessTokenMissing,
    #[error("payment provider returned {status}: {body}")]
    PaymentProvider { status: u16, body: String },
    #[error("checkout could not be started")]
    CheckoutFailed,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl StoreError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::ItemsInvalid => "ITEMS_INVALID",
            Self::CartEmpty => "CART_EMPTY",
            Self::ProfileIncomplete => "PROFILE_INCOMPLETE",
            Self::WebhookUrlNotPublic => "WEBHOOK_URL_NOT_PUBLIC",
            Self::InvalidMfaCode => "INVALID_MFA_CODE",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::MfaChallengeExpired => "MFA_CHALLENGE_EXPIRED",
            Self::InvalidSignatureHeaders => "INVALID_SIGNATURE_HEADERS",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::ProductCodeTaken => "PRODUCT_CODE_TAKEN",
            Self::WebhookSecretMissing => "MP_WEBHOOK_SECRET_MISSING",
            Self::AccessTokenMissing => "MP_ACCESS_TOKEN_MISSING",
            Self::PaymentProvider { .. } => "PAYMENT_PROVIDER_ERROR",
            Self::CheckoutFailed => "CHECKOUT_FAILED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::ItemsInvalid
            | Self::CartEmpty
            | Self::ProfileIncomplete
            | Self::WebhookUrlNotPublic
            | Self::InvalidMfaCode => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized
            | Self::InvalidCredentials
            | Self::MfaChallengeExpired
            | Self::InvalidSignatureHeaders
            | Self::InvalidSignature => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::EmailTaken | Self::ProductCodeTaken => StatusCode::CONFLICT,
            Self::WebhookSecretMissing | Self::AccessTokenMissing | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::PaymentProvider { .. } | Self::CheckoutFailed => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Malformed or mistyped JSON bodies answer with the usual error envelope.
impl From<JsonRejection> for StoreError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        // TraceLayer records every response status; only internal errors carry a
        // cause worth logging here.
        match &self {
            Self::Internal(e) => {
                tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
            }
            Self::PaymentProvider { status, body } => {
                tracing::warn!(status, body = %body, kind = self.kind(), "payment provider error");
            }
            _ => {}
        }
        // Provider bodies stay in the logs; callers only see the code.
        let message = match &self {
            Self::PaymentProvider { .. } => "payment provider error".to_owned(),
            other => other.to_string(),
        };
        let body = serde_json::json!({
            "error": self.kind(),
            "message": message,
        });
        (status, axum::Json(body)).into_response()
    }
}
