use std::collections::HashMap;

use crate::config::PaymentDefaults;
use crate::domain::repository::SettingsRepository;
use crate::domain::types::{
    DEFAULT_API_BASE_URL, PAYMENT_SETTING_KEYS, PaymentSettings, SETTING_ACCESS_TOKEN,
    SETTING_API_BASE_URL, SETTING_PAYMENT_METHOD, SETTING_PUBLIC_KEY, SETTING_WEBHOOK_SECRET,
};
use crate::error::StoreError;

// ── Resolve ──────────────────────────────────────────────────────────────────

/// Resolves Mercado Pago configuration.
///
/// Precedence per key: a non-empty value in the settings table, then the
/// process environment, then the built-in default (API base URL only).
pub struct PaymentConfigResolver<S: SettingsRepository> {
    pub settings: S,
    pub defaults: PaymentDefaults,
}

impl<S: SettingsRepository> PaymentConfigResolver<S> {
    async fn stored(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .settings
            .get(key)
            .await?
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty()))
    }

    pub async fn resolve(&self) -> Result<PaymentSettings, StoreError> {
        let d = &self.defaults;
        let access_token = self
            .stored(SETTING_ACCESS_TOKEN)
            .await?
            .or_else(|| d.access_token.clone());
        let public_key = self
            .stored(SETTING_PUBLIC_KEY)
            .await?
            .or_else(|| d.public_key.clone());
        let webhook_secret = self
            .stored(SETTING_WEBHOOK_SECRET)
            .await?
            .or_else(|| d.webhook_secret.clone());
        let api_base_url = self
            .stored(SETTING_API_BASE_URL)
            .await?
            .or_else(|| d.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        let payment_method = self
            .stored(SETTING_PAYMENT_METHOD)
            .await?
            .or_else(|| d.payment_method.clone());

        Ok(PaymentSettings {
            access_token,
            public_key,
            webhook_secret,
            api_base_url,
            payment_method,
        })
    }
}

// ── Update ───────────────────────────────────────────────────────────────────

pub struct UpdatePaymentSettingsUseCase<S: SettingsRepository> {
    pub settings: S,
}

impl<S: SettingsRepository> UpdatePaymentSettingsUseCase<S> {
    /// Store each provided key. An empty value clears the override.
    pub async fn execute(&self, values: HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(unknown) = values
            .keys()
            .find(|k| !PAYMENT_SETTING_KEYS.contains(&k.as_str()))
        {
            return Err(StoreError::Validation(format!("unknown setting {unknown}")));
        }
        for key in PAYMENT_SETTING_KEYS {
            if let Some(value) = values.get(key) {
                self.settings.set(key, value.trim()).await?;
            }
        }
        Ok(())
    }
}
