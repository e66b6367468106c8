//! TOTP secrets and code checks for admin MFA.
//!
//! SHA-1, 6 digits, 30 second step, one step of skew.

use totp_rs::{Algorithm, Secret, TOTP};

#[derive(Debug, thiserror::Error)]
pub enum TotpError {
    #[error("invalid TOTP secret: {0}")]
    Secret(String),
    #[error("system clock error")]
    Clock,
}

/// Generate a new base32 secret (160 bits).
pub fn generate_secret() -> String {
    Secret::generate_secret().to_encoded().to_string()
}

fn build(secret: &str, issuer: &str, account: &str) -> Result<TOTP, TotpError> {
    let bytes = Secret::Encoded(secret.to_owned())
        .to_bytes()
        .map_err(|e| TotpError::Secret(format!("{e:?}")))?;
    TOTP::new(
        Algorithm::SHA1,
        6,
        1,
        30,
        bytes,
        Some(issuer.to_owned()),
        account.to_owned(),
    )
    .map_err(|e| TotpError::Secret(e.to_string()))
}

/// `otpauth://` provisioning URL for authenticator apps.
pub fn provisioning_url(secret: &str, issuer: &str, account: &str) -> Result<String, TotpError> {
    Ok(build(secret, issuer, account)?.get_url())
}

/// Whether `code` is valid for `secret` right now.
pub fn verify_code(secret: &str, code: &str) -> Result<bool, TotpError> {
    let code = code.trim();
    if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
        return Ok(false);
    }
    build(secret, "vitrine", "account")?
        .check_current(code)
        .map_err(|_| TotpError::Clock)
}

/// Current code for `secret`.
pub fn current_code(secret: &str) -> Result<String, TotpError> {
    build(secret, "vitrine", "account")?
        .generate_current()
        .map_err(|_| TotpError::Clock)
}
