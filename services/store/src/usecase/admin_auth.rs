use chrono::Utc;
use uuid::Uuid;

use vitrine_auth_types::password::verify_password;
use vitrine_auth_types::totp;
use vitrine_domain::user::UserRole;

use crate::domain::repository::{MfaChallengeStore, UserRepository};
use crate::domain::types::{CustomerProfile, User};
use crate::error::StoreError;
use crate::usecase::account::{LoginOutcome, complete_login, hash};
use crate::usecase::input::normalize_email;

const BOOTSTRAP_ADMIN_NAME: &str = "Admin";

fn totp_error(e: totp::TotpError) -> StoreError {
    StoreError::Internal(e.into())
}

/// Admin credentials from the environment.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

// ── Bootstrap ────────────────────────────────────────────────────────────────

pub struct EnsureAdminUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> EnsureAdminUseCase<U> {
    /// Create the configured admin, or promote an existing user with that
    /// email. An existing user keeps their password.
    pub async fn execute(&self, admin: &BootstrapAdmin) -> Result<(), StoreError> {
        let email = admin.email.trim().to_lowercase();
        if email.is_empty() || admin.password.is_empty() {
            return Ok(());
        }
        match self.users.find_by_email(&email).await? {
            Some(user) if user.role == UserRole::Admin => Ok(()),
            Some(user) => {
                self.users
                    .update_credentials(user.id, UserRole::Admin, &user.password_hash)
                    .await?;
                tracing::info!(user_id = %user.id, "promoted configured admin");
                Ok(())
            }
            None => {
                let now = Utc::now();
                let user = User {
                    id: Uuid::now_v7(),
                    name: BOOTSTRAP_ADMIN_NAME.to_owned(),
                    email,
                    password_hash: hash(&admin.password)?,
                    role: UserRole::Admin,
                    profile: CustomerProfile::default(),
                    mfa_enabled: false,
                    mfa_secret: None,
                    created_at: now,
                    updated_at: now,
                };
                self.users.create(&user).await?;
                tracing::info!(user_id = %user.id, "created configured admin");
                Ok(())
            }
        }
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct AdminLoginUseCase<U, F>
where
    U: UserRepository,
    F: MfaChallengeStore,
{
    pub users: U,
    pub challenges: F,
}

impl<U, F> AdminLoginUseCase<U, F>
where
    U: UserRepository,
    F: MfaChallengeStore,
{
    /// Only admins may log in here. Customers get the same error as a bad
    /// password.
    pub async fn execute(&self, email: &str, password: &str) -> Result<LoginOutcome, StoreError> {
        let email = normalize_email(email)?;
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .filter(|u| u.role == UserRole::Admin)
            .filter(|u| verify_password(password, &u.password_hash))
            .ok_or(StoreError::InvalidCredentials)?;
        complete_login(&self.challenges, &user).await
    }
}

// ── MFA challenge ────────────────────────────────────────────────────────────

pub struct VerifyMfaUseCase<U, F>
where
    U: UserRepository,
    F: MfaChallengeStore,
{
    pub users: U,
    pub challenges: F,
}

impl<U, F> VerifyMfaUseCase<U, F>
where
    U: UserRepository,
    F: MfaChallengeStore,
{
    /// Confirm a login challenge. A wrong code keeps the challenge open.
    pub async fn execute(&self, token: &str, code: &str) -> Result<User, StoreError> {
        let user_id = self
            .challenges
            .find(token)
            .await?
            .ok_or(StoreError::MfaChallengeExpired)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(StoreError::MfaChallengeExpired)?;
        let Some(secret) = user.mfa_secret.as_deref() else {
            self.challenges.delete(token).await?;
            return Err(StoreError::MfaChallengeExpired);
        };

        if !totp::verify_code(secret, code).map_err(totp_error)? {
            return Err(StoreError::InvalidMfaCode);
        }
        self.challenges.delete(token).await?;
        tracing::info!(user_id = %user.id, "admin passed MFA");
        Ok(user)
    }
}

// ── MFA management ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MfaSetup {
    pub secret: String,
    pub otpauth_url: String,
    pub enabled: bool,
}

pub struct ManageMfaUseCase<U: UserRepository> {
    pub users: U,
    pub issuer: String,
}

impl<U: UserRepository> ManageMfaUseCase<U> {
    async fn admin(&self, user_id: Uuid) -> Result<User, StoreError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(StoreError::Unauthorized)
    }

    /// Generate a secret if the admin has none. MFA stays as it was.
    pub async fn setup(&self, user_id: Uuid) -> Result<MfaSetup, StoreError> {
        let user = self.admin(user_id).await?;
        let (secret, enabled) = match user.mfa_secret {
            Some(secret) => (secret, user.mfa_enabled),
            None => {
                let secret = totp::generate_secret();
                self.users.set_mfa(user.id, false, Some(&secret)).await?;
                (secret, false)
            }
        };
        let otpauth_url =
            totp::provisioning_url(&secret, &self.issuer, &user.email).map_err(totp_error)?;
        Ok(MfaSetup {
            secret,
            otpauth_url,
            enabled,
        })
    }

    /// Turn MFA on once the admin proves they can produce codes.
    pub async fn enable(&self, user_id: Uuid, code: &str) -> Result<(), StoreError> {
        let user = self.admin(user_id).await?;
        let Some(secret) = user.mfa_secret.as_deref() else {
            return Err(StoreError::InvalidMfaCode);
        };
        if !totp::verify_code(secret, code).map_err(totp_error)? {
            return Err(StoreError::InvalidMfaCode);
        }
        self.users.set_mfa(user.id, true, Some(secret)).await?;
        tracing::info!(user_id = %user.id, "MFA enabled");
        Ok(())
    }

    /// Turn MFA off and forget the secret.
    pub async fn disable(&self, user_id: Uuid) -> Result<(), StoreError> {
        let user = self.admin(user_id).await?;
        self.users.set_mfa(user.id, false, None).await?;
        tracing::info!(user_id = %user.id, "MFA disabled");
        Ok(())
    }
}
