use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use vitrine_auth_types::password::{hash_password, verify_password};
use vitrine_domain::user::UserRole;

use crate::domain::repository::{CartStore, MfaChallengeStore, OrderRepository, UserRepository};
use crate::domain::types::{
    CustomerProfile, DEFAULT_CUSTOMER_NAME, MIN_PASSWORD_LEN, OrderWithItems, User,
};
use crate::error::StoreError;
use crate::usecase::input::normalize_email;

/// Orders shown on the account overview.
pub const RECENT_ORDERS: u64 = 5;

/// Result of a password login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials accepted; issue a session.
    Authenticated { user_id: Uuid, role: UserRole },
    /// Admin with MFA; the code must be confirmed with this challenge token.
    MfaRequired { token: String },
}

pub(crate) fn hash(password: &str) -> Result<String, StoreError> {
    hash_password(password).map_err(|e| StoreError::Internal(e.into()))
}

/// Open an MFA challenge for `user` when enabled, else authenticate.
pub(crate) async fn complete_login<F: MfaChallengeStore>(
    challenges: &F,
    user: &User,
) -> Result<LoginOutcome, StoreError> {
    if user.role == UserRole::Admin && user.mfa_enabled {
        let token = Uuid::new_v4().to_string();
        challenges.create(&token, user.id).await?;
        return Ok(LoginOutcome::MfaRequired { token });
    }
    Ok(LoginOutcome::Authenticated {
        user_id: user.id,
        role: user.role,
    })
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub name: Option<String>,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Debug, Clone)]
pub struct Registered {
    pub user: User,
    /// Whether the visitor's cart has items, to continue to checkout.
    pub has_cart_items: bool,
}

pub struct RegisterUseCase<U, C>
where
    U: UserRepository,
    C: CartStore,
{
    pub users: U,
    pub carts: C,
}

impl<U, C> RegisterUseCase<U, C>
where
    U: UserRepository,
    C: CartStore,
{
    pub async fn execute(
        &self,
        input: RegisterInput,
        cart_id: Option<&str>,
    ) -> Result<Registered, StoreError> {
        let email = normalize_email(&input.email)?;
        if input.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(StoreError::Validation(format!(
                "password must have at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if input.password != input.password_confirmation {
            return Err(StoreError::Validation("password confirmation does not match".into()));
        }
        let name = input
            .name
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_CUSTOMER_NAME.to_owned());
        if name.chars().count() > 255 {
            return Err(StoreError::Validation("name must be at most 255 characters".into()));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(StoreError::EmailTaken);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            name,
            email,
            password_hash: hash(&input.password)?,
            role: UserRole::Customer,
            profile: CustomerProfile::default(),
            mfa_enabled: false,
            mfa_secret: None,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;
        tracing::info!(user_id = %user.id, "customer registered");

        let has_cart_items = match cart_id {
            Some(cart_id) => self
                .carts
                .load(cart_id)
                .await?
                .iter()
                .any(|l| l.quantity > 0),
            None => false,
        };
        Ok(Registered {
            user,
            has_cart_items,
        })
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginUseCase<U, F>
where
    U: UserRepository,
    F: MfaChallengeStore,
{
    pub users: U,
    pub challenges: F,
}

impl<U, F> LoginUseCase<U, F>
where
    U: UserRepository,
    F: MfaChallengeStore,
{
    pub async fn execute(&self, email: &str, password: &str) -> Result<LoginOutcome, StoreError> {
        let email = normalize_email(email)?;
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .filter(|u| verify_password(password, &u.password_hash))
            .ok_or(StoreError::InvalidCredentials)?;
        complete_login(&self.challenges, &user).await
    }
}

// ── Profile ──────────────────────────────────────────────────────────────────

pub struct GetCustomerUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetCustomerUseCase<U> {
    /// The session user. A session whose user is gone is unauthenticated.
    pub async fn execute(&self, user_id: Uuid) -> Result<User, StoreError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(StoreError::Unauthorized)
    }
}

/// Profile changes. `None` keeps a field, an empty string clears it.
#[derive(Debug, Clone, Default)]
pub struct ProfileInput {
    pub full_name: Option<String>,
    pub cpf: Option<String>,
    pub birth_date: Option<String>,
    pub phone: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

fn apply_text(
    field: &str,
    max_len: usize,
    change: Option<String>,
    current: &mut Option<String>,
) -> Result<(), StoreError> {
    let Some(value) = change else {
        return Ok(());
    };
    let value = value.trim();
    if value.chars().count() > max_len {
        return Err(StoreError::Validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    *current = (!value.is_empty()).then(|| value.to_owned());
    Ok(())
}

/// Merge `input` into `profile`.
pub fn apply_profile(profile: &mut CustomerProfile, input: ProfileInput) -> Result<(), StoreError> {
    apply_text("full_name", 255, input.full_name, &mut profile.full_name)?;
    apply_text("cpf", 32, input.cpf, &mut profile.cpf)?;
    apply_text("phone", 32, input.phone, &mut profile.phone)?;
    apply_text("address_line1", 255, input.address_line1, &mut profile.address_line1)?;
    apply_text("address_line2", 255, input.address_line2, &mut profile.address_line2)?;
    apply_text("city", 80, input.city, &mut profile.city)?;
    apply_text("state", 16, input.state, &mut profile.state)?;
    apply_text("zip", 20, input.zip, &mut profile.zip)?;
    if let Some(birth_date) = input.birth_date {
        let birth_date = birth_date.trim();
        profile.birth_date = if birth_date.is_empty() {
            None
        } else {
            Some(
                NaiveDate::parse_from_str(birth_date, "%Y-%m-%d")
                    .map_err(|_| StoreError::Validation("birth_date must be YYYY-MM-DD".into()))?,
            )
        };
    }
    Ok(())
}

pub struct UpdateProfileUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdateProfileUseCase<U> {
    pub async fn execute(&self, user_id: Uuid, input: ProfileInput) -> Result<User, StoreError> {
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(StoreError::Unauthorized)?;
        apply_profile(&mut user.profile, input)?;
        self.users.update_profile(user.id, &user.profile).await?;
        Ok(user)
    }
}

// ── Orders ───────────────────────────────────────────────────────────────────

pub struct CustomerOrdersUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> CustomerOrdersUseCase<O> {
    pub async fn list(
        &self,
        customer_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<OrderWithItems>, StoreError> {
        self.orders.list_by_customer(customer_id, limit).await
    }

    /// One of the customer's orders. Other customers' orders are not found.
    pub async fn get(&self, customer_id: Uuid, order_id: Uuid) -> Result<OrderWithItems, StoreError> {
        self.orders
            .find_for_customer(order_id, customer_id)
            .await?
            .ok_or(StoreError::NotFound)
    }
}
