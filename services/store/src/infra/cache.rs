use deadpool_redis::Pool;
use deadpool_redis::redis::{AsyncCommands, RedisError};
use uuid::Uuid;

use crate::domain::repository::{CartStore, MfaChallengeStore};
use crate::domain::types::{CART_TTL_SECS, CartLine, MFA_CHALLENGE_TTL_SECS};
use crate::error::StoreError;

fn cart_key(cart_id: &str) -> String {
    format!("cart:{cart_id}")
}

fn mfa_challenge_key(token: &str) -> String {
    format!("mfa_challenge:{token}")
}

#[derive(Clone)]
pub struct RedisCartStore {
    pub pool: Pool,
}

impl CartStore for RedisCartStore {
    async fn load(&self, cart_id: &str) -> Result<Vec<CartLine>, StoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| StoreError::Internal(e.into()))?;
        let raw: Option<String> = conn
            .get(cart_key(cart_id))
            .await
            .map_err(|e: RedisError| StoreError::Internal(e.into()))?;
        let Some(raw) = raw else {
            return Ok(vec![]);
        };
        // A cart that no longer parses is treated as empty.
        match serde_json::from_str(&raw) {
            Ok(lines) => Ok(lines),
            Err(e) => {
                tracing::warn!(cart_id, error = %e, "discarding unreadable cart");
                Ok(vec![])
            }
        }
    }

    async fn save(&self, cart_id: &str, lines: &[CartLine]) -> Result<(), StoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| StoreError::Internal(e.into()))?;
        let raw = serde_json::to_string(lines).map_err(|e| StoreError::Internal(e.into()))?;
        let (): () = conn
            .set_ex(cart_key(cart_id), raw, CART_TTL_SECS)
            .await
            .map_err(|e: RedisError| StoreError::Internal(e.into()))?;
        Ok(())
    }

    async fn clear(&self, cart_id: &str) -> Result<(), StoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| StoreError::Internal(e.into()))?;
        let (): () = conn
            .del(cart_key(cart_id))
            .await
            .map_err(|e: RedisError| StoreError::Internal(e.into()))?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct RedisMfaChallengeStore {
    pub pool: Pool,
}

impl MfaChallengeStore for RedisMfaChallengeStore {
    async fn create(&self, token: &str, user_id: Uuid) -> Result<(), StoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| StoreError::Internal(e.into()))?;
        let (): () = conn
            .set_ex(
                mfa_challenge_key(token),
                user_id.to_string(),
                MFA_CHALLENGE_TTL_SECS,
            )
            .await
            .map_err(|e: RedisError| StoreError::Internal(e.into()))?;
        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<Uuid>, StoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| StoreError::Internal(e.into()))?;
        let value: Option<String> = conn
            .get(mfa_challenge_key(token))
            .await
            .map_err(|e: RedisError| StoreError::Internal(e.into()))?;
        Ok(value.and_then(|v| Uuid::parse_str(&v).ok()))
    }

    async fn delete(&self, token: &str) -> Result<(), StoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| StoreError::Internal(e.into()))?;
        let (): () = conn
            .del(mfa_challenge_key(token))
            .await
            .map_err(|e: RedisError| StoreError::Internal(e.into()))?;
        Ok(())
    }
}
