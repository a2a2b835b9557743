//! Repository for API key database operations.

use async_trait::async_trait;
use domain::models::ApiKey;
use domain::services::ApiKeyStore;
use domain::StoreError;
use sqlx::PgPool;

use crate::entities::ApiKeyEntity;
use crate::metrics::QueryTimer;

/// Repository for API key operations.
#[derive(Clone)]
pub struct ApiKeyRepository {
    pool: PgPool,
}

impl ApiKeyRepository {
    /// Creates a new API key repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApiKeyStore for ApiKeyRepository {
    /// Finds an API key by its hash.
    ///
    /// Returns `None` if no key with the given hash exists.
    async fn find_by_key_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, StoreError> {
        let timer = QueryTimer::new("find_api_key_by_hash");
        let result = sqlx::query_as::<_, ApiKeyEntity>(
            r#"
            SELECT id, account_id::text AS account_id, key_hash, key_prefix, name,
                   is_active, last_used_at, created_at, expires_at
            FROM api_keys
            WHERE key_hash = $1
            "#,
        )
        .bind(key_hash)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);

        Ok(result?.map(Into::into))
    }

    /// Updates the last_used_at timestamp for an API key.
    async fn touch_last_used(&self, key_id: i64) -> Result<(), StoreError> {
        let timer = QueryTimer::new("touch_api_key");
        let result = sqlx::query(
            r#"
            UPDATE api_keys
            SET last_used_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(key_id)
        .execute(&self.pool)
        .await;
        timer.finish(&result);

        result?;
        Ok(())
    }
}
