//! Repository for custom domain lookups.

use async_trait::async_trait;
use domain::models::CustomDomain;
use domain::services::CustomDomainStore;
use domain::StoreError;
use sqlx::PgPool;

use crate::entities::CustomDomainEntity;
use crate::metrics::QueryTimer;

/// Repository for custom domain operations.
#[derive(Clone)]
pub struct CustomDomainRepository {
    pool: PgPool,
}

impl CustomDomainRepository {
    /// Creates a new custom domain repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomDomainStore for CustomDomainRepository {
    async fn find_active_by_domain(
        &self,
        hostname: &str,
    ) -> Result<Option<CustomDomain>, StoreError> {
        let timer = QueryTimer::new("find_active_custom_domain");
        let result = sqlx::query_as::<_, CustomDomainEntity>(
            r#"
            SELECT id, account_id::text AS account_id, domain, status,
                   created_at, updated_at
            FROM custom_domains
            WHERE domain = $1 AND status = 'active'
            LIMIT 1
            "#,
        )
        .bind(hostname)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);

        Ok(result?.map(Into::into))
    }

    async fn find_by_domain(&self, hostname: &str) -> Result<Option<CustomDomain>, StoreError> {
        let timer = QueryTimer::new("find_custom_domain");
        let result = sqlx::query_as::<_, CustomDomainEntity>(
            r#"
            SELECT id, account_id::text AS account_id, domain, status,
                   created_at, updated_at
            FROM custom_domains
            WHERE domain = $1
            LIMIT 1
            "#,
        )
        .bind(hostname)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);

        Ok(result?.map(Into::into))
    }
}
