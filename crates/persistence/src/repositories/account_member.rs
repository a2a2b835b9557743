//! Repository for account membership lookups.

use async_trait::async_trait;
use domain::models::Membership;
use domain::services::MembershipStore;
use domain::StoreError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::AccountMemberEntity;
use crate::metrics::QueryTimer;

/// Repository for account membership operations.
#[derive(Clone)]
pub struct AccountMemberRepository {
    pool: PgPool,
}

impl AccountMemberRepository {
    /// Creates a new account membership repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipStore for AccountMemberRepository {
    /// Accepted memberships of `user_id`, oldest first.
    async fn accepted_memberships(&self, user_id: Uuid) -> Result<Vec<Membership>, StoreError> {
        let timer = QueryTimer::new("accepted_memberships");
        let result = sqlx::query_as::<_, AccountMemberEntity>(
            r#"
            SELECT account_id::text AS account_id, user_id, role, status, created_at
            FROM account_members
            WHERE user_id = $1 AND status = 'accepted'
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);

        Ok(result?.into_iter().map(Into::into).collect())
    }
}
