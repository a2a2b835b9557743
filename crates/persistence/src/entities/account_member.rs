//! Account membership entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Membership, MembershipStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for membership status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "membership_status", rename_all = "lowercase")]
pub enum MembershipStatusDb {
    Pending,
    Accepted,
    Revoked,
}

impl From<MembershipStatusDb> for MembershipStatus {
    fn from(status: MembershipStatusDb) -> Self {
        match status {
            MembershipStatusDb::Pending => MembershipStatus::Pending,
            MembershipStatusDb::Accepted => MembershipStatus::Accepted,
            MembershipStatusDb::Revoked => MembershipStatus::Revoked,
        }
    }
}

impl From<MembershipStatus> for MembershipStatusDb {
    fn from(status: MembershipStatus) -> Self {
        match status {
            MembershipStatus::Pending => MembershipStatusDb::Pending,
            MembershipStatus::Accepted => MembershipStatusDb::Accepted,
            MembershipStatus::Revoked => MembershipStatusDb::Revoked,
        }
    }
}

/// Database row mapping for the account_members table.
#[derive(Debug, Clone, FromRow)]
pub struct AccountMemberEntity {
    pub account_id: String,
    pub user_id: Uuid,
    pub role: String,
    pub status: MembershipStatusDb,
    pub created_at: DateTime<Utc>,
}

impl From<AccountMemberEntity> for Membership {
    fn from(entity: AccountMemberEntity) -> Self {
        Self {
            account_id: entity.account_id.into(),
            user_id: entity.user_id,
            role: entity.role,
            status: entity.status.into(),
            created_at: entity.created_at,
        }
    }
}
