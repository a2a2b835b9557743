//! Custom domain entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{CustomDomain, CustomDomainStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for custom domain status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "custom_domain_status", rename_all = "lowercase")]
pub enum CustomDomainStatusDb {
    Active,
    Pending,
    Disabled,
    Error,
}

impl From<CustomDomainStatusDb> for CustomDomainStatus {
    fn from(status: CustomDomainStatusDb) -> Self {
        match status {
            CustomDomainStatusDb::Active => CustomDomainStatus::Active,
            CustomDomainStatusDb::Pending => CustomDomainStatus::Pending,
            CustomDomainStatusDb::Disabled => CustomDomainStatus::Disabled,
            CustomDomainStatusDb::Error => CustomDomainStatus::Error,
        }
    }
}

impl From<CustomDomainStatus> for CustomDomainStatusDb {
    fn from(status: CustomDomainStatus) -> Self {
        match status {
            CustomDomainStatus::Active => CustomDomainStatusDb::Active,
            CustomDomainStatus::Pending => CustomDomainStatusDb::Pending,
            CustomDomainStatus::Disabled => CustomDomainStatusDb::Disabled,
            CustomDomainStatus::Error => CustomDomainStatusDb::Error,
        }
    }
}

/// Database row mapping for the custom_domains table.
///
/// `account_id` is selected as text so account identifiers stay opaque
/// outside the database.
#[derive(Debug, Clone, FromRow)]
pub struct CustomDomainEntity {
    pub id: Uuid,
    pub account_id: String,
    pub domain: String,
    pub status: CustomDomainStatusDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CustomDomainEntity> for CustomDomain {
    fn from(entity: CustomDomainEntity) -> Self {
        Self {
            id: entity.id,
            account_id: entity.account_id.into(),
            domain: entity.domain,
            status: entity.status.into(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversion() {
        for status in [
            CustomDomainStatus::Active,
            CustomDomainStatus::Pending,
            CustomDomainStatus::Disabled,
            CustomDomainStatus::Error,
        ] {
            let db: CustomDomainStatusDb = status.into();
            assert_eq!(CustomDomainStatus::from(db), status);
        }
    }

    #[test]
    fn test_entity_into_domain() {
        let entity = CustomDomainEntity {
            id: Uuid::new_v4(),
            account_id: "5f0c6a1e-0000-4000-8000-000000000001".to_string(),
            domain: "book.happypaws.com".to_string(),
            status: CustomDomainStatusDb::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let domain: CustomDomain = entity.clone().into();
        assert_eq!(domain.id, entity.id);
        assert_eq!(domain.account_id.as_str(), entity.account_id);
        assert_eq!(domain.domain, "book.happypaws.com");
        assert!(domain.is_active());
    }
}
