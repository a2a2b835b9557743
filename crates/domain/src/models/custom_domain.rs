//! Custom domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::tenant::AccountId;

/// Verification status of a tenant's custom domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomDomainStatus {
    Active,
    Pending,
    Disabled,
    Error,
}

impl CustomDomainStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomDomainStatus::Active => "active",
            CustomDomainStatus::Pending => "pending",
            CustomDomainStatus::Disabled => "disabled",
            CustomDomainStatus::Error => "error",
        }
    }
}

impl FromStr for CustomDomainStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(CustomDomainStatus::Active),
            "pending" => Ok(CustomDomainStatus::Pending),
            "disabled" => Ok(CustomDomainStatus::Disabled),
            "error" => Ok(CustomDomainStatus::Error),
            _ => Err(format!("Unknown custom domain status: {}", s)),
        }
    }
}

impl std::fmt::Display for CustomDomainStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A hostname a tenant registered to serve its branded portal.
///
/// Rows are owned by the domain-management surface; the gate only reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomDomain {
    pub id: Uuid,
    pub account_id: AccountId,
    pub domain: String,
    pub status: CustomDomainStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomDomain {
    pub fn is_active(&self) -> bool {
        self.status == CustomDomainStatus::Active
    }
}
