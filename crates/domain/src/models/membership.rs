//! Account membership models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::tenant::AccountId;

/// Acceptance status of a user's membership in an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Pending,
    Accepted,
    Revoked,
}

impl FromStr for MembershipStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(MembershipStatus::Pending),
            "accepted" => Ok(MembershipStatus::Accepted),
            "revoked" => Ok(MembershipStatus::Revoked),
            _ => Err(format!("Unknown membership status: {}", s)),
        }
    }
}

impl std::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MembershipStatus::Pending => write!(f, "pending"),
            MembershipStatus::Accepted => write!(f, "accepted"),
            MembershipStatus::Revoked => write!(f, "revoked"),
        }
    }
}

/// Relation between a user and an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub account_id: AccountId,
    pub user_id: Uuid,
    pub role: String,
    pub status: MembershipStatus,
    pub created_at: DateTime<Utc>,
}
