//! API key domain model.

use chrono::{DateTime, Utc};

use super::tenant::AccountId;

/// A stored API key, identified by the hash of its secret.
#[derive(Debug, Clone)]
pub struct ApiKey {
    pub id: i64,
    pub account_id: AccountId,
    pub key_prefix: String,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ApiKey {
    /// Returns `true` if the key is active and not expired at `at`.
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        if !self.is_active {
            return false;
        }

        match self.expires_at {
            Some(expires_at) => expires_at >= at,
            None => true,
        }
    }

    /// Returns `true` if the key is expired at `at`, regardless of activity.
    pub fn is_expired_at(&self, at: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if expires_at < at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_key(is_active: bool, expires_at: Option<DateTime<Utc>>) -> ApiKey {
        ApiKey {
            id: 1,
            account_id: "acct_1".into(),
            key_prefix: "abcdefgh".to_string(),
            is_active,
            expires_at,
        }
    }

    #[test]
    fn test_active_no_expiry() {
        assert!(make_key(true, None).is_valid_at(Utc::now()));
    }

    #[test]
    fn test_active_future_expiry() {
        let key = make_key(true, Some(Utc::now() + Duration::days(30)));
        assert!(key.is_valid_at(Utc::now()));
        assert!(!key.is_expired_at(Utc::now()));
    }

    #[test]
    fn test_active_past_expiry() {
        let key = make_key(true, Some(Utc::now() - Duration::days(1)));
        assert!(!key.is_valid_at(Utc::now()));
        assert!(key.is_expired_at(Utc::now()));
    }

    #[test]
    fn test_inactive() {
        assert!(!make_key(false, None).is_valid_at(Utc::now()));
    }
}
