use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::JournalId;

/// Requesting user as supplied by the session provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    /// `None` for anonymous visitors
    pub id: Option<String>,
    pub is_admin: bool,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            is_admin: false,
        }
    }

    pub fn admin(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            is_admin: true,
        }
    }
}

/// A purchased or granted access to one journal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessGrant {
    pub identity: String,
    pub journal_id: JournalId,
    /// Last day (inclusive) the grant is valid
    pub expiration: NaiveDate,
    #[serde(default)]
    pub revoked: bool,
}

impl AccessGrant {
    pub fn is_valid_on(&self, today: NaiveDate) -> bool {
        !self.revoked && self.expiration >= today
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(expiration: NaiveDate, revoked: bool) -> AccessGrant {
        AccessGrant {
            identity: "reader".to_string(),
            journal_id: 1,
            expiration,
            revoked,
        }
    }

    #[test]
    fn test_grant_validity() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let yesterday = today.pred_opt().unwrap();

        assert!(grant(today, false).is_valid_on(today));
        assert!(!grant(yesterday, false).is_valid_on(today));
        assert!(!grant(today, true).is_valid_on(today));
    }

    #[test]
    fn test_identity_constructors() {
        assert_eq!(Identity::anonymous().id, None);
        assert!(!Identity::user("a").is_admin);
        assert!(Identity::admin("a").is_admin);
    }
}
