use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One code in an organisation's pool. Created in bulk, flipped to `used`
/// exactly once by the assignment engine, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PromoCode {
    pub id: Uuid,
    pub organisation_id: Uuid,
    pub code: String,
    pub from_date: DateTime<Utc>,
    pub to_date: DateTime<Utc>,
    pub assigned_to_user: Option<Uuid>,
    pub assigned_on: Option<DateTime<Utc>>,
    pub status: String, // 'unused' | 'used'
    pub created_at: DateTime<Utc>,
}

impl PromoCode {
    pub fn is_used(&self) -> bool {
        self.status == CodeStatus::Used.to_string()
    }

    pub fn in_window(&self, at: DateTime<Utc>) -> bool {
        self.from_date <= at && at <= self.to_date
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CodeStatus {
    Unused,
    Used,
}

impl From<String> for CodeStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "used" => CodeStatus::Used,
            _ => CodeStatus::Unused,
        }
    }
}

impl std::fmt::Display for CodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodeStatus::Unused => write!(f, "unused"),
            CodeStatus::Used => write!(f, "used"),
        }
    }
}

/// Redemption ledger row. Immutable once written; the store enforces at most
/// one row per code string.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserPromoCode {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub organisation_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub promo_code: String,
    pub bill_amount: f64,
    pub discounted_amount: f64,
    pub percentage: f64,
    pub assigned_at: DateTime<Utc>,
}

/// Fields for a new ledger row. `assigned_at` is stamped by the store.
#[derive(Debug, Clone)]
pub struct NewLedgerEntry {
    pub user_id: Option<Uuid>,
    pub organisation_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub promo_code: String,
    pub bill_amount: f64,
    pub discounted_amount: f64,
    pub percentage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(status: &str) -> PromoCode {
        let now = Utc::now();
        PromoCode {
            id: Uuid::new_v4(),
            organisation_id: Uuid::new_v4(),
            code: "SAMPLE-1".to_string(),
            from_date: now - Duration::days(1),
            to_date: now + Duration::days(1),
            assigned_to_user: None,
            assigned_on: None,
            status: status.to_string(),
            created_at: now,
        }
    }

    #[test]
    fn status_string_round_trips() {
        assert_eq!(CodeStatus::from("used".to_string()), CodeStatus::Used);
        assert_eq!(CodeStatus::from("unused".to_string()), CodeStatus::Unused);
        assert_eq!(CodeStatus::Used.to_string(), "used");
        assert!(sample("used").is_used());
        assert!(!sample("unused").is_used());
    }

    #[test]
    fn window_membership_is_inclusive() {
        let code = sample("unused");
        assert!(code.in_window(Utc::now()));
        assert!(code.in_window(code.from_date));
        assert!(code.in_window(code.to_date));
        assert!(!code.in_window(code.to_date + Duration::seconds(1)));
    }
}
