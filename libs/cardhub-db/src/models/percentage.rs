use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One entry of an organisation's percentage directory: the discount applied
/// to bills in one category.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CategoryPercentage {
    pub organisation_id: Uuid,
    pub category_id: Uuid,
    pub percentage: f64,
    pub updated_at: DateTime<Utc>,
}
