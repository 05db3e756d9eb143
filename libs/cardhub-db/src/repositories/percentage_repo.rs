use sqlx::PgPool;
use uuid::Uuid;

use crate::error::PromoError;
use crate::models::percentage::CategoryPercentage;

/// Per-organisation discount directory. Upserts keep exactly one row per
/// (organisation, category) pair; the primary key enforces it.
#[derive(Debug, Clone)]
pub struct PercentageRepository {
    pool: PgPool,
}

impl PercentageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Merges the given pairs into the organisation's directory: existing
    /// entries update in place, new ones are inserted. No error when the
    /// organisation had no directory before.
    pub async fn upsert(
        &self,
        organisation_id: Uuid,
        pairs: &[(Uuid, f64)],
    ) -> Result<(), PromoError> {
        let mut tx = self.pool.begin().await?;

        for (category_id, percentage) in pairs {
            sqlx::query(
                "INSERT INTO org_category_percentages (organisation_id, category_id, percentage)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (organisation_id, category_id)
                 DO UPDATE SET percentage = EXCLUDED.percentage, updated_at = CURRENT_TIMESTAMP",
            )
            .bind(organisation_id)
            .bind(category_id)
            .bind(percentage)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// The configured percentage for the pair, or `PercentageNotConfigured`
    /// when the organisation has no directory or the category is absent.
    pub async fn get(&self, organisation_id: Uuid, category_id: Uuid) -> Result<f64, PromoError> {
        sqlx::query_scalar::<_, f64>(
            "SELECT percentage FROM org_category_percentages
             WHERE organisation_id = $1 AND category_id = $2",
        )
        .bind(organisation_id)
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(PromoError::PercentageNotConfigured)
    }

    pub async fn list_for_organisation(
        &self,
        organisation_id: Uuid,
    ) -> Result<Vec<CategoryPercentage>, PromoError> {
        let rows = sqlx::query_as::<_, CategoryPercentage>(
            "SELECT organisation_id, category_id, percentage, updated_at
             FROM org_category_percentages
             WHERE organisation_id = $1
             ORDER BY updated_at DESC",
        )
        .bind(organisation_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
