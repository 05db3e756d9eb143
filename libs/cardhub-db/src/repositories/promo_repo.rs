use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{PromoError, is_unique_violation};
use crate::models::promo::PromoCode;

const PROMO_COLUMNS: &str =
    "id, organisation_id, code, from_date, to_date, assigned_to_user, assigned_on, status, created_at";

/// Code pool store. The claim and mark-used transitions take a transaction
/// handle so callers can commit them together with the ledger write.
#[derive(Debug, Clone)]
pub struct PromoCodeRepository {
    pool: PgPool,
}

impl PromoCodeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a batch of unused codes for one organisation and validity
    /// window. All-or-nothing: a single colliding code string aborts the
    /// whole batch with `DuplicateCode`.
    pub async fn bulk_create(
        &self,
        organisation_id: Uuid,
        from_date: DateTime<Utc>,
        to_date: DateTime<Utc>,
        codes: &[String],
    ) -> Result<u64, PromoError> {
        let mut tx = self.pool.begin().await?;

        for code in codes {
            let result = sqlx::query(
                "INSERT INTO promo_codes (organisation_id, code, from_date, to_date, status)
                 VALUES ($1, $2, $3, $4, 'unused')",
            )
            .bind(organisation_id)
            .bind(code)
            .bind(from_date)
            .bind(to_date)
            .execute(&mut *tx)
            .await;

            if let Err(e) = result {
                if is_unique_violation(&e) {
                    return Err(PromoError::DuplicateCode);
                }
                return Err(e.into());
            }
        }

        tx.commit().await?;
        Ok(codes.len() as u64)
    }

    /// Peeks at the oldest unused, in-window code without claiming it.
    pub async fn find_unused_for_organisation(
        &self,
        organisation_id: Uuid,
    ) -> Result<Option<PromoCode>, PromoError> {
        let code = sqlx::query_as::<_, PromoCode>(&format!(
            "SELECT {PROMO_COLUMNS} FROM promo_codes
             WHERE organisation_id = $1 AND status = 'unused'
               AND from_date <= CURRENT_TIMESTAMP AND to_date >= CURRENT_TIMESTAMP
             ORDER BY created_at
             LIMIT 1"
        ))
        .bind(organisation_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(code)
    }

    pub async fn list_for_organisation(
        &self,
        organisation_id: Uuid,
    ) -> Result<Vec<PromoCode>, PromoError> {
        let codes = sqlx::query_as::<_, PromoCode>(&format!(
            "SELECT {PROMO_COLUMNS} FROM promo_codes
             WHERE organisation_id = $1
             ORDER BY created_at"
        ))
        .bind(organisation_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(codes)
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<PromoCode>, PromoError> {
        let found = sqlx::query_as::<_, PromoCode>(&format!(
            "SELECT {PROMO_COLUMNS} FROM promo_codes WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(found)
    }

    /// Claims the oldest unused, in-window code for the organisation and
    /// binds it to the user, in one conditional UPDATE. `FOR UPDATE SKIP
    /// LOCKED` keeps concurrent claimants off the same row, so two requests
    /// can never walk away with the same code. Returns `None` when the pool
    /// has nothing eligible.
    pub async fn claim_one_in(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        organisation_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<PromoCode>, PromoError> {
        let claimed = sqlx::query_as::<_, PromoCode>(&format!(
            "UPDATE promo_codes
             SET status = 'used', assigned_to_user = $2, assigned_on = CURRENT_TIMESTAMP
             WHERE id = (
                 SELECT id FROM promo_codes
                 WHERE organisation_id = $1 AND status = 'unused'
                   AND from_date <= CURRENT_TIMESTAMP AND to_date >= CURRENT_TIMESTAMP
                 ORDER BY created_at
                 LIMIT 1
                 FOR UPDATE SKIP LOCKED
             )
             RETURNING {PROMO_COLUMNS}"
        ))
        .bind(organisation_id)
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(claimed)
    }

    /// Flips a known code to `used` iff it is still unused. Returns `None`
    /// when no row matched (code missing or already consumed); the caller
    /// distinguishes the two with `find_by_code`.
    pub async fn mark_used_in(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<PromoCode>, PromoError> {
        let updated = sqlx::query_as::<_, PromoCode>(&format!(
            "UPDATE promo_codes
             SET status = 'used', assigned_on = CURRENT_TIMESTAMP
             WHERE code = $1 AND status = 'unused'
             RETURNING {PROMO_COLUMNS}"
        ))
        .bind(code)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(updated)
    }
}
