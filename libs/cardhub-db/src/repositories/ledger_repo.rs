use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{PromoError, is_unique_violation};
use crate::models::promo::{NewLedgerEntry, PromoCode, UserPromoCode};

const LEDGER_COLUMNS: &str = "id, user_id, organisation_id, category_id, promo_code, bill_amount, discounted_amount, percentage, assigned_at";

/// Append-only redemption ledger. The unique index on promo_code turns a
/// double write into `AlreadyUsed` instead of a second row.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: PgPool,
}

impl LedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends a ledger row inside the caller's transaction, so the claim
    /// and its record commit or roll back together.
    pub async fn insert_in(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entry: &NewLedgerEntry,
    ) -> Result<UserPromoCode, PromoError> {
        let inserted = sqlx::query_as::<_, UserPromoCode>(&format!(
            "INSERT INTO user_promo_codes
                 (user_id, organisation_id, category_id, promo_code,
                  bill_amount, discounted_amount, percentage)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {LEDGER_COLUMNS}"
        ))
        .bind(entry.user_id)
        .bind(entry.organisation_id)
        .bind(entry.category_id)
        .bind(&entry.promo_code)
        .bind(entry.bill_amount)
        .bind(entry.discounted_amount)
        .bind(entry.percentage)
        .fetch_one(&mut **tx)
        .await;

        match inserted {
            Ok(row) => Ok(row),
            Err(e) if is_unique_violation(&e) => Err(PromoError::AlreadyUsed),
            Err(e) => Err(e.into()),
        }
    }

    /// Idempotent re-query for audit: the ledger row for a code, if any.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<UserPromoCode>, PromoError> {
        let found = sqlx::query_as::<_, UserPromoCode>(&format!(
            "SELECT {LEDGER_COLUMNS} FROM user_promo_codes WHERE promo_code = $1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(found)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<UserPromoCode>, PromoError> {
        let rows = sqlx::query_as::<_, UserPromoCode>(&format!(
            "SELECT {LEDGER_COLUMNS} FROM user_promo_codes
             WHERE user_id = $1
             ORDER BY assigned_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Used codes that never got a ledger row. This state cannot arise from
    /// the transactional assign path; it feeds the reconciliation sweep that
    /// repairs pre-existing or manually-touched data.
    pub async fn codes_missing_entries(&self) -> Result<Vec<PromoCode>, PromoError> {
        let rows = sqlx::query_as::<_, PromoCode>(
            "SELECT p.id, p.organisation_id, p.code, p.from_date, p.to_date,
                    p.assigned_to_user, p.assigned_on, p.status, p.created_at
             FROM promo_codes p
             LEFT JOIN user_promo_codes l ON l.promo_code = p.code
             WHERE p.status = 'used' AND l.id IS NULL
             ORDER BY p.assigned_on",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Reconciliation write: appends a ledger row on its own connection,
    /// tolerating a concurrent repair of the same code.
    pub async fn insert(&self, entry: &NewLedgerEntry) -> Result<(), PromoError> {
        let mut tx = self.pool.begin().await?;
        self.insert_in(&mut tx, entry).await?;
        tx.commit().await?;
        Ok(())
    }
}
