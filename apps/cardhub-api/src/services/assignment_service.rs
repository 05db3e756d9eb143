use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use cardhub_db::error::PromoError;
use cardhub_db::models::promo::{NewLedgerEntry, PromoCode, UserPromoCode};
use cardhub_db::repositories::ledger_repo::LedgerRepository;
use cardhub_db::repositories::org_repo::OrganisationRepository;
use cardhub_db::repositories::percentage_repo::PercentageRepository;
use cardhub_db::repositories::promo_repo::PromoCodeRepository;
use cardhub_db::repositories::user_repo::UserRepository;

use super::parse_id;

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentOutcome {
    pub code: String,
    pub bill_amount: f64,
    pub discounted_amount: f64,
    pub percentage: f64,
}

/// The assignment engine: validates a redemption request, computes the
/// discount server-side, then claims one code and writes the ledger row in a
/// single transaction.
#[derive(Debug, Clone)]
pub struct AssignmentService {
    pool: PgPool,
    users: UserRepository,
    orgs: OrganisationRepository,
    percentages: PercentageRepository,
    promo_codes: PromoCodeRepository,
    ledger: LedgerRepository,
}

impl AssignmentService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            orgs: OrganisationRepository::new(pool.clone()),
            percentages: PercentageRepository::new(pool.clone()),
            promo_codes: PromoCodeRepository::new(pool.clone()),
            ledger: LedgerRepository::new(pool.clone()),
            pool,
        }
    }

    /// Assigns one unused code from the organisation's pool to the user.
    /// The claim and the ledger write share one transaction, so a used code
    /// without a ledger row cannot be produced by this path.
    pub async fn assign_code(
        &self,
        user_id: &str,
        organisation_id: &str,
        category_id: &str,
        bill_amount: f64,
    ) -> Result<AssignmentOutcome, PromoError> {
        let user_id = parse_id(user_id)?;
        let organisation_id = parse_id(organisation_id)?;
        let category_id = parse_id(category_id)?;

        if !bill_amount.is_finite() || bill_amount < 0.0 {
            return Err(PromoError::invalid_input(
                "Bill amount must be a non-negative number",
            ));
        }

        if !self.users.exists(user_id).await? {
            return Err(PromoError::UserNotFound);
        }
        if !self.orgs.exists(organisation_id).await? {
            return Err(PromoError::OrganisationNotFound);
        }
        if !self.orgs.category_exists(category_id).await? {
            return Err(PromoError::CategoryNotFound);
        }

        let percentage = self.percentages.get(organisation_id, category_id).await?;
        let discounted_amount = apply_discount(bill_amount, percentage);

        let mut tx = self.pool.begin().await?;

        let claimed = self
            .promo_codes
            .claim_one_in(&mut tx, organisation_id, user_id)
            .await?
            .ok_or(PromoError::NoCodeAvailable)?;

        self.ledger
            .insert_in(
                &mut tx,
                &NewLedgerEntry {
                    user_id: Some(user_id),
                    organisation_id: Some(organisation_id),
                    category_id: Some(category_id),
                    promo_code: claimed.code.clone(),
                    bill_amount,
                    discounted_amount,
                    percentage,
                },
            )
            .await?;

        tx.commit().await?;

        Ok(AssignmentOutcome {
            code: claimed.code,
            bill_amount,
            discounted_amount,
            percentage,
        })
    }

    /// Redeems a code the caller already holds (entered manually rather than
    /// auto-assigned). The transition is the same conditional update as the
    /// assign path; the ledger row reuses whatever user the code was bound
    /// to, which may be nobody.
    pub async fn mark_code_used(&self, code: &str, bill_amount: f64) -> Result<(), PromoError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(PromoError::invalid_input("Code is required"));
        }
        if !bill_amount.is_finite() || bill_amount < 0.0 {
            return Err(PromoError::invalid_input(
                "Bill amount must be a non-negative number",
            ));
        }

        let mut tx = self.pool.begin().await?;

        let Some(flipped) = self.promo_codes.mark_used_in(&mut tx, code).await? else {
            // Nothing matched: the code either does not exist or was already
            // consumed. Dropping the open transaction rolls it back.
            return match self.promo_codes.find_by_code(code).await? {
                Some(_) => Err(PromoError::AlreadyUsed),
                None => Err(PromoError::CodeNotFound),
            };
        };

        // No category is known on this path, so no percentage applies.
        self.ledger
            .insert_in(
                &mut tx,
                &NewLedgerEntry {
                    user_id: flipped.assigned_to_user,
                    organisation_id: Some(flipped.organisation_id),
                    category_id: None,
                    promo_code: flipped.code,
                    bill_amount,
                    discounted_amount: bill_amount,
                    percentage: 0.0,
                },
            )
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Operator bulk load of a fresh pool, one organisation and one validity
    /// window per batch. All-or-nothing on duplicates.
    pub async fn bulk_create_codes(
        &self,
        organisation_id: &str,
        from_date: DateTime<Utc>,
        to_date: DateTime<Utc>,
        codes: &[String],
    ) -> Result<u64, PromoError> {
        let organisation_id = parse_id(organisation_id)?;
        if to_date < from_date {
            return Err(PromoError::invalid_input(
                "Validity window end precedes its start",
            ));
        }
        if codes.iter().any(|c| c.trim().is_empty()) {
            return Err(PromoError::invalid_input("Code strings must be non-empty"));
        }
        if !self.orgs.exists(organisation_id).await? {
            return Err(PromoError::OrganisationNotFound);
        }

        let codes: Vec<String> = codes.iter().map(|c| c.trim().to_string()).collect();
        self.promo_codes
            .bulk_create(organisation_id, from_date, to_date, &codes)
            .await
    }

    /// Peek at the next claimable code without consuming it.
    pub async fn peek_unused(&self, organisation_id: &str) -> Result<PromoCode, PromoError> {
        let organisation_id = parse_id(organisation_id)?;
        self.promo_codes
            .find_unused_for_organisation(organisation_id)
            .await?
            .ok_or(PromoError::NoCodeAvailable)
    }

    pub async fn list_pool(&self, organisation_id: &str) -> Result<Vec<PromoCode>, PromoError> {
        let organisation_id = parse_id(organisation_id)?;
        if !self.orgs.exists(organisation_id).await? {
            return Err(PromoError::OrganisationNotFound);
        }
        self.promo_codes.list_for_organisation(organisation_id).await
    }

    pub async fn redemption_history(
        &self,
        user_id: &str,
    ) -> Result<Vec<UserPromoCode>, PromoError> {
        let user_id = parse_id(user_id)?;
        if !self.users.exists(user_id).await? {
            return Err(PromoError::UserNotFound);
        }
        self.ledger.list_for_user(user_id).await
    }

    /// Repairs used codes that have no ledger row. The transactional paths
    /// above cannot create that state; it can still exist in data that
    /// predates them or was touched by hand. Each repair is logged.
    pub async fn reconcile_ledger(&self) -> Result<u64, PromoError> {
        let orphans = self.ledger.codes_missing_entries().await?;
        let mut repaired = 0u64;

        for code in orphans {
            let entry = NewLedgerEntry {
                user_id: code.assigned_to_user,
                organisation_id: Some(code.organisation_id),
                category_id: None,
                promo_code: code.code.clone(),
                bill_amount: 0.0,
                discounted_amount: 0.0,
                percentage: 0.0,
            };
            match self.ledger.insert(&entry).await {
                Ok(()) => {
                    warn!(code = %code.code, "repaired used code missing its ledger entry");
                    repaired += 1;
                }
                // Someone else repaired it between the scan and the write.
                Err(PromoError::AlreadyUsed) => {}
                Err(e) => return Err(e),
            }
        }

        Ok(repaired)
    }

    /// Idempotent audit lookup: the ledger entry for a redeemed code.
    pub async fn ledger_entry_for_code(&self, code: &str) -> Result<UserPromoCode, PromoError> {
        self.ledger
            .find_by_code(code.trim())
            .await?
            .ok_or(PromoError::CodeNotFound)
    }
}

/// Server-side discount math: what the user pays after the category
/// percentage comes off the bill, rounded to cents.
pub fn apply_discount(bill_amount: f64, percentage: f64) -> f64 {
    let discounted = bill_amount * (1.0 - percentage / 100.0);
    (discounted.max(0.0) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::apply_discount;

    #[test]
    fn twenty_percent_off_a_thousand_is_eight_hundred() {
        assert_eq!(apply_discount(1000.0, 20.0), 800.0);
    }

    #[test]
    fn zero_percent_leaves_the_bill_alone() {
        assert_eq!(apply_discount(249.99, 0.0), 249.99);
    }

    #[test]
    fn full_discount_bottoms_out_at_zero() {
        assert_eq!(apply_discount(1000.0, 100.0), 0.0);
    }

    #[test]
    fn discount_rounds_to_cents() {
        // 33.333% of 100 leaves 66.667, which rounds to 66.67.
        assert_eq!(apply_discount(100.0, 33.333), 66.67);
    }

    #[test]
    fn zero_bill_stays_zero() {
        assert_eq!(apply_discount(0.0, 50.0), 0.0);
    }
}
