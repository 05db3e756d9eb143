use sqlx::PgPool;
use uuid::Uuid;

use cardhub_db::error::PromoError;
use cardhub_db::models::percentage::CategoryPercentage;
use cardhub_db::repositories::org_repo::OrganisationRepository;
use cardhub_db::repositories::percentage_repo::PercentageRepository;

use super::parse_id;

/// Thin front over the percentage directory: id parsing, range checks and
/// reference checks, then straight through to the repository upsert.
#[derive(Debug, Clone)]
pub struct PercentageService {
    percentages: PercentageRepository,
    orgs: OrganisationRepository,
}

impl PercentageService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            percentages: PercentageRepository::new(pool.clone()),
            orgs: OrganisationRepository::new(pool),
        }
    }

    /// Merges (category, percentage) pairs into an organisation's directory.
    /// Creating the directory on first write is not an error, but every
    /// referenced organisation and category must exist; unknown references
    /// come back as their NotFound variant, never as a store failure.
    pub async fn upsert(
        &self,
        organisation_id: &str,
        pairs: &[(String, f64)],
    ) -> Result<(), PromoError> {
        let organisation_id = parse_id(organisation_id)?;
        let parsed = validate_pairs(pairs)?;

        if !self.orgs.exists(organisation_id).await? {
            return Err(PromoError::OrganisationNotFound);
        }
        for (category_id, _) in &parsed {
            if !self.orgs.category_exists(*category_id).await? {
                return Err(PromoError::CategoryNotFound);
            }
        }

        self.percentages.upsert(organisation_id, &parsed).await
    }

    pub async fn get(&self, organisation_id: &str, category_id: &str) -> Result<f64, PromoError> {
        let organisation_id = parse_id(organisation_id)?;
        let category_id = parse_id(category_id)?;
        self.percentages.get(organisation_id, category_id).await
    }

    pub async fn list_for_organisation(
        &self,
        organisation_id: &str,
    ) -> Result<Vec<CategoryPercentage>, PromoError> {
        let organisation_id = parse_id(organisation_id)?;
        self.percentages.list_for_organisation(organisation_id).await
    }
}

fn validate_pairs(pairs: &[(String, f64)]) -> Result<Vec<(Uuid, f64)>, PromoError> {
    if pairs.is_empty() {
        return Err(PromoError::invalid_input(
            "At least one category percentage is required",
        ));
    }
    pairs
        .iter()
        .map(|(category_id, percentage)| {
            if !percentage.is_finite() || !(0.0..=100.0).contains(percentage) {
                return Err(PromoError::invalid_input(
                    "Percentage must be between 0 and 100",
                ));
            }
            Ok((parse_id(category_id)?, *percentage))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAT: &str = "6f9619ff-8b86-4d01-b42d-00cf4fc964ff";

    #[test]
    fn rejects_out_of_range_percentage() {
        for pct in [-0.1, 100.5, f64::NAN, f64::INFINITY] {
            let pairs = vec![(CAT.to_string(), pct)];
            assert!(matches!(
                validate_pairs(&pairs),
                Err(PromoError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn rejects_empty_batch() {
        assert!(matches!(
            validate_pairs(&[]),
            Err(PromoError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_malformed_category_id() {
        let pairs = vec![("not-an-id".to_string(), 50.0)];
        assert!(matches!(
            validate_pairs(&pairs),
            Err(PromoError::InvalidIdFormat)
        ));
    }

    #[test]
    fn accepts_boundary_percentages() {
        let pairs = vec![(CAT.to_string(), 0.0), (CAT.to_string(), 100.0)];
        assert_eq!(validate_pairs(&pairs).unwrap().len(), 2);
    }
}
