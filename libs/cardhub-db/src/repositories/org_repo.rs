use sqlx::PgPool;
use uuid::Uuid;

use crate::error::PromoError;
use crate::models::orgs::Organisation;

/// Existence lookups for the collaborator records the engine references.
/// Organisation and category CRUD itself lives elsewhere.
#[derive(Debug, Clone)]
pub struct OrganisationRepository {
    pool: PgPool,
}

impl OrganisationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, PromoError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM organisations WHERE id = $1 AND is_active = TRUE)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn category_exists(&self, id: Uuid) -> Result<bool, PromoError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Organisation>, PromoError> {
        let org = sqlx::query_as::<_, Organisation>(
            "SELECT id, organisation_name, is_active, created_at
             FROM organisations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(org)
    }
}
