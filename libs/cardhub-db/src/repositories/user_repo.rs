use sqlx::PgPool;
use uuid::Uuid;

use crate::error::PromoError;
use crate::models::user::User;

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, PromoError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND is_active = TRUE)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, PromoError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, first_name, last_name, email, is_active, created_at
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}
