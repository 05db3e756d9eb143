use sqlx::PgPool;

use crate::services::assignment_service::AssignmentService;
use crate::services::percentage_service::PercentageService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub assignments: AssignmentService,
    pub percentages: PercentageService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            assignments: AssignmentService::new(pool.clone()),
            percentages: PercentageService::new(pool.clone()),
            pool,
        }
    }
}
