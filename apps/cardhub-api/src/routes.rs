use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{superadmin, user};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/superadmin/promo-codes", post(superadmin::save_promo_codes))
        .route(
            "/api/superadmin/organisations/{org_id}/promo-codes",
            get(superadmin::list_pool),
        )
        .route(
            "/api/superadmin/percentages",
            post(superadmin::upsert_percentages),
        )
        .route(
            "/api/superadmin/organisations/{org_id}/percentages",
            get(superadmin::list_percentages),
        )
        .route(
            "/api/organisations/{org_id}/categories/{cat_id}/percentage",
            get(user::get_percentage),
        )
        .route(
            "/api/organisations/{org_id}/promo-codes/unused",
            get(user::get_unused_code),
        )
        .route("/api/promo-codes/assign", post(user::assign_code))
        .route("/api/promo-codes/mark-used", post(user::mark_code_used))
        .route(
            "/api/promo-codes/{code}/redemption",
            get(user::get_redemption),
        )
        .route("/api/users/{user_id}/promo-codes", get(user::redemption_history))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
