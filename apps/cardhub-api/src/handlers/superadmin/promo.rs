use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use cardhub_db::error::PromoError;

use crate::error::ApiError;
use crate::handlers::required;
use crate::response::ok;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SavePromoCodesRequest {
    pub organisation_id: Option<String>,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
    pub codes: Option<Vec<String>>,
}

/// POST /api/superadmin/promo-codes — bulk load a pool of unused codes for
/// one organisation and validity window.
pub async fn save_promo_codes(
    State(state): State<AppState>,
    Json(req): Json<SavePromoCodesRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let organisation_id = required(&req.organisation_id, "organisation_id")?;
    let from_date = req
        .from_date
        .ok_or_else(|| PromoError::invalid_input("from_date is required"))?;
    let to_date = req
        .to_date
        .ok_or_else(|| PromoError::invalid_input("to_date is required"))?;
    let codes = req.codes.unwrap_or_default();
    if codes.is_empty() {
        return Err(PromoError::invalid_input("At least one code is required").into());
    }

    let created = state
        .assignments
        .bulk_create_codes(organisation_id, from_date, to_date, &codes)
        .await?;

    Ok((
        StatusCode::CREATED,
        ok(json!({ "created": created }), "Promo codes saved successfully"),
    ))
}

/// GET /api/superadmin/organisations/{org_id}/promo-codes — the whole pool,
/// used and unused, oldest first.
pub async fn list_pool(
    State(state): State<AppState>,
    Path(org_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let codes = state.assignments.list_pool(&org_id).await?;
    Ok(ok(codes, "Data found"))
}
