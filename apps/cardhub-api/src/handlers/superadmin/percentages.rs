use axum::extract::{Json, Path, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::handlers::required;
use crate::response::ok;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PercentagePair {
    pub category_id: String,
    pub percentage: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpsertPercentagesRequest {
    pub organisation_id: Option<String>,
    #[serde(default)]
    pub percentages: Vec<PercentagePair>,
}

/// POST /api/superadmin/percentages — merge discount percentages into an
/// organisation's directory; existing categories update in place, new ones
/// are appended.
pub async fn upsert_percentages(
    State(state): State<AppState>,
    Json(req): Json<UpsertPercentagesRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let organisation_id = required(&req.organisation_id, "organisation_id")?;
    let pairs: Vec<(String, f64)> = req
        .percentages
        .into_iter()
        .map(|p| (p.category_id, p.percentage))
        .collect();

    state.percentages.upsert(organisation_id, &pairs).await?;
    Ok(ok(json!({}), "Percentages saved successfully"))
}

/// GET /api/superadmin/organisations/{org_id}/percentages — the full
/// directory for one organisation; empty when none is configured.
pub async fn list_percentages(
    State(state): State<AppState>,
    Path(org_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.percentages.list_for_organisation(&org_id).await?;
    Ok(ok(rows, "Data found"))
}
