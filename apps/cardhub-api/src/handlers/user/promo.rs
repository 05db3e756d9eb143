use axum::extract::{Json, Path, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::json;

use cardhub_db::error::PromoError;

use crate::error::ApiError;
use crate::handlers::required;
use crate::response::ok;
use crate::state::AppState;

/// GET /api/organisations/{org_id}/categories/{cat_id}/percentage
pub async fn get_percentage(
    State(state): State<AppState>,
    Path((org_id, cat_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let percentage = state.percentages.get(&org_id, &cat_id).await?;
    Ok(ok(
        json!({ "percentage": percentage }),
        "Percentage fetched successfully",
    ))
}

/// GET /api/organisations/{org_id}/promo-codes/unused — peek at the next
/// claimable code without consuming it.
pub async fn get_unused_code(
    State(state): State<AppState>,
    Path(org_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let code = state.assignments.peek_unused(&org_id).await?;
    Ok(ok(json!({ "promo_code": code.code }), "Data found"))
}

#[derive(Debug, Deserialize)]
pub struct AssignCodeRequest {
    pub user_id: Option<String>,
    pub organisation_id: Option<String>,
    pub category_id: Option<String>,
    pub bill_amount: Option<f64>,
}

/// POST /api/promo-codes/assign — the assignment engine: claim one unused
/// code for the user and record the redemption, returning the code and the
/// server-computed discount.
pub async fn assign_code(
    State(state): State<AppState>,
    Json(req): Json<AssignCodeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = required(&req.user_id, "user_id")?;
    let organisation_id = required(&req.organisation_id, "organisation_id")?;
    let category_id = required(&req.category_id, "category_id")?;
    let bill_amount = req
        .bill_amount
        .ok_or_else(|| PromoError::invalid_input("bill_amount is required"))?;

    let outcome = state
        .assignments
        .assign_code(user_id, organisation_id, category_id, bill_amount)
        .await?;

    Ok(ok(outcome, "Promo code assigned and saved successfully"))
}

#[derive(Debug, Deserialize)]
pub struct MarkCodeUsedRequest {
    pub code: Option<String>,
    pub bill_amount: Option<f64>,
}

/// POST /api/promo-codes/mark-used — redeem a code the caller already holds.
pub async fn mark_code_used(
    State(state): State<AppState>,
    Json(req): Json<MarkCodeUsedRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let code = required(&req.code, "code")?;
    let bill_amount = req
        .bill_amount
        .ok_or_else(|| PromoError::invalid_input("bill_amount is required"))?;

    state.assignments.mark_code_used(code, bill_amount).await?;
    Ok(ok(
        json!({}),
        "Promo code marked as used and recorded successfully",
    ))
}

/// GET /api/promo-codes/{code}/redemption — the ledger entry for a redeemed
/// code, for audit and idempotent re-query.
pub async fn get_redemption(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state.assignments.ledger_entry_for_code(&code).await?;
    Ok(ok(entry, "Data found"))
}

/// GET /api/users/{user_id}/promo-codes — redemption history, newest first.
pub async fn redemption_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = state.assignments.redemption_history(&user_id).await?;
    Ok(ok(entries, "Data found"))
}
