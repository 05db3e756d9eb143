use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use cardhub_db::error::PromoError;

/// Wrapper so `PromoError` can flow out of handlers with `?` and render as
/// the structured `{success, message}` body. Status travels with the value;
/// nothing is shared across requests.
#[derive(Debug)]
pub struct ApiError(pub PromoError);

impl<E: Into<PromoError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

pub fn status_for(err: &PromoError) -> StatusCode {
    match err {
        PromoError::InvalidInput(_) | PromoError::InvalidIdFormat => StatusCode::BAD_REQUEST,
        PromoError::UserNotFound
        | PromoError::OrganisationNotFound
        | PromoError::CategoryNotFound
        | PromoError::CodeNotFound
        | PromoError::PercentageNotConfigured => StatusCode::NOT_FOUND,
        PromoError::AlreadyUsed | PromoError::NoCodeAvailable | PromoError::DuplicateCode => {
            StatusCode::CONFLICT
        }
        PromoError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let message = if let PromoError::Store(e) = &self.0 {
            error!("store error: {e}");
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };
        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_map_to_400() {
        assert_eq!(
            status_for(&PromoError::invalid_input("missing field")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&PromoError::InvalidIdFormat),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn not_found_family_maps_to_404() {
        for e in [
            PromoError::UserNotFound,
            PromoError::OrganisationNotFound,
            PromoError::CategoryNotFound,
            PromoError::CodeNotFound,
            PromoError::PercentageNotConfigured,
        ] {
            assert_eq!(status_for(&e), StatusCode::NOT_FOUND, "{e}");
        }
    }

    #[test]
    fn conflict_family_maps_to_409() {
        for e in [
            PromoError::AlreadyUsed,
            PromoError::NoCodeAvailable,
            PromoError::DuplicateCode,
        ] {
            assert_eq!(status_for(&e), StatusCode::CONFLICT, "{e}");
        }
    }

    #[test]
    fn only_store_errors_are_retryable() {
        assert!(PromoError::Store(sqlx::Error::PoolClosed).is_retryable());
        assert!(!PromoError::NoCodeAvailable.is_retryable());
        assert!(!PromoError::AlreadyUsed.is_retryable());
    }
}
