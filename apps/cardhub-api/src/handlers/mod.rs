pub mod superadmin;
pub mod user;

use cardhub_db::error::PromoError;

use crate::error::ApiError;

/// Presence check for required request fields; missing or blank input is the
/// caller's mistake, reported before anything touches the store.
pub(crate) fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, ApiError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError(PromoError::invalid_input(format!(
            "{name} is required"
        )))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_missing_and_blank() {
        assert!(required(&None, "user_id").is_err());
        assert!(required(&Some("   ".to_string()), "user_id").is_err());
        assert_eq!(required(&Some(" abc ".to_string()), "user_id").unwrap(), "abc");
    }
}
