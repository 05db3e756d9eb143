pub mod assignment_service;
pub mod percentage_service;

use cardhub_db::error::PromoError;
use uuid::Uuid;

/// Opaque request ids must parse as store-native keys before any lookup is
/// attempted, so malformed input never surfaces as a store-level cast error.
pub fn parse_id(raw: &str) -> Result<Uuid, PromoError> {
    Uuid::parse_str(raw.trim()).map_err(|_| PromoError::InvalidIdFormat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_canonical_uuid() {
        assert!(parse_id("6f9619ff-8b86-4d01-b42d-00cf4fc964ff").is_ok());
        assert!(parse_id("  6f9619ff-8b86-4d01-b42d-00cf4fc964ff  ").is_ok());
    }

    #[test]
    fn parse_id_rejects_garbage() {
        for bad in ["", "null", "12345", "not-a-uuid", "zzzzzzzz-8b86-4d01-b42d-00cf4fc964ff"] {
            assert!(matches!(parse_id(bad), Err(PromoError::InvalidIdFormat)), "{bad}");
        }
    }
}
