use thiserror::Error;

/// Everything the promo engine can hand back to a caller. Repositories map
/// store-level unique violations into the matching conflict variant so the
/// HTTP layer never has to inspect sqlx errors itself.
#[derive(Debug, Error)]
pub enum PromoError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Invalid ID format")]
    InvalidIdFormat,
    #[error("User not found")]
    UserNotFound,
    #[error("Organisation not found")]
    OrganisationNotFound,
    #[error("Category not found")]
    CategoryNotFound,
    #[error("Promo code not found")]
    CodeNotFound,
    #[error("No percentage configured for this organisation and category")]
    PercentageNotConfigured,
    #[error("Promo code is already used")]
    AlreadyUsed,
    #[error("No unused promo code available for this organisation")]
    NoCodeAvailable,
    #[error("Duplicate promo code in pool")]
    DuplicateCode,
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl PromoError {
    /// Only transient store failures are worth retrying; every other variant
    /// is a terminal answer for the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PromoError::Store(_))
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        PromoError::InvalidInput(msg.into())
    }
}

/// True when the sqlx error is a Postgres unique-constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}
