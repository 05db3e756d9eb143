pub mod ledger_repo;
pub mod org_repo;
pub mod percentage_repo;
pub mod promo_repo;
pub mod user_repo;
