pub mod percentages;
pub mod promo;

pub use percentages::{list_percentages, upsert_percentages};
pub use promo::{list_pool, save_promo_codes};
