pub mod promo;

pub use promo::{
    assign_code, get_percentage, get_redemption, get_unused_code, mark_code_used,
    redemption_history,
};
