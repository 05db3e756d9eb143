pub mod orgs;
pub mod percentage;
pub mod promo;
pub mod user;
