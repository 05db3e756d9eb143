pub mod cli;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
