pub mod db;
pub mod error;
pub mod models;
pub mod repositories;

pub use sqlx;
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;

/// Opens the pool and brings the schema up to date. The one entry point for
/// the database; `db::init_db` layers env handling on top.
pub async fn connect(url: &str) -> Result<sqlx::PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .connect(url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run DB migrations")?;

    Ok(pool)
}
