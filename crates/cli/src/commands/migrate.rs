//! Apply the PostgreSQL schema.
//!
//! Every statement is idempotent, so running this against an up-to-date
//! database is a no-op.

use anyhow::{Context as _, Result};
use streakcert_core::AppConfig;
use streakcert_storage::PgStorage;

pub(crate) async fn run(config: AppConfig) -> Result<()> {
    let url = config
        .database_url
        .as_deref()
        .context("STREAKCERT_DATABASE_URL or DATABASE_URL must be set for migrate")?;
    // Connecting runs the migrations.
    let _storage = PgStorage::new(url).await?;
    println!("Migrations applied");
    Ok(())
}
