use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Connection ceiling for the screening store. A batch evaluates applicants
/// one at a time, so a small pool covers dashboard reads plus one in-flight
/// batch with room to spare.
const MAX_POOL_CONNECTIONS: u32 = 5;

/// Creates the PostgreSQL pool backing the screening store.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_POOL_CONNECTIONS)
        .connect(database_url)
        .await?;

    info!("Screening database pool ready (max {MAX_POOL_CONNECTIONS} connections)");
    Ok(pool)
}
