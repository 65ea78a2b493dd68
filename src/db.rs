use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Process-wide pool, created once at startup and shared via `AppState`.
pub async fn connect_pg(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await?;
    Ok(pool)
}
