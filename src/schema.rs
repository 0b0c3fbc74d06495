use anyhow::Context;
use sqlx::PgPool;

/// Ensures the users table exists. Safe to run on every start; any failure
/// here is fatal upstream so the service never serves with an unverified
/// schema.
pub async fn ensure_schema(db: &PgPool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id         BIGSERIAL PRIMARY KEY,
            name       VARCHAR(100) NOT NULL,
            email      VARCHAR(255) NOT NULL UNIQUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(db)
    .await
    .context("ensure users schema")?;
    Ok(())
}
