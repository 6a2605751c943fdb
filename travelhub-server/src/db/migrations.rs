//! Schema migrations
//!
//! Every statement is idempotent, so `travelhub migrate` and server
//! startup can both run them against an existing database.

use sqlx::PgPool;

const STATEMENTS: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            nickname TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            is_admin BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "resorts",
        r#"
        CREATE TABLE IF NOT EXISTS resorts (
            id BIGSERIAL PRIMARY KEY,
            country TEXT NOT NULL,
            state TEXT,
            city TEXT,
            county TEXT,
            resort_name TEXT NOT NULL,
            resort_type TEXT NOT NULL,
            picture TEXT,
            creator_id BIGINT REFERENCES users(id) ON DELETE SET NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "user_resorts",
        r#"
        CREATE TABLE IF NOT EXISTS user_resorts (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            resort_id BIGINT NOT NULL REFERENCES resorts(id) ON DELETE CASCADE,
            recommendation INTEGER,
            expenditure DOUBLE PRECISION,
            comment TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "user_resorts_resort_idx",
        "CREATE INDEX IF NOT EXISTS user_resorts_resort_idx ON user_resorts (resort_id)",
    ),
    (
        "user_resorts_user_idx",
        "CREATE INDEX IF NOT EXISTS user_resorts_user_idx ON user_resorts (user_id)",
    ),
    (
        "sessions",
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token TEXT PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            expires_at TIMESTAMPTZ NOT NULL
        )
        "#,
    ),
    (
        "sessions_expires_idx",
        "CREATE INDEX IF NOT EXISTS sessions_expires_idx ON sessions (expires_at)",
    ),
];

/// Run all migrations in order.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running schema migrations...");

    for (name, sql) in STATEMENTS {
        tracing::debug!(migration = name, "applying");
        sqlx::query(sql).execute(pool).await?;
    }

    tracing::info!(count = STATEMENTS.len(), "Schema migrations complete");
    Ok(())
}
