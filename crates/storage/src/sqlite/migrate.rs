use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

struct Migration {
    version: i64,
    statements: &'static [&'static str],
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    statements: &[r"
        CREATE TABLE IF NOT EXISTS local_storage (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
    "],
}];

/// Applies every version in `MIGRATIONS` not yet recorded in `schema_migrations`.
/// Each version runs in its own transaction.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
        ",
    )
    .execute(pool)
    .await?;

    for migration in MIGRATIONS {
        apply(pool, migration)
            .await
            .map_err(|source| SqliteInitError::Migration {
                version: migration.version,
                source,
            })?;
    }

    Ok(())
}

async fn apply(pool: &SqlitePool, migration: &Migration) -> Result<(), sqlx::Error> {
    let applied = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
        .bind(migration.version)
        .fetch_optional(pool)
        .await?
        .is_some();
    if applied {
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    for statement in migration.statements {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    sqlx::query(
        r"
            INSERT INTO schema_migrations (version, applied_at)
            VALUES (?1, ?2)
            ON CONFLICT(version) DO NOTHING
        ",
    )
    .bind(migration.version)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;
    tx.commit().await
}
