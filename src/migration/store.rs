use super::error::MigrationResult;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions};

const POOL_MIN_CONNECTIONS: u32 = 1;
const POOL_MAX_CONNECTIONS: u32 = 5;

/// Journal table definition, created on first use
const JOURNAL_DDL: &str = "CREATE TABLE IF NOT EXISTS migrations (\n    \
     id SERIAL PRIMARY KEY,\n    \
     name TEXT UNIQUE NOT NULL,\n    \
     hash TEXT NOT NULL,\n    \
     applied_at TIMESTAMP NOT NULL\n\
     )";

/// Database operations the migration manager needs, behind a trait so the
/// manager is testable without a running PostgreSQL.
#[async_trait]
pub trait MigrationStore: Send + Sync {
    /// Create the migrations journal table if it does not exist
    async fn ensure_journal(&self) -> MigrationResult<()>;

    /// Check whether a (name, hash) pair has already been applied
    async fn journal_contains(&self, name: &str, hash: &str) -> MigrationResult<bool>;

    /// Record an applied migration
    async fn record(&self, name: &str, hash: &str, applied_at: NaiveDateTime)
    -> MigrationResult<()>;

    /// Column names of a table per information_schema (empty when the table
    /// does not exist)
    async fn existing_columns(&self, table: &str) -> MigrationResult<Vec<String>>;

    /// Execute a DDL statement
    async fn execute(&self, sql: &str) -> MigrationResult<()>;
}

/// PostgreSQL-backed migration store over a bounded connection pool.
///
/// Checkout waits when the pool is exhausted; the only timeout in play is
/// the pool's own acquire timeout.
pub struct PgMigrationStore {
    pool: PgPool,
}

impl PgMigrationStore {
    /// Connect to the database at `dsn`
    pub async fn connect(dsn: &str) -> MigrationResult<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(POOL_MIN_CONNECTIONS)
            .max_connections(POOL_MAX_CONNECTIONS)
            .connect(dsn)
            .await?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool
    #[allow(dead_code)]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MigrationStore for PgMigrationStore {
    async fn ensure_journal(&self) -> MigrationResult<()> {
        sqlx::query(JOURNAL_DDL).execute(&self.pool).await?;
        Ok(())
    }

    async fn journal_contains(&self, name: &str, hash: &str) -> MigrationResult<bool> {
        let row = sqlx::query("SELECT 1 FROM migrations WHERE name = $1 AND hash = $2")
            .bind(name)
            .bind(hash)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    async fn record(
        &self,
        name: &str,
        hash: &str,
        applied_at: NaiveDateTime,
    ) -> MigrationResult<()> {
        sqlx::query(
            "INSERT INTO migrations (name, hash, applied_at) VALUES ($1, $2, $3) \
             ON CONFLICT (name) DO UPDATE SET hash = $2, applied_at = $3",
        )
        .bind(name)
        .bind(hash)
        .bind(applied_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn existing_columns(&self, table: &str) -> MigrationResult<Vec<String>> {
        let rows =
            sqlx::query("SELECT column_name FROM information_schema.columns WHERE table_name = $1")
                .bind(table)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .iter()
            .map(|row| row.get::<String, _>("column_name"))
            .collect())
    }

    async fn execute(&self, sql: &str) -> MigrationResult<()> {
        sqlx::query(sql).execute(&self.pool).await?;
        Ok(())
    }
}
