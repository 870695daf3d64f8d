//! Dynamic schema migration for PostgreSQL.
//!
//! `SchemaMigrationManager` inspects an incoming sample record, infers a
//! column definition for it, and evolves the target table additively (CREATE
//! TABLE or ADD COLUMN only, never dropping or retyping). Applied
//! definitions are journalled in a `migrations` table so identical samples
//! short-circuit; failures roll back best-effort and re-raise.

pub mod error;
pub mod manager;
pub mod quality;
pub mod store;
pub mod types;

pub use error::{MigrationError, MigrationResult};
pub use manager::SchemaMigrationManager;
pub use quality::score_quality;
pub use store::{MigrationStore, PgMigrationStore};
pub use types::{ColumnType, infer_column_type};
