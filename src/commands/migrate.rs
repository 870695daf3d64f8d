use super::helpers;
use crate::context::Context;
use crate::migration::{PgMigrationStore, SchemaMigrationManager, score_quality};
use crate::output;
use anyhow::Result;
use std::sync::Arc;

pub struct MigrateCommand;

impl MigrateCommand {
    /// Evolve `table` to fit the sample record in `sample_path`
    pub fn execute(ctx: &Context, table: &str, sample_path: &str, database_url: &str) -> Result<()> {
        let sample = helpers::load_sample(&*ctx.fs, sample_path)?;

        ctx.output.section(&format!("Schema Migration: {}", table));
        output::blank();

        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(async {
            let store = PgMigrationStore::connect(database_url).await?;
            let manager = SchemaMigrationManager::new(Arc::new(store), ctx.output.clone());
            manager.evolve_table(table, &sample).await?;
            Ok::<_, anyhow::Error>(())
        })?;

        let score = score_quality(&sample);
        ctx.output
            .key_value("Sample quality", &format!("{:.0}%", score * 100.0));
        ctx.output
            .success(&format!("Table {} is up to date", table));
        Ok(())
    }
}
