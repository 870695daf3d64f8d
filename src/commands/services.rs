use super::helpers;
use crate::context::Context;
use crate::output;
use anyhow::Result;

pub struct ServicesCommand;

impl ServicesCommand {
    pub fn execute(ctx: &Context) -> Result<()> {
        let resolver = helpers::build_resolver(ctx)?;
        let registry = resolver.registry();

        ctx.output.section("Registered Services");
        ctx.output
            .key_value("Source", &helpers::describe_source(registry.source()));
        output::blank();

        if registry.is_empty() {
            ctx.output.info("No services registered");
            return Ok(());
        }

        output::table_header(&["Service", "Type", "Config", "Secrets", "Rotation"]);
        for (name, entry) in registry.iter() {
            output::table_row(&[
                &format!("{:<14}", name),
                &format!("{:<14}", entry.service_type),
                &format!("{:<6}", entry.config_keys.len()),
                &format!("{:<7}", entry.secret_keys.len()),
                &entry.rotation_schedule,
            ]);
        }

        output::blank();
        ctx.output
            .dimmed(&format!("{} services registered", registry.len()));
        Ok(())
    }
}
