use super::helpers;
use crate::context::Context;
use crate::output;
use crate::registry::ServiceRegistry;
use crate::secrets::StoreHealth;
use anyhow::Result;

pub struct StatusCommand;

impl StatusCommand {
    pub fn execute(ctx: &Context) -> Result<()> {
        ctx.output.section("Sophia Status");

        let environment = ctx
            .env
            .get("SOPHIA_ENVIRONMENT")
            .unwrap_or_else(|| "production".to_string());
        ctx.output.environment_badge(&environment);
        output::blank();

        let store = helpers::build_store(ctx)?;
        match &store {
            Some(store) => match store.health_check() {
                StoreHealth::Healthy => {
                    ctx.output.status_check("Secret backend", true);
                }
                StoreHealth::Unhealthy(reason) => {
                    ctx.output.status_check("Secret backend", false);
                    ctx.output
                        .warning(&format!("Backend unhealthy: {}", reason));
                }
            },
            None => {
                ctx.output.dimmed(
                    "No PULUMI_ACCESS_TOKEN set, resolving from environment variables only",
                );
            }
        }

        let registry = ServiceRegistry::load(&*ctx.fs, &*ctx.env, &*ctx.output, store.as_deref());
        ctx.output
            .key_value("Registry source", &helpers::describe_source(registry.source()));
        ctx.output.key_value("Services", &registry.len().to_string());

        Ok(())
    }
}
