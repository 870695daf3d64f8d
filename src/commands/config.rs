use super::helpers;
use crate::context::Context;
use crate::output;
use anyhow::{Result, bail};

pub struct ConfigCommand;

impl ConfigCommand {
    /// Show every declared key for a service with its resolved value.
    /// Secret values are redacted unless `reveal` is set.
    pub fn execute_show(ctx: &Context, service: &str, reveal: bool) -> Result<()> {
        let resolver = helpers::build_resolver(ctx)?;
        let Some(config) = resolver.get_service_config(service) else {
            bail!("Unknown service: {}", service);
        };

        ctx.output.section(&format!("Configuration: {}", service));
        ctx.output.key_value("Type", &config.metadata.service_type);
        ctx.output
            .key_value("Rotation schedule", &config.metadata.rotation_schedule);

        if !config.metadata.config_keys.is_empty() {
            ctx.output.subsection("Config");
            for key in &config.metadata.config_keys {
                match config.config.get(key) {
                    Some(value) => ctx.output.key_value(key, value),
                    None => ctx.output.key_value(key, "(unset)"),
                }
            }
        }

        if !config.metadata.secret_keys.is_empty() {
            ctx.output.subsection("Secrets");
            for key in &config.metadata.secret_keys {
                match config.secrets.get(key) {
                    Some(value) if reveal => ctx.output.key_value(key, value),
                    Some(_) => ctx.output.key_value(key, "********"),
                    None => ctx.output.key_value(key, "(unset)"),
                }
            }

            if !reveal {
                output::blank();
                ctx.output.dimmed("Use --reveal to show secret values");
            }
        }

        Ok(())
    }

    /// Print a single resolved value, config keys checked before secrets
    pub fn execute_get(ctx: &Context, service: &str, key: &str) -> Result<()> {
        let resolver = helpers::build_resolver(ctx)?;
        if resolver.service_metadata(service).is_none() {
            bail!("Unknown service: {}", service);
        }

        let value = resolver
            .get_config_value(service, key)
            .or_else(|| resolver.get_secret_value(service, key));

        match value {
            Some(value) => {
                println!("{}", value);
                Ok(())
            }
            None => bail!("No value resolved for {} key: {}", service, key),
        }
    }
}
