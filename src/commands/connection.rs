use super::helpers;
use crate::context::Context;
use crate::resolver::connection_string;
use anyhow::{Result, bail};

pub struct ConnectionStringCommand;

impl ConnectionStringCommand {
    pub fn execute(ctx: &Context, service: &str) -> Result<()> {
        let resolver = helpers::build_resolver(ctx)?;
        let Some(config) = resolver.get_service_config(service) else {
            bail!("Unknown service: {}", service);
        };

        match connection_string(&config)? {
            Some(dsn) => {
                println!("{}", dsn);
                Ok(())
            }
            None => bail!(
                "No connection string format defined for service: {}",
                service
            ),
        }
    }
}
