use super::helpers;
use crate::context::Context;
use crate::output;
use crate::registry::{ServiceRegistry, parse_rotation_schedule};
use crate::secrets::{SecretStore, envfile};
use anyhow::{Context as AnyhowContext, Result, bail};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub struct SecretsCommand;

impl SecretsCommand {
    /// Push every variable from a local env file into the secret backend.
    /// Backend keys are the lowercased variable names.
    pub fn execute_import_env(ctx: &Context, env_file: &str) -> Result<()> {
        let Some(store) = helpers::build_store(ctx)? else {
            bail!("PULUMI_ACCESS_TOKEN is required to import secrets");
        };

        let contents = ctx
            .fs
            .read_to_string(Path::new(env_file))
            .with_context(|| format!("Failed to read env file: {}", env_file))?;

        let entries = envfile::parse(&contents);
        if entries.is_empty() {
            ctx.output
                .warning(&format!("No variables found in {}", env_file));
            return Ok(());
        }

        let mut imported = 0usize;
        for (key, value) in &entries {
            let backend_key = key.to_lowercase();
            match store.set_secret(&backend_key, value) {
                Ok(()) => {
                    imported += 1;
                    ctx.output.dimmed(&format!("Imported {}", backend_key));
                }
                Err(err) => {
                    ctx.output
                        .error(&format!("Failed to import {}: {}", backend_key, err));
                }
            }
        }

        ctx.output.success(&format!(
            "Imported {} of {} variables from {}",
            imported,
            entries.len(),
            env_file
        ));
        Ok(())
    }

    /// Resolve every registered service and write the results as an env file
    pub fn execute_export_env(ctx: &Context, env_file: &str) -> Result<()> {
        let resolver = helpers::build_resolver(ctx)?;
        let services: Vec<String> = resolver
            .list_services()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut entries: Vec<(String, String)> = Vec::new();
        for service in &services {
            let Some(config) = resolver.get_service_config(service) else {
                continue;
            };
            let prefix = service.to_uppercase();

            let mut pairs: Vec<(&String, &String)> =
                config.config.iter().chain(config.secrets.iter()).collect();
            pairs.sort();

            for (key, value) in pairs {
                entries.push((format!("{}_{}", prefix, key.to_uppercase()), value.clone()));
            }
        }

        if entries.is_empty() {
            ctx.output.warning("No values resolved, nothing to export");
            return Ok(());
        }

        ctx.fs
            .write(Path::new(env_file), &envfile::format(&entries))?;

        ctx.output.warning("Exported secrets are stored in plain text");
        ctx.output.success(&format!(
            "Exported {} variables to {}",
            entries.len(),
            env_file
        ));
        Ok(())
    }

    /// Rotate the secrets of one service (or "all") to fresh random values
    /// and stamp the local rotation state.
    pub fn execute_rotate(ctx: &Context, service: &str) -> Result<()> {
        let Some(store) = helpers::build_store(ctx)? else {
            bail!("PULUMI_ACCESS_TOKEN is required to rotate secrets");
        };
        let registry = ServiceRegistry::load(&*ctx.fs, &*ctx.env, &*ctx.output, Some(&*store));
        Self::rotate_services(ctx, &*store, &registry, service)
    }

    fn rotate_services(
        ctx: &Context,
        store: &dyn SecretStore,
        registry: &ServiceRegistry,
        service: &str,
    ) -> Result<()> {
        let targets: Vec<String> = if service == "all" {
            registry
                .service_names()
                .iter()
                .map(|s| s.to_string())
                .collect()
        } else if registry.contains(service) {
            vec![service.to_string()]
        } else {
            bail!("Unknown service: {}", service);
        };

        let now: DateTime<Utc> = ctx.clock.now().into();
        let mut state = read_rotation_state(ctx);

        // A failed write aborts the run, but secrets already rotated in the
        // backend stay rotated: their stamps must be persisted regardless,
        // or audit would report them as never rotated.
        let mut failure: Option<anyhow::Error> = None;
        'services: for target in &targets {
            let Some(entry) = registry.get(target) else {
                continue;
            };

            if entry.secret_keys.is_empty() {
                ctx.output
                    .dimmed(&format!("{} declares no secrets, skipping", target));
                continue;
            }

            for key in &entry.secret_keys {
                let backend_key = format!("{}_{}", target, key);
                let new_value = Uuid::new_v4().to_string();
                if let Err(err) = store.set_secret(&backend_key, &new_value) {
                    failure = Some(err.context(format!("Failed to rotate {}", backend_key)));
                    break 'services;
                }
                ctx.output.dimmed(&format!("Rotated {}", backend_key));
            }

            state.insert(target.clone(), now.to_rfc3339());
            ctx.output
                .success(&format!("Rotated secrets for {}", target));
        }

        write_rotation_state(ctx, &state)?;

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Compare each service's last rotation against its declared schedule
    pub fn execute_audit(ctx: &Context) -> Result<()> {
        let store = helpers::build_store(ctx)?;
        let registry = ServiceRegistry::load(&*ctx.fs, &*ctx.env, &*ctx.output, store.as_deref());
        Self::audit_rotation(ctx, &registry)
    }

    fn audit_rotation(ctx: &Context, registry: &ServiceRegistry) -> Result<()> {
        let state = read_rotation_state(ctx);
        let now: DateTime<Utc> = ctx.clock.now().into();

        ctx.output.section("Secret Rotation Audit");
        output::blank();

        let mut overdue = 0usize;
        for (name, entry) in registry.iter() {
            let schedule_days = match parse_rotation_schedule(&entry.rotation_schedule) {
                Ok(days) => days,
                Err(err) => {
                    ctx.output.warning(&format!("{}: {}", name, err));
                    continue;
                }
            };

            let rotated_at = state
                .get(name)
                .and_then(|stamp| DateTime::parse_from_rfc3339(stamp).ok());

            match rotated_at {
                Some(rotated_at) => {
                    let age_days = (now - rotated_at.with_timezone(&Utc)).num_days();
                    if age_days > i64::from(schedule_days) {
                        overdue += 1;
                        ctx.output.warning(&format!(
                            "{}: overdue, last rotated {} days ago (schedule {})",
                            name, age_days, entry.rotation_schedule
                        ));
                    } else {
                        ctx.output.dimmed(&format!(
                            "{}: rotated {} days ago (schedule {})",
                            name, age_days, entry.rotation_schedule
                        ));
                    }
                }
                None => {
                    overdue += 1;
                    ctx.output.warning(&format!(
                        "{}: no rotation on record (schedule {})",
                        name, entry.rotation_schedule
                    ));
                }
            }
        }

        output::blank();
        if overdue == 0 {
            ctx.output
                .success("All services are within their rotation schedules");
        } else {
            ctx.output
                .warning(&format!("{} service(s) need rotation", overdue));
        }
        Ok(())
    }
}

/// Rotation stamps live next to the local registry file
fn rotation_state_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".sophia")
        .join("rotation_state.json")
}

fn read_rotation_state(ctx: &Context) -> BTreeMap<String, String> {
    let path = rotation_state_path();
    if !ctx.fs.exists(&path) {
        return BTreeMap::new();
    }

    ctx.fs
        .read_to_string(&path)
        .ok()
        .and_then(|contents| serde_json::from_str(&contents).ok())
        .unwrap_or_default()
}

fn write_rotation_state(ctx: &Context, state: &BTreeMap<String, String>) -> Result<()> {
    let path = rotation_state_path();
    if let Some(parent) = path.parent() {
        ctx.fs.create_dir_all(parent)?;
    }

    let contents = serde_json::to_string_pretty(state)?;
    ctx.fs.write(&path, &contents)?;
    Ok(())
}
