use super::helpers;
use crate::context::Context;
use crate::migration::score_quality;
use anyhow::Result;
use serde_json::Value;

pub struct QualityCommand;

impl QualityCommand {
    pub fn execute(ctx: &Context, sample_path: &str) -> Result<()> {
        let sample = helpers::load_sample(&*ctx.fs, sample_path)?;
        let score = score_quality(&sample);

        ctx.output.section("Sample Quality");
        ctx.output.key_value("Fields", &sample.len().to_string());
        ctx.output
            .key_value("Score", &format!("{:.0}%", score * 100.0));

        let unfilled: Vec<&str> = sample
            .iter()
            .filter(|(_, value)| match value {
                Value::Null => true,
                Value::String(s) => s.is_empty(),
                _ => false,
            })
            .map(|(key, _)| key.as_str())
            .collect();

        if !unfilled.is_empty() {
            ctx.output
                .dimmed(&format!("Unfilled fields: {}", unfilled.join(", ")));
        }

        Ok(())
    }
}
