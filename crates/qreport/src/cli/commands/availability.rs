use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use crate::availability::{AvailabilityInput, AvailabilityResolution, resolve_input};
use crate::models::{LoggingMode, ReportEnvelope};

#[derive(Debug, Clone, Args)]
pub struct AvailabilityArgs {
    #[arg(long, default_value_t = false)]
    pub reports_disabled: bool,

    #[arg(long, default_value_t = false)]
    pub discard_data: bool,

    #[arg(long, value_name = "MODE", default_value = "snapshot")]
    pub logging: String,

    #[arg(long, default_value_t = false)]
    pub force_edit: bool,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: &AvailabilityArgs) -> Result<()> {
    let input = AvailabilityInput {
        global_reports_disabled: args.reports_disabled,
        query_discard_data: args.discard_data,
        logging_mode: LoggingMode::parse(&args.logging),
        user_forced_override: args.force_edit,
    };
    let resolution = resolve_input(&input);

    if args.json {
        let envelope = ReportEnvelope::ok(
            "availability",
            serde_json::to_value(&resolution).context("failed to encode availability")?,
        )
        .with_meta("input", serde_json::to_value(&input).context("failed to encode input")?)
        .with_meta("retains_results", json!(resolution.retains_results()));
        let encoded =
            serde_json::to_string(&envelope).context("failed to encode availability envelope")?;
        println!("{encoded}");
    } else {
        println!("{}", render_resolution(&input, &resolution));
    }

    Ok(())
}

fn render_resolution(input: &AvailabilityInput, resolution: &AvailabilityResolution) -> String {
    let mut lines = vec![
        format!("logging: {}", input.logging_mode.as_str()),
        format!("state: {}", resolution.state.as_str()),
    ];
    if let Some(annotation) = resolution.annotation {
        lines.push(format!("annotation: {}", annotation.as_str()));
    }
    lines.push(format!(
        "discard setting editable: {}",
        yes_no(resolution.discard_setting_is_editable)
    ));
    lines.push(format!(
        "edit anyway available: {}",
        yes_no(resolution.edit_anyway_available)
    ));
    lines.push(resolution.message.clone());
    lines.join("\n")
}

const fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
