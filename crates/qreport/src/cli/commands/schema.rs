use anyhow::{Context, Result};
use clap::Args;

use crate::models::payload_json_schema;

#[derive(Debug, Clone, Args)]
pub struct SchemaArgs {
    #[arg(long, default_value_t = false)]
    pub compact: bool,
}

pub fn run(args: &SchemaArgs) -> Result<()> {
    let schema = payload_json_schema();
    let encoded = if args.compact {
        serde_json::to_string(&schema)
    } else {
        serde_json::to_string_pretty(&schema)
    }
    .context("failed to encode report payload schema")?;
    println!("{encoded}");
    Ok(())
}
