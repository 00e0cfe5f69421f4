use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::commands::{
    availability::AvailabilityArgs, export::ExportArgs, schema::SchemaArgs, view::ViewArgs,
};

#[derive(Debug, Parser)]
#[command(name = "qreport", version, about = "Query report engine for fleet host results")]
pub struct Cli {
    #[command(flatten)]
    pub runtime: RuntimeArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct RuntimeArgs {
    #[arg(long, global = true, value_name = "PATH")]
    pub home_dir: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH")]
    pub cwd: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH")]
    pub out_dir: Option<PathBuf>,

    #[arg(long, global = true, value_name = "N")]
    pub result_limit: Option<usize>,

    #[arg(long, global = true, value_name = "N")]
    pub page_size: Option<usize>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    View(ViewArgs),
    Export(ExportArgs),
    Availability(AvailabilityArgs),
    Schema(SchemaArgs),
}
