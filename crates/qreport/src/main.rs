#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use clap::error::ErrorKind;
use qreport::cli::app::{Cli, Command, RuntimeArgs};
use qreport::cli::commands;
use qreport::config::{ReportSettings, RuntimePaths, resolve_report_settings};
use qreport::models::ReportCommandFailure;

const EXIT_SUCCESS: i32 = 0;
const EXIT_RUNTIME_FAILURE: i32 = 1;
const EXIT_FETCH_FAILURE: i32 = 2;
const EXIT_USAGE_ERROR: i32 = 64;

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return exit_code_for_parse_error(error),
    };
    qreport::logging::init_logging();

    let command_name = command_name(&cli.command);
    println!("qreport: starting `{command_name}`");

    match execute(cli) {
        Ok(()) => {
            println!("qreport: completed `{command_name}` (exit_code={EXIT_SUCCESS})");
            EXIT_SUCCESS
        }
        Err(error) => {
            let exit_code = classify_runtime_error(&error);
            eprintln!("qreport: failed `{command_name}` (exit_code={exit_code})");
            eprintln!("{error:#}");
            exit_code
        }
    }
}

fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Command::View(args) => {
            let runtime_paths = resolve_runtime_paths(&cli.runtime)?;
            let settings = resolve_settings(&cli.runtime)?;
            commands::view::run(&args, &runtime_paths, &settings)
        }
        Command::Export(args) => {
            let runtime_paths = resolve_runtime_paths(&cli.runtime)?;
            let settings = resolve_settings(&cli.runtime)?;
            commands::export::run(&args, &runtime_paths, &settings)
        }
        Command::Availability(args) => commands::availability::run(&args),
        Command::Schema(args) => commands::schema::run(&args),
    }
}

fn classify_runtime_error(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<ReportCommandFailure>() {
        Some(failure)
            if failure.error_code() == Some(commands::view::REPORT_FETCH_FAILED_CODE) =>
        {
            EXIT_FETCH_FAILURE
        }
        _ => EXIT_RUNTIME_FAILURE,
    }
}

fn exit_code_for_parse_error(error: clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = error.print();
            EXIT_SUCCESS
        }
        _ => {
            let _ = error.print();
            EXIT_USAGE_ERROR
        }
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::View(_) => "view",
        Command::Export(_) => "export",
        Command::Availability(_) => "availability",
        Command::Schema(_) => "schema",
    }
}

fn resolve_settings(args: &RuntimeArgs) -> Result<ReportSettings> {
    resolve_report_settings(args.result_limit, args.page_size)
}

fn resolve_runtime_paths(args: &RuntimeArgs) -> Result<RuntimePaths> {
    let home_dir = match &args.home_dir {
        Some(path) => path.clone(),
        None => std::env::var_os("HOME")
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("HOME is not set; pass --home-dir"))?,
    };

    let cwd = match &args.cwd {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };

    qreport::config::resolve_runtime_paths(&home_dir, &cwd, args.out_dir.as_deref())
}
