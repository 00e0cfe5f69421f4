use anyhow::{Context, Result};
use clap::Args;

use crate::config::{ReportSettings, RuntimePaths};

use super::view::{ReportQueryArgs, load_report};

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub report: ReportQueryArgs,
}

pub fn run(args: &ExportArgs, runtime_paths: &RuntimePaths, settings: &ReportSettings) -> Result<()> {
    println!(
        "export: start query_id={} source={} out_dir={}",
        args.report.query_id,
        args.report.source.display(),
        runtime_paths.out_dir.display()
    );

    let service = load_report("export", &args.report, runtime_paths, settings)?;
    let Some(file) = service.export_current_view() else {
        println!(
            "export: nothing to export for query {} (no visible rows)",
            args.report.query_id
        );
        return Ok(());
    };

    std::fs::create_dir_all(&runtime_paths.out_dir).with_context(|| {
        format!(
            "failed to create export directory {}",
            runtime_paths.out_dir.display()
        )
    })?;
    let path = runtime_paths.out_dir.join(&file.filename);
    std::fs::write(&path, &file.content)
        .with_context(|| format!("failed to write export {}", path.display()))?;

    println!(
        "export: complete rows={} file={}",
        file.row_count,
        path.display()
    );
    Ok(())
}
