use std::path::PathBuf;

use anyhow::{Context, Error, Result, anyhow};
use clap::{Args, ValueEnum};
use serde_json::json;

use crate::config::{ReportSettings, RuntimePaths, resolve_user_path};
use crate::models::{FetchFailure, ReportEnvelope, SortDirection, SortOption};
use crate::report::{DirectorySource, ReportService, ReportStatus, ReportView};
use crate::schema::ColumnHeader;
use crate::utils::time::humanize_duration_seconds;

pub const REPORT_FETCH_FAILED_CODE: &str = "report_fetch_failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortDirectionArg {
    Asc,
    Desc,
}

impl From<SortDirectionArg> for SortDirection {
    fn from(value: SortDirectionArg) -> Self {
        match value {
            SortDirectionArg::Asc => Self::Asc,
            SortDirectionArg::Desc => Self::Desc,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ReportQueryArgs {
    #[arg(long, value_name = "DIR")]
    pub source: PathBuf,

    #[arg(long, value_name = "ID")]
    pub query_id: u64,

    #[arg(long, value_name = "TEXT")]
    pub filter: Option<String>,

    #[arg(long, value_name = "FIELD")]
    pub sort_key: Option<String>,

    #[arg(long, value_enum)]
    pub sort_direction: Option<SortDirectionArg>,
}

#[derive(Debug, Clone, Args)]
pub struct ViewArgs {
    #[command(flatten)]
    pub report: ReportQueryArgs,

    /// Zero-based page index; out-of-range pages clamp to the last page.
    #[arg(long, value_name = "N")]
    pub page: Option<usize>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: &ViewArgs, runtime_paths: &RuntimePaths, settings: &ReportSettings) -> Result<()> {
    let mut service = load_report("view", &args.report, runtime_paths, settings)?;
    if let Some(page) = args.page {
        service.set_page(page);
    }
    let view = service
        .current_view()
        .ok_or_else(|| anyhow!("report session was not initialized"))?;

    if args.json {
        let mut envelope = ReportEnvelope::ok(
            "view",
            serde_json::to_value(&view).context("failed to encode report view")?,
        )
        .with_meta("query_id", json!(view.query_id))
        .with_meta("source", json!(args.report.source.display().to_string()));
        if let Some(banner) = &view.clipped_banner {
            envelope = envelope.with_warning("result_clipped", banner);
        }
        let encoded = serde_json::to_string(&envelope).context("failed to encode view envelope")?;
        println!("{encoded}");
    } else {
        println!("{}", render_text_view(&view));
    }

    Ok(())
}

pub(crate) fn load_report(
    command: &str,
    args: &ReportQueryArgs,
    runtime_paths: &RuntimePaths,
    settings: &ReportSettings,
) -> Result<ReportService<DirectorySource>> {
    let source_root = resolve_user_path(&args.source, &runtime_paths.home_dir, &runtime_paths.cwd)?;
    let sort = requested_sort(args, settings);
    let mut service = ReportService::new(DirectorySource::new(&source_root), settings.clone());

    service
        .get_report_view(args.query_id, sort.clone())
        .map_err(|failure| fetch_failure(command, args.query_id, &failure))?;
    service.set_sort(Some(sort));
    if let Some(filter) = &args.filter {
        let visible = service.set_filter(filter);
        tracing::debug!(query_id = args.query_id, visible, "filter applied");
    }

    Ok(service)
}

fn requested_sort(args: &ReportQueryArgs, settings: &ReportSettings) -> SortOption {
    let key = args
        .sort_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .unwrap_or(settings.default_sort.key.as_str());
    let direction = args
        .sort_direction
        .map_or(settings.default_sort.direction, SortDirection::from);
    SortOption::new(key, direction)
}

fn fetch_failure(command: &str, query_id: u64, failure: &FetchFailure) -> Error {
    ReportEnvelope::error(command, REPORT_FETCH_FAILED_CODE, crate::report::DATA_ERROR_MESSAGE)
        .with_meta("query_id", json!(query_id))
        .with_error_details(json!({
            "kind": failure.kind.as_str(),
            "cause": failure.message,
        }))
        .into_failure()
}

#[must_use]
pub fn render_text_view(view: &ReportView) -> String {
    let details = &view.details;
    let mut lines = Vec::new();

    let name = if details.name.trim().is_empty() {
        "Query"
    } else {
        details.name.as_str()
    };
    lines.push(format!("{name} (query {})", view.query_id));
    if !details.description.trim().is_empty() {
        lines.push(details.description.clone());
    }
    let frequency = if details.interval_seconds == 0 {
        "never".to_string()
    } else {
        format!(
            "{} ({}s)",
            humanize_duration_seconds(details.interval_seconds),
            details.interval_seconds
        )
    };
    lines.push(format!(
        "automations: {} | frequency: {frequency} | log destination: {}",
        details.automations.label(),
        details.log_destination
    ));
    match &details.live_query.tooltip {
        Some(tooltip) => lines.push(format!("live query: unavailable ({tooltip})")),
        None => lines.push("live query: available".to_string()),
    }
    lines.push(format!("report: {}", view.availability.state.as_str()));
    if !view.availability.retains_results() {
        lines.push(format!("  {}", view.availability.message));
    }
    lines.push(String::new());

    match view.status {
        ReportStatus::Loading => lines.push("loading".to_string()),
        ReportStatus::Error => {
            if let Some(error) = &view.error {
                lines.push(format!("error: {}", error.message));
                lines.push(format!("cause: {}", error.cause));
            }
        }
        ReportStatus::Empty => {
            if let Some(empty_state) = &view.empty_state {
                lines.push(empty_state.header.clone());
                lines.push(empty_state.info.clone());
                lines.extend(empty_state.reasons.iter().map(|reason| format!("- {reason}")));
            }
        }
        ReportStatus::Ready => {
            let mut count = view.result_count.label.clone();
            if let Some(tooltip) = &view.result_count.clipped_tooltip {
                count.push_str(&format!(" ({tooltip})"));
            }
            lines.push(count);
            if let Some(banner) = &view.clipped_banner {
                lines.push(banner.clone());
            }
            let sort = view
                .sort
                .as_ref()
                .map(|sort| format!("{} {}", sort.key, sort.direction.as_str()))
                .unwrap_or_else(|| "server order".to_string());
            lines.push(format!(
                "filter: {:?} | sort: {sort} | page {} of {}",
                view.filter_text,
                view.page.page + 1,
                view.page.page_count
            ));
            lines.push(String::new());
            lines.extend(render_table(&view.headers, &view.visible_rows));
        }
    }

    lines.join("\n")
}

fn render_table(headers: &[ColumnHeader], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers
        .iter()
        .map(|header| header.display_label.chars().count())
        .collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}", width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_line(
        headers
            .iter()
            .map(|header| header.display_label.as_str())
            .collect(),
    ));
    let rules: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    lines.push(format_line(rules.iter().map(String::as_str).collect()));
    for row in rows {
        lines.push(format_line(row.iter().map(String::as_str).collect()));
    }
    lines
}
