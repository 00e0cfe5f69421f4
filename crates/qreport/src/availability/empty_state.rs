use serde::Serialize;

use crate::models::LoggingMode;
use crate::utils::time::{humanize_duration_seconds, parse_timestamp_to_unix_ms};

const COLLECTION_GRACE_SECONDS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReportKind {
    NoSchedule,
    RetentionDisabled,
    Collecting,
    NoDataYet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyReportExplanation {
    pub kind: EmptyReportKind,
    pub header: String,
    pub info: String,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyStateInput<'a> {
    pub interval_seconds: u64,
    pub updated_at: Option<&'a str>,
    pub global_reports_disabled: bool,
    pub discard_data: bool,
    pub logging_mode: &'a LoggingMode,
    pub now_unix_ms: u64,
}

impl EmptyStateInput<'_> {
    fn retention_disabled(&self) -> bool {
        self.global_reports_disabled || self.discard_data || !self.logging_mode.is_snapshot()
    }

    fn seconds_until_results(&self) -> Option<u64> {
        let updated_at_ms = self
            .updated_at
            .and_then(|raw| parse_timestamp_to_unix_ms(raw).ok())?;
        let elapsed_seconds = self.now_unix_ms.saturating_sub(updated_at_ms) / 1_000;
        let wait_seconds = self.interval_seconds.saturating_add(COLLECTION_GRACE_SECONDS);
        (elapsed_seconds < wait_seconds).then(|| wait_seconds - elapsed_seconds)
    }
}

#[must_use]
pub fn explain_empty_report(input: &EmptyStateInput<'_>) -> EmptyReportExplanation {
    if input.interval_seconds == 0 {
        return EmptyReportExplanation {
            kind: EmptyReportKind::NoSchedule,
            header: "Nothing to report yet".to_string(),
            info: "This query does not collect data on a schedule. Add a frequency or run this as a live query to see results.".to_string(),
            reasons: Vec::new(),
        };
    }

    if input.retention_disabled() {
        let mut reasons = Vec::new();
        if input.global_reports_disabled {
            reasons.push("Query reports are globally disabled in organization settings.".to_string());
        }
        if input.discard_data {
            reasons.push("This query has Discard data enabled.".to_string());
        }
        if !input.logging_mode.is_snapshot() {
            reasons.push("The logging setting for this query is not Snapshot.".to_string());
        }
        return EmptyReportExplanation {
            kind: EmptyReportKind::RetentionDisabled,
            header: "Nothing to report".to_string(),
            info: "The following settings prevent saving this query's results:".to_string(),
            reasons,
        };
    }

    if let Some(remaining_seconds) = input.seconds_until_results() {
        return EmptyReportExplanation {
            kind: EmptyReportKind::Collecting,
            header: "Collecting results...".to_string(),
            info: format!(
                "Results are being collected from hosts. Check back in {}.",
                humanize_duration_seconds(remaining_seconds)
            ),
            reasons: Vec::new(),
        };
    }

    EmptyReportExplanation {
        kind: EmptyReportKind::NoDataYet,
        header: "Nothing to report yet".to_string(),
        info: "This query has returned no data so far.".to_string(),
        reasons: Vec::new(),
    }
}
