use serde::Serialize;

pub const DEFAULT_RESULT_COUNT_LIMIT: usize = 1_000;

pub const CLIPPED_COUNT_TOOLTIP: &str = "A sample of early results has been retained for reference. Reporting is paused until existing data is deleted. You can reset this report by updating the query's SQL, or by temporarily enabling the discard data setting and disabling it again.";
pub const CLIPPED_BANNER: &str = "Report clipped. A sample of this query's results is included below. You can still use query automations to complete this report in your log destination.";

#[must_use]
pub const fn is_clipped(row_count: usize, limit: usize) -> bool {
    row_count >= limit
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultCount {
    pub count: usize,
    pub label: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub clipped_tooltip: Option<String>,
}

#[must_use]
pub fn result_count(count: usize, clipped: bool) -> ResultCount {
    ResultCount {
        count,
        label: count_label(count),
        clipped_tooltip: clipped.then(|| CLIPPED_COUNT_TOOLTIP.to_string()),
    }
}

#[must_use]
pub fn clipped_banner(clipped: bool) -> Option<String> {
    clipped.then(|| CLIPPED_BANNER.to_string())
}

#[must_use]
pub fn count_label(count: usize) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} result{suffix}")
}
