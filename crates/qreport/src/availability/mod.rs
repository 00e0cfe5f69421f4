pub mod empty_state;

use serde::Serialize;

use crate::models::LoggingMode;

pub use empty_state::{EmptyReportExplanation, EmptyReportKind, EmptyStateInput, explain_empty_report};

pub const DIFFERENTIAL_LOGGING_MESSAGE: &str = "The Discard data setting is ignored when differential logging is enabled. This query's results will not be saved.";
pub const GLOBALLY_DISABLED_MESSAGE: &str = "This setting is ignored because query reports have been globally disabled. An administrator can enable query reports under Organization settings > Advanced options > Disable query reports.";
pub const DISCARDED_BY_QUERY_MESSAGE: &str = "The most recent results for each host will not be available. Data will still be sent to your log destination if automations are on.";
pub const ENABLED_MESSAGE: &str = "The most recent results for each host are retained as this query's report.";
pub const OVERRIDDEN_NOTE: &str = "Query reports are globally disabled; this setting is being edited anyway and takes effect only if reports are enabled again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityState {
    Enabled,
    GloballyDisabled,
    DiscardedByQuery,
    DisabledByNonSnapshotLogging,
    OverriddenByUser,
}

impl AvailabilityState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::GloballyDisabled => "globally_disabled",
            Self::DiscardedByQuery => "discarded_by_query",
            Self::DisabledByNonSnapshotLogging => "disabled_by_non_snapshot_logging",
            Self::OverriddenByUser => "overridden_by_user",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityInput {
    pub global_reports_disabled: bool,
    pub query_discard_data: bool,
    pub logging_mode: LoggingMode,
    pub user_forced_override: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityResolution {
    pub state: AvailabilityState,
    pub message: String,
    pub discard_setting_is_editable: bool,
    pub edit_anyway_available: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<AvailabilityState>,
}

impl AvailabilityResolution {
    #[must_use]
    pub fn retains_results(&self) -> bool {
        self.state == AvailabilityState::Enabled && self.annotation.is_none()
    }
}

#[must_use]
pub fn resolve(
    global_reports_disabled: bool,
    query_discard_data: bool,
    logging_mode: &LoggingMode,
    user_forced_override: bool,
) -> AvailabilityResolution {
    if !logging_mode.is_snapshot() {
        return AvailabilityResolution {
            state: AvailabilityState::DisabledByNonSnapshotLogging,
            message: DIFFERENTIAL_LOGGING_MESSAGE.to_string(),
            discard_setting_is_editable: false,
            edit_anyway_available: false,
            annotation: None,
        };
    }

    if global_reports_disabled && !user_forced_override {
        return AvailabilityResolution {
            state: AvailabilityState::GloballyDisabled,
            message: GLOBALLY_DISABLED_MESSAGE.to_string(),
            discard_setting_is_editable: false,
            edit_anyway_available: true,
            annotation: None,
        };
    }

    let annotation = global_reports_disabled.then_some(AvailabilityState::OverriddenByUser);
    let (state, message) = if query_discard_data {
        (AvailabilityState::DiscardedByQuery, DISCARDED_BY_QUERY_MESSAGE)
    } else {
        (AvailabilityState::Enabled, ENABLED_MESSAGE)
    };
    let message = match annotation {
        Some(_) => format!("{message} {OVERRIDDEN_NOTE}"),
        None => message.to_string(),
    };

    AvailabilityResolution {
        state,
        message,
        discard_setting_is_editable: true,
        edit_anyway_available: false,
        annotation,
    }
}

#[must_use]
pub fn resolve_input(input: &AvailabilityInput) -> AvailabilityResolution {
    resolve(
        input.global_reports_disabled,
        input.query_discard_data,
        &input.logging_mode,
        input.user_forced_override,
    )
}
