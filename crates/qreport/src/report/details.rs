use serde::Serialize;

use crate::models::{GlobalConfig, QueryMetadata};

pub const LIVE_QUERY_DISABLED_TOOLTIP: &str = "Live queries are disabled in organization settings";
pub const LIVE_QUERY_UNREACHABLE_TOOLTIP: &str = "Live queries are currently unavailable";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomationsStatus {
    On,
    Paused,
    Off,
}

impl AutomationsStatus {
    #[must_use]
    pub const fn from_query(automations_enabled: bool, interval_seconds: u64) -> Self {
        match (automations_enabled, interval_seconds) {
            (true, 0) => Self::Paused,
            (true, _) => Self::On,
            (false, _) => Self::Off,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::On => "On",
            Self::Paused => "Paused",
            Self::Off => "Off",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveQueryAffordance {
    pub enabled: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

impl LiveQueryAffordance {
    #[must_use]
    pub fn resolve(live_query_disabled: bool, probe_ok: bool) -> Self {
        let tooltip = if live_query_disabled {
            Some(LIVE_QUERY_DISABLED_TOOLTIP)
        } else if !probe_ok {
            Some(LIVE_QUERY_UNREACHABLE_TOOLTIP)
        } else {
            None
        };
        Self {
            enabled: tooltip.is_none(),
            tooltip: tooltip.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryDetails {
    pub name: String,
    pub description: String,
    pub automations: AutomationsStatus,
    pub interval_seconds: u64,
    pub log_destination: String,
    pub live_query: LiveQueryAffordance,
}

impl QueryDetails {
    #[must_use]
    pub fn from_parts(
        metadata: Option<&QueryMetadata>,
        config: &GlobalConfig,
        live_probe_ok: bool,
    ) -> Self {
        let (name, description, automations_enabled, interval_seconds) = metadata
            .map(|metadata| {
                (
                    metadata.name.clone(),
                    metadata.description.clone(),
                    metadata.automations_enabled,
                    metadata.interval,
                )
            })
            .unwrap_or_default();

        Self {
            name,
            description,
            automations: AutomationsStatus::from_query(automations_enabled, interval_seconds),
            interval_seconds,
            log_destination: log_destination_label(&config.logging.result.plugin),
            live_query: LiveQueryAffordance::resolve(
                config.server_settings.live_query_disabled,
                live_probe_ok,
            ),
        }
    }
}

#[must_use]
pub fn log_destination_label(plugin: &str) -> String {
    let label = match plugin.trim() {
        "" => "None",
        "filesystem" => "Filesystem",
        "firehose" => "Amazon Kinesis Data Firehose",
        "kinesis" => "Amazon Kinesis Data Streams",
        "lambda" => "AWS Lambda",
        "pubsub" => "Google Cloud Pub/Sub",
        "kafkarest" => "Apache Kafka",
        "stdout" => "Standard output (stdout)",
        other => return other.to_string(),
    };
    label.to_string()
}
