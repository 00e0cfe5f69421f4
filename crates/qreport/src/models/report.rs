use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const HOST_DISPLAY_NAME_FIELD: &str = "host_display_name";
pub const LAST_FETCHED_FIELD: &str = "last_fetched";
pub const HOST_METADATA_FIELDS: [&str; 2] = [HOST_DISPLAY_NAME_FIELD, LAST_FETCHED_FIELD];

pub type RowColumns = BTreeMap<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_id: Option<u64>,

    #[serde(default)]
    pub results: Vec<RawReportRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawReportRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_fetched: Option<String>,

    #[serde(default)]
    pub columns: RowColumns,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryReportRow {
    pub host_id: Option<u64>,
    pub host_display_name: String,
    pub last_fetched: String,
    pub columns: RowColumns,
}

impl QueryReportRow {
    #[must_use]
    pub fn new(host_display_name: impl Into<String>, last_fetched: impl Into<String>) -> Self {
        Self {
            host_id: None,
            host_display_name: host_display_name.into(),
            last_fetched: last_fetched.into(),
            columns: RowColumns::new(),
        }
    }

    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, value: Value) -> Self {
        self.columns.insert(name.into(), value);
        self
    }

    pub fn from_raw(raw: RawReportRow) -> Self {
        if raw.host_name.is_none() || raw.last_fetched.is_none() {
            tracing::warn!(
                host_id = ?raw.host_id,
                missing_host_name = raw.host_name.is_none(),
                missing_last_fetched = raw.last_fetched.is_none(),
                "report row is missing host metadata; substituting empty values"
            );
        }

        Self {
            host_id: raw.host_id,
            host_display_name: raw.host_name.unwrap_or_default(),
            last_fetched: raw.last_fetched.unwrap_or_default(),
            columns: raw.columns,
        }
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<CellRef<'_>> {
        if let Some(value) = self.columns.get(name) {
            return Some(CellRef::Value(value));
        }
        match name {
            HOST_DISPLAY_NAME_FIELD => Some(CellRef::Text(&self.host_display_name)),
            LAST_FETCHED_FIELD => Some(CellRef::Text(&self.last_fetched)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellRef<'a> {
    Text(&'a str),
    Value(&'a Value),
}

impl CellRef<'_> {
    #[must_use]
    pub fn display_text(self) -> String {
        match self {
            Self::Text(text) => text.to_string(),
            Self::Value(value) => value_text(value),
        }
    }

    #[must_use]
    pub fn as_number(self) -> Option<f64> {
        match self {
            Self::Text(text) => parse_number(text),
            Self::Value(Value::Number(number)) => number.as_f64(),
            Self::Value(Value::String(text)) => parse_number(text),
            Self::Value(_) => None,
        }
    }

    #[must_use]
    pub fn is_blank(self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Value(Value::Null) => true,
            Self::Value(Value::String(text)) => text.is_empty(),
            Self::Value(_) => false,
        }
    }
}

#[must_use]
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|number| number.is_finite())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct SortOption {
    pub key: String,
    pub direction: SortDirection,
}

impl SortOption {
    #[must_use]
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoggingMode {
    Snapshot,
    Differential,
    DifferentialIgnoreRemovals,
    #[default]
    #[serde(other)]
    Unknown,
}

impl LoggingMode {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "snapshot" => Self::Snapshot,
            "differential" => Self::Differential,
            "differential_ignore_removals" => Self::DifferentialIgnoreRemovals,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn is_snapshot(&self) -> bool {
        matches!(self, Self::Snapshot)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Snapshot => "snapshot",
            Self::Differential => "differential",
            Self::DifferentialIgnoreRemovals => "differential_ignore_removals",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QueryMetadata {
    pub id: u64,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub query: String,

    #[serde(default)]
    pub interval: u64,

    #[serde(default)]
    pub logging: LoggingMode,

    #[serde(default)]
    pub discard_data: bool,

    #[serde(default)]
    pub automations_enabled: bool,

    #[serde(default)]
    pub observer_can_run: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<u64>,

    #[serde(default)]
    pub platform: String,

    #[serde(default)]
    pub min_osquery_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ServerSettings {
    #[serde(default = "restrictive_default")]
    pub query_reports_disabled: bool,

    #[serde(default = "restrictive_default")]
    pub live_query_disabled: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            query_reports_disabled: true,
            live_query_disabled: true,
        }
    }
}

const fn restrictive_default() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResultLoggingConfig {
    #[serde(default)]
    pub plugin: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LoggingConfig {
    #[serde(default)]
    pub result: ResultLoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GlobalConfig {
    #[serde(default)]
    pub server_settings: ServerSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchFailureKind {
    Network,
    Unauthorized,
    NotFound,
    Server,
    Decode,
}

impl FetchFailureKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::Server => "server",
            Self::Decode => "decode",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchFailure {
    pub kind: FetchFailureKind,
    pub message: String,
}

impl FetchFailure {
    #[must_use]
    pub fn new(kind: FetchFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl Display for FetchFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} fetch failure: {}", self.kind.as_str(), self.message)
    }
}

impl std::error::Error for FetchFailure {}

#[must_use]
pub fn payload_json_schema() -> Value {
    let schema = schemars::schema_for!(ReportPayload);
    match serde_json::to_value(schema) {
        Ok(value) => value,
        Err(error) => {
            panic!("failed to serialize generated report payload schema: {error}");
        }
    }
}
