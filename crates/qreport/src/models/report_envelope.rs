use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::Serialize;
use serde_json::{Value, json};

use crate::utils::time::{format_unix_ms, unix_timestamp_millis};

pub const REPORT_ENVELOPE_SCHEMA_VERSION: &str = "qreport.report-envelope.v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportWarning {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportError {
    pub code: String,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEnvelope {
    pub ok: bool,
    pub command: String,
    pub generated_at_utc: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    pub meta: BTreeMap<String, Value>,
    pub warnings: Vec<ReportWarning>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ReportError>,
}

impl ReportEnvelope {
    #[must_use]
    pub fn ok(command: impl Into<String>, data: Value) -> Self {
        Self::new(command.into(), Some(data), None)
    }

    #[must_use]
    pub fn error(
        command: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let error = ReportError {
            code: code.into(),
            message: message.into(),
            details: None,
        };
        Self::new(command.into(), None, Some(error))
    }

    fn new(command: String, data: Option<Value>, error: Option<ReportError>) -> Self {
        let meta = BTreeMap::from([(
            "schema_version".to_string(),
            json!(REPORT_ENVELOPE_SCHEMA_VERSION),
        )]);
        Self {
            ok: error.is_none(),
            command,
            generated_at_utc: format_unix_ms(unix_timestamp_millis()),
            data,
            meta,
            warnings: Vec::new(),
            error,
        }
    }

    #[must_use]
    pub fn with_meta(mut self, key: impl Into<String>, value: Value) -> Self {
        self.meta.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn with_warning(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.warnings.push(ReportWarning {
            code: code.into(),
            message: message.into(),
        });
        self
    }

    #[must_use]
    pub fn with_error_details(mut self, details: Value) -> Self {
        if let Some(error) = self.error.as_mut() {
            error.details = Some(details);
        }
        self
    }

    #[must_use]
    pub fn into_failure(self) -> anyhow::Error {
        anyhow::Error::new(ReportCommandFailure::new(self))
    }
}

#[derive(Debug, Clone)]
pub struct ReportCommandFailure {
    envelope: ReportEnvelope,
}

impl ReportCommandFailure {
    #[must_use]
    pub fn new(envelope: ReportEnvelope) -> Self {
        Self { envelope }
    }

    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        self.envelope.error.as_ref().map(|error| error.code.as_str())
    }
}

impl Display for ReportCommandFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let encoded = serde_json::to_string(&self.envelope).map_err(|_| std::fmt::Error)?;
        f.write_str(&encoded)
    }
}

impl std::error::Error for ReportCommandFailure {}
