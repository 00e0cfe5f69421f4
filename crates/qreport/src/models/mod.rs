pub mod report;
pub mod report_envelope;

pub use report::{
    CellRef, FetchFailure, FetchFailureKind, GlobalConfig, HOST_DISPLAY_NAME_FIELD,
    HOST_METADATA_FIELDS, LAST_FETCHED_FIELD, LoggingConfig, LoggingMode, QueryMetadata,
    QueryReportRow, RawReportRow, ReportPayload, ResultLoggingConfig, RowColumns, ServerSettings,
    SortDirection, SortOption, payload_json_schema, value_text,
};
pub use report_envelope::{
    REPORT_ENVELOPE_SCHEMA_VERSION, ReportCommandFailure, ReportEnvelope, ReportError,
    ReportWarning,
};
