pub mod details;
pub mod service;
pub mod snapshot;
pub mod source;

use serde::Serialize;

use crate::availability::{
    AvailabilityResolution, EmptyReportExplanation, EmptyStateInput, explain_empty_report, resolve,
};
use crate::clipping::{ResultCount, clipped_banner, is_clipped, result_count};
use crate::config::ReportSettings;
use crate::export::{ExportFile, serialize};
use crate::models::{FetchFailure, GlobalConfig, QueryMetadata, ReportPayload, SortOption};
use crate::schema::ColumnHeader;
use crate::utils::time::unix_timestamp_millis;
use crate::view::{PageInfo, TabularView};

pub use details::{AutomationsStatus, LiveQueryAffordance, QueryDetails, log_destination_label};
pub use service::ReportService;
pub use snapshot::ReportSnapshot;
pub use source::{DirectorySource, ReportSource};

pub const DATA_ERROR_MESSAGE: &str = "Something's gone wrong. Refresh the page or try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub query_id: u64,
    pub generation: u64,
    pub sort: Vec<SortOption>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied { rows: usize },
    RetainedClipped,
    Stale,
    Failed(FetchFailure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Loading,
    Ready,
    Empty,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataError {
    pub message: String,
    pub cause: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub query_id: u64,
    pub status: ReportStatus,
    pub headers: Vec<ColumnHeader>,
    pub visible_rows: Vec<Vec<String>>,
    pub result_count: ResultCount,
    pub is_clipped: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub clipped_banner: Option<String>,

    pub page: PageInfo,
    pub filter_text: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOption>,

    pub availability: AvailabilityResolution,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_state: Option<EmptyReportExplanation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<DataError>,

    pub details: QueryDetails,
}

#[derive(Debug, Clone)]
pub struct ReportSession {
    query_id: u64,
    settings: ReportSettings,
    view: TabularView,
    metadata: Option<QueryMetadata>,
    config: Option<GlobalConfig>,
    live_probe_ok: bool,
    user_forced_override: bool,
    last_error: Option<FetchFailure>,
    latest_generation: u64,
    loaded: bool,
}

impl ReportSession {
    #[must_use]
    pub fn new(query_id: u64, settings: ReportSettings) -> Self {
        let view = TabularView::new(
            ReportSnapshot::empty(query_id, settings.result_count_limit),
            settings.page_size,
        );
        Self {
            query_id,
            settings,
            view,
            metadata: None,
            config: None,
            live_probe_ok: false,
            user_forced_override: false,
            last_error: None,
            latest_generation: 0,
            loaded: false,
        }
    }

    #[must_use]
    pub fn query_id(&self) -> u64 {
        self.query_id
    }

    #[must_use]
    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    #[must_use]
    pub fn table(&self) -> &TabularView {
        &self.view
    }

    pub fn table_mut(&mut self) -> &mut TabularView {
        &mut self.view
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&FetchFailure> {
        self.last_error.as_ref()
    }

    pub fn begin_fetch(&mut self, sort: Vec<SortOption>) -> FetchTicket {
        self.latest_generation += 1;
        tracing::debug!(
            query_id = self.query_id,
            generation = self.latest_generation,
            "report fetch started"
        );
        FetchTicket {
            query_id: self.query_id,
            generation: self.latest_generation,
            sort,
        }
    }

    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<ReportPayload, FetchFailure>,
    ) -> FetchOutcome {
        if ticket.query_id != self.query_id || ticket.generation != self.latest_generation {
            tracing::warn!(
                query_id = ticket.query_id,
                generation = ticket.generation,
                latest_generation = self.latest_generation,
                "discarding superseded report fetch"
            );
            return FetchOutcome::Stale;
        }

        let payload = match result {
            Ok(payload) => payload,
            Err(failure) => {
                tracing::warn!(query_id = self.query_id, error = %failure, "report fetch failed");
                self.last_error = Some(failure.clone());
                return FetchOutcome::Failed(failure);
            }
        };

        self.last_error = None;
        self.loaded = true;
        let current = self.view.snapshot();
        let limit = self.settings.result_count_limit;
        if current.is_clipped() && !is_clipped(payload.results.len(), limit) {
            tracing::warn!(
                query_id = self.query_id,
                retained_rows = current.rows().len(),
                fetched_rows = payload.results.len(),
                "unclipped fetch for a clipped report; keeping rows until an explicit reset"
            );
            return FetchOutcome::RetainedClipped;
        }

        let snapshot = ReportSnapshot::from_payload(
            self.query_id,
            ticket.generation,
            payload,
            self.settings.result_count_limit,
            current.headers(),
        );
        let rows = snapshot.rows().len();
        self.view.set_raw_rows(snapshot);
        FetchOutcome::Applied { rows }
    }

    pub fn record_details(
        &mut self,
        metadata: QueryMetadata,
        config: GlobalConfig,
        live_probe_ok: bool,
    ) {
        self.metadata = Some(metadata);
        self.config = Some(config);
        self.live_probe_ok = live_probe_ok;
    }

    pub fn record_failure(&mut self, failure: FetchFailure) {
        tracing::warn!(query_id = self.query_id, error = %failure, "report details fetch failed");
        self.last_error = Some(failure);
    }

    pub fn switch_query(&mut self, query_id: u64) {
        if query_id == self.query_id {
            return;
        }
        self.query_id = query_id;
        self.latest_generation += 1;
        self.metadata = None;
        self.config = None;
        self.live_probe_ok = false;
        self.user_forced_override = false;
        self.last_error = None;
        self.loaded = false;
        self.view.set_raw_rows(ReportSnapshot::empty(
            query_id,
            self.settings.result_count_limit,
        ));
    }

    pub fn reset_report(&mut self) {
        tracing::debug!(query_id = self.query_id, "report reset requested");
        self.latest_generation += 1;
        self.view.set_raw_rows(ReportSnapshot::empty(
            self.query_id,
            self.settings.result_count_limit,
        ));
    }

    pub fn force_edit_discard_data(&mut self) {
        self.user_forced_override = true;
    }

    #[must_use]
    pub fn user_forced_override(&self) -> bool {
        self.user_forced_override
    }

    #[must_use]
    pub fn availability(&self) -> AvailabilityResolution {
        let config = self.config.clone().unwrap_or_default();
        let metadata = self.metadata.clone().unwrap_or_default();
        resolve(
            config.server_settings.query_reports_disabled,
            metadata.discard_data,
            &metadata.logging,
            self.user_forced_override,
        )
    }

    #[must_use]
    pub fn view(&self) -> ReportView {
        self.view_at(unix_timestamp_millis())
    }

    #[must_use]
    pub fn view_at(&self, now_unix_ms: u64) -> ReportView {
        let config = self.config.clone().unwrap_or_default();
        let metadata = self.metadata.clone().unwrap_or_default();
        let details = QueryDetails::from_parts(
            self.metadata.as_ref(),
            &config,
            self.live_probe_ok,
        );
        let availability = self.availability();
        let page = self.view.page_info();

        if let Some(failure) = &self.last_error {
            return ReportView {
                query_id: self.query_id,
                status: ReportStatus::Error,
                headers: Vec::new(),
                visible_rows: Vec::new(),
                result_count: result_count(0, false),
                is_clipped: false,
                clipped_banner: None,
                page: PageInfo {
                    page: 0,
                    page_count: 1,
                    total_rows: 0,
                    ..page
                },
                filter_text: self.view.filter_text().to_string(),
                sort: self.view.sort().cloned(),
                availability,
                empty_state: None,
                error: Some(DataError {
                    message: DATA_ERROR_MESSAGE.to_string(),
                    cause: failure.to_string(),
                }),
                details,
            };
        }

        let snapshot = self.view.snapshot();
        let headers = self.view.headers().to_vec();
        let visible_rows = self
            .view
            .page_rows()
            .into_iter()
            .map(|row| headers.iter().map(|header| header.cell_text(row)).collect())
            .collect();
        let is_clipped = snapshot.is_clipped();

        let (status, empty_state) = if !self.loaded {
            (ReportStatus::Loading, None)
        } else if snapshot.is_empty() {
            let explanation = explain_empty_report(&EmptyStateInput {
                interval_seconds: metadata.interval,
                updated_at: metadata.updated_at.as_deref(),
                global_reports_disabled: config.server_settings.query_reports_disabled,
                discard_data: metadata.discard_data,
                logging_mode: &metadata.logging,
                now_unix_ms,
            });
            (ReportStatus::Empty, Some(explanation))
        } else {
            (ReportStatus::Ready, None)
        };

        ReportView {
            query_id: self.query_id,
            status,
            headers,
            visible_rows,
            result_count: result_count(self.view.visible_count(), is_clipped),
            is_clipped,
            clipped_banner: clipped_banner(is_clipped),
            page,
            filter_text: self.view.filter_text().to_string(),
            sort: self.view.sort().cloned(),
            availability,
            empty_state,
            error: None,
            details,
        }
    }

    #[must_use]
    pub fn export_current_view(&self) -> Option<ExportFile> {
        self.export_current_view_at(unix_timestamp_millis())
    }

    #[must_use]
    pub fn export_current_view_at(&self, now_unix_ms: u64) -> Option<ExportFile> {
        if self.last_error.is_some() {
            tracing::debug!(query_id = self.query_id, "export skipped: report is in error state");
            return None;
        }

        let rows = self.view.exportable_rows();
        if rows.is_empty() {
            tracing::debug!(query_id = self.query_id, "export skipped: no rows selected");
            return None;
        }

        let name = self
            .metadata
            .as_ref()
            .map(|metadata| metadata.name.trim())
            .filter(|name| !name.is_empty())
            .unwrap_or(self.settings.export_title_fallback.as_str());
        let title = format!("{name} - Query Report");

        match serialize(&rows, self.view.headers(), &title, now_unix_ms) {
            Ok(file) => Some(file),
            Err(error) => {
                tracing::warn!(query_id = self.query_id, error = %error, "report export failed");
                None
            }
        }
    }
}
