use serde::Serialize;

use crate::clipping::is_clipped;
use crate::models::{QueryReportRow, ReportPayload};
use crate::schema::{ColumnHeader, derive_headers, reconcile_headers};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSnapshot {
    query_id: u64,
    generation: u64,
    rows: Vec<QueryReportRow>,
    headers: Vec<ColumnHeader>,
    is_clipped: bool,
    result_count_limit: usize,
}

impl ReportSnapshot {
    #[must_use]
    pub fn empty(query_id: u64, result_count_limit: usize) -> Self {
        Self::build(query_id, 0, Vec::new(), result_count_limit, &[])
    }

    #[must_use]
    pub fn build(
        query_id: u64,
        generation: u64,
        rows: Vec<QueryReportRow>,
        result_count_limit: usize,
        previous_headers: &[ColumnHeader],
    ) -> Self {
        let headers = reconcile_headers(previous_headers, derive_headers(&rows));
        let is_clipped = is_clipped(rows.len(), result_count_limit);
        Self {
            query_id,
            generation,
            rows,
            headers,
            is_clipped,
            result_count_limit,
        }
    }

    #[must_use]
    pub fn from_payload(
        query_id: u64,
        generation: u64,
        payload: ReportPayload,
        result_count_limit: usize,
        previous_headers: &[ColumnHeader],
    ) -> Self {
        if let Some(payload_query_id) = payload.query_id
            && payload_query_id != query_id
        {
            tracing::warn!(
                query_id,
                payload_query_id,
                "report payload names a different query id"
            );
        }

        let rows = payload
            .results
            .into_iter()
            .map(QueryReportRow::from_raw)
            .collect();
        Self::build(
            query_id,
            generation,
            rows,
            result_count_limit,
            previous_headers,
        )
    }

    #[must_use]
    pub fn query_id(&self) -> u64 {
        self.query_id
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn rows(&self) -> &[QueryReportRow] {
        &self.rows
    }

    #[must_use]
    pub fn headers(&self) -> &[ColumnHeader] {
        &self.headers
    }

    #[must_use]
    pub fn is_clipped(&self) -> bool {
        self.is_clipped
    }

    #[must_use]
    pub fn result_count_limit(&self) -> usize {
        self.result_count_limit
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
