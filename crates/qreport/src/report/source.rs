use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::models::{FetchFailure, FetchFailureKind, GlobalConfig, QueryMetadata, ReportPayload, SortOption};

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const QUERIES_DIR_NAME: &str = "queries";
pub const REPORTS_DIR_NAME: &str = "reports";
pub const LIVE_PROBE_PATH: [&str; 2] = ["health", "live"];

pub trait ReportSource {
    fn fetch_report(&self, query_id: u64, sort: &[SortOption]) -> Result<ReportPayload, FetchFailure>;

    fn fetch_query(&self, query_id: u64) -> Result<QueryMetadata, FetchFailure>;

    fn fetch_config(&self) -> Result<GlobalConfig, FetchFailure>;

    fn live_query_available(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn report_path(&self, query_id: u64) -> PathBuf {
        self.root
            .join(REPORTS_DIR_NAME)
            .join(format!("{query_id}.json"))
    }

    #[must_use]
    pub fn query_path(&self, query_id: u64) -> PathBuf {
        self.root
            .join(QUERIES_DIR_NAME)
            .join(format!("{query_id}.json"))
    }

    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    #[must_use]
    pub fn live_probe_path(&self) -> PathBuf {
        LIVE_PROBE_PATH
            .iter()
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }
}

impl ReportSource for DirectorySource {
    fn fetch_report(&self, query_id: u64, sort: &[SortOption]) -> Result<ReportPayload, FetchFailure> {
        tracing::debug!(query_id, sort = ?sort, "fetching report from directory source");
        read_json(&self.report_path(query_id))
    }

    fn fetch_query(&self, query_id: u64) -> Result<QueryMetadata, FetchFailure> {
        read_json(&self.query_path(query_id))
    }

    fn fetch_config(&self) -> Result<GlobalConfig, FetchFailure> {
        read_json(&self.config_path())
    }

    fn live_query_available(&self) -> bool {
        std::fs::read_to_string(self.live_probe_path())
            .map(|contents| contents.trim().eq_ignore_ascii_case("ok"))
            .unwrap_or(false)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, FetchFailure> {
    let bytes = std::fs::read(path).map_err(|error| {
        let kind = match error.kind() {
            std::io::ErrorKind::NotFound => FetchFailureKind::NotFound,
            std::io::ErrorKind::PermissionDenied => FetchFailureKind::Unauthorized,
            _ => FetchFailureKind::Network,
        };
        FetchFailure::new(kind, format!("failed to read {}: {error}", path.display()))
    })?;

    serde_json::from_slice(&bytes).map_err(|error| {
        FetchFailure::new(
            FetchFailureKind::Decode,
            format!("failed to decode {}: {error}", path.display()),
        )
    })
}
