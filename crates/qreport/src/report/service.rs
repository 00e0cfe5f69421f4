use crate::config::ReportSettings;
use crate::export::ExportFile;
use crate::models::{FetchFailure, SortOption};
use crate::view::PageInfo;

use super::source::ReportSource;
use super::{FetchOutcome, ReportSession, ReportView};

#[derive(Debug)]
pub struct ReportService<S> {
    source: S,
    settings: ReportSettings,
    session: Option<ReportSession>,
}

impl<S: ReportSource> ReportService<S> {
    #[must_use]
    pub fn new(source: S, settings: ReportSettings) -> Self {
        Self {
            source,
            settings,
            session: None,
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&ReportSession> {
        self.session.as_ref()
    }

    pub fn get_report_view(
        &mut self,
        query_id: u64,
        sort: SortOption,
    ) -> Result<ReportView, FetchFailure> {
        let session = session_for(&mut self.session, &self.settings, query_id);
        refresh(&self.source, session, vec![sort])?;
        Ok(session.view())
    }

    #[must_use]
    pub fn current_view(&self) -> Option<ReportView> {
        self.session.as_ref().map(ReportSession::view)
    }

    #[must_use]
    pub fn export_current_view(&self) -> Option<ExportFile> {
        self.session
            .as_ref()
            .and_then(ReportSession::export_current_view)
    }

    pub fn set_filter(&mut self, text: &str) -> usize {
        self.session
            .as_mut()
            .map_or(0, |session| session.table_mut().apply_filter(text).len())
    }

    pub fn set_sort(&mut self, option: Option<SortOption>) {
        if let Some(session) = self.session.as_mut() {
            session.table_mut().apply_sort(option);
        }
    }

    pub fn set_page(&mut self, page: usize) -> Option<PageInfo> {
        self.session
            .as_mut()
            .map(|session| session.table_mut().set_page(page))
    }

    pub fn force_edit_discard_data(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.force_edit_discard_data();
        }
    }

    pub fn reset_report(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.reset_report();
        }
    }
}

fn session_for<'a>(
    slot: &'a mut Option<ReportSession>,
    settings: &ReportSettings,
    query_id: u64,
) -> &'a mut ReportSession {
    let session = slot.get_or_insert_with(|| ReportSession::new(query_id, settings.clone()));
    session.switch_query(query_id);
    session
}

fn refresh<S: ReportSource>(
    source: &S,
    session: &mut ReportSession,
    sort: Vec<SortOption>,
) -> Result<(), FetchFailure> {
    let query_id = session.query_id();
    let details = source
        .fetch_config()
        .and_then(|config| source.fetch_query(query_id).map(|metadata| (metadata, config)));
    match details {
        Ok((metadata, config)) => {
            session.record_details(metadata, config, source.live_query_available());
        }
        Err(failure) => {
            session.record_failure(failure.clone());
            return Err(failure);
        }
    }

    let ticket = session.begin_fetch(sort);
    let result = source.fetch_report(query_id, &ticket.sort);
    match session.complete_fetch(&ticket, result) {
        FetchOutcome::Failed(failure) => Err(failure),
        FetchOutcome::Applied { .. } | FetchOutcome::RetainedClipped | FetchOutcome::Stale => {
            Ok(())
        }
    }
}
