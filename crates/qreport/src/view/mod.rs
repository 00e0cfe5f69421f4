use std::cmp::Ordering;

use serde::Serialize;

use crate::models::{CellRef, HOST_DISPLAY_NAME_FIELD, QueryReportRow, SortDirection, SortOption};
use crate::report::ReportSnapshot;
use crate::schema::ColumnHeader;

pub const DEFAULT_PAGE_SIZE: usize = 20;

// Server-side sort key for the host column.
const HOST_NAME_SORT_KEY: &str = "host_name";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub total_rows: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow<'a, T> {
    pub page: usize,
    pub page_count: usize,
    pub rows: &'a [T],
}

#[derive(Debug, Clone)]
pub struct TabularView {
    snapshot: ReportSnapshot,
    filter_text: String,
    sort: Option<SortOption>,
    page: usize,
    page_size: usize,
    selection: Vec<usize>,
}

impl TabularView {
    #[must_use]
    pub fn new(snapshot: ReportSnapshot, page_size: usize) -> Self {
        let mut view = Self {
            snapshot,
            filter_text: String::new(),
            sort: None,
            page: 0,
            page_size,
            selection: Vec::new(),
        };
        view.recompute_selection();
        view
    }

    pub fn set_raw_rows(&mut self, snapshot: ReportSnapshot) {
        if snapshot.query_id() != self.snapshot.query_id() {
            tracing::debug!(
                from = self.snapshot.query_id(),
                to = snapshot.query_id(),
                "report identity changed; resetting view state"
            );
            self.filter_text.clear();
            self.sort = None;
            self.page = 0;
        }
        self.snapshot = snapshot;
        self.recompute_selection();
    }

    pub fn apply_filter(&mut self, text: &str) -> Vec<&QueryReportRow> {
        if self.filter_text != text {
            self.filter_text = text.to_string();
            self.page = 0;
            self.recompute_selection();
        }
        self.exportable_rows()
    }

    pub fn apply_sort(&mut self, option: Option<SortOption>) -> Vec<&QueryReportRow> {
        if self.sort != option {
            self.sort = option;
            self.recompute_selection();
        }
        self.exportable_rows()
    }

    pub fn set_page(&mut self, page: usize) -> PageInfo {
        self.page = paginate(&self.selection, page, self.page_size).page;
        self.page_info()
    }

    #[must_use]
    pub fn page_rows(&self) -> Vec<&QueryReportRow> {
        let window = paginate(&self.selection, self.page, self.page_size);
        self.resolve(window.rows)
    }

    #[must_use]
    pub fn exportable_rows(&self) -> Vec<&QueryReportRow> {
        self.resolve(&self.selection)
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.selection.len()
    }

    #[must_use]
    pub fn page_info(&self) -> PageInfo {
        let window = paginate(&self.selection, self.page, self.page_size);
        PageInfo {
            page: window.page,
            page_size: self.page_size,
            page_count: window.page_count,
            total_rows: self.selection.len(),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> &ReportSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn headers(&self) -> &[ColumnHeader] {
        self.snapshot.headers()
    }

    #[must_use]
    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    #[must_use]
    pub fn sort(&self) -> Option<&SortOption> {
        self.sort.as_ref()
    }

    fn resolve(&self, indices: &[usize]) -> Vec<&QueryReportRow> {
        let rows = self.snapshot.rows();
        indices.iter().filter_map(|index| rows.get(*index)).collect()
    }

    fn recompute_selection(&mut self) {
        let rows = self.snapshot.rows();
        let headers = self.snapshot.headers();
        let mut selection = (0..rows.len())
            .filter(|index| row_matches_filter(&rows[*index], headers, &self.filter_text))
            .collect::<Vec<_>>();
        if let Some(option) = &self.sort {
            sort_indices(&mut selection, rows, option);
        }
        self.selection = selection;
    }
}

#[must_use]
pub fn filter_rows<'a>(
    rows: &'a [QueryReportRow],
    headers: &[ColumnHeader],
    text: &str,
) -> Vec<&'a QueryReportRow> {
    rows.iter()
        .filter(|row| row_matches_filter(row, headers, text))
        .collect()
}

#[must_use]
pub fn sort_rows<'a>(
    rows: &[&'a QueryReportRow],
    option: &SortOption,
) -> Vec<&'a QueryReportRow> {
    let mut ordered = rows.to_vec();
    let key = canonical_sort_key(&option.key);
    ordered.sort_by(|left, right| compare_cells(left.field(key), right.field(key), option.direction));
    ordered
}

#[must_use]
pub fn paginate<T>(rows: &[T], page: usize, page_size: usize) -> PageWindow<'_, T> {
    if page_size == 0 {
        return PageWindow {
            page: 0,
            page_count: 1,
            rows,
        };
    }

    let page_count = rows.len().div_ceil(page_size).max(1);
    let page = page.min(page_count - 1);
    let start = page.saturating_mul(page_size).min(rows.len());
    let end = start.saturating_add(page_size).min(rows.len());
    PageWindow {
        page,
        page_count,
        rows: &rows[start..end],
    }
}

fn row_matches_filter(row: &QueryReportRow, headers: &[ColumnHeader], text: &str) -> bool {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    headers
        .iter()
        .any(|header| header.cell_text(row).to_lowercase().contains(&needle))
}

fn sort_indices(selection: &mut [usize], rows: &[QueryReportRow], option: &SortOption) {
    let key = canonical_sort_key(&option.key);
    selection.sort_by(|left, right| {
        compare_cells(
            rows[*left].field(key),
            rows[*right].field(key),
            option.direction,
        )
    });
}

fn canonical_sort_key(key: &str) -> &str {
    if key == HOST_NAME_SORT_KEY {
        HOST_DISPLAY_NAME_FIELD
    } else {
        key
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Number(f64),
    Text(String),
    Missing,
}

impl SortKey {
    fn from_cell(cell: Option<CellRef<'_>>) -> Self {
        let Some(cell) = cell else {
            return Self::Missing;
        };
        if cell.is_blank() {
            return Self::Missing;
        }
        if let Some(number) = cell.as_number() {
            return Self::Number(number);
        }
        match cell {
            CellRef::Value(serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Self::Missing
            }
            _ => Self::Text(cell.display_text()),
        }
    }
}

// Missing values trail in both directions.
fn compare_cells(
    left: Option<CellRef<'_>>,
    right: Option<CellRef<'_>>,
    direction: SortDirection,
) -> Ordering {
    let left = SortKey::from_cell(left);
    let right = SortKey::from_cell(right);
    let ordering = match (&left, &right) {
        (SortKey::Missing, SortKey::Missing) => return Ordering::Equal,
        (SortKey::Missing, _) => return Ordering::Greater,
        (_, SortKey::Missing) => return Ordering::Less,
        (SortKey::Number(left), SortKey::Number(right)) => left.total_cmp(right),
        (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
        (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
        (SortKey::Text(left), SortKey::Text(right)) => left
            .to_lowercase()
            .cmp(&right.to_lowercase())
            .then_with(|| left.cmp(right)),
    };

    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::{TabularView, paginate, sort_rows};
    use crate::models::{QueryReportRow, SortDirection, SortOption};
    use crate::report::ReportSnapshot;
    use serde_json::json;

    fn snapshot(query_id: u64) -> ReportSnapshot {
        let rows = vec![
            QueryReportRow::new("alpha", "t").with_column("cores", json!("8")),
            QueryReportRow::new("bravo", "t").with_column("cores", json!(16)),
            QueryReportRow::new("charlie", "t"),
            QueryReportRow::new("delta", "t").with_column("cores", json!("2")),
        ];
        ReportSnapshot::build(query_id, 1, rows, 1_000, &[])
    }

    fn names(rows: &[&QueryReportRow]) -> Vec<String> {
        rows.iter().map(|row| row.host_display_name.clone()).collect()
    }

    #[test]
    fn numeric_sort_keeps_missing_last_in_both_directions() {
        let mut view = TabularView::new(snapshot(1), 10);
        let ascending = view.apply_sort(Some(SortOption::new("cores", SortDirection::Asc)));
        assert_eq!(names(&ascending), vec!["delta", "alpha", "bravo", "charlie"]);

        let descending = view.apply_sort(Some(SortOption::new("cores", SortDirection::Desc)));
        assert_eq!(names(&descending), vec!["bravo", "alpha", "delta", "charlie"]);
    }

    #[test]
    fn host_name_sort_key_maps_to_host_column() {
        let snapshot = snapshot(1);
        let rows = snapshot.rows().iter().collect::<Vec<_>>();
        let sorted = sort_rows(&rows, &SortOption::new("host_name", SortDirection::Desc));
        assert_eq!(names(&sorted), vec!["delta", "charlie", "bravo", "alpha"]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let rows = vec![
            QueryReportRow::new("first", "t").with_column("zone", json!("a")),
            QueryReportRow::new("second", "t").with_column("zone", json!("A")),
            QueryReportRow::new("third", "t").with_column("zone", json!("a")),
        ];
        let refs = rows.iter().collect::<Vec<_>>();
        let sorted = sort_rows(&refs, &SortOption::new("zone", SortDirection::Asc));
        assert_eq!(names(&sorted), vec!["second", "first", "third"]);
    }

    #[test]
    fn filter_change_resets_page() {
        let mut view = TabularView::new(snapshot(1), 1);
        assert_eq!(view.set_page(3).page, 3);
        view.apply_filter("a");
        assert_eq!(view.page_info().page, 0);
    }

    #[test]
    fn same_identity_refresh_keeps_filter_and_sort() {
        let mut view = TabularView::new(snapshot(1), 10);
        view.apply_filter("alp");
        view.apply_sort(Some(SortOption::new("cores", SortDirection::Desc)));
        view.set_raw_rows(snapshot(1));
        assert_eq!(view.filter_text(), "alp");
        assert!(view.sort().is_some());
        assert_eq!(view.visible_count(), 1);
    }

    #[test]
    fn identity_change_resets_filter_sort_and_page() {
        let mut view = TabularView::new(snapshot(1), 1);
        view.apply_filter("a");
        view.apply_sort(Some(SortOption::new("cores", SortDirection::Asc)));
        view.set_page(2);
        view.set_raw_rows(snapshot(2));
        assert_eq!(view.filter_text(), "");
        assert!(view.sort().is_none());
        assert_eq!(view.page_info().page, 0);
        assert_eq!(view.visible_count(), 4);
    }

    #[test]
    fn pagination_clamps_and_handles_empty_sets() {
        let rows = [1, 2, 3, 4, 5];
        let window = paginate(&rows, 9, 2);
        assert_eq!(window.page, 2);
        assert_eq!(window.page_count, 3);
        assert_eq!(window.rows, &[5]);

        let empty: [u8; 0] = [];
        let window = paginate(&empty, 4, 10);
        assert_eq!(window.page, 0);
        assert!(window.rows.is_empty());

        assert_eq!(paginate(&rows, 3, 0).rows.len(), 5);
    }
}
