use qreport::models::{QueryReportRow, SortDirection, SortOption};
use qreport::report::ReportSnapshot;
use qreport::view::{TabularView, filter_rows, paginate, sort_rows};
use serde_json::json;

fn fleet_rows() -> Vec<QueryReportRow> {
    vec![
        QueryReportRow::new("mac-01", "2026-02-05T07:00:03Z")
            .with_column("cpu_brand", json!("Intel(R) Core(TM) i9-9980HK"))
            .with_column("memory_gb", json!(32)),
        QueryReportRow::new("mac-02", "2026-02-05T07:01:03Z")
            .with_column("cpu_brand", json!("Apple M2 Pro"))
            .with_column("memory_gb", json!(16)),
        QueryReportRow::new("win-01", "2026-02-05T07:02:03Z")
            .with_column("cpu_brand", json!("Intel(R) Core(TM) i9-12900K"))
            .with_column("memory_gb", json!(64)),
        QueryReportRow::new("linux-01", "2026-02-05T07:03:03Z")
            .with_column("cpu_brand", json!("AMD Ryzen 9 7950X")),
    ]
}

fn table(query_id: u64, rows: Vec<QueryReportRow>, page_size: usize) -> TabularView {
    TabularView::new(ReportSnapshot::build(query_id, 1, rows, 1_000, &[]), page_size)
}

fn hosts(rows: &[&QueryReportRow]) -> Vec<String> {
    rows.iter()
        .map(|row| row.host_display_name.clone())
        .collect()
}

#[test]
fn filter_matches_substring_case_insensitively() {
    let mut view = table(1, fleet_rows(), 20);

    let lower = hosts(&view.apply_filter("i9"));
    assert_eq!(lower, vec!["mac-01", "win-01"]);

    let upper = hosts(&view.apply_filter("I9"));
    assert_eq!(upper, lower);
    assert_eq!(view.visible_count(), 2);

    let padded = hosts(&view.apply_filter("  i9  "));
    assert_eq!(padded, lower);
}

#[test]
fn empty_filter_returns_every_row() {
    let mut view = table(1, fleet_rows(), 20);
    view.apply_filter("i9");

    assert_eq!(view.apply_filter("").len(), 4);
    assert_eq!(view.visible_count(), 4);
}

#[test]
fn filter_searches_host_metadata_too() {
    let rows = fleet_rows();
    let snapshot = ReportSnapshot::build(1, 1, rows, 1_000, &[]);

    let matched = filter_rows(snapshot.rows(), snapshot.headers(), "LINUX");
    assert_eq!(hosts(&matched), vec!["linux-01"]);
}

#[test]
fn out_of_range_page_clamps_to_last_page() {
    let rows = fleet_rows()[..3].to_vec();
    let first = paginate(&rows, 0, 10);
    let far = paginate(&rows, 100, 10);

    assert_eq!(far.page, 0);
    assert_eq!(far.rows, first.rows);
    assert_eq!(far.rows.len(), 3);

    let mut view = table(1, rows, 10);
    let info = view.set_page(100);
    assert_eq!(info.page, 0);
    assert_eq!(info.page_count, 1);
    assert_eq!(view.page_rows().len(), 3);
}

#[test]
fn pages_window_the_filtered_rows() {
    let rows: Vec<QueryReportRow> = (0..25)
        .map(|index| QueryReportRow::new(format!("host-{index:02}"), "2026-02-05T07:00:03Z"))
        .collect();
    let mut view = table(1, rows, 10);

    let info = view.set_page(2);
    assert_eq!(info.page, 2);
    assert_eq!(info.page_count, 3);
    assert_eq!(hosts(&view.page_rows()), vec!["host-20", "host-21", "host-22", "host-23", "host-24"]);
    assert_eq!(view.exportable_rows().len(), 25);
}

#[test]
fn clamped_page_is_kept_when_refresh_adds_rows() {
    let numbered = |count: usize| -> Vec<QueryReportRow> {
        (0..count)
            .map(|index| QueryReportRow::new(format!("host-{index:02}"), "2026-02-05T07:00:03Z"))
            .collect()
    };
    let mut view = table(1, numbered(5), 2);
    assert_eq!(view.set_page(100).page, 2);

    let previous_headers = view.headers().to_vec();
    view.set_raw_rows(ReportSnapshot::build(1, 2, numbered(25), 1_000, &previous_headers));

    let info = view.page_info();
    assert_eq!(info.page, 2);
    assert_eq!(info.page_count, 13);
    assert_eq!(hosts(&view.page_rows()), vec!["host-04", "host-05"]);
}

#[test]
fn changing_filter_returns_to_first_page() {
    let rows: Vec<QueryReportRow> = (0..25)
        .map(|index| QueryReportRow::new(format!("host-{index:02}"), "2026-02-05T07:00:03Z"))
        .collect();
    let mut view = table(1, rows, 10);
    view.set_page(2);

    view.apply_filter("host-1");
    assert_eq!(view.page_info().page, 0);
    assert_eq!(view.visible_count(), 10);
}

#[test]
fn sort_trails_missing_values_in_both_directions() {
    let mut view = table(1, fleet_rows(), 20);

    let ascending = hosts(&view.apply_sort(Some(SortOption::new("memory_gb", SortDirection::Asc))));
    assert_eq!(ascending, vec!["mac-02", "mac-01", "win-01", "linux-01"]);

    let descending =
        hosts(&view.apply_sort(Some(SortOption::new("memory_gb", SortDirection::Desc))));
    assert_eq!(descending, vec!["win-01", "mac-01", "mac-02", "linux-01"]);
}

#[test]
fn sort_is_stable_for_equal_keys() {
    let rows = vec![
        QueryReportRow::new("first", "t").with_column("region", json!("eu")),
        QueryReportRow::new("second", "t").with_column("region", json!("us")),
        QueryReportRow::new("third", "t").with_column("region", json!("eu")),
    ];
    let refs: Vec<&QueryReportRow> = rows.iter().collect();

    let ordered = sort_rows(&refs, &SortOption::new("region", SortDirection::Asc));
    assert_eq!(hosts(&ordered), vec!["first", "third", "second"]);

    let reversed = sort_rows(&refs, &SortOption::new("region", SortDirection::Desc));
    assert_eq!(hosts(&reversed), vec!["second", "first", "third"]);
}

#[test]
fn host_name_sort_key_orders_by_display_name() {
    let mut view = table(1, fleet_rows(), 20);
    let ordered = hosts(&view.apply_sort(Some(SortOption::new("host_name", SortDirection::Asc))));

    assert_eq!(ordered, vec!["linux-01", "mac-01", "mac-02", "win-01"]);
}

#[test]
fn refetch_of_same_report_keeps_filter_and_sort() {
    let mut view = table(1, fleet_rows(), 20);
    view.apply_filter("intel");
    view.apply_sort(Some(SortOption::new("memory_gb", SortDirection::Desc)));

    let mut refreshed = fleet_rows();
    refreshed.push(
        QueryReportRow::new("win-02", "2026-02-05T08:00:03Z")
            .with_column("cpu_brand", json!("Intel(R) Xeon(R)"))
            .with_column("memory_gb", json!(128)),
    );
    let previous_headers = view.headers().to_vec();
    view.set_raw_rows(ReportSnapshot::build(1, 2, refreshed, 1_000, &previous_headers));

    assert_eq!(view.filter_text(), "intel");
    assert_eq!(hosts(&view.exportable_rows()), vec!["win-02", "win-01", "mac-01"]);

    view.set_raw_rows(ReportSnapshot::build(2, 3, fleet_rows(), 1_000, &[]));
    assert_eq!(view.filter_text(), "");
    assert!(view.sort().is_none());
    assert_eq!(view.visible_count(), 4);
}
