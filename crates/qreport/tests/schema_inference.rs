use std::collections::BTreeSet;

use proptest::prelude::*;
use qreport::models::QueryReportRow;
use qreport::schema::{ColumnHeader, derive_headers, reconcile_headers};
use serde_json::json;

fn row_with_fields(host: &str, fields: &[&str]) -> QueryReportRow {
    fields.iter().fold(
        QueryReportRow::new(host, "2026-02-05T07:00:03Z"),
        |row, field| row.with_column(*field, json!("value")),
    )
}

fn header_ids(headers: &[ColumnHeader]) -> Vec<&str> {
    headers.iter().map(|header| header.id.as_str()).collect()
}

#[test]
fn metadata_leads_then_first_seen_order() {
    let rows = vec![
        row_with_fields("web-01", &["uptime"]),
        row_with_fields("web-02", &["cpu_brand", "uptime"]),
        row_with_fields("web-03", &["region"]),
    ];

    let headers = derive_headers(&rows);
    assert_eq!(
        header_ids(&headers),
        vec![
            "host_display_name",
            "last_fetched",
            "uptime",
            "cpu_brand",
            "region"
        ]
    );
    let labels: Vec<&str> = headers
        .iter()
        .map(|header| header.display_label.as_str())
        .collect();
    assert_eq!(labels, vec!["Host", "Last fetched", "Uptime", "Cpu Brand", "Region"]);
}

#[test]
fn empty_rows_yield_no_headers() {
    assert!(derive_headers(&[]).is_empty());
}

#[test]
fn rows_missing_a_column_still_render_empty_cells() {
    let rows = vec![
        row_with_fields("web-01", &["cpu_brand"]),
        row_with_fields("web-02", &["cpu_brand", "region"]),
    ];
    let headers = derive_headers(&rows);
    let region = headers
        .iter()
        .find(|header| header.id == "region")
        .expect("region header should exist");

    assert_eq!(region.cell_text(&rows[0]), "");
    assert!(region.value(&rows[0]).is_none());
}

#[test]
fn reconcile_keeps_previous_order_for_same_field_set() {
    let previous = derive_headers(&[row_with_fields("a", &["zeta", "alpha"])]);
    let derived = vec![
        ColumnHeader::for_field("host_display_name"),
        ColumnHeader::for_field("last_fetched"),
        ColumnHeader::for_field("zeta"),
        ColumnHeader::for_field("alpha"),
    ];
    let reordered = vec![
        derived[0].clone(),
        derived[1].clone(),
        derived[3].clone(),
        derived[2].clone(),
    ];

    assert_eq!(reconcile_headers(&previous, reordered), previous);

    let widened = derive_headers(&[row_with_fields("a", &["zeta", "alpha", "beta"])]);
    assert_eq!(reconcile_headers(&previous, widened.clone()), widened);
}

fn field_name() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "cpu_brand",
        "region",
        "uptime",
        "hardware_model",
        "os_version",
        "disk_free",
    ])
    .prop_map(str::to_string)
}

fn rows_strategy() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(field_name(), 0..5), 1..12)
}

fn build_rows(field_sets: &[Vec<String>]) -> Vec<QueryReportRow> {
    field_sets
        .iter()
        .enumerate()
        .map(|(index, fields)| {
            fields.iter().fold(
                QueryReportRow::new(format!("host-{index}"), "2026-02-05T07:00:03Z"),
                |row, field| row.with_column(field.as_str(), json!(index)),
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn header_field_set_is_union_of_row_keys(field_sets in rows_strategy()) {
        let rows = build_rows(&field_sets);
        let headers = derive_headers(&rows);

        prop_assert_eq!(headers[0].id.as_str(), "host_display_name");
        prop_assert_eq!(headers[1].id.as_str(), "last_fetched");

        let mut expected: BTreeSet<String> = field_sets.iter().flatten().cloned().collect();
        expected.insert("host_display_name".to_string());
        expected.insert("last_fetched".to_string());
        let actual: BTreeSet<String> = headers.iter().map(|header| header.id.clone()).collect();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(headers.len(), rows.iter().flat_map(|row| row.columns.keys()).collect::<BTreeSet<_>>().len() + 2);
    }

    #[test]
    fn header_field_set_is_shuffle_invariant(field_sets in rows_strategy(), rotation in 0_usize..12) {
        let rows = build_rows(&field_sets);
        let mut shuffled = rows.clone();
        let by = rotation % shuffled.len();
        shuffled.rotate_left(by);
        shuffled.reverse();

        let original: BTreeSet<String> = derive_headers(&rows).into_iter().map(|header| header.id).collect();
        let permuted: BTreeSet<String> = derive_headers(&shuffled).into_iter().map(|header| header.id).collect();
        prop_assert_eq!(original, permuted);
    }

    #[test]
    fn derivation_is_deterministic_for_fixed_order(field_sets in rows_strategy()) {
        let rows = build_rows(&field_sets);
        prop_assert_eq!(derive_headers(&rows), derive_headers(&rows));
    }
}
