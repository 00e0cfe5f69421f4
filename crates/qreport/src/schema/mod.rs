use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::{
    CellRef, HOST_DISPLAY_NAME_FIELD, HOST_METADATA_FIELDS, LAST_FETCHED_FIELD, QueryReportRow,
};

const LABEL_OVERRIDES: [(&str, &str); 2] = [
    (HOST_DISPLAY_NAME_FIELD, "Host"),
    (LAST_FETCHED_FIELD, "Last fetched"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnHeader {
    pub id: String,
    pub display_label: String,
}

impl ColumnHeader {
    #[must_use]
    pub fn for_field(id: impl Into<String>) -> Self {
        let id = id.into();
        let display_label = display_label(&id);
        Self { id, display_label }
    }

    #[must_use]
    pub fn value<'a>(&self, row: &'a QueryReportRow) -> Option<CellRef<'a>> {
        row.field(&self.id)
    }

    #[must_use]
    pub fn cell_text(&self, row: &QueryReportRow) -> String {
        self.value(row).map(CellRef::display_text).unwrap_or_default()
    }
}

#[must_use]
pub fn derive_headers(rows: &[QueryReportRow]) -> Vec<ColumnHeader> {
    if rows.is_empty() {
        return Vec::new();
    }

    let mut seen = BTreeSet::new();
    let mut headers = Vec::new();
    for field in HOST_METADATA_FIELDS {
        seen.insert(field.to_string());
        headers.push(ColumnHeader::for_field(field));
    }

    for row in rows {
        for field in row.columns.keys() {
            if seen.insert(field.clone()) {
                headers.push(ColumnHeader::for_field(field.as_str()));
            }
        }
    }

    tracing::debug!(
        rows = rows.len(),
        columns = headers.len(),
        "derived report headers"
    );
    headers
}

#[must_use]
pub fn reconcile_headers(
    previous: &[ColumnHeader],
    derived: Vec<ColumnHeader>,
) -> Vec<ColumnHeader> {
    if previous.is_empty() || previous.len() != derived.len() {
        return derived;
    }

    let previous_ids = previous.iter().map(|header| header.id.as_str()).collect::<BTreeSet<_>>();
    let same_field_set = derived
        .iter()
        .all(|header| previous_ids.contains(header.id.as_str()));
    if same_field_set {
        previous.to_vec()
    } else {
        derived
    }
}

#[must_use]
pub fn display_label(field: &str) -> String {
    if let Some((_, label)) = LABEL_OVERRIDES.iter().find(|(name, _)| *name == field) {
        return (*label).to_string();
    }
    humanize_field_name(field)
}

#[must_use]
pub fn humanize_field_name(field: &str) -> String {
    let words = field
        .split(|character: char| character == '_' || character == '-' || character.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>();

    if words.is_empty() {
        field.to_string()
    } else {
        words.join(" ")
    }
}

fn capitalize(word: &str) -> String {
    let mut characters = word.chars();
    match characters.next() {
        Some(first) => first.to_uppercase().chain(characters).collect(),
        None => String::new(),
    }
}
