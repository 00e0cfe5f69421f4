use std::sync::OnceLock;

use anyhow::{Context, Result, anyhow};
use regex::Regex;
use serde::Serialize;

use crate::models::QueryReportRow;
use crate::schema::ColumnHeader;
use crate::utils::time::format_filename_stamp;

pub const EXPORT_FILE_EXTENSION: &str = "csv";
pub const FALLBACK_EXPORT_TITLE: &str = "export";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportFile {
    pub filename: String,
    #[serde(skip)]
    pub content: Vec<u8>,
    pub row_count: usize,
}

pub fn serialize(
    rows: &[&QueryReportRow],
    headers: &[ColumnHeader],
    title: &str,
    at_unix_ms: u64,
) -> Result<ExportFile> {
    let content = encode_csv(rows, headers)?;
    Ok(ExportFile {
        filename: export_filename(title, at_unix_ms),
        content,
        row_count: rows.len(),
    })
}

#[must_use]
pub fn export_filename(title: &str, at_unix_ms: u64) -> String {
    format!(
        "{} ({}).{EXPORT_FILE_EXTENSION}",
        sanitize_filename_component(title),
        format_filename_stamp(at_unix_ms)
    )
}

#[must_use]
pub fn sanitize_filename_component(raw: &str) -> String {
    let replaced = unsafe_filename_characters_regex().replace_all(raw, "_");
    let collapsed = repeated_whitespace_regex().replace_all(replaced.trim(), " ");
    let trimmed = collapsed.trim_matches('.').trim();
    if trimmed.is_empty() {
        FALLBACK_EXPORT_TITLE.to_string()
    } else {
        trimmed.to_string()
    }
}

fn unsafe_filename_characters_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r#"[\p{Cc}/\\:*?"<>|]"#)
            .expect("filename sanitizer regex should compile")
    })
}

fn repeated_whitespace_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex should compile"))
}

pub fn encode_csv(rows: &[&QueryReportRow], headers: &[ColumnHeader]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer
        .write_record(headers.iter().map(|header| header.display_label.as_str()))
        .context("failed to write csv header record")?;
    for row in rows {
        writer
            .write_record(headers.iter().map(|header| header.cell_text(row)))
            .context("failed to write csv data record")?;
    }

    writer
        .into_inner()
        .map_err(|error| anyhow!("failed to flush csv export: {}", error.error()))
}
