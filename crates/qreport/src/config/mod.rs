use std::path::{Component, Path, PathBuf};

use anyhow::{Result, bail};

use crate::clipping::DEFAULT_RESULT_COUNT_LIMIT;
use crate::models::{SortDirection, SortOption};
use crate::view::DEFAULT_PAGE_SIZE;

pub const DEFAULT_SORT_KEY: &str = "host_name";
pub const DEFAULT_EXPORT_TITLE: &str = "Query";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    pub home_dir: PathBuf,
    pub cwd: PathBuf,
    pub out_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSettings {
    pub result_count_limit: usize,
    pub page_size: usize,
    pub default_sort: SortOption,
    pub export_title_fallback: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            result_count_limit: DEFAULT_RESULT_COUNT_LIMIT,
            page_size: DEFAULT_PAGE_SIZE,
            default_sort: SortOption::new(DEFAULT_SORT_KEY, SortDirection::Asc),
            export_title_fallback: DEFAULT_EXPORT_TITLE.to_string(),
        }
    }
}

pub fn resolve_report_settings(
    result_count_limit: Option<usize>,
    page_size: Option<usize>,
) -> Result<ReportSettings> {
    let mut settings = ReportSettings::default();
    if let Some(limit) = result_count_limit {
        if limit == 0 {
            bail!("result_count_limit must be greater than zero");
        }
        settings.result_count_limit = limit;
    }
    if let Some(page_size) = page_size {
        if page_size == 0 {
            bail!("page_size must be greater than zero");
        }
        settings.page_size = page_size;
    }
    Ok(settings)
}

pub fn resolve_runtime_paths(
    home_dir: &Path,
    cwd: &Path,
    out_dir_override: Option<&Path>,
) -> Result<RuntimePaths> {
    if !home_dir.is_absolute() {
        bail!("home_dir must be absolute: {}", home_dir.display());
    }
    if !cwd.is_absolute() {
        bail!("cwd must be absolute: {}", cwd.display());
    }

    let home_dir = normalize_lexical(home_dir);
    let cwd = normalize_lexical(cwd);
    let out_dir = match out_dir_override {
        Some(path) => resolve_user_path(path, &home_dir, &cwd)?,
        None => home_dir.join(".qreport").join("exports"),
    };

    Ok(RuntimePaths {
        home_dir,
        cwd,
        out_dir: normalize_lexical(&out_dir),
    })
}

pub fn resolve_user_path(path: &Path, home_dir: &Path, cwd: &Path) -> Result<PathBuf> {
    let expanded = expand_tilde(path, home_dir)?;
    let resolved = if expanded.is_absolute() {
        expanded
    } else {
        cwd.join(expanded)
    };

    Ok(normalize_lexical(&resolved))
}

fn expand_tilde(path: &Path, home_dir: &Path) -> Result<PathBuf> {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => {
            Ok(components.fold(home_dir.to_path_buf(), |mut expanded, component| {
                expanded.push(component.as_os_str());
                expanded
            }))
        }
        Some(Component::Normal(first))
            if first
                .to_str()
                .is_some_and(|segment| segment.starts_with('~')) =>
        {
            bail!(
                "unsupported home expansion syntax (only `~` and `~/...` are supported): {}",
                path.display()
            )
        }
        _ => Ok(path.to_path_buf()),
    }
}

fn normalize_lexical(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component.as_os_str());
                }
            }
            _ => normalized.push(component.as_os_str()),
        }
    }

    normalized
}
