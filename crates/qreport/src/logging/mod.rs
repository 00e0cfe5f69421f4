use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

pub const LOG_ENV_VAR: &str = "QREPORT_LOG";
pub const DEFAULT_LOG_DIRECTIVE: &str = "warn";

pub fn init_logging() {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time()
        .compact();

    let installed = tracing_subscriber::registry()
        .with(build_env_filter(std::env::var(LOG_ENV_VAR).ok().as_deref()))
        .with(fmt_layer)
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[must_use]
pub fn build_env_filter(directives: Option<&str>) -> EnvFilter {
    if let Some(directives) = directives
        && let Ok(filter) = EnvFilter::try_new(directives)
    {
        return filter;
    }

    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    EnvFilter::new(DEFAULT_LOG_DIRECTIVE)
}
