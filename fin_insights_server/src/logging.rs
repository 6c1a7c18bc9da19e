//! Log filter selection for the binary.

use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset or blank.
pub const DEFAULT_LOG_DIRECTIVES: &str = "fin_insights=info,fin_insights_lib=info";

/// Builds the subscriber filter from the value of `RUST_LOG`. A set value is
/// used as-is; the default directives apply only without one, or when the
/// value does not parse.
pub fn env_filter(rust_log: Option<&str>) -> EnvFilter {
    match rust_log.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|e| {
            eprintln!(
                "ignoring invalid RUST_LOG {:?} ({}), using {}",
                directives, e, DEFAULT_LOG_DIRECTIVES
            );
            EnvFilter::new(DEFAULT_LOG_DIRECTIVES)
        }),
        None => EnvFilter::new(DEFAULT_LOG_DIRECTIVES),
    }
}
