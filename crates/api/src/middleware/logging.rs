//! Logging initialization and configuration.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};

use crate::config::LoggingConfig;

/// Initializes the logging subsystem based on configuration.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if uses_json(&config.format) {
        let json_layer = fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_target(true);
        subscriber.with(json_layer).try_init()
    } else {
        let pretty_layer = fmt::layer()
            .pretty()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true);
        subscriber.with(pretty_layer).try_init()
    }
}

/// Falls back to `info` when the configured directive does not parse.
fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

fn uses_json(format: &str) -> bool {
    !format.eq_ignore_ascii_case("pretty")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_selection() {
        assert!(uses_json("json"));
        assert!(uses_json("JSON"));
        assert!(uses_json("anything-else"));
        assert!(!uses_json("pretty"));
        assert!(!uses_json("Pretty"));
    }

    #[test]
    fn test_level_filter_accepts_directives() {
        let filter = level_filter("grooming_api=debug,domain=trace");
        assert!(filter.to_string().contains("grooming_api=debug"));
    }

    #[test]
    fn test_level_filter_falls_back_on_garbage() {
        assert_eq!(level_filter("grooming_api=loudest").to_string(), "info");
    }
}
