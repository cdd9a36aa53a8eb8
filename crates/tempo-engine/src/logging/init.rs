use std::sync::Once;

/// Environment variable checked before `RUST_LOG`.
pub const LOG_ENV: &str = "TEMPO_LOG";

/// Logger configuration.
///
/// `env_filter` uses the `env_logger` filter syntax, e.g. `"info"` or
/// `"tempo::startup=info,wgpu=warn"`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

/// Picks the filter string: explicit config, then `TEMPO_LOG`, then
/// `RUST_LOG`. `None` means "use the built-in default".
pub fn resolve_filter(
    config: &LoggingConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    config
        .env_filter
        .clone()
        .or_else(|| lookup(LOG_ENV))
        .or_else(|| lookup("RUST_LOG"))
        .filter(|f| !f.trim().is_empty())
}

static INIT: Once = Once::new();

/// Installs the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match resolve_filter(&config, |k| std::env::var(k).ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                // wgpu is chatty at info.
                builder
                    .filter_level(log::LevelFilter::Info)
                    .filter_module("wgpu_core", log::LevelFilter::Warn)
                    .filter_module("wgpu_hal", log::LevelFilter::Warn);
            }
        }

        // Startup numbers are milliseconds; match the log stamps.
        builder
            .write_style(config.write_style)
            .format_timestamp_millis();

        if builder.try_init().is_err() {
            // Someone else (a test harness, an embedding host) got there first.
            return;
        }

        log::debug!("logging initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |k: &str| pairs.iter().find(|(n, _)| *n == k).map(|(_, v)| v.to_string())
    }

    #[test]
    fn explicit_filter_wins() {
        let cfg = LoggingConfig { env_filter: Some("debug".into()), ..Default::default() };
        let got = resolve_filter(&cfg, env(&[(LOG_ENV, "warn"), ("RUST_LOG", "error")]));
        assert_eq!(got.as_deref(), Some("debug"));
    }

    #[test]
    fn tempo_log_before_rust_log() {
        let got = resolve_filter(
            &LoggingConfig::default(),
            env(&[(LOG_ENV, "warn"), ("RUST_LOG", "error")]),
        );
        assert_eq!(got.as_deref(), Some("warn"));
    }

    #[test]
    fn rust_log_fallback() {
        let got = resolve_filter(&LoggingConfig::default(), env(&[("RUST_LOG", "error")]));
        assert_eq!(got.as_deref(), Some("error"));
    }

    #[test]
    fn blank_filter_means_default() {
        let got = resolve_filter(&LoggingConfig::default(), env(&[(LOG_ENV, "  ")]));
        assert_eq!(got, None);
        assert_eq!(resolve_filter(&LoggingConfig::default(), env(&[])), None);
    }

    #[test]
    fn init_twice_is_harmless() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig::default());
    }
}
