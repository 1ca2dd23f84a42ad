//! Global logger setup. Everything else logs through the `log` facade.

/// Used when neither the caller nor `RUST_LOG` names a filter. GPU driver
/// crates are chatty at `info`.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// `filter` uses `env_logger` syntax, e.g. `"debug"` or
/// `"cardflip_carousel=trace,warn"`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: Option<String>,
    pub style: env_logger::WriteStyle,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            style: env_logger::WriteStyle::Auto,
            timestamps: true,
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self { filter: Some(filter.into()), ..Self::default() }
    }

    /// Explicit filter first, then `RUST_LOG`, then [`DEFAULT_FILTER`].
    fn resolve_filter(&self, env: Option<String>) -> String {
        self.filter
            .clone()
            .or(env)
            .unwrap_or_else(|| DEFAULT_FILTER.to_string())
    }
}

/// Installs the global logger. Returns `false` if one was already installed,
/// which makes repeated calls harmless.
pub fn init_logging(config: LoggingConfig) -> bool {
    let filter = config.resolve_filter(std::env::var("RUST_LOG").ok());

    let mut builder = env_logger::Builder::new();
    builder.parse_filters(&filter).write_style(config.style);
    if config.timestamps {
        builder.format_timestamp_millis();
    } else {
        builder.format_timestamp(None);
    }

    let installed = builder.try_init().is_ok();
    if installed {
        log::debug!("logging with filter {filter:?}");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_precedence() {
        let explicit = LoggingConfig::with_filter("debug");
        assert_eq!(explicit.resolve_filter(Some("trace".into())), "debug");

        let plain = LoggingConfig::default();
        assert_eq!(plain.resolve_filter(Some("trace".into())), "trace");
        assert_eq!(plain.resolve_filter(None), DEFAULT_FILTER);
    }

    #[test]
    fn second_init_is_a_no_op() {
        init_logging(LoggingConfig::default());
        assert!(!init_logging(LoggingConfig::with_filter("trace")));
    }
}
