use std::sync::Once;

use log::LevelFilter;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "pixelgrid_engine=debug").
///
/// `modules` are applied after the filter; a shell can keep
/// per-frame modules such as `pixelgrid_engine::driver` quieter than the rest.
///
/// `write_style` controls ANSI coloring behavior.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub modules: Vec<(String, LevelFilter)>,
    pub write_style: env_logger::WriteStyle,
    /// Millisecond timestamps.
    pub millis: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            modules: Vec::new(),
            write_style: env_logger::WriteStyle::Auto,
            millis: true,
        }
    }
}

impl LoggingConfig {
    /// Config with an explicit filter, ignoring `RUST_LOG`.
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            env_filter: Some(filter.into()),
            ..Self::default()
        }
    }

    /// Overrides the level of one module path.
    pub fn with_module(mut self, module: impl Into<String>, level: LevelFilter) -> Self {
        self.modules.push((module.into(), level));
        self
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Filter precedence: `config.env_filter`, then `RUST_LOG`, then `info`.
/// Subsequent calls are ignored, as is a logger installed by someone else.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(LevelFilter::Info);
        }

        for (module, level) in &config.modules {
            builder.filter_module(module, *level);
        }
        if config.millis {
            builder.format_timestamp_millis();
        }
        builder.write_style(config.write_style);

        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_logging(LoggingConfig::with_filter("warn").with_module("pixelgrid_engine::driver", LevelFilter::Error));
        init_logging(LoggingConfig::default());
        log::warn!("logging still works");
    }
}
