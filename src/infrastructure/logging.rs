//! Logging system configuration and initialization
//!
//! - Console output, optionally JSON formatted
//! - Optional file output through a non-blocking `tracing-appender` writer
//! - `RUST_LOG` overrides the configured level and module filters

use std::sync::Mutex;

use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

pub use crate::infrastructure::config::LoggingConfig;

// Keeps the file writer alive for the life of the process
lazy_static! {
    static ref LOG_GUARDS: Mutex<Vec<WorkerGuard>> = Mutex::new(Vec::new());
}

/// Build the filter: `RUST_LOG` when set, otherwise the configured level with
/// noisy dependencies capped by `module_filters`
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut filter = EnvFilter::try_new(&config.level)
        .map_err(|e| anyhow!("Invalid log level '{}': {}", config.level, e))?;

    // Verbose dependency output only at trace
    if !config.level.eq_ignore_ascii_case("trace") {
        for (module, level) in &config.module_filters {
            let directive = format!("{module}={level}")
                .parse()
                .map_err(|e| anyhow!("Invalid log directive {}={}: {}", module, level, e))?;
            filter = filter.add_directive(directive);
        }
    }

    Ok(filter)
}

/// Initialize logging with custom configuration
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    let env_filter = build_env_filter(config)?;

    let console_layer = config.console_output.then(|| {
        if config.json_format {
            fmt::layer().json().with_target(true).boxed()
        } else {
            fmt::layer().with_target(false).boxed()
        }
    });

    let file_layer = if config.file_output {
        std::fs::create_dir_all(&config.log_dir).map_err(|e| {
            anyhow!("Failed to create log directory {}: {}", config.log_dir.display(), e)
        })?;

        let appender = tracing_appender::rolling::never(&config.log_dir, &config.file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        LOG_GUARDS
            .lock()
            .map_err(|_| anyhow!("Log guard registry poisoned"))?
            .push(guard);

        let layer = fmt::layer().with_writer(writer).with_ansi(false);
        Some(if config.json_format { layer.json().boxed() } else { layer.boxed() })
    } else {
        None
    };

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    tracing::info!(
        "Logging initialized (level={}, file_output={})",
        config.level,
        config.file_output
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_from_config() {
        let config = LoggingConfig::default();
        assert!(build_env_filter(&config).is_ok());
    }

    #[test]
    fn test_bad_module_filter_rejected() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let mut config = LoggingConfig::default();
        config.module_filters.insert("reqwest".to_string(), "notalevel".to_string());
        assert!(build_env_filter(&config).is_err());
    }
}
