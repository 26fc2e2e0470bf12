use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global subscriber, writing to `dir/<file_name>` through a
/// non-blocking appender. The terminal belongs to the UI, so nothing is
/// logged to stderr. Keep the returned guard alive until exit so buffered
/// lines are flushed.
pub fn init(config: &LoggingConfig, dir: &Path) -> Result<Option<WorkerGuard>> {
    if !config.enabled {
        return Ok(None);
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_appender = tracing_appender::rolling::never(dir, &config.file_name);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
    {
        Ok(()) => Ok(Some(guard)),
        // A subscriber is already installed; drop the guard so the writer shuts down.
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn disabled_logging_installs_nothing() {
        let dir = TempDir::new().unwrap();
        let config = LoggingConfig {
            enabled: false,
            ..LoggingConfig::default()
        };
        assert!(init(&config, dir.path()).unwrap().is_none());
        assert!(!dir.path().join("svgpad.log").exists());
    }
}
