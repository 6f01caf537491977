//! Logging system initialization
//!
//! Builds the global tracing subscriber from [`LoggingConfig`].

use std::io::Write;
use std::path::Path;

use tracing_appender::{non_blocking::WorkerGuard, rolling};

use crate::config::LoggingConfig;
use crate::errors::{Result, UtmError};

type BoxedWriter = Box<dyn Write + Send + Sync>;

/// Pick the log sink: stdout, an appended file, or a daily rolling file.
pub fn build_writer(config: &LoggingConfig) -> Result<BoxedWriter> {
    let log_file = match config.file.as_deref() {
        Some(file) if !file.is_empty() => file,
        _ => return Ok(Box::new(std::io::stdout())),
    };

    if config.enable_rotation {
        let path = Path::new(log_file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let filename = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("utm-attribution.log");

        let appender = rolling::Builder::new()
            .rotation(rolling::Rotation::DAILY)
            .filename_prefix(filename.trim_end_matches(".log"))
            .filename_suffix("log")
            .max_log_files(config.max_backups.max(1) as usize)
            .build(dir)
            .map_err(|e| UtmError::file_operation(format!("rolling log appender: {}", e)))?;
        Ok(Box::new(appender))
    } else {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)?;
        Ok(Box::new(file))
    }
}

/// Initialize logging system based on configuration
///
/// Call once at startup, after the configuration is loaded. The returned
/// `WorkerGuard` must be kept alive so buffered log lines get flushed.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let writer = build_writer(config)?;
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);

    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| UtmError::configuration(format!("invalid log level '{}': {}", config.level, e)))?;

    let builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(config.file.as_ref().is_none_or(|f| f.is_empty()));

    let installed = if config.format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| UtmError::configuration(format!("logging already initialized: {}", e)))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_file_writer_appends() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("app.log");
        let config = LoggingConfig {
            file: Some(path.display().to_string()),
            enable_rotation: false,
            ..LoggingConfig::default()
        };

        let mut writer = build_writer(&config).expect("writer");
        writer.write_all(b"hello\n").expect("write");
        writer.flush().expect("flush");
        drop(writer);

        let content = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(content, "hello\n");
    }

    #[test]
    fn test_rolling_writer_creates_file_in_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = LoggingConfig {
            file: Some(dir.path().join("utm.log").display().to_string()),
            enable_rotation: true,
            ..LoggingConfig::default()
        };

        let mut writer = build_writer(&config).expect("writer");
        writer.write_all(b"line\n").expect("write");
        writer.flush().expect("flush");

        let created = std::fs::read_dir(dir.path()).expect("read dir").count();
        assert_eq!(created, 1);
    }

    #[test]
    fn test_missing_directory_fails_plain_file() {
        let config = LoggingConfig {
            file: Some("/nonexistent-dir-for-utm/app.log".to_string()),
            enable_rotation: false,
            ..LoggingConfig::default()
        };
        assert!(matches!(build_writer(&config), Err(UtmError::FileOperation(_))));
    }
}
