use anyhow::{anyhow, Result};
use mdtoc_config::LogConfig;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

/// Log files above this size are truncated on startup.
const MAX_LOG_FILE_SIZE: u64 = 8 * 1024 * 1024;

/// Installs the global subscriber.
///
/// The log file is taken from `log`, `MDTOC_LOG_PATH` or the config in this
/// order, the log goes to stderr if none is set. The returned guard must be
/// kept alive until exit to flush the file writer.
pub fn init_logging(log: Option<PathBuf>, log_config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let maybe_log = log
        .or_else(|| std::env::var("MDTOC_LOG_PATH").ok().map(PathBuf::from))
        .or_else(|| log_config.log_file.as_ref().map(PathBuf::from));

    let max_level = log_config
        .max_level
        .parse()
        .unwrap_or(tracing::Level::INFO);

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(max_level).into())
        .parse_lossy(&log_config.log_target);

    if let Some(log_path) = maybe_log {
        if let Ok(metadata) = std::fs::metadata(&log_path) {
            if log_path.is_file() && metadata.len() > MAX_LOG_FILE_SIZE {
                std::fs::remove_file(&log_path)?;
            }
        }

        let file_name = log_path
            .file_name()
            .ok_or_else(|| anyhow!("no file name in {log_path:?}"))?;

        let directory = log_path
            .parent()
            .ok_or_else(|| anyhow!("{log_path:?} has no parent"))?;

        let file_appender = tracing_appender::rolling::never(directory, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let subscriber = tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(env_filter)
            .with_line_number(true)
            .with_writer(non_blocking)
            .with_ansi(false)
            .finish();

        tracing::subscriber::set_global_default(subscriber)?;

        Ok(Some(guard))
    } else {
        let subscriber = tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .finish();

        tracing::subscriber::set_global_default(subscriber)?;

        Ok(None)
    }
}
