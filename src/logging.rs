use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct LogOptions {
    pub level: String,
    pub file_enable: bool,
    pub dir: String,
    pub filename: String,
    pub rotate: String,
}

impl LogOptions {
    /// Whether log records already reach stderr.
    pub fn on_stderr(&self) -> bool {
        !self.file_enable
    }
}

/// Installs the global subscriber and routes `log` records into it.
///
/// Output goes to stderr unless file logging is enabled. The returned guard
/// flushes the file writer on drop and must live until the process exits.
pub fn init(opts: &LogOptions) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(&opts.level)
        .with_context(|| format!("Invalid log level '{}'", opts.level))?;

    let guard = if opts.file_enable {
        let appender = match opts.rotate.as_str() {
            "hourly" => rolling::hourly(&opts.dir, &opts.filename),
            "never" => rolling::never(&opts.dir, &opts.filename),
            "daily" => rolling::daily(&opts.dir, &opts.filename),
            other => anyhow::bail!("Unknown log rotation '{}' (daily, hourly, never)", other),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(writer)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .context("Failed to install log subscriber")?;
        Some(guard)
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .context("Failed to install log subscriber")?;
        None
    };

    tracing_log::LogTracer::init().context("Failed to bridge log records")?;
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_logging_leaves_stderr() {
        let mut opts = LogOptions {
            level: "info".into(),
            file_enable: false,
            dir: ".".into(),
            filename: "test.log".into(),
            rotate: "daily".into(),
        };
        assert!(opts.on_stderr());
        opts.file_enable = true;
        assert!(!opts.on_stderr());
    }

    #[test]
    fn test_rejects_unknown_rotation() {
        let dir = tempfile::tempdir().unwrap();
        let opts = LogOptions {
            level: "info".into(),
            file_enable: true,
            dir: dir.path().to_string_lossy().into_owned(),
            filename: "test.log".into(),
            rotate: "weekly".into(),
        };
        let err = init(&opts).unwrap_err();
        assert!(err.to_string().contains("weekly"));
    }
}
