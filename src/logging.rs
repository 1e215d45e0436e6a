use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use anyhow::{Context, Result, ensure};
use tracing::Level;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, writer::MakeWriterExt},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use uuid::Uuid;

use crate::config::{LoggingConfig, LoggingRotation};

pub const LOG_FILE_PREFIX: &str = "cvd_agent.log";

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Keeps the non-blocking writer alive; drop it last to flush pending lines.
pub struct LoggingGuard {
    _worker_guard: WorkerGuard,
    run_id: Uuid,
    sweep: RetentionSweep,
}

impl LoggingGuard {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// What the start-up retention pass removed or could not inspect.
    pub fn retention_sweep(&self) -> &RetentionSweep {
        &self.sweep
    }
}

/// Installs the global subscriber: JSON lines into a rolling file, plus WARN and above on
/// stderr when enabled. Expired log files are swept before the first line is written.
pub fn init_tracing(logging_config: &LoggingConfig) -> Result<LoggingGuard> {
    let sink = LogSink::prepare(logging_config)?;
    let sweep = RetentionPolicy::new(LOG_FILE_PREFIX, logging_config.retention_days)
        .sweep(&sink.dir, SystemTime::now());
    let (writer, worker_guard) = tracing_appender::non_blocking(sink.appender()?);

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = vec![
        fmt::layer()
            .json()
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_current_span(true)
            .with_span_list(true)
            .with_ansi(false)
            .with_writer(writer)
            .with_filter(sink.filter)
            .boxed(),
    ];
    if logging_config.stderr_warn_enabled {
        layers.push(
            fmt::layer()
                .with_writer(std::io::stderr.with_max_level(Level::WARN))
                .boxed(),
        );
    }
    tracing_subscriber::registry()
        .with(layers)
        .with(ErrorLayer::default())
        .try_init()
        .context("failed to initialize tracing subscriber")?;

    let run_id = Uuid::now_v7();
    announce(run_id, &sink.dir, logging_config, &sweep);
    Ok(LoggingGuard {
        _worker_guard: worker_guard,
        run_id,
        sweep,
    })
}

/// Checked destination and filter; nothing is installed until both resolve.
struct LogSink {
    dir: PathBuf,
    rotation: LoggingRotation,
    filter: EnvFilter,
}

impl LogSink {
    fn prepare(config: &LoggingConfig) -> Result<Self> {
        ensure!(!config.filter.trim().is_empty(), "logging.filter cannot be empty");
        ensure!(!config.dir.as_os_str().is_empty(), "logging.dir cannot be empty");
        let filter = build_env_filter(&config.filter)?;

        let dir = resolve_log_dir(&config.dir)?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create logging directory {}", dir.display()))?;
        Ok(Self {
            dir,
            rotation: config.rotation,
            filter,
        })
    }

    fn appender(&self) -> Result<RollingFileAppender> {
        let rotation = match self.rotation {
            LoggingRotation::Daily => Rotation::DAILY,
            LoggingRotation::Hourly => Rotation::HOURLY,
        };
        RollingFileAppender::builder()
            .rotation(rotation)
            .filename_prefix(LOG_FILE_PREFIX)
            .build(&self.dir)
            .with_context(|| format!("failed to open log file in {}", self.dir.display()))
    }
}

fn announce(run_id: Uuid, dir: &Path, config: &LoggingConfig, sweep: &RetentionSweep) {
    tracing::info!(
        target: "logging",
        run_id = %run_id,
        dir = %dir.display(),
        filter = %config.filter,
        rotation = ?config.rotation,
        retention_days = config.retention_days,
        expired_removed = sweep.removed.len(),
        stderr_warn_enabled = config.stderr_warn_enabled,
        "logging_initialized"
    );
    for warning in &sweep.warnings {
        tracing::warn!(target: "logging", warning = %warning, "logging_retention_warning");
    }
}

fn build_env_filter(filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(filter)
        .with_context(|| format!("failed to parse logging.filter '{}'", filter))
}

fn resolve_log_dir(dir: &Path) -> Result<PathBuf> {
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }

    Ok(std::env::current_dir()
        .context("failed to read current working directory for logging.dir resolution")?
        .join(dir))
}

/// Age-based cleanup of rolled log files sharing one prefix.
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    prefix: String,
    max_age: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionSweep {
    pub removed: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

impl RetentionPolicy {
    pub fn new(prefix: impl Into<String>, retention_days: usize) -> Self {
        let days = u64::try_from(retention_days).unwrap_or(u64::MAX);
        Self {
            prefix: prefix.into(),
            max_age: Duration::from_secs(days.saturating_mul(SECONDS_PER_DAY)),
        }
    }

    /// Removes prefixed files last modified at or before `now - max_age`.
    /// Problems become warnings; the sweep never fails.
    pub fn sweep(&self, log_dir: &Path, now: SystemTime) -> RetentionSweep {
        let cutoff = now
            .checked_sub(self.max_age)
            .unwrap_or(SystemTime::UNIX_EPOCH);
        let mut sweep = RetentionSweep::default();

        let entries = match fs::read_dir(log_dir) {
            Ok(entries) => entries,
            Err(err) => {
                sweep.warnings.push(format!(
                    "failed to scan logging directory {}: {}",
                    log_dir.display(),
                    err
                ));
                return sweep;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    sweep
                        .warnings
                        .push(format!("failed to iterate logging directory entries: {}", err));
                    continue;
                }
            };
            if !entry.file_name().to_string_lossy().starts_with(&self.prefix) {
                continue;
            }

            let path = entry.path();
            match self.is_expired(&entry, cutoff) {
                Ok(false) => {}
                Ok(true) => match fs::remove_file(&path) {
                    Ok(()) => sweep.removed.push(path),
                    Err(err) => sweep.warnings.push(format!(
                        "failed to remove expired log file {}: {}",
                        path.display(),
                        err
                    )),
                },
                Err(warning) => sweep.warnings.push(warning),
            }
        }

        sweep
    }

    fn is_expired(&self, entry: &fs::DirEntry, cutoff: SystemTime) -> Result<bool, String> {
        let metadata = entry
            .metadata()
            .map_err(|err| format!("failed to stat {}: {}", entry.path().display(), err))?;
        if !metadata.is_file() {
            return Ok(false);
        }
        let modified = metadata.modified().map_err(|err| {
            format!("failed to read mtime for {}: {}", entry.path().display(), err)
        })?;
        Ok(modified <= cutoff)
    }
}
