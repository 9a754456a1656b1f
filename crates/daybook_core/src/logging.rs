//! Process-wide logging for the calendar service.
//!
//! # Responsibility
//! - Route `log` records into a size-rotated `daybook` file set.
//! - Surface warnings and errors on stderr for whoever runs the server.
//! - Record panics as a single `event=panic_captured` line.
//!
//! # Invariants
//! - The backend starts at most once; later calls must name the same level
//!   and directory or they fail with `LoggingError::Conflict`.
//! - Startup failures are returned, never panicked on.

use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, LogSpecification, Logger, LoggerHandle, Naming,
    WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "daybook";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEPT_LOG_FILES: usize = 5;
const PANIC_SUMMARY_CHARS: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    level: LevelFilter,
    dir: PathBuf,
    _handle: LoggerHandle,
}

/// Logging bootstrap failure.
#[derive(Debug)]
pub enum LoggingError {
    InvalidLevel(String),
    /// Directory is not absolute.
    RelativeDir(PathBuf),
    CreateDir {
        dir: PathBuf,
        source: std::io::Error,
    },
    Backend(flexi_logger::FlexiLoggerError),
    /// Logger already runs with another level or directory.
    Conflict {
        active: String,
        requested: String,
    },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLevel(raw) => write!(
                f,
                "unsupported log level `{raw}`; expected off|error|warn|info|debug|trace"
            ),
            Self::RelativeDir(dir) => {
                write!(f, "log directory must be absolute, got `{}`", dir.display())
            }
            Self::CreateDir { dir, source } => write!(
                f,
                "failed to create log directory `{}`: {source}",
                dir.display()
            ),
            Self::Backend(err) => write!(f, "failed to start logger: {err}"),
            Self::Conflict { active, requested } => write!(
                f,
                "logging already running as {active}; refusing to switch to {requested}"
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
            _ => None,
        }
    }
}

/// Starts file logging at `level` under the absolute directory `dir`.
///
/// `level` is any `log::LevelFilter` name, case-insensitive.
pub fn init_logging(level: &str, dir: &Path) -> Result<(), LoggingError> {
    let level = parse_level(level)?;
    if !dir.is_absolute() {
        return Err(LoggingError::RelativeDir(dir.to_path_buf()));
    }

    let active = ACTIVE.get_or_try_init(|| start(level, dir))?;
    if active.level != level || active.dir != dir {
        return Err(LoggingError::Conflict {
            active: describe(active.level, &active.dir),
            requested: describe(level, dir),
        });
    }
    Ok(())
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn parse_level(raw: &str) -> Result<LevelFilter, LoggingError> {
    raw.trim()
        .parse::<LevelFilter>()
        .map_err(|_| LoggingError::InvalidLevel(raw.to_string()))
}

fn describe(level: LevelFilter, dir: &Path) -> String {
    format!("level={} dir={}", level.as_str().to_ascii_lowercase(), dir.display())
}

fn start(level: LevelFilter, dir: &Path) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
        dir: dir.to_path_buf(),
        source,
    })?;

    let spec = LogSpecification::builder().default(level).build();
    let handle = Logger::with(spec)
        .log_to_file(FileSpec::default().directory(dir).basename(LOG_FILE_BASENAME))
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEPT_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .duplicate_to_stderr(Duplicate::Warn)
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(LoggingError::Backend)?;

    PANIC_HOOK.get_or_init(install_panic_hook);
    info!(
        "event=logging_init module=logging status=ok version={} {}",
        env!("CARGO_PKG_VERSION"),
        describe(level, dir)
    );

    Ok(ActiveLogger {
        level,
        dir: dir.to_path_buf(),
        _handle: handle,
    })
}

fn install_panic_hook() {
    let next = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info.location().map_or_else(
            || "unknown".to_string(),
            |loc| format!("{}:{}", loc.file(), loc.line()),
        );
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
            .map_or_else(|| "<opaque>".to_string(), one_line);
        error!(
            "event=panic_captured module=logging status=error location={location} payload={payload}"
        );
        next(info);
    }));
}

/// Collapses control characters to spaces and caps the length.
fn one_line(text: &str) -> String {
    let mut out: String = text
        .chars()
        .take(PANIC_SUMMARY_CHARS)
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    if text.chars().nth(PANIC_SUMMARY_CHARS).is_some() {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{init_logging, one_line, parse_level, LoggingError, ACTIVE, PANIC_SUMMARY_CHARS};
    use log::LevelFilter;
    use std::path::Path;

    #[test]
    fn level_names_parse_case_insensitively() {
        assert_eq!(parse_level(" WARN ").unwrap(), LevelFilter::Warn);
        assert_eq!(parse_level("trace").unwrap(), LevelFilter::Trace);
        assert!(matches!(
            parse_level("verbose"),
            Err(LoggingError::InvalidLevel(raw)) if raw == "verbose"
        ));
    }

    #[test]
    fn relative_directory_is_rejected_before_start() {
        let err = init_logging("info", Path::new("logs/dev")).unwrap_err();
        assert!(matches!(err, LoggingError::RelativeDir(_)));
        assert!(err.to_string().contains("absolute"));
    }

    #[test]
    fn panic_payload_is_flattened_and_capped() {
        assert_eq!(one_line("bad\ninput\r\t!"), "bad input  !");
        let long = "x".repeat(PANIC_SUMMARY_CHARS + 1);
        let summary = one_line(&long);
        assert!(summary.ends_with("..."));
        assert_eq!(summary.chars().count(), PANIC_SUMMARY_CHARS + 3);
        assert_eq!(one_line(&"y".repeat(PANIC_SUMMARY_CHARS)).len(), PANIC_SUMMARY_CHARS);
    }

    #[test]
    fn second_start_must_match_the_running_logger() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();

        init_logging("info", first.path()).unwrap();
        init_logging("INFO", first.path()).unwrap();

        let err = init_logging("debug", first.path()).unwrap_err();
        assert!(matches!(err, LoggingError::Conflict { .. }));
        assert!(err.to_string().contains("refusing to switch"));
        assert!(matches!(
            init_logging("info", second.path()),
            Err(LoggingError::Conflict { .. })
        ));

        let active = ACTIVE.get().unwrap();
        assert_eq!(active.level, LevelFilter::Info);
        assert_eq!(active.dir, first.path());
    }
}
