//! Program logging.
//!
//! Messages go to the console and, for `run`, to two log files in the output folder: one for the
//! yearly progress of the fund and one for warnings and errors.
use anyhow::{Context, Result, bail};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Metadata, Record};
use std::env;
use std::fmt::Arguments;
use std::fs::File;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::OnceLock;

/// Set once the global logger is in place
static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// The log level used when neither `BAMBOO_FUND_LOG_LEVEL` nor `settings.toml` gives one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Takes precedence over the level in the settings file
const LOG_LEVEL_ENV_VAR: &str = "BAMBOO_FUND_LOG_LEVEL";

/// Yearly progress of the fund
const LOG_INFO_FILE_NAME: &str = "bamboo_fund_info.log";

/// Warnings (e.g. rates above 100 %) and errors
const LOG_ERROR_FILE_NAME: &str = "bamboo_fund_error.log";

/// Whether the program logger has been initialised
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Initialise the program logger.
///
/// The level is read from `BAMBOO_FUND_LOG_LEVEL` if set, otherwise from `log_level_from_settings`.
/// Accepted values are `off`, `error`, `warn`, `info`, `debug` and `trace`, in any case.
///
/// # Arguments
///
/// * `log_level_from_settings`: The log level specified in `settings.toml`
/// * `log_file_dir`: Folder in which to create log files, if any
pub fn init(log_level_from_settings: &str, log_file_dir: Option<&Path>) -> Result<()> {
    let log_level = match env::var(LOG_LEVEL_ENV_VAR) {
        Ok(level) => parse_log_level(&level)
            .with_context(|| format!("Invalid value for {LOG_LEVEL_ENV_VAR}"))?,
        Err(_) => parse_log_level(log_level_from_settings)?,
    };

    let mut dispatch = console_dispatch(log_level);
    if let Some(dir) = log_file_dir {
        dispatch = dispatch.chain(LogFiles::create(dir)?.into_dispatch(log_level));
    }

    dispatch.apply().context("Logger already initialised")?;
    let _ = LOGGER_INIT.set(());

    Ok(())
}

/// Convert a log level string (case insensitive) to a [`LevelFilter`]
fn parse_log_level(log_level: &str) -> Result<LevelFilter> {
    let level = match log_level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        unknown => bail!("Unknown log level: {unknown}"),
    };

    Ok(level)
}

/// Messages below warning level
fn is_routine(metadata: &Metadata) -> bool {
    metadata.level() > LevelFilter::Warn
}

/// Routine messages go to stdout and the rest to stderr, coloured when the stream is a terminal
fn console_dispatch(log_level: LevelFilter) -> Dispatch {
    let colours = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);
    let stdout_colours = std::io::stdout().is_terminal().then_some(colours);
    let stderr_colours = std::io::stderr().is_terminal().then_some(colours);

    let stdout = Dispatch::new()
        .filter(is_routine)
        .format(move |out, message, record| {
            format_line(out, message, record, stdout_colours.as_ref());
        })
        .level(log_level)
        .chain(std::io::stdout());
    let stderr = Dispatch::new()
        .format(move |out, message, record| {
            format_line(out, message, record, stderr_colours.as_ref());
        })
        .level(log_level.min(LevelFilter::Warn))
        .chain(std::io::stderr());

    Dispatch::new().chain(stdout).chain(stderr)
}

/// The pair of log files written alongside a run's results
struct LogFiles {
    info: File,
    error: File,
}

impl LogFiles {
    /// Create (or truncate) both log files in `dir`
    fn create(dir: &Path) -> Result<Self> {
        let create = |file_name: &str| {
            let path = dir.join(file_name);
            File::create(&path)
                .with_context(|| format!("Could not create log file {}", path.display()))
        };

        Ok(Self {
            info: create(LOG_INFO_FILE_NAME)?,
            error: create(LOG_ERROR_FILE_NAME)?,
        })
    }

    /// Route messages to the files without colour.
    ///
    /// The info file always records the yearly progress, even if the console is quieter.
    fn into_dispatch(self, log_level: LevelFilter) -> Dispatch {
        Dispatch::new()
            .chain(
                Dispatch::new()
                    .filter(is_routine)
                    .format(format_plain)
                    .level(log_level.max(LevelFilter::Info))
                    .chain(self.info),
            )
            .chain(
                Dispatch::new()
                    .format(format_plain)
                    .level(LevelFilter::Warn)
                    .chain(self.error),
            )
    }
}

/// Write a line as `[HH:MM:SS LEVEL target] message`
fn format_line(
    out: FormatCallback,
    message: &Arguments,
    record: &Record,
    colours: Option<&ColoredLevelConfig>,
) {
    let timestamp = Local::now().format("%H:%M:%S");
    let target = record.target();
    match colours {
        Some(colours) => out.finish(format_args!(
            "[{timestamp} {} {target}] {message}",
            colours.color(record.level())
        )),
        None => out.finish(format_args!(
            "[{timestamp} {} {target}] {message}",
            record.level()
        )),
    }
}

/// Write a line without colour
fn format_plain(out: FormatCallback, message: &Arguments, record: &Record) {
    format_line(out, message, record, None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;
    use rstest::rstest;
    use std::fs;
    use tempfile::tempdir;

    #[rstest]
    #[case("off", LevelFilter::Off)]
    #[case("error", LevelFilter::Error)]
    #[case("WARN", LevelFilter::Warn)]
    #[case("info", LevelFilter::Info)]
    #[case("Debug", LevelFilter::Debug)]
    #[case("trace", LevelFilter::Trace)]
    fn test_parse_log_level(#[case] input: &str, #[case] expected: LevelFilter) {
        assert_eq!(parse_log_level(input).unwrap(), expected);
    }

    #[test]
    fn test_parse_log_level_unknown() {
        assert_eq!(
            parse_log_level("verbose").unwrap_err().to_string(),
            "Unknown log level: verbose"
        );
    }

    #[rstest]
    #[case(Level::Error, false)]
    #[case(Level::Warn, false)]
    #[case(Level::Info, true)]
    #[case(Level::Trace, true)]
    fn test_is_routine(#[case] level: Level, #[case] expected: bool) {
        let metadata = Metadata::builder().level(level).build();
        assert_eq!(is_routine(&metadata), expected);
    }

    #[test]
    fn test_log_files_create_truncates() {
        let dir = tempdir().unwrap();
        let info_path = dir.path().join(LOG_INFO_FILE_NAME);
        fs::write(&info_path, "previous run").unwrap();

        LogFiles::create(dir.path()).unwrap();
        assert_eq!(fs::read_to_string(&info_path).unwrap(), "");
        assert!(dir.path().join(LOG_ERROR_FILE_NAME).is_file());
    }

    #[test]
    fn test_log_files_create_missing_dir() {
        let dir = tempdir().unwrap();
        assert!(LogFiles::create(&dir.path().join("missing")).is_err());
    }
}
