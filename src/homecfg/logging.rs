//! Logging bootstrap for the binary.
//!
//! Library code only talks to the `log` facade. The binary calls
//! [`init_logging`] once to route those records to stderr through
//! `flexi_logger`, so stdout stays clean for command output.
//!
//! Initialization is idempotent for the same level and never panics.

use flexi_logger::{Logger, LoggerHandle};
use log::debug;
use once_cell::sync::OnceCell;

/// Environment variable read when `--verbose` is not given.
pub const LOG_ENV: &str = "HOMECFG_LOG";

const DEFAULT_LEVEL: &str = "warn";

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    _logger: LoggerHandle,
}

/// Picks the level: `--verbose` wins, then `HOMECFG_LOG`, then `warn`.
pub fn resolve_level(verbose: bool, env_value: Option<&str>) -> Result<&'static str, String> {
    if verbose {
        return Ok("debug");
    }
    match env_value {
        Some(value) if !value.trim().is_empty() => normalize_level(value),
        _ => Ok(DEFAULT_LEVEL),
    }
}

pub fn init_logging(level: &str) -> Result<(), String> {
    let level = normalize_level(level)?;

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, String> {
        let logger = Logger::try_with_str(level)
            .map_err(|err| format!("invalid log level `{level}`: {err}"))?
            .log_to_stderr()
            .format(flexi_logger::default_format)
            .start()
            .map_err(|err| format!("failed to start logger: {err}"))?;

        debug!(
            "event=logging_init level={} version={}",
            level,
            env!("CARGO_PKG_VERSION")
        );
        Ok(LoggingState {
            level,
            _logger: logger,
        })
    })?;

    if state.level != level {
        return Err(format!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            state.level, level
        ));
    }
    Ok(())
}

fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        "off" => Ok("off"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error|off"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_wins() {
        assert_eq!(resolve_level(true, Some("error")).unwrap(), "debug");
    }

    #[test]
    fn env_then_default() {
        assert_eq!(resolve_level(false, Some(" INFO ")).unwrap(), "info");
        assert_eq!(resolve_level(false, Some("")).unwrap(), "warn");
        assert_eq!(resolve_level(false, None).unwrap(), "warn");
        assert!(resolve_level(false, Some("loud")).is_err());
    }

    #[test]
    fn init_is_idempotent_and_rejects_level_switch() {
        init_logging("warn").unwrap();
        init_logging("warning").unwrap();
        let err = init_logging("debug").unwrap_err();
        assert!(err.contains("refusing to switch"));
    }
}
