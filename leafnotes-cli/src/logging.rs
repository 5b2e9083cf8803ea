//! Stderr logging for the CLI.

use flexi_logger::{Logger, LoggerHandle};

/// Starts the global logger at `level`, writing to stderr.
///
/// Keep the returned handle alive for the life of the process.
pub fn init_logging(level: &str) -> Result<LoggerHandle, String> {
    let level = normalize_level(level)?;
    Logger::try_with_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_stderr()
        .format(flexi_logger::default_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))
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
