use anyhow::{Context, Result};
use flexi_logger::{Logger, LoggerHandle};
use log::info;

/// Starts stderr logging at `level`. The returned handle must stay alive for
/// the rest of the process or buffered records are lost.
pub fn init_logging(level: &str) -> Result<LoggerHandle> {
    let handle = Logger::try_with_str(level)
        .with_context(|| format!("invalid log level `{level}`"))?
        .log_to_stderr()
        .format_for_stderr(flexi_logger::detailed_format)
        .start()
        .context("failed to start logger")?;
    info!(
        "event=app_start platform={} build_mode={} version={}",
        std::env::consts::OS,
        build_mode(),
        env!("CARGO_PKG_VERSION")
    );
    Ok(handle)
}

fn build_mode() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}
