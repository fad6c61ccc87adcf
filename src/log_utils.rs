use std::path::*;
use flexi_logger::{
    Logger, LoggerHandle, FileSpec, Duplicate, Criterion, Naming, Cleanup, detailed_format,
};

pub struct TimeLogger {
    start_time: std::time::Instant,
}

impl TimeLogger {
    pub fn start() -> TimeLogger {
        TimeLogger { start_time: std::time::Instant::now() }
    }

    pub fn log(self, text: &str) {
        let time = self.start_time.elapsed().as_secs_f64();
        log::info!("BENCH {} time = {:.6} s", text, time);
    }
}

const MAX_LOG_FILE_SIZE: u64 = 10 * 1024 * 1024;
const LOG_FILES_TO_KEEP: usize = 5;

/// Logs into files of `log_path` directory. Warnings also go to stderr.
/// Logging stops when returned handle is dropped.
pub fn start_logger(log_path: &Path, verbose: bool) -> anyhow::Result<LoggerHandle> {
    let level = if verbose { "debug" } else { "info" };
    let handle = Logger::try_with_env_or_str(level)?
        .log_to_file(
            FileSpec::default()
                .directory(log_path)
                .basename(env!("CARGO_PKG_NAME"))
        )
        .format_for_files(detailed_format)
        .duplicate_to_stderr(Duplicate::Warn)
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(LOG_FILES_TO_KEEP),
        )
        .start()?;
    Ok(handle)
}
