//! Minimal stderr logger behind the `log` facade.
//!
//! Library code logs through `log` macros only; this module is the single
//! place that decides where records go. The verbose flag is plain data
//! handed to [`init`] by `main`, components never consult global state to
//! decide what to log.

use log::{Level, LevelFilter, Log, Metadata, Record};

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let level = match record.level() {
                Level::Warn => "WARNING",
                other => other.as_str(),
            };
            eprintln!("{level}: {}", record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Install the stderr logger. Verbose enables per-file debug lines.
///
/// Safe to call more than once; only the first call installs.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init(false);
        init(true);
        log::warn!("logger installed");
    }
}
