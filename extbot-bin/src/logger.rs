use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record};

static LOGGER: Logger = Logger;

/// Installs the logger. Only records of the extbot crates are printed.
pub fn init(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

pub struct Logger;

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target().starts_with("extbot")
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let now = Local::now().format("%Y-%m-%d %H:%M:%S");

        println!(
            "[{}] [{}] {}",
            now,
            match record.level() {
                Level::Error => "ERROR",
                Level::Warn => "WARN",
                Level::Info => "INFO",
                Level::Debug => "DEBUG",
                Level::Trace => "TRACE",
            },
            record.args()
        );
    }

    fn flush(&self) {}
}
