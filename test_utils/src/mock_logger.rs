use lazy_static::lazy_static;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default)]
struct MockLogger {
    pub logs: Arc<Mutex<Vec<(log::Level, String)>>>,
}

impl log::Log for MockLogger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }
    fn flush(&self) {}
    fn log(&self, record: &log::Record) {
        if let Ok(mut logs) = self.logs.lock() {
            logs.push((record.level(), record.args().to_string()));
        }
    }
}

/// Installs a process-wide logger that records every message.
///
/// Tests in the same binary share the logger, so assertions should look for
/// their own messages rather than compare the whole log.
pub fn mock_logger(max_level: Option<log::LevelFilter>) -> Arc<Mutex<Vec<(log::Level, String)>>> {
    lazy_static! {
        static ref MOCK_LOGGER: MockLogger = MockLogger::default();
    }

    // Only the first call can install the logger; later calls reuse it.
    let _ = log::set_logger(&*MOCK_LOGGER as &'static MockLogger);
    log::set_max_level(max_level.unwrap_or(log::LevelFilter::Debug));

    MOCK_LOGGER.logs.clone()
}
