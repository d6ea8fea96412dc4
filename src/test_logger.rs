//! Test logger: prints through `simplelog::TestLogger` and keeps the records of the current
//! thread so tests can look at what was reported.

use std::cell::RefCell;

use log::{Level, LevelFilter, Log, Metadata, Record};
use simplelog::{Config, TestLogger};

thread_local! {
    static RECORDS: RefCell<Vec<(Level, String)>> = RefCell::new(Vec::new());
}

struct CapturingLogger {
    inner: Box<TestLogger>,
}

impl Log for CapturingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        RECORDS.with(|records| {
            records
                .borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
        self.inner.log(record);
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

pub fn init() {
    let logger = CapturingLogger {
        inner: TestLogger::new(LevelFilter::Trace, Config::default()),
    };
    if log::set_logger(Box::leak(Box::new(logger))).is_ok() {
        log::set_max_level(LevelFilter::Trace);
    }
}

/// Drain the records logged so far on this thread.
pub fn take() -> Vec<(Level, String)> {
    RECORDS.with(|records| records.take())
}

/// Messages logged at `level` on this thread since the last call to [`take`].
pub fn take_at(level: Level) -> Vec<String> {
    take()
        .into_iter()
        .filter(|(l, _)| *l == level)
        .map(|(_, message)| message)
        .collect()
}
