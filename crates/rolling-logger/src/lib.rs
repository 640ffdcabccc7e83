//! Rolling Logger
//!
//! A `log` backend that keeps the newest records in a circular buffer and
//! forwards every record to the browser console (stderr off-wasm).
//!
//! The buffer survives until the page unloads, so it can be dumped after
//! the fact, e.g. from a panic hook.

use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};

use log::{Level, LevelFilter, Log, Metadata, Record};

pub const DEFAULT_CAPACITY: usize = 256;

static LOGGER: OnceLock<RollingLogger> = OnceLock::new();

/// Fixed-capacity buffer that evicts the oldest line when full
#[derive(Debug)]
pub struct RingBuffer {
    capacity: usize,
    lines: VecDeque<String>,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { capacity, lines: VecDeque::with_capacity(capacity) }
    }

    pub fn push(&mut self, line: String) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Oldest first
    pub fn snapshot(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }
}

pub struct RollingLogger {
    level: LevelFilter,
    buffer: Mutex<RingBuffer>,
}

impl RollingLogger {
    pub fn new(level: LevelFilter, capacity: usize) -> Self {
        Self { level, buffer: Mutex::new(RingBuffer::new(capacity)) }
    }

    /// Buffered lines, oldest first
    pub fn recent(&self) -> Vec<String> {
        self.buffer.lock().map(|b| b.snapshot()).unwrap_or_default()
    }

    fn format(record: &Record) -> String {
        format!(
            "{} {:<5} {}",
            chrono::Utc::now().format("%H:%M:%S%.3f"),
            record.level(),
            record.args()
        )
    }
}

impl Log for RollingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = Self::format(record);
        emit(record.level(), &line);
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.push(line);
        }
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    let msg = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&msg),
        Level::Warn => web_sys::console::warn_1(&msg),
        Level::Info => web_sys::console::info_1(&msg),
        Level::Debug | Level::Trace => web_sys::console::debug_1(&msg),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    eprintln!("{}", line);
}

/// Install the global logger. Later calls keep the first logger.
pub fn init(level: LevelFilter, capacity: usize) {
    let logger = LOGGER.get_or_init(|| RollingLogger::new(level, capacity));
    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}

/// Buffered lines of the global logger
pub fn recent() -> Vec<String> {
    LOGGER.get().map(RollingLogger::recent).unwrap_or_default()
}

/// Re-emit the whole buffer as one grouped error, for post-mortems
pub fn dump() {
    let lines = recent();
    if lines.is_empty() {
        return;
    }
    emit(Level::Error, &format!("last {} log lines:\n{}", lines.len(), lines.join("\n")));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_buffer_keeps_newest() {
        let mut buffer = RingBuffer::new(3);
        for i in 0..5 {
            buffer.push(format!("line {}", i));
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.snapshot(), vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn test_zero_capacity_still_holds_one() {
        let mut buffer = RingBuffer::new(0);
        buffer.push("a".into());
        buffer.push("b".into());
        assert_eq!(buffer.snapshot(), vec!["b"]);
    }

    #[test]
    fn test_logger_filters_by_level() {
        let logger = RollingLogger::new(LevelFilter::Info, 8);
        logger.log(&Record::builder().level(Level::Debug).args(format_args!("hidden")).build());
        logger.log(&Record::builder().level(Level::Warn).args(format_args!("[DND] shown")).build());

        let recent = logger.recent();
        assert_eq!(recent.len(), 1);
        assert!(recent[0].contains("WARN"));
        assert!(recent[0].ends_with("[DND] shown"));
    }
}
