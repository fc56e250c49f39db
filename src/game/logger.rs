//! Engine logger
//!
//! Purely observational: nothing the logger records ever feeds back into
//! game state, and replay never depends on it.

use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::ops::Deref;

/// Verbosity level for engine output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Silent - no output
    Silent = 0,
    /// Minimal - eliminations and game outcome
    Minimal = 1,
    /// Normal - one line per root event (default)
    #[default]
    Normal = 2,
    /// Verbose - every cascade event and rule firing
    Verbose = 3,
}

/// Output format for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// Machine-readable JSON output (one object per line)
    Json,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Output only to stdout (default)
    #[default]
    Stdout,
    /// Capture only to in-memory buffer (no stdout)
    Memory,
}

/// A captured log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    /// e.g. "event", "rule", "ignored"
    pub category: Option<&'static str>,
}

/// Read-only view of the captured entries
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl<'a> LogGuard<'a> {
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.guard.iter()
    }

    pub fn len(&self) -> usize {
        self.guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Centralized engine logger with optional in-memory capture
pub struct GameLogger {
    verbosity: VerbosityLevel,
    output_format: OutputFormat,
    output_mode: OutputMode,

    /// Captured log entries
    log_buffer: RefCell<Vec<LogEntry>>,
}

impl GameLogger {
    /// Create a new logger with default verbosity (Normal)
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            output_format: OutputFormat::default(),
            output_mode: OutputMode::default(),
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    /// Capture to memory only (suppresses stdout)
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn is_capturing(&self) -> bool {
        self.output_mode == OutputMode::Memory
    }

    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.output_format = format;
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    /// Print only the last `tail_lines` buffered logs, then clear
    pub fn flush_tail(&mut self, tail_lines: usize) {
        let buffer = self.log_buffer.borrow();

        let total_lines = buffer.len();
        let elided_count = total_lines.saturating_sub(tail_lines);
        if elided_count > 0 {
            println!(
                ">>> {} LOG LINES ELIDED. PRINTING LAST {} LINES <<<",
                elided_count, tail_lines
            );
        }

        for entry in buffer.iter().skip(elided_count) {
            if entry.level <= self.verbosity {
                self.write_stdout(entry);
            }
        }

        drop(buffer);
        self.clear_logs();
    }

    /// Captured entries, without copying
    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.log_buffer.borrow(),
        }
    }

    pub fn clear_logs(&mut self) {
        self.log_buffer.borrow_mut().clear();
    }

    /// Would a message at `level` go anywhere?
    ///
    /// Lets callers skip building expensive messages.
    #[inline]
    pub fn enabled(&self, level: VerbosityLevel) -> bool {
        level != VerbosityLevel::Silent && (self.is_capturing() || level <= self.verbosity)
    }

    fn write_stdout(&self, entry: &LogEntry) {
        match self.output_format {
            OutputFormat::Text => {
                if entry.level == VerbosityLevel::Minimal {
                    println!("{}", entry.message);
                } else {
                    println!("  {}", entry.message);
                }
            }
            OutputFormat::Json => match serde_json::to_string(entry) {
                Ok(line) => println!("{}", line),
                Err(_) => println!("{}", entry.message),
            },
        }
    }

    fn log(&self, level: VerbosityLevel, category: Option<&'static str>, message: &str) {
        let should_capture = self.is_capturing();
        let should_output = self.output_mode == OutputMode::Stdout;

        // Early exit if message won't be used
        if level > self.verbosity && !should_capture {
            return;
        }

        let entry = LogEntry {
            level,
            message: message.to_string(),
            category,
        };

        if should_output && level <= self.verbosity {
            self.write_stdout(&entry);
        }
        if should_capture {
            self.log_buffer.borrow_mut().push(entry);
        }
    }

    #[inline]
    pub fn minimal(&self, message: &str) {
        self.log(VerbosityLevel::Minimal, None, message);
    }

    #[inline]
    pub fn normal(&self, message: &str) {
        self.log(VerbosityLevel::Normal, None, message);
    }

    /// An applied event; roots log at Normal, cascades at Verbose
    pub fn event(&self, root: bool, message: &str) {
        let level = if root {
            VerbosityLevel::Normal
        } else {
            VerbosityLevel::Verbose
        };
        self.log(level, Some("event"), message);
    }

    pub fn rule_fired(&self, rule: &str, emitted: usize) {
        if self.enabled(VerbosityLevel::Verbose) {
            self.log(
                VerbosityLevel::Verbose,
                Some("rule"),
                &format!("rule {rule} emitted {emitted} event(s)"),
            );
        }
    }

    /// A rejected (no-op) event
    pub fn ignored(&self, message: &str) {
        if self.enabled(VerbosityLevel::Verbose) {
            self.log(VerbosityLevel::Verbose, Some("ignored"), &format!("ignored: {message}"));
        }
    }
}

impl Default for GameLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GameLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("log_count", &self.log_buffer.borrow().len())
            .finish()
    }
}

impl Clone for GameLogger {
    /// Settings only; the capture buffer starts empty
    fn clone(&self) -> Self {
        GameLogger {
            verbosity: self.verbosity,
            output_format: self.output_format,
            output_mode: self.output_mode,
            log_buffer: RefCell::new(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_creation() {
        let logger = GameLogger::new();
        assert_eq!(logger.verbosity(), VerbosityLevel::Normal);
    }

    #[test]
    fn test_log_capture() {
        let mut logger = GameLogger::new();
        logger.enable_capture();

        logger.normal("test message");
        logger.minimal("minimal message");

        let logs = logger.logs();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].message, "test message");
        assert_eq!(logs[1].message, "minimal message");
    }

    #[test]
    fn test_event_levels() {
        let mut logger = GameLogger::with_verbosity(VerbosityLevel::Normal);
        logger.enable_capture();

        logger.event(true, "alice plays a scout");
        logger.event(false, "alice gains 1 trade");
        logger.rule_fired("card_abilities", 2);

        let logs = logger.logs();
        assert_eq!(logs.len(), 3);
        assert_eq!(logs[0].level, VerbosityLevel::Normal);
        assert_eq!(logs[1].level, VerbosityLevel::Verbose);
        assert_eq!(logs[2].category, Some("rule"));
    }

    #[test]
    fn test_flush_tail_clears() {
        let mut logger = GameLogger::with_verbosity(VerbosityLevel::Silent);
        logger.enable_capture();
        for i in 0..10 {
            logger.normal(&format!("message {}", i));
        }
        logger.flush_tail(3);
        assert!(logger.logs().is_empty());
    }

    #[test]
    fn test_silent_stdout_skips_work() {
        let logger = GameLogger::with_verbosity(VerbosityLevel::Silent);
        assert!(!logger.enabled(VerbosityLevel::Minimal));
        assert!(!logger.enabled(VerbosityLevel::Silent));
    }

    #[test]
    fn test_json_entry_shape() {
        let entry = LogEntry {
            level: VerbosityLevel::Minimal,
            message: "bob has been eliminated".to_string(),
            category: Some("event"),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"level": "Minimal", "message": "bob has been eliminated", "category": "event"})
        );
    }
}
