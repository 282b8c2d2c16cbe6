/*!
Logging interface injected into the run controller.

Nothing in the crate looks a logger up globally. `Console::with_logger`
receives an `Rc<dyn Logger>`; the default is `LogFacade`, which forwards to
the `log` crate so any `log` backend the binary installs picks it up.

Sinks
=====
- `LogFacade`: `log::info!` / `log::warn!` / `log::error!` with target `famicore`.
- `ConsoleLog`: bounded in-memory history for a debugger console pane. Oldest
  entries are dropped once `capacity` is reached. Front-ends `drain` it to
  print what accumulated since the last frame.
*/

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::time::SystemTime;

pub const LOG_TARGET: &str = "famicore";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Message,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Message => "MSG",
            Severity::Warning => "WARN",
            Severity::Error => "ERROR",
        })
    }
}

pub trait Logger {
    fn log(&self, severity: Severity, message: &str);

    fn message(&self, message: &str) {
        self.log(Severity::Message, message);
    }

    fn warning(&self, message: &str) {
        self.log(Severity::Warning, message);
    }

    fn error(&self, message: &str) {
        self.log(Severity::Error, message);
    }
}

/// Forwards to the `log` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFacade;

impl Logger for LogFacade {
    fn log(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Message => log::info!(target: LOG_TARGET, "{message}"),
            Severity::Warning => log::warn!(target: LOG_TARGET, "{message}"),
            Severity::Error => log::error!(target: LOG_TARGET, "{message}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: SystemTime,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self
            .timestamp
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        write!(f, "[{secs:.3}] {:<5} {}", self.severity, self.message)
    }
}

/// In-memory log history with a fixed capacity.
#[derive(Debug)]
pub struct ConsoleLog {
    capacity: usize,
    entries: RefCell<VecDeque<LogEntry>>,
}

impl ConsoleLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: RefCell::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Copy of the current history, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.borrow().iter().cloned().collect()
    }

    /// Take every entry out of the history, oldest first.
    pub fn drain(&self) -> Vec<LogEntry> {
        self.entries.borrow_mut().drain(..).collect()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl Logger for ConsoleLog {
    fn log(&self, severity: Severity, message: &str) {
        let mut entries = self.entries.borrow_mut();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(LogEntry {
            timestamp: SystemTime::now(),
            severity,
            message: message.to_owned(),
        });
    }
}
