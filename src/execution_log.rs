use std::collections::VecDeque;
use std::sync::Mutex;

use crate::config::DEFAULT_LOG_LIMIT;
use crate::models::execution::LogEntry;

/// Cross-workflow, most-recent-first audit trail of executions. Bounded;
/// the oldest entry is evicted once the cap is reached.
pub struct ExecutionLog {
    entries: Mutex<VecDeque<LogEntry>>,
    limit: usize,
}

impl ExecutionLog {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_LOG_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        ExecutionLog {
            entries: Mutex::new(VecDeque::with_capacity(limit)),
            limit,
        }
    }

    pub fn append(&self, entry: LogEntry) {
        let mut entries = self.entries.lock().unwrap();
        entries.push_front(entry);
        entries.truncate(self.limit);
    }

    /// The newest `count` entries, newest first.
    pub fn recent(&self, count: usize) -> Vec<LogEntry> {
        let entries = self.entries.lock().unwrap();
        entries.iter().take(count).cloned().collect()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

impl Default for ExecutionLog {
    fn default() -> Self {
        Self::new()
    }
}
