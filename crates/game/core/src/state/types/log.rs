//! Player-facing narration feed.

use std::collections::VecDeque;

/// Category of a log line, used by renderers for colouring and by tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum LogKind {
    Info,
    Combat,
    Death,
    Loot,
    Heal,
    Dialogue,
    Warning,
    System,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    pub kind: LogKind,
    pub text: String,
}

/// Append-only message feed with a fixed retention cap.
///
/// Once `capacity` entries are stored, every push evicts the oldest entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "StoredLog")
)]
pub struct MessageLog {
    capacity: usize,
    entries: VecDeque<LogEntry>,
}

/// Wire form of [`MessageLog`]; decoding re-applies the retention cap.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct StoredLog {
    capacity: usize,
    entries: VecDeque<LogEntry>,
}

#[cfg(feature = "serde")]
impl From<StoredLog> for MessageLog {
    fn from(stored: StoredLog) -> Self {
        let mut log = Self::with_capacity(stored.capacity);
        for entry in stored.entries {
            log.push(entry.kind, entry.text);
        }
        log
    }
}

impl MessageLog {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, kind: LogKind, text: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            kind,
            text: text.into(),
        });
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    /// Entries visible in a window of `window` lines scrolled back by `offset`.
    pub fn window(&self, offset: usize, window: usize) -> impl Iterator<Item = &LogEntry> {
        let end = self.entries.len().saturating_sub(offset);
        let start = end.saturating_sub(window);
        self.entries.range(start..end)
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::with_capacity(crate::config::GameConfig::DEFAULT_LOG_CAPACITY)
    }
}
