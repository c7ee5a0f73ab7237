use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const DEFAULT_LOG_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Goal,
    Field,
    Bench,
    Timer,
    Quarter,
    Game,
    Error,
}

impl LogKind {
    pub fn icon(&self) -> &'static str {
        match self {
            LogKind::Goal => "🥍",
            LogKind::Field => "▲",
            LogKind::Bench => "▼",
            LogKind::Timer => "⏱",
            LogKind::Quarter => "◷",
            LogKind::Game => "★",
            LogKind::Error => "!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "type")]
    pub kind: LogKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Newest-first, bounded event history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl ActivityLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Rebuild a log from entries stored newest first, keeping at most `capacity`.
    pub fn from_entries(entries: Vec<LogEntry>, capacity: usize) -> Self {
        let mut log = Self::with_capacity(capacity);
        log.entries = entries.into_iter().take(log.capacity).collect();
        log
    }

    pub fn push(&mut self, kind: LogKind, message: impl Into<String>) {
        self.push_entry(LogEntry {
            kind,
            message: message.into(),
            timestamp: Utc::now(),
        });
    }

    pub fn push_entry(&mut self, entry: LogEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn iter_chronological(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_vec(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_entry_comes_first() {
        let mut log = ActivityLog::default();
        log.push(LogKind::Field, "Arlo moved to field.");
        log.push(LogKind::Goal, "Goal by Arlo!");

        assert_eq!(log.latest().map(|e| e.kind), Some(LogKind::Goal));
        let messages: Vec<_> = log.iter_chronological().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["Arlo moved to field.", "Goal by Arlo!"]);
    }

    #[test]
    fn oldest_entries_are_evicted_past_capacity() {
        let mut log = ActivityLog::with_capacity(3);
        for i in 0..5 {
            log.push(LogKind::Timer, format!("entry {i}"));
        }
        assert_eq!(log.len(), 3);
        let messages: Vec<_> = log.iter().map(|e| e.message.clone()).collect();
        assert_eq!(messages, vec!["entry 4", "entry 3", "entry 2"]);
    }

    #[test]
    fn default_capacity_is_fifty() {
        let mut log = ActivityLog::default();
        for i in 0..60 {
            log.push(LogKind::Timer, format!("{i}"));
        }
        assert_eq!(log.len(), DEFAULT_LOG_CAPACITY);
        assert_eq!(log.latest().map(|e| e.message.as_str()), Some("59"));
    }

    #[test]
    fn entry_kind_serializes_as_type_field() {
        let entry = LogEntry {
            kind: LogKind::Bench,
            message: "x".into(),
            timestamp: Utc::now(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "bench");
    }
}
