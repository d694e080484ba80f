use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use weave_utils::SmallStr;

/// Caps every bounded per-agent deque at this many entries; the oldest
/// entry is dropped once a new one arrives past this length.
pub const MEMORY_CAPACITY: usize = 64;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub at: DateTime<Utc>,
    pub peer_id: SmallStr,
    pub description: SmallStr,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InfluenceEntry {
    pub peer_id: SmallStr,
    pub at: DateTime<Utc>,
    pub strength: f32,
}

/// An append-only log trimmed to its most recent [`MEMORY_CAPACITY`]
/// entries, used for an agent's social memory and its influence
/// given/received ledgers alike.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BoundedLog<T> {
    entries: VecDeque<T>,
}

impl<T> BoundedLog<T> {
    pub fn new() -> Self {
        Self { entries: VecDeque::new() }
    }

    pub fn push(&mut self, entry: T) {
        self.entries.push_back(entry);
        while self.entries.len() > MEMORY_CAPACITY {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn recent(&self, n: usize) -> impl Iterator<Item = &T> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_to_capacity() {
        let mut log = BoundedLog::new();
        for i in 0..(MEMORY_CAPACITY + 10) {
            log.push(i);
        }
        assert_eq!(log.len(), MEMORY_CAPACITY);
        assert_eq!(*log.iter().next().unwrap(), 10);
    }

    #[test]
    fn recent_returns_last_n_in_order() {
        let mut log = BoundedLog::new();
        for i in 0..5 {
            log.push(i);
        }
        let last_two: Vec<_> = log.recent(2).copied().collect();
        assert_eq!(last_two, vec![3, 4]);
    }
}
