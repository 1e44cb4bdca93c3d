//! A bounded, ordered log of entered command lines.

use std::collections::VecDeque;

/// Maximum number of entries a [`HistoryBuffer`] retains.
pub const MAX_HISTORY: usize = 50;

/// FIFO log of command lines with capacity eviction and indexed replay.
///
/// Entries are stored with a trailing newline so the `history` listing can
/// reproduce each line exactly as entered. Display indices are 1-based and
/// renumber after an eviction: the index identifies a position in the buffer
/// at display time, not a stable id.
#[derive(Debug, Clone, Default)]
pub struct HistoryBuffer {
    entries: VecDeque<String>,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Record a command line.
    ///
    /// Blank (whitespace-only) lines are ignored. When the buffer is full
    /// the oldest entry is dropped.
    pub fn append(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        self.entries.push_back(format!("{line}\n"));
        while self.entries.len() > MAX_HISTORY {
            self.entries.pop_front();
        }
    }

    /// Entry at a 1-based display index.
    pub fn get(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(String::as_str)
    }

    /// Entries as `(1-based index, text)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i + 1, entry.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
