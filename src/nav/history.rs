use std::collections::VecDeque;

use crate::geometry::Region;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Bounds reached by a drill; a valid undo target.
    Checkpoint,
    /// Last position of a continuous move; never restored by `back`.
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub bounds: Region,
    pub kind: EntryKind,
}

/// Undo stack of visited regions. At most one manual entry exists, and only
/// on top.
#[derive(Debug, Clone)]
pub struct NavHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl NavHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn push_checkpoint(&mut self, bounds: Region) {
        self.push(HistoryEntry {
            bounds,
            kind: EntryKind::Checkpoint,
        });
    }

    /// Records a manual position, replacing the top entry if it is already
    /// manual.
    pub fn record_manual(&mut self, bounds: Region) {
        if let Some(top) = self.entries.back_mut()
            && top.kind == EntryKind::Manual
        {
            top.bounds = bounds;
            return;
        }
        self.push(HistoryEntry {
            bounds,
            kind: EntryKind::Manual,
        });
    }

    /// Pops the most recent checkpoint, discarding a manual entry above it.
    pub fn pop_checkpoint(&mut self) -> Option<Region> {
        if self
            .entries
            .back()
            .is_some_and(|top| top.kind == EntryKind::Manual)
        {
            self.entries.pop_back();
        }
        self.entries.pop_back().map(|entry| entry.bounds)
    }

    fn push(&mut self, entry: HistoryEntry) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }
}
