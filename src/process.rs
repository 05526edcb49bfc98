use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A `(process, page)` pair. This is the unit the frame table, the FIFO
/// queue and the LRU stamp table all key on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRef {
    pub pid: String,
    pub page: usize,
}

impl PageRef {
    pub fn new(pid: &str, page: usize) -> Self {
        PageRef { pid: pid.to_string(), page }
    }
}

impl fmt::Display for PageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-P{}", self.pid, self.page)
    }
}

/// One row of a paging process's page table.
///
/// Residency is `frame.is_some()`; there is no separate flag to drift out
/// of sync. `loaded_at` and `last_used` are values of the manager's
/// monotonic access counter, so two runs of the same operation sequence
/// produce identical tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageEntry {
    pub page: usize,
    pub frame: Option<usize>,
    pub loaded_at: Option<u64>,
    pub last_used: Option<u64>,
}

impl PageEntry {
    /// A fresh entry with no frame assigned.
    pub fn absent(page: usize) -> Self {
        PageEntry { page, frame: None, loaded_at: None, last_used: None }
    }

    pub fn resident(&self) -> bool {
        self.frame.is_some()
    }
}

/// A named region carved out of the shared byte-addressed space.
/// `limit` is the segment's length, so `base + limit` is its end offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentEntry {
    pub name: String,
    pub size: usize,
    pub base: usize,
    pub limit: usize,
}

/// Allocation record for one process id. An id maps to exactly one variant
/// at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Process {
    Paging {
        declared_size: usize,
        pages: BTreeMap<usize, PageEntry>,
    },
    Segmentation {
        segments: Vec<SegmentEntry>,
        total_size: usize,
    },
}

impl Process {
    pub fn is_paging(&self) -> bool {
        matches!(self, Process::Paging { .. })
    }

    pub fn pages(&self) -> Option<&BTreeMap<usize, PageEntry>> {
        match self {
            Process::Paging { pages, .. } => Some(pages),
            Process::Segmentation { .. } => None,
        }
    }

    pub fn pages_mut(&mut self) -> Option<&mut BTreeMap<usize, PageEntry>> {
        match self {
            Process::Paging { pages, .. } => Some(pages),
            Process::Segmentation { .. } => None,
        }
    }

    pub fn segments(&self) -> Option<&[SegmentEntry]> {
        match self {
            Process::Segmentation { segments, .. } => Some(segments),
            Process::Paging { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_ref_display_matches_log_format() {
        assert_eq!(PageRef::new("P1", 3).to_string(), "P1-P3");
    }

    #[test]
    fn test_residency_follows_frame_assignment() {
        let mut entry = PageEntry::absent(0);
        assert!(!entry.resident());
        entry.frame = Some(2);
        assert!(entry.resident());
    }
}
