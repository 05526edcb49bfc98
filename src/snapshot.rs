//! Read-only projections of engine state.
//!
//! A snapshot is a plain value: the presentation layer and the analytics
//! in `stats` read it, nothing writes through it. All mutation goes
//! through `MemoryManager` operations.

use serde::Serialize;

use crate::process::SegmentEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameStatus {
    Free,
    Allocated,
}

/// One frame slot as the presentation layer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameView {
    pub index: usize,
    pub status: FrameStatus,
    pub process_id: Option<String>,
    pub page: Option<usize>,
}

/// Full engine state at one point in time. Two snapshots of identical
/// engine state compare equal, which is what makes reset-to-fresh testable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub frames: Vec<FrameView>,
    pub process_ids: Vec<String>,
    pub fault_log: Vec<String>,
    pub free_frames: Vec<usize>,
}

impl Snapshot {
    pub fn total_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn used_frames(&self) -> usize {
        self.frames.iter().filter(|f| f.status == FrameStatus::Allocated).count()
    }

    pub fn fault_count(&self) -> usize {
        self.fault_log.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessKind {
    Paging,
    Segmentation,
}

/// Per-process summary row for reports and exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessStats {
    pub id: String,
    pub kind: ProcessKind,
    /// Declared size for paging, summed segment sizes for segmentation.
    pub size: usize,
    /// Page-table length; zero for segmentation processes.
    pub pages: usize,
    /// Pages currently holding a frame; zero for segmentation processes.
    pub resident_pages: usize,
    pub segments: Vec<SegmentEntry>,
}
