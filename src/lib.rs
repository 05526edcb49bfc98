//! Educational simulator of operating-system memory management: paged
//! allocation with FIFO/LRU page replacement, first-fit segmentation, and
//! read-only snapshots with derived analytics on top.

pub mod error;
pub mod io;
pub mod manager;
pub mod physical;
pub mod process;
pub mod replace;
pub mod report;
pub mod segmentation;
pub mod snapshot;
pub mod stats;

// Re-export commonly used items for convenience
pub use error::{SimError, SimResult};
pub use manager::{AccessOutcome, MemoryManager};
pub use process::{PageEntry, PageRef, Process, SegmentEntry};
pub use replace::Algorithm;
pub use segmentation::SegmentRequest;
pub use snapshot::{FrameStatus, FrameView, ProcessKind, ProcessStats, Snapshot};
