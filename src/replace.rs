//! Victim selection for page replacement.
//!
//! Two policies are supported. FIFO keeps an eviction queue of resident
//! pages in load order and always evicts the front. LRU scans the occupied
//! frames and evicts the one with the smallest access stamp.

use std::collections::{HashMap, VecDeque};

use log::error;

use crate::error::{SimError, SimResult};
use crate::physical::FrameTable;
use crate::process::PageRef;

/// Replacement policy selector. Anything other than a case-insensitive
/// `"FIFO"` selects LRU, including unrecognized names; the loose match is
/// kept on purpose so callers passing free-form strings get the same
/// behavior the simulator always had.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Fifo,
    Lru,
}

impl Algorithm {
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("fifo") {
            Algorithm::Fifo
        } else {
            Algorithm::Lru
        }
    }
}

/// Resident pages in load order, oldest at the front.
#[derive(Debug, Clone, Default)]
pub struct FifoQueue {
    entries: VecDeque<PageRef>,
}

impl FifoQueue {
    pub fn new() -> Self {
        FifoQueue::default()
    }

    pub fn push(&mut self, page: PageRef) {
        self.entries.push_back(page);
    }

    pub fn pop_front(&mut self) -> Option<PageRef> {
        self.entries.pop_front()
    }

    /// Drop a specific entry wherever it sits in the queue. Needed when LRU
    /// evicts a page that is not at the front.
    pub fn remove(&mut self, page: &PageRef) {
        self.entries.retain(|entry| entry != page);
    }

    /// Drop every entry belonging to `pid`.
    pub fn remove_process(&mut self, pid: &str) {
        self.entries.retain(|entry| entry.pid != pid);
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageRef> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Access stamps keyed by `(process, page)`. Stamps come from a monotonic
/// counter, so a smaller stamp means a less recent access.
#[derive(Debug, Clone, Default)]
pub struct LruStamps {
    stamps: HashMap<PageRef, u64>,
}

impl LruStamps {
    pub fn new() -> Self {
        LruStamps::default()
    }

    pub fn record(&mut self, page: PageRef, stamp: u64) {
        self.stamps.insert(page, stamp);
    }

    pub fn stamp_of(&self, page: &PageRef) -> Option<u64> {
        self.stamps.get(page).copied()
    }

    pub fn remove_process(&mut self, pid: &str) {
        self.stamps.retain(|key, _| key.pid != pid);
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    pub fn clear(&mut self) {
        self.stamps.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PageRef, u64)> {
        self.stamps.iter().map(|(key, stamp)| (key, *stamp))
    }
}

/// Pop the FIFO victim and locate its frame.
///
/// A queue entry whose frame cannot be found means the queue and the frame
/// table have diverged, which the manager's bookkeeping rules out. Debug
/// builds assert on it; release builds log and fall back to frame 0 so the
/// simulation can limp on. The fallback result is a recovery, not an
/// answer to trust.
pub fn fifo_victim(queue: &mut FifoQueue, frames: &FrameTable) -> SimResult<(usize, PageRef)> {
    let victim = queue.pop_front().ok_or(SimError::EmptyFifoQueue)?;
    match frames.find_frame_of(&victim) {
        Some(index) => Ok((index, victim)),
        None => {
            debug_assert!(false, "FIFO victim {victim} not present in any frame");
            error!("FIFO victim {victim} not present in any frame, recovering with frame 0");
            Ok((0, victim))
        }
    }
}

/// Scan every occupied frame and pick the one with the smallest stamp,
/// breaking ties toward the lowest frame index.
///
/// A pair with no recorded stamp is treated as infinitely recent and is
/// never chosen while any stamped page remains. Pages loaded by a FIFO
/// replacement are the ones that end up in that state.
pub fn lru_victim(frames: &FrameTable, stamps: &LruStamps) -> SimResult<(usize, PageRef)> {
    let mut best: Option<(usize, PageRef, u64)> = None;
    for (index, occupant) in frames.occupied() {
        let stamp = stamps.stamp_of(occupant).unwrap_or(u64::MAX);
        let better = match &best {
            Some((_, _, best_stamp)) => stamp < *best_stamp,
            None => true,
        };
        if better {
            best = Some((index, occupant.clone(), stamp));
        }
    }
    best.map(|(index, victim, _)| (index, victim))
        .ok_or(SimError::NoResidentPages)
}
