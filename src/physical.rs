use std::collections::BTreeSet;

use crate::error::{SimError, SimResult};
use crate::process::PageRef;

/// Physical memory modeled as a fixed array of frame slots plus the set of
/// currently free frame indices. The two views are kept as an exact
/// partition of `0..total_frames`.
#[derive(Debug, Clone)]
pub struct FrameTable {
    memory_size: usize,
    frame_size: usize,
    frames: Vec<Option<PageRef>>,
    free: BTreeSet<usize>,
}

impl FrameTable {
    /// Build a frame table for `memory_size` bytes split into frames of
    /// `frame_size` bytes. A memory smaller than one frame still yields a
    /// single frame.
    pub fn new(memory_size: usize, frame_size: usize) -> SimResult<Self> {
        if frame_size == 0 {
            return Err(SimError::InvalidSize);
        }
        let total = (memory_size / frame_size).max(1);
        Ok(FrameTable {
            memory_size,
            frame_size,
            frames: vec![None; total],
            free: (0..total).collect(),
        })
    }

    pub fn memory_size(&self) -> usize {
        self.memory_size
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn total_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn has_free(&self) -> bool {
        !self.free.is_empty()
    }

    /// Free frame indices in ascending order.
    pub fn free_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.free.iter().copied()
    }

    /// Occupied frames in ascending index order.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &PageRef)> {
        self.frames
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|occ| (i, occ)))
    }

    pub fn occupant(&self, index: usize) -> Option<&PageRef> {
        self.frames.get(index).and_then(|slot| slot.as_ref())
    }

    /// Claim the lowest-indexed free frame for `occupant`. Returns `None`
    /// when every frame is occupied; callers are expected to check
    /// `has_free` first and treat `None` as the replacement trigger.
    pub fn acquire(&mut self, occupant: PageRef) -> Option<usize> {
        let index = self.free.iter().next().copied()?;
        self.free.remove(&index);
        self.frames[index] = Some(occupant);
        Some(index)
    }

    /// Clear a frame and return its index to the free set.
    pub fn release(&mut self, index: usize) {
        if index < self.frames.len() {
            self.frames[index] = None;
            self.free.insert(index);
        }
    }

    /// Overwrite the occupant of an already-occupied frame. Used by the
    /// replacement path, where the victim's frame is handed directly to the
    /// incoming page without passing through the free set.
    pub fn reassign(&mut self, index: usize, occupant: PageRef) {
        self.frames[index] = Some(occupant);
    }

    /// Locate the frame holding `occupant`, scanning indices in ascending
    /// order and taking the first match.
    pub fn find_frame_of(&self, occupant: &PageRef) -> Option<usize> {
        self.frames
            .iter()
            .position(|slot| slot.as_ref() == Some(occupant))
    }

    /// Return every frame to the free set.
    pub fn reset(&mut self) {
        for slot in &mut self.frames {
            *slot = None;
        }
        self.free = (0..self.frames.len()).collect();
    }
}
