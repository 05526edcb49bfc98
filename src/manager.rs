//! The allocation and replacement engine.
//!
//! `MemoryManager` owns every piece of simulator state: the frame table,
//! the process registry, the FIFO eviction queue, the LRU stamp table, the
//! fault log and the access counter. One logical actor drives it
//! sequentially; each operation runs to completion before the next starts,
//! and callers observe state only through `snapshot()` and the other
//! read-only projections.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use log::debug;

use crate::error::{SimError, SimResult};
use crate::physical::FrameTable;
use crate::process::{PageEntry, PageRef, Process, SegmentEntry};
use crate::replace::{self, Algorithm, FifoQueue, LruStamps};
use crate::segmentation::{self, SegmentRequest};
use crate::snapshot::{FrameStatus, FrameView, ProcessKind, ProcessStats, Snapshot};

/// Result of one `access_page` call. `replacement` carries the log line of
/// the eviction when one happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessOutcome {
    pub fault: bool,
    pub replacement: Option<String>,
}

impl AccessOutcome {
    fn hit() -> Self {
        AccessOutcome { fault: false, replacement: None }
    }

    fn fault_no_eviction() -> Self {
        AccessOutcome { fault: true, replacement: None }
    }
}

pub struct MemoryManager {
    frames: FrameTable,
    processes: BTreeMap<String, Process>,
    fault_log: Vec<String>,
    fifo: FifoQueue,
    stamps: LruStamps,
    access_counter: u64,
}

impl MemoryManager {
    pub fn new(memory_size: usize, frame_size: usize) -> SimResult<Self> {
        Ok(MemoryManager {
            frames: FrameTable::new(memory_size, frame_size)?,
            processes: BTreeMap::new(),
            fault_log: Vec::new(),
            fifo: FifoQueue::new(),
            stamps: LruStamps::new(),
            access_counter: 0,
        })
    }

    pub fn memory_size(&self) -> usize {
        self.frames.memory_size()
    }

    pub fn frame_size(&self) -> usize {
        self.frames.frame_size()
    }

    pub fn total_frames(&self) -> usize {
        self.frames.total_frames()
    }

    pub fn fault_log(&self) -> &[String] {
        &self.fault_log
    }

    /// Create a paging process of `process_size` bytes.
    ///
    /// Pages are loaded eagerly while free frames last; the rest of the
    /// table is created non-resident, which is the normal shape of a
    /// process bigger than available memory, not an error. An existing
    /// record under the same id is deallocated first so its frames cannot
    /// leak out of reach of any page table.
    pub fn allocate_paging(&mut self, pid: &str, process_size: usize) -> SimResult<Vec<PageEntry>> {
        if process_size == 0 {
            return Err(SimError::InvalidSize);
        }
        self.deallocate(pid);

        let pages_needed = process_size.div_ceil(self.frames.frame_size());
        let mut pages = BTreeMap::new();
        for page in 0..pages_needed {
            let key = PageRef::new(pid, page);
            let mut entry = PageEntry::absent(page);
            if let Some(index) = self.frames.acquire(key.clone()) {
                let stamp = self.touch(&key);
                entry.frame = Some(index);
                entry.loaded_at = Some(stamp);
                entry.last_used = Some(stamp);
                self.fifo.push(key);
            }
            pages.insert(page, entry);
        }

        let resident = pages.values().filter(|e| e.resident()).count();
        debug!("allocated {pid}: {pages_needed} pages, {resident} resident");

        let table: Vec<PageEntry> = pages.values().cloned().collect();
        self.processes.insert(
            pid.to_string(),
            Process::Paging { declared_size: process_size, pages },
        );
        self.debug_validate();
        Ok(table)
    }

    /// Simulate one access to `page` of paging process `pid`.
    ///
    /// A resident page is a hit: its stamp and last-used marker advance and
    /// nothing is logged. A non-resident page logs a fault, then loads into
    /// a free frame if one exists, otherwise evicts a victim chosen by
    /// `algorithm` (case-insensitive `"FIFO"`; anything else runs LRU).
    pub fn access_page(&mut self, pid: &str, page: usize, algorithm: &str) -> SimResult<AccessOutcome> {
        let resident = {
            let pages = match self.processes.get(pid) {
                Some(Process::Paging { pages, .. }) => pages,
                _ => return Err(SimError::ProcessNotFound(pid.to_string())),
            };
            let entry = pages.get(&page).ok_or_else(|| SimError::PageOutOfRange {
                process: pid.to_string(),
                page,
            })?;
            entry.resident()
        };

        let key = PageRef::new(pid, page);
        if resident {
            let stamp = self.touch(&key);
            if let Some(entry) = self.entry_mut(&key) {
                entry.last_used = Some(stamp);
            }
            debug!("hit {key}");
            return Ok(AccessOutcome::hit());
        }

        self.fault_log.push(format!("PF: {key}"));
        debug!("page fault {key}");

        if let Some(index) = self.frames.acquire(key.clone()) {
            let stamp = self.touch(&key);
            if let Some(entry) = self.entry_mut(&key) {
                entry.frame = Some(index);
                entry.loaded_at = Some(stamp);
            }
            self.fifo.push(key);
            self.debug_validate();
            return Ok(AccessOutcome::fault_no_eviction());
        }

        let outcome = match Algorithm::from_name(algorithm) {
            Algorithm::Fifo => self.replace_fifo(key),
            Algorithm::Lru => self.replace_lru(key),
        }?;
        self.debug_validate();
        Ok(outcome)
    }

    /// Access every page of `pid` in page order, the way the original
    /// "simulate access" control does. Returns how many accesses faulted.
    pub fn access_all(&mut self, pid: &str, algorithm: &str) -> SimResult<usize> {
        let pages: Vec<usize> = match self.processes.get(pid) {
            Some(Process::Paging { pages, .. }) => pages.keys().copied().collect(),
            _ => return Err(SimError::ProcessNotFound(pid.to_string())),
        };
        let mut faults = 0;
        for page in pages {
            if self.access_page(pid, page, algorithm)?.fault {
                faults += 1;
            }
        }
        Ok(faults)
    }

    /// Allocate named segments for `pid` by first-fit over the byte space.
    ///
    /// Placement is computed against a scratch view of the ranges owned by
    /// every other registered process, so a failure commits nothing. Only
    /// on success is any prior record for `pid` torn down and replaced.
    pub fn allocate_segmentation(
        &mut self,
        pid: &str,
        requests: &[SegmentRequest],
    ) -> SimResult<Vec<SegmentEntry>> {
        let mut occupied: Vec<(usize, usize)> = Vec::new();
        for (other, process) in &self.processes {
            if other == pid {
                continue;
            }
            if let Some(segments) = process.segments() {
                for seg in segments {
                    occupied.push((seg.base, seg.base + seg.limit));
                }
            }
        }
        occupied.sort_unstable();

        let free = segmentation::free_ranges(&occupied, self.frames.memory_size());
        let segments = segmentation::first_fit(requests, free)?;

        self.deallocate(pid);
        let total_size = segments.iter().map(|s| s.size).sum();
        debug!("allocated {pid}: {} segments, {total_size} bytes", segments.len());
        self.processes.insert(
            pid.to_string(),
            Process::Segmentation { segments: segments.clone(), total_size },
        );
        self.debug_validate();
        Ok(segments)
    }

    /// Remove a process and everything it holds. Paging frames go back to
    /// the free set and the process's queue entries and stamps are purged;
    /// a segmentation record frees its ranges simply by leaving the
    /// registry. Unknown ids are a no-op.
    pub fn deallocate(&mut self, pid: &str) {
        let Some(process) = self.processes.remove(pid) else {
            return;
        };
        if let Process::Paging { pages, .. } = process {
            for entry in pages.values() {
                if let Some(frame) = entry.frame {
                    self.frames.release(frame);
                }
            }
            self.fifo.remove_process(pid);
            self.stamps.remove_process(pid);
        }
        debug!("deallocated {pid}");
        self.debug_validate();
    }

    /// Back to construction-time state: all frames free, no processes, an
    /// empty log and queue, counter at zero.
    pub fn reset(&mut self) {
        self.frames.reset();
        self.processes.clear();
        self.fault_log.clear();
        self.fifo.clear();
        self.stamps.clear();
        self.access_counter = 0;
    }

    /// Immutable view of current state for presentation and analytics.
    pub fn snapshot(&self) -> Snapshot {
        let frames = (0..self.frames.total_frames())
            .map(|index| match self.frames.occupant(index) {
                Some(occ) => FrameView {
                    index,
                    status: FrameStatus::Allocated,
                    process_id: Some(occ.pid.clone()),
                    page: Some(occ.page),
                },
                None => FrameView {
                    index,
                    status: FrameStatus::Free,
                    process_id: None,
                    page: None,
                },
            })
            .collect();
        Snapshot {
            frames,
            process_ids: self.processes.keys().cloned().collect(),
            fault_log: self.fault_log.clone(),
            free_frames: self.frames.free_indices().collect(),
        }
    }

    /// Page table of a paging process, rows in page order. `None` when the
    /// id is unknown or the process uses segmentation.
    pub fn page_table(&self, pid: &str) -> Option<Vec<PageEntry>> {
        self.processes
            .get(pid)?
            .pages()
            .map(|pages| pages.values().cloned().collect())
    }

    /// Segment list of a segmentation process, in allocation order.
    pub fn segment_table(&self, pid: &str) -> Option<Vec<SegmentEntry>> {
        self.processes.get(pid)?.segments().map(<[SegmentEntry]>::to_vec)
    }

    /// Per-process summary rows for reports and exports.
    pub fn process_stats(&self) -> Vec<ProcessStats> {
        self.processes
            .iter()
            .map(|(id, process)| match process {
                Process::Paging { declared_size, pages } => ProcessStats {
                    id: id.clone(),
                    kind: ProcessKind::Paging,
                    size: *declared_size,
                    pages: pages.len(),
                    resident_pages: pages.values().filter(|e| e.resident()).count(),
                    segments: Vec::new(),
                },
                Process::Segmentation { segments, total_size } => ProcessStats {
                    id: id.clone(),
                    kind: ProcessKind::Segmentation,
                    size: *total_size,
                    pages: 0,
                    resident_pages: 0,
                    segments: segments.clone(),
                },
            })
            .collect()
    }

    fn touch(&mut self, key: &PageRef) -> u64 {
        self.access_counter += 1;
        self.stamps.record(key.clone(), self.access_counter);
        self.access_counter
    }

    fn entry_mut(&mut self, key: &PageRef) -> Option<&mut PageEntry> {
        self.processes.get_mut(&key.pid)?.pages_mut()?.get_mut(&key.page)
    }

    fn clear_residency(&mut self, key: &PageRef) {
        if let Some(entry) = self.entry_mut(key) {
            entry.frame = None;
        }
    }

    fn replace_fifo(&mut self, incoming: PageRef) -> SimResult<AccessOutcome> {
        let (frame_index, victim) = replace::fifo_victim(&mut self.fifo, &self.frames)?;
        self.frames.reassign(frame_index, incoming.clone());
        self.clear_residency(&victim);

        // The incoming page gets a load marker but no LRU stamp on this
        // path; see `replace::lru_victim` for what that implies later.
        self.access_counter += 1;
        let loaded_at = self.access_counter;
        if let Some(entry) = self.entry_mut(&incoming) {
            entry.frame = Some(frame_index);
            entry.loaded_at = Some(loaded_at);
        }
        self.fifo.push(incoming.clone());

        let message = format!("REPLACE FIFO: evict {victim} → load {incoming}");
        debug!("{message}");
        self.fault_log.push(message.clone());
        Ok(AccessOutcome { fault: true, replacement: Some(message) })
    }

    fn replace_lru(&mut self, incoming: PageRef) -> SimResult<AccessOutcome> {
        let (frame_index, victim) = replace::lru_victim(&self.frames, &self.stamps)?;
        self.frames.reassign(frame_index, incoming.clone());
        self.clear_residency(&victim);
        self.fifo.remove(&victim);

        let stamp = self.touch(&incoming);
        if let Some(entry) = self.entry_mut(&incoming) {
            entry.frame = Some(frame_index);
            entry.loaded_at = Some(stamp);
        }
        self.fifo.push(incoming.clone());

        let message = format!("REPLACE LRU: evict {victim} → load {incoming}");
        debug!("{message}");
        self.fault_log.push(message.clone());
        Ok(AccessOutcome { fault: true, replacement: Some(message) })
    }

    fn debug_validate(&self) {
        debug_assert_eq!(self.validate(), Ok(()), "bookkeeping invariants violated");
    }

    /// Full consistency check over every bookkeeping structure. Exercised
    /// by the randomized tests and by debug builds after each mutation.
    pub fn validate(&self) -> Result<(), String> {
        let total = self.frames.total_frames();

        // Free set and occupied slots must partition the frame indices.
        let free: BTreeSet<usize> = self.frames.free_indices().collect();
        for index in 0..total {
            let occupied = self.frames.occupant(index).is_some();
            if occupied == free.contains(&index) {
                return Err(format!("frame {index} is not exactly one of free or occupied"));
            }
        }

        // Resident page entries and occupied frames must match one-to-one.
        let mut claimed: BTreeMap<usize, PageRef> = BTreeMap::new();
        for (pid, process) in &self.processes {
            if let Some(pages) = process.pages() {
                for entry in pages.values() {
                    if let Some(frame) = entry.frame {
                        let key = PageRef::new(pid, entry.page);
                        match self.frames.occupant(frame) {
                            Some(occ) if *occ == key => {}
                            _ => {
                                return Err(format!(
                                    "frame {frame} occupant does not match resident entry {key}"
                                ));
                            }
                        }
                        if claimed.insert(frame, key.clone()).is_some() {
                            return Err(format!("frame {frame} claimed by two resident entries"));
                        }
                    }
                }
            }
        }
        let occupied_count = self.frames.occupied().count();
        if claimed.len() != occupied_count {
            return Err(format!(
                "{} resident entries against {occupied_count} occupied frames",
                claimed.len()
            ));
        }

        // FIFO queue holds exactly the resident pages, no duplicates.
        let mut queued: HashSet<PageRef> = HashSet::new();
        for entry in self.fifo.iter() {
            if !queued.insert(entry.clone()) {
                return Err(format!("duplicate FIFO entry {entry}"));
            }
            if self.frames.find_frame_of(entry).is_none() {
                return Err(format!("FIFO entry {entry} is not resident"));
            }
        }
        if queued.len() != occupied_count {
            return Err(format!(
                "FIFO queue tracks {} pages against {occupied_count} occupied frames",
                queued.len()
            ));
        }

        // Stamps are unique and never ahead of the counter.
        let mut stamp_values: HashSet<u64> = HashSet::new();
        for (key, stamp) in self.stamps.iter() {
            if stamp > self.access_counter {
                return Err(format!(
                    "stamp {stamp} for {key} exceeds access counter {}",
                    self.access_counter
                ));
            }
            if !stamp_values.insert(stamp) {
                return Err(format!("stamp {stamp} recorded for two pages"));
            }
        }

        // Segment ranges stay inside memory and never overlap.
        let mut ranges: Vec<(usize, usize)> = Vec::new();
        for (pid, process) in &self.processes {
            if let Some(segments) = process.segments() {
                for seg in segments {
                    if seg.limit != seg.size {
                        return Err(format!("segment {} of {pid} has limit != size", seg.name));
                    }
                    if seg.base + seg.limit > self.frames.memory_size() {
                        return Err(format!("segment {} of {pid} ends past memory", seg.name));
                    }
                    ranges.push((seg.base, seg.base + seg.limit));
                }
            }
        }
        ranges.sort_unstable();
        for pair in ranges.windows(2) {
            if pair[0].1 > pair[1].0 {
                return Err(format!("segment ranges overlap at offset {}", pair[1].0));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> MemoryManager {
        MemoryManager::new(256, 64).unwrap()
    }

    #[test]
    fn test_new_engine_starts_all_free() {
        let mm = manager();
        assert_eq!(mm.total_frames(), 4);
        let snap = mm.snapshot();
        assert_eq!(snap.free_frames, vec![0, 1, 2, 3]);
        assert!(snap.fault_log.is_empty());
        assert!(snap.process_ids.is_empty());
    }

    #[test]
    fn test_paging_creates_ceil_pages() {
        let mut mm = manager();
        let table = mm.allocate_paging("P1", 200).unwrap();
        // ceil(200 / 64) = 4
        assert_eq!(table.len(), 4);
        assert_eq!(table.iter().map(|e| e.page).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert!(table.iter().all(PageEntry::resident));
    }

    #[test]
    fn test_zero_size_paging_is_invalid() {
        let mut mm = manager();
        assert_eq!(mm.allocate_paging("P1", 0).unwrap_err(), SimError::InvalidSize);
        assert!(mm.snapshot().process_ids.is_empty());
    }

    #[test]
    fn test_overcommit_leaves_pages_non_resident() {
        let mut mm = manager();
        mm.allocate_paging("P1", 256).unwrap();
        let table = mm.allocate_paging("P2", 128).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.iter().all(|e| !e.resident()));
        // Overcommit is not a fault; nothing is logged.
        assert!(mm.fault_log().is_empty());
    }

    #[test]
    fn test_resident_access_is_a_silent_hit() {
        let mut mm = manager();
        mm.allocate_paging("P1", 100).unwrap();
        let outcome = mm.access_page("P1", 0, "FIFO").unwrap();
        assert_eq!(outcome, AccessOutcome { fault: false, replacement: None });
        assert!(mm.fault_log().is_empty());
    }

    #[test]
    fn test_fault_with_free_frame_loads_directly() {
        let mut mm = manager();
        mm.allocate_paging("P1", 256).unwrap(); // fills all four frames
        mm.allocate_paging("P2", 128).unwrap(); // 2 pages, both non-resident
        mm.deallocate("P1"); // head room appears after the fact

        let outcome = mm.access_page("P2", 0, "FIFO").unwrap();
        assert_eq!(outcome, AccessOutcome { fault: true, replacement: None });
        assert_eq!(mm.fault_log(), ["PF: P2-P0"]);
        // Lowest-indexed free frame wins.
        assert_eq!(mm.page_table("P2").unwrap()[0].frame, Some(0));
    }

    #[test]
    fn test_unknown_process_is_not_found() {
        let mut mm = manager();
        assert_eq!(
            mm.access_page("P9", 0, "FIFO").unwrap_err(),
            SimError::ProcessNotFound("P9".to_string())
        );
    }

    #[test]
    fn test_segmentation_process_is_wrong_variant_for_access() {
        let mut mm = manager();
        mm.allocate_segmentation("S1", &[SegmentRequest::new("code", 64)]).unwrap();
        assert_eq!(
            mm.access_page("S1", 0, "FIFO").unwrap_err(),
            SimError::ProcessNotFound("S1".to_string())
        );
    }

    #[test]
    fn test_access_past_table_is_out_of_range() {
        let mut mm = manager();
        mm.allocate_paging("P1", 200).unwrap();
        assert_eq!(
            mm.access_page("P1", 4, "FIFO").unwrap_err(),
            SimError::PageOutOfRange { process: "P1".to_string(), page: 4 }
        );
    }

    #[test]
    fn test_fifo_evicts_in_load_order() {
        let mut mm = manager();
        mm.allocate_paging("P1", 256).unwrap(); // pages 0..4 fill all frames
        mm.allocate_paging("P2", 128).unwrap(); // 2 pages, both non-resident

        let outcome = mm.access_page("P2", 0, "FIFO").unwrap();
        assert_eq!(
            outcome.replacement.as_deref(),
            Some("REPLACE FIFO: evict P1-P0 → load P2-P0")
        );
        let outcome = mm.access_page("P2", 1, "FIFO").unwrap();
        assert_eq!(
            outcome.replacement.as_deref(),
            Some("REPLACE FIFO: evict P1-P1 → load P2-P1")
        );
    }

    #[test]
    fn test_lru_evicts_least_recently_stamped() {
        let mut mm = manager();
        mm.allocate_paging("P1", 256).unwrap();
        // Refresh pages 0..3 except page 1, which becomes the oldest stamp.
        mm.access_page("P1", 0, "LRU").unwrap();
        mm.access_page("P1", 2, "LRU").unwrap();
        mm.access_page("P1", 3, "LRU").unwrap();

        mm.allocate_paging("P2", 64).unwrap(); // non-resident
        let outcome = mm.access_page("P2", 0, "LRU").unwrap();
        assert_eq!(
            outcome.replacement.as_deref(),
            Some("REPLACE LRU: evict P1-P1 → load P2-P0")
        );
    }

    #[test]
    fn test_unrecognized_algorithm_runs_lru() {
        let mut mm = manager();
        mm.allocate_paging("P1", 256).unwrap();
        mm.access_page("P1", 0, "whatever").unwrap();
        mm.access_page("P1", 2, "whatever").unwrap();
        mm.access_page("P1", 3, "whatever").unwrap();

        mm.allocate_paging("P2", 64).unwrap();
        let outcome = mm.access_page("P2", 0, "not-a-policy").unwrap();
        assert_eq!(
            outcome.replacement.as_deref(),
            Some("REPLACE LRU: evict P1-P1 → load P2-P0")
        );
    }

    #[test]
    fn test_replacement_logs_fault_then_eviction() {
        let mut mm = manager();
        mm.allocate_paging("P1", 256).unwrap();
        mm.allocate_paging("P2", 64).unwrap();
        mm.access_page("P2", 0, "FIFO").unwrap();

        assert_eq!(
            mm.fault_log(),
            [
                "PF: P2-P0",
                "REPLACE FIFO: evict P1-P0 → load P2-P0",
            ]
        );
    }

    #[test]
    fn test_evicted_page_faults_on_next_access() {
        let mut mm = manager();
        mm.allocate_paging("P1", 256).unwrap();
        mm.allocate_paging("P2", 64).unwrap();
        mm.access_page("P2", 0, "FIFO").unwrap(); // evicts P1-P0

        let outcome = mm.access_page("P1", 0, "FIFO").unwrap();
        assert!(outcome.fault);
        assert_eq!(
            outcome.replacement.as_deref(),
            Some("REPLACE FIFO: evict P1-P1 → load P1-P0")
        );
    }

    #[test]
    fn test_deallocate_releases_frames_and_trackers() {
        let mut mm = manager();
        mm.allocate_paging("P1", 256).unwrap();
        mm.deallocate("P1");

        let snap = mm.snapshot();
        assert_eq!(snap.free_frames, vec![0, 1, 2, 3]);
        assert!(snap.process_ids.is_empty());
        assert!(mm.fifo.is_empty());
        assert!(mm.stamps.is_empty());
    }

    #[test]
    fn test_deallocate_unknown_is_a_no_op() {
        let mut mm = manager();
        mm.deallocate("nobody");
        assert_eq!(mm.snapshot().free_frames.len(), 4);
    }

    #[test]
    fn test_reallocation_frees_the_old_record_first() {
        let mut mm = manager();
        mm.allocate_paging("P1", 256).unwrap();
        mm.allocate_paging("P1", 64).unwrap();

        // The four old frames came back before the single new page loaded;
        // nothing is left orphaned.
        let snap = mm.snapshot();
        assert_eq!(snap.free_frames.len(), 3);
        assert_eq!(mm.page_table("P1").unwrap().len(), 1);
        assert_eq!(mm.validate(), Ok(()));
    }

    #[test]
    fn test_segmentation_first_fit_from_registry_state() {
        let mut mm = MemoryManager::new(1024, 64).unwrap();
        mm.allocate_segmentation("S1", &[SegmentRequest::new("code", 100)]).unwrap();
        let segments = mm
            .allocate_segmentation("S2", &[SegmentRequest::new("data", 80)])
            .unwrap();
        assert_eq!(segments[0].base, 100);
    }

    #[test]
    fn test_segmentation_failure_commits_nothing() {
        let mut mm = MemoryManager::new(256, 64).unwrap();
        let err = mm
            .allocate_segmentation(
                "S1",
                &[SegmentRequest::new("small", 50), SegmentRequest::new("huge", 257)],
            )
            .unwrap_err();
        assert_eq!(err, SimError::InsufficientSpace { segment: "huge".to_string() });
        assert!(mm.segment_table("S1").is_none());
        assert!(mm.snapshot().process_ids.is_empty());
    }

    #[test]
    fn test_failed_reallocation_keeps_the_old_record() {
        let mut mm = MemoryManager::new(256, 64).unwrap();
        mm.allocate_segmentation("S1", &[SegmentRequest::new("code", 100)]).unwrap();
        let err = mm
            .allocate_segmentation("S1", &[SegmentRequest::new("big", 1000)])
            .unwrap_err();
        assert_eq!(err, SimError::InsufficientSpace { segment: "big".to_string() });
        // The old segments survive an aborted replacement.
        let segments = mm.segment_table("S1").unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].name, "code");
    }

    #[test]
    fn test_segmentation_reallocation_reuses_own_space() {
        let mut mm = MemoryManager::new(256, 64).unwrap();
        mm.allocate_segmentation("S1", &[SegmentRequest::new("code", 200)]).unwrap();
        // 200 of 256 bytes are held by S1 itself; the replacement must be
        // placed as if those bytes were free.
        let segments = mm
            .allocate_segmentation("S1", &[SegmentRequest::new("code2", 220)])
            .unwrap();
        assert_eq!(segments[0].base, 0);
    }

    #[test]
    fn test_switching_variant_releases_paging_frames() {
        let mut mm = manager();
        mm.allocate_paging("P1", 256).unwrap();
        mm.allocate_segmentation("P1", &[SegmentRequest::new("code", 64)]).unwrap();

        let snap = mm.snapshot();
        assert_eq!(snap.free_frames, vec![0, 1, 2, 3]);
        assert_eq!(mm.validate(), Ok(()));
    }

    #[test]
    fn test_reset_restores_construction_snapshot() {
        let mut mm = manager();
        let fresh = mm.snapshot();

        mm.allocate_paging("P1", 200).unwrap();
        mm.allocate_segmentation("S1", &[SegmentRequest::new("code", 10)]).unwrap();
        mm.access_page("P1", 0, "LRU").unwrap();
        mm.reset();

        assert_eq!(mm.snapshot(), fresh);
    }

    #[test]
    fn test_access_all_touches_every_page_in_order() {
        let mut mm = manager();
        mm.allocate_paging("P1", 256).unwrap();
        mm.allocate_paging("P2", 128).unwrap(); // both pages non-resident
        let faults = mm.access_all("P2", "FIFO").unwrap();
        assert_eq!(faults, 2);
        assert_eq!(mm.access_all("P2", "FIFO").unwrap(), 0); // now resident
    }

    #[test]
    fn test_process_stats_summarize_both_kinds() {
        let mut mm = MemoryManager::new(1024, 64).unwrap();
        mm.allocate_paging("P1", 200).unwrap();
        mm.allocate_segmentation("S1", &[SegmentRequest::new("code", 100)]).unwrap();

        let stats = mm.process_stats();
        assert_eq!(stats.len(), 2);
        let p1 = stats.iter().find(|s| s.id == "P1").unwrap();
        assert_eq!(p1.kind, ProcessKind::Paging);
        assert_eq!(p1.pages, 4);
        assert_eq!(p1.resident_pages, 4);
        let s1 = stats.iter().find(|s| s.id == "S1").unwrap();
        assert_eq!(s1.kind, ProcessKind::Segmentation);
        assert_eq!(s1.size, 100);
        assert_eq!(s1.segments.len(), 1);
    }

    // The worked example: 256 bytes of memory, 64-byte frames.
    #[test]
    fn test_end_to_end_pressure_scenario() {
        let mut mm = manager();
        assert_eq!(mm.total_frames(), 4);

        let table = mm.allocate_paging("P1", 200).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(mm.snapshot().free_frames.len(), 0);

        assert_eq!(
            mm.access_page("P1", 4, "FIFO").unwrap_err(),
            SimError::PageOutOfRange { process: "P1".to_string(), page: 4 }
        );

        let table = mm.allocate_paging("P2", 64).unwrap();
        assert_eq!(table.len(), 1);
        assert!(!table[0].resident());

        let outcome = mm.access_page("P2", 0, "FIFO").unwrap();
        assert!(outcome.fault);
        assert_eq!(
            outcome.replacement.as_deref(),
            Some("REPLACE FIFO: evict P1-P0 → load P2-P0")
        );
    }
}
