//! Derived analytics over snapshots.
//!
//! Everything here is a read-only projection: functions take a `Snapshot`
//! and compute numbers from it. Percentages are reported to one decimal
//! place, matching what the presentation layer displays.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::snapshot::{FrameStatus, Snapshot};

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Free-space layout of the frame table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FragmentationStats {
    /// Number of maximal contiguous runs of free frames.
    pub free_blocks: usize,
    /// Length of the longest free run.
    pub largest_free_block: usize,
    pub total_free: usize,
    /// External fragmentation percentage, one decimal. Zero unless the
    /// free space is split across more than one block.
    pub external: f64,
    /// Free frames outside the largest block.
    pub fragmented_frames: usize,
}

pub fn fragmentation(snapshot: &Snapshot) -> FragmentationStats {
    let mut free_blocks = 0;
    let mut largest = 0;
    let mut run = 0;
    for frame in &snapshot.frames {
        if frame.status == FrameStatus::Free {
            run += 1;
        } else if run > 0 {
            free_blocks += 1;
            largest = largest.max(run);
            run = 0;
        }
    }
    if run > 0 {
        free_blocks += 1;
        largest = largest.max(run);
    }

    let total_free = snapshot.free_frames.len();
    let external = if total_free > 0 && free_blocks > 1 {
        round1((1.0 - largest as f64 / total_free as f64) * 100.0)
    } else {
        0.0
    };

    FragmentationStats {
        free_blocks,
        largest_free_block: largest,
        total_free,
        external,
        fragmented_frames: total_free - largest,
    }
}

/// Utilization discounted by fault pressure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyStats {
    /// Used frames over total frames, one decimal.
    pub utilization: f64,
    /// `utilization / (1 + ln(fault_count + 1))` once any fault happened,
    /// plain utilization before that.
    pub efficiency: f64,
    /// Length of the whole fault log, replacement lines included.
    pub fault_count: usize,
    pub wasted_frames: usize,
}

pub fn efficiency(snapshot: &Snapshot) -> EfficiencyStats {
    let total = snapshot.total_frames();
    let used = snapshot.used_frames();
    let utilization = if total > 0 {
        used as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    let fault_count = snapshot.fault_count();
    let efficiency = if utilization > 0.0 && fault_count > 0 {
        round1(utilization / (1.0 + ((fault_count + 1) as f64).ln()))
    } else {
        round1(utilization)
    };

    EfficiencyStats {
        utilization: round1(utilization),
        efficiency,
        fault_count,
        wasted_frames: total - used,
    }
}

/// Composite 0..=100 score: utilization capped at its sweet spot of 80,
/// minus external fragmentation, minus a fault penalty capped at 30.
pub fn health_score(snapshot: &Snapshot) -> f64 {
    if snapshot.frames.is_empty() {
        return 100.0;
    }
    let eff = efficiency(snapshot);
    let frag = fragmentation(snapshot);
    let fault_penalty = (snapshot.fault_count() as f64 / 10.0).min(30.0);
    let score = eff.utilization.min(80.0) - frag.external - fault_penalty;
    score.clamp(0.0, 100.0).round()
}

/// Which pages fault and how often, read back out of the `"PF: "` lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaultPatterns {
    pub total_faults: usize,
    pub distinct_pages: usize,
    /// Heaviest faulter as `(page, count)`; ties go to the first page in
    /// lexicographic order.
    pub most_faulted: Option<(String, usize)>,
}

pub fn fault_patterns(snapshot: &Snapshot) -> FaultPatterns {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for line in &snapshot.fault_log {
        if let Some(page) = line.strip_prefix("PF: ") {
            *counts.entry(page).or_insert(0) += 1;
        }
    }

    let total_faults: usize = counts.values().sum();
    let mut most_faulted: Option<(String, usize)> = None;
    for (page, count) in &counts {
        if most_faulted.as_ref().is_none_or(|(_, best)| count > best) {
            most_faulted = Some(((*page).to_string(), *count));
        }
    }

    FaultPatterns {
        total_faults,
        distinct_pages: counts.len(),
        most_faulted,
    }
}
