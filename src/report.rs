//! Human-readable report and machine-readable JSON export.
//!
//! Both render from a snapshot plus the per-process summary rows; neither
//! touches the engine. The output carries no timestamps, so identical
//! state always renders identically.

use std::fmt::Write;

use serde::Serialize;

use crate::snapshot::{FrameView, ProcessKind, ProcessStats, Snapshot};
use crate::stats::{self, EfficiencyStats, FaultPatterns, FragmentationStats};

const RULE: char = '=';
const LIGHT_RULE: char = '-';

fn rule(ch: char) -> String {
    ch.to_string().repeat(60)
}

/// Sectioned plain-text report: memory overview, fragmentation, faults,
/// then one block per process.
pub fn render_report(snapshot: &Snapshot, processes: &[ProcessStats]) -> String {
    let frag = stats::fragmentation(snapshot);
    let eff = stats::efficiency(snapshot);

    let mut out = String::new();
    let _ = writeln!(out, "Memory Management Report");
    let _ = writeln!(out, "{}", rule(RULE));
    let _ = writeln!(out);
    let _ = writeln!(out, "MEMORY OVERVIEW");
    let _ = writeln!(out, "{}", rule(LIGHT_RULE));
    let _ = writeln!(out, "Total Frames: {}", snapshot.total_frames());
    let _ = writeln!(out, "Used Frames: {}", snapshot.used_frames());
    let _ = writeln!(out, "Free Frames: {}", snapshot.free_frames.len());
    let _ = writeln!(out, "Utilization: {}%", eff.utilization);
    let _ = writeln!(out, "Efficiency: {}%", eff.efficiency);
    let _ = writeln!(out);
    let _ = writeln!(out, "FRAGMENTATION ANALYSIS");
    let _ = writeln!(out, "{}", rule(LIGHT_RULE));
    let _ = writeln!(out, "Free Blocks: {}", frag.free_blocks);
    let _ = writeln!(out, "Largest Free Block: {} frames", frag.largest_free_block);
    let _ = writeln!(out, "External Fragmentation: {}%", frag.external);
    let _ = writeln!(out, "Fragmented Frames: {}", frag.fragmented_frames);
    let _ = writeln!(out);
    let _ = writeln!(out, "PAGE FAULTS");
    let _ = writeln!(out, "{}", rule(LIGHT_RULE));
    let _ = writeln!(out, "Total Faults: {}", eff.fault_count);
    let _ = writeln!(out);
    let _ = writeln!(out, "PROCESS STATISTICS");
    let _ = writeln!(out, "{}", rule(LIGHT_RULE));

    for (position, process) in processes.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Process {}: {}", position + 1, process.id);
        match process.kind {
            ProcessKind::Paging => {
                let _ = writeln!(out, "  Type: paging");
                let _ = writeln!(out, "  Size: {} bytes", process.size);
                let _ = writeln!(
                    out,
                    "  Pages: {} ({} resident)",
                    process.pages, process.resident_pages
                );
            }
            ProcessKind::Segmentation => {
                let _ = writeln!(out, "  Type: segmentation");
                let _ = writeln!(out, "  Size: {} bytes", process.size);
                let _ = writeln!(out, "  Segments:");
                for segment in &process.segments {
                    let _ = writeln!(
                        out,
                        "    {}: {} bytes at base {}",
                        segment.name, segment.size, segment.base
                    );
                }
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", rule(RULE));
    let _ = writeln!(out, "End of Report");
    out
}

#[derive(Serialize)]
struct Metrics {
    fragmentation: FragmentationStats,
    efficiency: EfficiencyStats,
    fault_patterns: FaultPatterns,
    health_score: f64,
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    frames: &'a [FrameView],
    processes: &'a [ProcessStats],
    fault_log: &'a [String],
    free_frames: &'a [usize],
    metrics: Metrics,
}

/// Pretty-printed JSON document with the full state and the analytics
/// block, suitable for saving to a file.
pub fn export_json(snapshot: &Snapshot, processes: &[ProcessStats]) -> serde_json::Result<String> {
    let document = ExportDocument {
        frames: &snapshot.frames,
        processes,
        fault_log: &snapshot.fault_log,
        free_frames: &snapshot.free_frames,
        metrics: Metrics {
            fragmentation: stats::fragmentation(snapshot),
            efficiency: stats::efficiency(snapshot),
            fault_patterns: stats::fault_patterns(snapshot),
            health_score: stats::health_score(snapshot),
        },
    };
    serde_json::to_string_pretty(&document)
}
