//! First-fit segment placement over the shared byte-addressed space.
//!
//! The functions here are pure: they take the occupied ranges as data and
//! hand back either a fully placed segment list or an error, so a failed
//! request never leaves partial state behind. The manager commits the
//! result only on success.

use crate::error::{SimError, SimResult};
use crate::process::SegmentEntry;

/// One requested segment, in the order the caller wants them placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentRequest {
    pub name: String,
    pub size: usize,
}

impl SegmentRequest {
    pub fn new(name: &str, size: usize) -> Self {
        SegmentRequest { name: name.to_string(), size }
    }
}

/// Compute the free-range complement of `occupied` over `[0, memory_size)`.
/// `occupied` must be sorted ascending by start; ranges are half-open
/// `(start, end)` pairs.
pub fn free_ranges(occupied: &[(usize, usize)], memory_size: usize) -> Vec<(usize, usize)> {
    let mut free = Vec::new();
    let mut cursor = 0;
    for &(start, end) in occupied {
        if cursor < start {
            free.push((cursor, start));
        }
        cursor = cursor.max(end);
    }
    if cursor < memory_size {
        free.push((cursor, memory_size));
    }
    free
}

/// Place every request first-fit into `free`, consuming ranges from the
/// front. All-or-nothing: the first request that fits nowhere fails the
/// whole batch with the segment's name.
pub fn first_fit(requests: &[SegmentRequest], mut free: Vec<(usize, usize)>) -> SimResult<Vec<SegmentEntry>> {
    let mut segments = Vec::with_capacity(requests.len());
    for request in requests {
        let mut placed = false;
        for i in 0..free.len() {
            let (start, end) = free[i];
            if end - start >= request.size {
                segments.push(SegmentEntry {
                    name: request.name.clone(),
                    size: request.size,
                    base: start,
                    limit: request.size,
                });
                let new_start = start + request.size;
                if new_start >= end {
                    free.remove(i);
                } else {
                    free[i] = (new_start, end);
                }
                placed = true;
                break;
            }
        }
        if !placed {
            return Err(SimError::InsufficientSpace { segment: request.name.clone() });
        }
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_ranges_of_empty_memory_is_one_span() {
        assert_eq!(free_ranges(&[], 1024), vec![(0, 1024)]);
    }

    #[test]
    fn test_free_ranges_walks_gaps_and_tail() {
        let occupied = [(100, 150), (250, 300)];
        assert_eq!(free_ranges(&occupied, 400), vec![(0, 100), (150, 250), (300, 400)]);
    }

    #[test]
    fn test_free_ranges_with_adjacent_occupied_ranges() {
        let occupied = [(0, 100), (100, 200)];
        assert_eq!(free_ranges(&occupied, 300), vec![(200, 300)]);
    }

    #[test]
    fn test_free_ranges_fully_occupied_is_empty() {
        assert_eq!(free_ranges(&[(0, 256)], 256), Vec::<(usize, usize)>::new());
    }

    #[test]
    fn test_first_fit_is_deterministic() {
        // Free ranges [0,100) and [150,250): an 80-byte request lands at 0,
        // a following 90-byte request skips the shrunken first range and
        // lands at 150.
        let free = vec![(0, 100), (150, 250)];
        let requests = [SegmentRequest::new("a", 80), SegmentRequest::new("b", 90)];
        let segments = first_fit(&requests, free).unwrap();

        assert_eq!(segments[0].base, 0);
        assert_eq!(segments[0].limit, 80);
        assert_eq!(segments[1].base, 150);
        assert_eq!(segments[1].limit, 90);
    }

    #[test]
    fn test_first_fit_consumes_a_range_exactly() {
        let free = vec![(0, 50), (100, 200)];
        let requests = [SegmentRequest::new("a", 50), SegmentRequest::new("b", 50)];
        let segments = first_fit(&requests, free).unwrap();

        assert_eq!(segments[0].base, 0);
        // First range was consumed whole, second request moves on.
        assert_eq!(segments[1].base, 100);
    }

    #[test]
    fn test_first_fit_reports_the_segment_that_failed() {
        let free = vec![(0, 100)];
        let requests = [SegmentRequest::new("code", 60), SegmentRequest::new("heap", 60)];
        let err = first_fit(&requests, free).unwrap_err();
        assert_eq!(err, SimError::InsufficientSpace { segment: "heap".to_string() });
    }

    #[test]
    fn test_base_plus_limit_gives_end_offset() {
        let free = vec![(40, 200)];
        let requests = [SegmentRequest::new("stack", 32)];
        let segments = first_fit(&requests, free).unwrap();
        assert_eq!(segments[0].base + segments[0].limit, 72);
    }
}
