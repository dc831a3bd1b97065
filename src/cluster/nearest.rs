/// Nearest-neighbor tour construction
///
/// Builds an initial open path by starting at the most isolated sequence
/// and repeatedly appending the closest unvisited one. O(n^2) over a
/// destructive working copy of the distance matrix. Fast and simple; the
/// greedy construction is a little slower and noticeably better.
use tracing::debug;

use crate::cluster::DistanceMatrix;
use crate::progress::{ClusterStage, Progress};
use crate::Result;

/// Index of the sequence whose minimum nonzero distance to any other is
/// largest. Zero distances never count toward isolation, so the most
/// isolated *cluster* of identical sequences wins; this also covers the
/// diagonal without special-casing. Ties go to the first index found.
///
/// Starting an open path here avoids hanging two long edges off a remote
/// node later.
pub fn most_isolated(distances: &DistanceMatrix) -> usize {
    let n = distances.len();
    let mut greatest_isolation = -1i64;
    let mut greatest_index = 0usize;

    for i in 0..n {
        let mut isolation = i64::MAX;

        for &d in distances.row(i) {
            if d == 0 {
                continue;
            }
            if d < isolation {
                isolation = d;
            }
        }

        if isolation > greatest_isolation {
            greatest_isolation = isolation;
            greatest_index = i;
        }
    }

    greatest_index
}

/// Runs the nearest-neighbor construction. On cancellation the partial,
/// incomplete ordering is returned as-is; the orchestrator discards it.
pub fn nearest_neighbor_solve(
    distances: &DistanceMatrix,
    progress: &mut dyn Progress,
) -> Result<Vec<usize>> {
    let n = distances.len();
    let mut path = Vec::with_capacity(n);
    if n == 0 {
        return Ok(path);
    }

    // visited columns get poisoned, so work on a copy
    let mut work = distances.to_working_buffer()?;
    let mut remaining = n;
    let mut last = most_isolated(distances);
    debug!(start = last, "nearest-neighbor start node");

    loop {
        path.push(last);

        progress.report(path.len(), ClusterStage::Construction);
        if progress.is_cancelled() {
            break;
        }

        remaining -= 1;
        if remaining == 0 {
            break;
        }

        // mark the chosen sequence unavailable in every row
        for row in 0..n {
            work[row * n + last] = i64::MAX;
        }

        let row = &work[last * n..(last + 1) * n];
        let mut nearest_distance = i64::MAX;
        let mut nearest_index = usize::MAX;
        for (candidate, &d) in row.iter().enumerate() {
            if d < nearest_distance {
                nearest_distance = d;
                nearest_index = candidate;
            }
        }
        debug_assert!(nearest_index != usize::MAX);

        last = nearest_index;
    }

    Ok(path)
}
