/// 2-opt local search refinement
///
/// Repeatedly reverses the sub-path whose reversal shortens the tour,
/// taking the first improving move found and restarting the scan; the
/// search ends when a full scan finds nothing. First-improvement runs
/// about twice as fast as best-improvement here with no better results.
use tracing::debug;

use crate::cluster::DistanceMatrix;
use crate::progress::{ClusterStage, Progress};

/// Total length of an open path under the given distances.
pub fn path_length(path: &[usize], distances: &DistanceMatrix) -> i64 {
    let mut length = 0;
    for pair in path.windows(2) {
        length += distances.get(pair[0], pair[1]);
    }
    length
}

/// Refines the ordering in place. Because the metric is symmetric, the
/// delta of reversing `path[i..=k]` involves only the two boundary edges
/// (one, when the segment touches an end of the open path); interior edges
/// are reversal-invariant. Progress is reported as the furthest `i`
/// reached across all restarts, the only monotonic quantity available
/// when the restart count is unpredictable.
pub fn refine_two_opt(path: &mut [usize], distances: &DistanceMatrix, progress: &mut dyn Progress) {
    let n = path.len();
    if n < 3 {
        return;
    }

    let original_length = path_length(path, distances);
    let mut best_length = original_length;
    let mut farthest_i = 0usize;

    'restart: loop {
        for i in 0..(n - 1) {
            for k in (i + 1)..n {
                let node_i = path[i];
                let node_k = path[k];
                let mut delta = 0i64;

                if i > 0 {
                    let before = path[i - 1];
                    delta -= distances.get(before, node_i);
                    delta += distances.get(before, node_k);
                }
                if k < n - 1 {
                    let after = path[k + 1];
                    delta -= distances.get(node_k, after);
                    delta += distances.get(node_i, after);
                }

                if delta < 0 {
                    path[i..=k].reverse();
                    best_length += delta;
                    continue 'restart;
                }
            }

            farthest_i = farthest_i.max(i + 1);
            progress.report(farthest_i, ClusterStage::Refinement);
            if progress.is_cancelled() {
                return;
            }
        }

        break;
    }

    debug!(
        before = original_length,
        after = best_length,
        "2-opt refinement finished"
    );
}
