/// Pairwise genetic distance computation
///
/// The distance between two haplosomes is the number of mutation sites at
/// which they differ, optionally restricted to a chromosome subrange and/or
/// to the mutation types flagged for display. This O(N^2) pass dominates
/// the runtime of a clustering run, so there are four specialized loops,
/// one per combination of active restrictions, and the inner comparison
/// uses a radix "seen" buffer instead of set intersection.
use std::sync::Arc;

use tracing::debug;

use crate::bio::{Haplosome, MutationId, MutationTable, SiteRange};
use crate::progress::{ClusterStage, Progress};
use crate::Result;

/// Owned, symmetric N×N matrix of pairwise distances with a zero diagonal.
/// Built and dropped within a single clustering invocation.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    n: usize,
    values: Vec<i64>,
}

impl DistanceMatrix {
    /// Allocates an N×N zero matrix. The buffer is reserved with
    /// `try_reserve_exact` so an allocation failure on huge samples
    /// surfaces as an error instead of an abort.
    pub fn zeroed(n: usize) -> Result<Self> {
        let mut values = Vec::new();
        values.try_reserve_exact(n * n)?;
        values.resize(n * n, 0);

        Ok(Self { n, values })
    }

    /// Number of sequences (rows) in the matrix.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> i64 {
        self.values[i * self.n + j]
    }

    /// Sets both mirrored entries.
    #[inline]
    pub fn set_pair(&mut self, i: usize, j: usize, distance: i64) {
        self.values[i * self.n + j] = distance;
        self.values[j * self.n + i] = distance;
    }

    pub fn row(&self, i: usize) -> &[i64] {
        &self.values[i * self.n..(i + 1) * self.n]
    }

    /// Flat copy of the underlying buffer, for heuristics that need a
    /// destructive working matrix.
    pub(crate) fn to_working_buffer(&self) -> Result<Vec<i64>> {
        let mut buffer = Vec::new();
        buffer.try_reserve_exact(self.values.len())?;
        buffer.extend_from_slice(&self.values);
        Ok(buffer)
    }

    /// Builds the matrix for the given sample, dispatching to the loop
    /// specialized for the active restrictions. Progress is reported per
    /// completed row; on cancellation the remaining rows are left zero and
    /// the caller is expected to discard the partial matrix.
    pub fn build(
        haplosomes: &[Haplosome],
        table: &MutationTable,
        subrange: Option<SiteRange>,
        displayed_only: bool,
        progress: &mut dyn Progress,
    ) -> Result<Self> {
        let mut matrix = Self::zeroed(haplosomes.len())?;
        let mut seen = SeenTracker::new(table.len());

        match (subrange, displayed_only) {
            (None, false) => build_unrestricted(&mut matrix, haplosomes, &mut seen, progress),
            (Some(range), false) => {
                build_subrange(&mut matrix, haplosomes, table, range, &mut seen, progress)
            }
            (None, true) => build_subset(&mut matrix, haplosomes, table, &mut seen, progress),
            (Some(range), true) => build_subrange_and_subset(
                &mut matrix, haplosomes, table, range, &mut seen, progress,
            ),
        }

        debug!(
            sequences = matrix.len(),
            subrange = subrange.is_some(),
            displayed_only,
            "built pairwise distance matrix"
        );
        Ok(matrix)
    }
}

/// Radix buffer marking which mutation ids the left-hand sequence carries.
///
/// Clearing the buffer between every run comparison would cost O(table)
/// each time, so marks are stamped with a generation marker instead; the
/// marker is an explicit wrapping counter and the buffer is only cleared
/// when it wraps, amortizing the clears across ~255 comparisons.
struct SeenTracker {
    seen: Vec<u8>,
    marker: u8,
}

impl SeenTracker {
    fn new(id_count: usize) -> Self {
        Self {
            seen: vec![0; id_count],
            marker: 1,
        }
    }

    #[inline]
    fn mark(&mut self, id: MutationId) {
        self.seen[id as usize] = self.marker;
    }

    #[inline]
    fn is_marked(&self, id: MutationId) -> bool {
        self.seen[id as usize] == self.marker
    }

    /// Starts a new generation; clears the buffer only on wraparound.
    fn advance(&mut self) {
        self.marker = self.marker.wrapping_add(1);
        if self.marker == 0 {
            self.seen.fill(0);
            self.marker = 1;
        }
    }
}

/// No restrictions: every mutation id counts. Per-run fast paths apply
/// (shared storage, one side empty), and the counting scheme assumes all
/// sites mismatched up front, then subtracts two per shared id.
fn build_unrestricted(
    matrix: &mut DistanceMatrix,
    haplosomes: &[Haplosome],
    seen: &mut SeenTracker,
    progress: &mut dyn Progress,
) {
    let n = haplosomes.len();

    for i in 0..n {
        let left = &haplosomes[i];

        for j in (i + 1)..n {
            let right = &haplosomes[j];
            let mut distance = 0i64;

            for (left_run, right_run) in left.runs().iter().zip(right.runs()) {
                if Arc::ptr_eq(left_run, right_run) {
                    // identical storage, no differences
                } else if left_run.is_empty() {
                    distance += right_run.len() as i64;
                } else if right_run.is_empty() {
                    distance += left_run.len() as i64;
                } else {
                    distance += (left_run.len() + right_run.len()) as i64;

                    for &id in left_run.ids() {
                        seen.mark(id);
                    }
                    for &id in right_run.ids() {
                        if seen.is_marked(id) {
                            distance -= 2;
                        }
                    }

                    seen.advance();
                }
            }

            matrix.set_pair(i, j, distance);
        }

        progress.report(i + 1, ClusterStage::Distances);
        if progress.is_cancelled() {
            break;
        }
    }
}

/// Subrange restriction: runs wholly outside the range are skipped
/// outright, and each id is position-tested. The counting scheme here is
/// count-up-assume-unmatched, count-down-on-match.
fn build_subrange(
    matrix: &mut DistanceMatrix,
    haplosomes: &[Haplosome],
    table: &MutationTable,
    range: SiteRange,
    seen: &mut SeenTracker,
    progress: &mut dyn Progress,
) {
    let n = haplosomes.len();

    for i in 0..n {
        let left = &haplosomes[i];
        let run_width = left.run_width();

        for j in (i + 1)..n {
            let right = &haplosomes[j];
            let mut distance = 0i64;

            for (run_index, (left_run, right_run)) in
                left.runs().iter().zip(right.runs()).enumerate()
            {
                if run_outside_range(run_index, run_width, range) {
                    continue;
                }
                if Arc::ptr_eq(left_run, right_run) {
                    continue;
                }

                for &id in left_run.ids() {
                    if range.contains(table.position(id)) {
                        seen.mark(id);
                        distance += 1; // assume unmatched
                    }
                }
                for &id in right_run.ids() {
                    if range.contains(table.position(id)) {
                        if seen.is_marked(id) {
                            distance -= 1; // matched after all
                        } else {
                            distance += 1;
                        }
                    }
                }

                seen.advance();
            }

            matrix.set_pair(i, j, distance);
        }

        progress.report(i + 1, ClusterStage::Distances);
        if progress.is_cancelled() {
            break;
        }
    }
}

/// Mutation-type subset restriction: only ids flagged for display count.
fn build_subset(
    matrix: &mut DistanceMatrix,
    haplosomes: &[Haplosome],
    table: &MutationTable,
    seen: &mut SeenTracker,
    progress: &mut dyn Progress,
) {
    let n = haplosomes.len();

    for i in 0..n {
        let left = &haplosomes[i];

        for j in (i + 1)..n {
            let right = &haplosomes[j];
            let mut distance = 0i64;

            for (left_run, right_run) in left.runs().iter().zip(right.runs()) {
                if Arc::ptr_eq(left_run, right_run) {
                    continue;
                }

                for &id in left_run.ids() {
                    if table.is_displayed(id) {
                        seen.mark(id);
                        distance += 1;
                    }
                }
                for &id in right_run.ids() {
                    if table.is_displayed(id) {
                        if seen.is_marked(id) {
                            distance -= 1;
                        } else {
                            distance += 1;
                        }
                    }
                }

                seen.advance();
            }

            matrix.set_pair(i, j, distance);
        }

        progress.report(i + 1, ClusterStage::Distances);
        if progress.is_cancelled() {
            break;
        }
    }
}

/// Both restrictions: position test first, then the display flag.
fn build_subrange_and_subset(
    matrix: &mut DistanceMatrix,
    haplosomes: &[Haplosome],
    table: &MutationTable,
    range: SiteRange,
    seen: &mut SeenTracker,
    progress: &mut dyn Progress,
) {
    let n = haplosomes.len();

    for i in 0..n {
        let left = &haplosomes[i];
        let run_width = left.run_width();

        for j in (i + 1)..n {
            let right = &haplosomes[j];
            let mut distance = 0i64;

            for (run_index, (left_run, right_run)) in
                left.runs().iter().zip(right.runs()).enumerate()
            {
                if run_outside_range(run_index, run_width, range) {
                    continue;
                }
                if Arc::ptr_eq(left_run, right_run) {
                    continue;
                }

                for &id in left_run.ids() {
                    if range.contains(table.position(id)) && table.is_displayed(id) {
                        seen.mark(id);
                        distance += 1;
                    }
                }
                for &id in right_run.ids() {
                    if range.contains(table.position(id)) && table.is_displayed(id) {
                        if seen.is_marked(id) {
                            distance -= 1;
                        } else {
                            distance += 1;
                        }
                    }
                }

                seen.advance();
            }

            matrix.set_pair(i, j, distance);
        }

        progress.report(i + 1, ClusterStage::Distances);
        if progress.is_cancelled() {
            break;
        }
    }
}

/// Whether run `run_index` covers no position inside `range`.
#[inline]
fn run_outside_range(run_index: usize, run_width: i64, range: SiteRange) -> bool {
    let run_start = run_width * run_index as i64;
    run_start > range.last || run_start + run_width - 1 < range.first
}
