/// Clustering orchestrator
///
/// Sequences the full run: distance matrix, tour construction, permutation
/// validation, optional 2-opt refinement, validation again. Cancellation
/// at any checkpoint yields `ClusterOutcome::Cancelled` and never a
/// partial ordering; every scratch structure is dropped on every exit
/// path.
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::bio::{Haplosome, MutationTable, SiteRange};
use crate::cluster::{greedy, nearest, two_opt, DistanceMatrix};
use crate::progress::Progress;
use crate::{HaplosortError, Result};

/// Which construction heuristic builds the initial ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClusteringMethod {
    /// O(n^2), fastest; starts at the most isolated sequence.
    NearestNeighbor,
    /// Shortest-legal-edge-first; a little slower, noticeably better.
    Greedy,
}

/// Whether the constructed ordering gets a local-search pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Refinement {
    None,
    TwoOpt,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub method: ClusteringMethod,
    pub refinement: Refinement,
    /// Inclusive chromosome subrange restricting which sites count.
    pub subrange: Option<SiteRange>,
    /// Count only mutations flagged for display in the mutation table.
    pub displayed_only: bool,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            method: ClusteringMethod::Greedy,
            refinement: Refinement::None,
            subrange: None,
            displayed_only: false,
        }
    }
}

/// Result of a clustering run: the ordering, or an explicit cancellation.
/// Partial orderings are never surfaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterOutcome {
    Ordering(Vec<usize>),
    Cancelled,
}

impl ClusterOutcome {
    pub fn into_ordering(self) -> Option<Vec<usize>> {
        match self {
            Self::Ordering(ordering) => Some(ordering),
            Self::Cancelled => None,
        }
    }
}

/// The haplotype-similarity clustering engine. Holds configuration only;
/// all per-run state lives and dies inside `sort`.
#[derive(Debug, Clone, Default)]
pub struct HaplotypeClusterer {
    config: ClusterConfig,
}

impl HaplotypeClusterer {
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    pub fn with_method(mut self, method: ClusteringMethod) -> Self {
        self.config.method = method;
        self
    }

    pub fn with_refinement(mut self, refinement: Refinement) -> Self {
        self.config.refinement = refinement;
        self
    }

    pub fn with_subrange(mut self, subrange: Option<SiteRange>) -> Self {
        self.config.subrange = subrange;
        self
    }

    pub fn with_displayed_only(mut self, displayed_only: bool) -> Self {
        self.config.displayed_only = displayed_only;
        self
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Number of progress stages a run will pass through: distances and
    /// construction, plus refinement when enabled.
    pub fn stage_count(&self) -> usize {
        match self.config.refinement {
            Refinement::None => 2,
            Refinement::TwoOpt => 3,
        }
    }

    /// Computes a similarity ordering over the sample. Returns a
    /// permutation of `0..haplosomes.len()` placing similar sequences
    /// adjacent, or `Cancelled` if the collaborator requested a stop at
    /// any checkpoint.
    pub fn sort(
        &self,
        haplosomes: &[Haplosome],
        table: &MutationTable,
        progress: &mut dyn Progress,
    ) -> Result<ClusterOutcome> {
        let n = haplosomes.len();
        if n <= 1 {
            return Ok(ClusterOutcome::Ordering((0..n).collect()));
        }

        info!(
            sequences = n,
            mutations = haplosomes.iter().map(Haplosome::mutation_count).sum::<usize>(),
            method = ?self.config.method,
            refinement = ?self.config.refinement,
            "clustering haplosomes"
        );

        let distances = DistanceMatrix::build(
            haplosomes,
            table,
            self.config.subrange,
            self.config.displayed_only,
            progress,
        )?;
        if progress.is_cancelled() {
            return Ok(ClusterOutcome::Cancelled);
        }

        let mut path = match self.config.method {
            ClusteringMethod::NearestNeighbor => {
                nearest::nearest_neighbor_solve(&distances, progress)?
            }
            ClusteringMethod::Greedy => greedy::greedy_solve(&distances, progress)?,
        };
        if progress.is_cancelled() {
            return Ok(ClusterOutcome::Cancelled);
        }

        validate_ordering(&path, n)?;

        if self.config.refinement == Refinement::TwoOpt {
            two_opt::refine_two_opt(&mut path, &distances, progress);
            if progress.is_cancelled() {
                return Ok(ClusterOutcome::Cancelled);
            }

            validate_ordering(&path, n)?;
        }

        Ok(ClusterOutcome::Ordering(path))
    }
}

/// Checks that an ordering visits every sequence exactly once. A failure
/// here is a heuristic defect, unreachable from valid input; it is
/// reported loudly and fails the invocation rather than surfacing a
/// silently wrong answer.
pub fn validate_ordering(ordering: &[usize], n: usize) -> Result<()> {
    if ordering.len() != n {
        error!(expected = n, actual = ordering.len(), "ordering has wrong length");
        return Err(HaplosortError::Invariant(format!(
            "ordering visits {} of {} sequences",
            ordering.len(),
            n
        )));
    }

    let mut visits = vec![0u8; n];
    for &index in ordering {
        if index >= n {
            error!(index, "ordering contains out-of-range index");
            return Err(HaplosortError::Invariant(format!(
                "ordering contains out-of-range index {index}"
            )));
        }
        visits[index] += 1;
    }

    for (index, &count) in visits.iter().enumerate() {
        if count != 1 {
            error!(index, count, "sequence visited wrong number of times");
            return Err(HaplosortError::Invariant(format!(
                "sequence {index} visited {count} times"
            )));
        }
    }

    Ok(())
}

/// Reorders the caller's handle list to match the found ordering.
pub fn apply_ordering<T: Clone>(items: &mut Vec<T>, ordering: &[usize]) {
    debug_assert_eq!(items.len(), ordering.len());
    let reordered: Vec<T> = ordering.iter().map(|&i| items[i].clone()).collect();
    *items = reordered;
}
