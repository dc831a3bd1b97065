use std::sync::Arc;

use super::{MutationId, Position};

/// One storage chunk of a haplosome: the mutation ids carried by a
/// fixed-width span of the chromosome. Runs are shared between haplosomes
/// via `Arc`, so two sequences that inherited the same chunk compare by
/// pointer identity instead of by contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRun {
    ids: Vec<MutationId>,
}

impl MutationRun {
    pub fn new(ids: Vec<MutationId>) -> Self {
        Self { ids }
    }

    pub fn ids(&self) -> &[MutationId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// One sampled haplosome: a list of shared mutation runs plus the uniform
/// chromosome width covered by each run. The clustering engine treats this
/// as an opaque handle; only the distance builder looks inside, and handles
/// are never retained past a call.
#[derive(Debug, Clone)]
pub struct Haplosome {
    runs: Vec<Arc<MutationRun>>,
    run_width: Position,
}

impl Haplosome {
    pub fn new(runs: Vec<Arc<MutationRun>>, run_width: Position) -> Self {
        Self { runs, run_width }
    }

    /// Convenience constructor for a haplosome stored as a single run.
    pub fn single_run(ids: Vec<MutationId>, run_width: Position) -> Self {
        Self::new(vec![Arc::new(MutationRun::new(ids))], run_width)
    }

    pub fn runs(&self) -> &[Arc<MutationRun>] {
        &self.runs
    }

    pub fn run_width(&self) -> Position {
        self.run_width
    }

    /// Total number of mutation ids carried, across all runs.
    pub fn mutation_count(&self) -> usize {
        self.runs.iter().map(|r| r.len()).sum()
    }
}
