pub mod bio;
pub mod cluster;
pub mod progress;
pub mod sort;

pub use crate::bio::{Haplosome, MutationRun, MutationTable, SiteRange};
pub use crate::cluster::engine::{
    apply_ordering, ClusterConfig, ClusterOutcome, ClusteringMethod, HaplotypeClusterer,
    Refinement,
};
pub use crate::cluster::DistanceMatrix;
pub use crate::progress::{ClusterStage, ConsoleProgress, NoProgress, Progress};
pub use crate::sort::IncrementalSorter;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HaplosortError {
    #[error("allocation failed: {0}")]
    Allocation(#[from] std::collections::TryReserveError),

    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, HaplosortError>;
