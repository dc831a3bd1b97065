pub mod distance;
pub mod engine;
pub mod greedy;
pub mod nearest;
pub mod two_opt;

pub use distance::DistanceMatrix;
pub use engine::{
    apply_ordering, validate_ordering, ClusterConfig, ClusterOutcome, ClusteringMethod,
    HaplotypeClusterer, Refinement,
};
pub use greedy::greedy_solve;
pub use nearest::{most_isolated, nearest_neighbor_solve};
pub use two_opt::{path_length, refine_two_opt};
