pub mod incremental;

pub use incremental::IncrementalSorter;
