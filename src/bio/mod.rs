pub mod haplosome;
pub mod table;

pub use haplosome::{Haplosome, MutationRun};
pub use table::MutationTable;

/// Index into the population-wide mutation table.
pub type MutationId = u32;

/// Base position on the chromosome.
pub type Position = i64;

/// An inclusive range of base positions restricting which mutation sites
/// count toward genetic distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SiteRange {
    pub first: Position,
    pub last: Position,
}

impl SiteRange {
    pub fn new(first: Position, last: Position) -> Self {
        Self { first, last }
    }

    pub fn contains(&self, position: Position) -> bool {
        position >= self.first && position <= self.last
    }
}
