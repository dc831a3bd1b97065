use super::{MutationId, Position};

/// Population-level mutation lookup, indexed by `MutationId`.
///
/// Holds the base position of every mutation in use, plus a per-mutation
/// `displayed` flag: the caller resolves its mutation-type subset choice to
/// flags once, so the distance builder never calls back out per site.
#[derive(Debug, Clone, Default)]
pub struct MutationTable {
    positions: Vec<Position>,
    displayed: Vec<bool>,
}

impl MutationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a mutation and returns its id.
    pub fn push(&mut self, position: Position, displayed: bool) -> MutationId {
        let id = self.positions.len() as MutationId;
        self.positions.push(position);
        self.displayed.push(displayed);
        id
    }

    /// Number of distinct mutation ids in use; bounds the distance
    /// builder's marker array.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, id: MutationId) -> Position {
        self.positions[id as usize]
    }

    pub fn is_displayed(&self, id: MutationId) -> bool {
        self.displayed[id as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_assigns_sequential_ids() {
        let mut table = MutationTable::new();
        let a = table.push(10, true);
        let b = table.push(250, false);

        assert_eq!((a, b), (0, 1));
        assert_eq!(table.len(), 2);
        assert_eq!(table.position(b), 250);
        assert!(table.is_displayed(a));
        assert!(!table.is_displayed(b));
    }
}
