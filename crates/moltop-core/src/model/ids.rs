use slotmap::new_key_type;

new_key_type! {
    pub struct MoleculeTypeId;
}

/// Index of a shared parameter record in a [`ForceFieldParams`](super::params::ForceFieldParams)
/// table, or, for specialized restraint entries, in a per-entry restraint
/// parameter table of an expanded view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(usize);

impl ParamId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}
