use super::ids::MoleculeTypeId;
use nalgebra::Point3;

/// A run of identical molecule copies: one molecule type replicated
/// `count` times at consecutive global atom indices.
///
/// If the molecule type carries restraint interactions, the block must
/// provide an A-state reference-coordinate table (and may provide a B-state
/// table). Both tables span every copy of the block and are indexed
/// copy-major: entry `copy * atoms_per_molecule + local_atom`.
#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeBlock {
    pub moltype: MoleculeTypeId,
    /// Number of copies; must be at least 1.
    pub count: usize,
    /// A-state restraint reference coordinates, one per atom per copy.
    pub restraint_refs_a: Option<Vec<Point3<f64>>>,
    /// B-state restraint reference coordinates; absent means "same as A".
    pub restraint_refs_b: Option<Vec<Point3<f64>>>,
}

impl MoleculeBlock {
    pub fn new(moltype: MoleculeTypeId, count: usize) -> Self {
        Self {
            moltype,
            count,
            restraint_refs_a: None,
            restraint_refs_b: None,
        }
    }

    /// Attaches an A-state reference table.
    pub fn with_restraint_refs(mut self, refs_a: Vec<Point3<f64>>) -> Self {
        self.restraint_refs_a = Some(refs_a);
        self
    }

    /// Attaches a B-state reference table.
    pub fn with_restraint_refs_b(mut self, refs_b: Vec<Point3<f64>>) -> Self {
        self.restraint_refs_b = Some(refs_b);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::{KeyData, Key};

    fn dummy_type_id() -> MoleculeTypeId {
        MoleculeTypeId::from(KeyData::from_ffi(1))
    }

    #[test]
    fn new_block_has_no_reference_tables() {
        let block = MoleculeBlock::new(dummy_type_id(), 3);
        assert_eq!(block.count, 3);
        assert!(block.restraint_refs_a.is_none());
        assert!(block.restraint_refs_b.is_none());
        assert!(!block.moltype.is_null());
    }

    #[test]
    fn builder_helpers_attach_reference_tables() {
        let refs = vec![Point3::new(1.0, 2.0, 3.0)];
        let block = MoleculeBlock::new(dummy_type_id(), 1)
            .with_restraint_refs(refs.clone())
            .with_restraint_refs_b(vec![Point3::origin()]);
        assert_eq!(block.restraint_refs_a.as_deref(), Some(refs.as_slice()));
        assert_eq!(
            block.restraint_refs_b.as_deref(),
            Some([Point3::origin()].as_slice())
        );
    }
}
