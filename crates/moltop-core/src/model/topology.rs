use super::atom::FreeEnergyState;
use super::block::MoleculeBlock;
use super::ids::MoleculeTypeId;
use super::interaction::InteractionLists;
use super::moltype::MoleculeType;
use super::params::ForceFieldParams;
use slotmap::SlotMap;

/// The compact, hierarchically replicated description of a whole molecular
/// system: molecule templates, replication blocks, shared force-field
/// parameters and the system-wide extras that do not replicate.
///
/// A topology is built once by an external construction stage and treated
/// as immutable by every derivation in [`expand`](crate::expand): all
/// derived views own their storage and never alias the source.
#[derive(Debug, Clone)]
pub struct GlobalTopology {
    /// System name.
    pub name: String,
    moltypes: SlotMap<MoleculeTypeId, MoleculeType>,
    blocks: Vec<MoleculeBlock>,
    /// Shared interaction parameter table.
    pub params: ForceFieldParams,
    /// Interactions between atoms of different molecules, already carrying
    /// global atom indices. Applied once, never replicated or offset.
    pub intermolecular: Option<InteractionLists>,
    /// Explicit global atom ids to be made mutually excluded, on top of the
    /// replicated template exclusions. Empty means none.
    pub intermolecular_exclusion_group: Vec<usize>,
    /// Molecule types with at most this many residues get their residue
    /// numbers replaced by a running per-copy counter during expansion;
    /// larger types keep their template numbering verbatim.
    pub renumber_residue_limit: usize,
}

impl GlobalTopology {
    pub fn new(name: &str, params: ForceFieldParams) -> Self {
        Self {
            name: name.to_string(),
            moltypes: SlotMap::with_key(),
            blocks: Vec::new(),
            params,
            intermolecular: None,
            intermolecular_exclusion_group: Vec::new(),
            renumber_residue_limit: 1,
        }
    }

    /// Registers a molecule template and returns its id.
    pub fn add_molecule_type(&mut self, moltype: MoleculeType) -> MoleculeTypeId {
        self.moltypes.insert(moltype)
    }

    pub fn molecule_type(&self, id: MoleculeTypeId) -> Option<&MoleculeType> {
        self.moltypes.get(id)
    }

    /// Iterates all registered molecule templates.
    pub fn molecule_types(&self) -> impl Iterator<Item = (MoleculeTypeId, &MoleculeType)> {
        self.moltypes.iter()
    }

    /// Appends a replication block. Blocks are expanded in append order.
    pub fn add_block(&mut self, block: MoleculeBlock) {
        self.blocks.push(block);
    }

    pub fn blocks(&self) -> &[MoleculeBlock] {
        &self.blocks
    }

    /// Total number of atoms across every copy of every block.
    ///
    /// Assumes a validated topology; the expansion entry points detect
    /// unresolvable type ids and count overflow up front.
    pub fn atom_count(&self) -> usize {
        self.blocks
            .iter()
            .map(|block| {
                block.count
                    * self
                        .moltypes
                        .get(block.moltype)
                        .map_or(0, MoleculeType::atom_count)
            })
            .sum()
    }

    /// Total number of residues across every copy of every block.
    pub fn residue_count(&self) -> usize {
        self.blocks
            .iter()
            .map(|block| {
                block.count
                    * self
                        .moltypes
                        .get(block.moltype)
                        .map_or(0, MoleculeType::residue_count)
            })
            .sum()
    }

    /// Total number of molecule copies across all blocks.
    pub fn molecule_count(&self) -> usize {
        self.blocks.iter().map(|block| block.count).sum()
    }

    /// The highest template residue number among molecule types that are
    /// *not* renumbered during expansion.
    ///
    /// This seeds the running counter that numbers the renumbered (small)
    /// molecules, so their synthesized numbers continue past the preserved
    /// ones instead of colliding with them.
    pub fn max_residue_number_not_renumbered(&self) -> isize {
        self.moltypes
            .values()
            .filter(|moltype| moltype.residue_count() > self.renumber_residue_limit)
            .flat_map(|moltype| moltype.residues.iter().map(|residue| residue.number))
            .max()
            .unwrap_or(0)
    }

    /// Whether any atom of any template has a charge or type differing
    /// between the A and B states.
    pub fn has_perturbed_charges_or_types(&self) -> bool {
        self.moltypes.values().any(|moltype| {
            moltype.atoms.iter().any(|atom| {
                atom.is_charge_perturbed() || atom.type_in(FreeEnergyState::B) != atom.type_index
            })
        })
    }

    /// Whether any atom of any template has a mass differing between the A
    /// and B states.
    pub fn has_perturbed_masses(&self) -> bool {
        self.moltypes
            .values()
            .any(|moltype| moltype.atoms.iter().any(|atom| atom.is_mass_perturbed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::{Atom, AtomBState};
    use crate::model::moltype::Residue;

    fn water_type() -> MoleculeType {
        let atoms = vec![
            Atom::new(0, -0.8, 15.999, 0),
            Atom::new(1, 0.4, 1.008, 0),
            Atom::new(1, 0.4, 1.008, 0),
        ];
        MoleculeType::new("water", atoms, vec![Residue::new("SOL", 1)])
    }

    fn peptide_type() -> MoleculeType {
        let atoms = vec![
            Atom::new(2, 0.0, 12.011, 0),
            Atom::new(2, 0.0, 12.011, 1),
            Atom::new(2, 0.0, 12.011, 2),
        ];
        let residues = vec![
            Residue::new("ALA", 5),
            Residue::new("GLY", 6),
            Residue::new("SER", 7),
        ];
        MoleculeType::new("peptide", atoms, residues)
    }

    fn small_system() -> GlobalTopology {
        let mut topology = GlobalTopology::new("test", ForceFieldParams::new(3));
        let peptide = topology.add_molecule_type(peptide_type());
        let water = topology.add_molecule_type(water_type());
        topology.add_block(MoleculeBlock::new(peptide, 1));
        topology.add_block(MoleculeBlock::new(water, 10));
        topology
    }

    #[test]
    fn counts_scale_with_block_multiplicity() {
        let topology = small_system();
        assert_eq!(topology.atom_count(), 3 + 10 * 3);
        assert_eq!(topology.residue_count(), 3 + 10);
        assert_eq!(topology.molecule_count(), 11);
    }

    #[test]
    fn empty_topology_has_zero_counts() {
        let topology = GlobalTopology::new("empty", ForceFieldParams::new(0));
        assert_eq!(topology.atom_count(), 0);
        assert_eq!(topology.residue_count(), 0);
        assert_eq!(topology.molecule_count(), 0);
        assert_eq!(topology.max_residue_number_not_renumbered(), 0);
    }

    #[test]
    fn max_residue_number_ignores_renumbered_types() {
        // Threshold 1: water (1 residue) is renumbered, peptide (3) is not.
        let topology = small_system();
        assert_eq!(topology.renumber_residue_limit, 1);
        assert_eq!(topology.max_residue_number_not_renumbered(), 7);
    }

    #[test]
    fn raising_the_limit_moves_types_into_the_renumbered_class() {
        let mut topology = small_system();
        topology.renumber_residue_limit = 3;
        // Now every registered type is renumbered; nothing is preserved.
        assert_eq!(topology.max_residue_number_not_renumbered(), 0);
    }

    #[test]
    fn perturbation_probes_see_b_states() {
        let mut topology = small_system();
        assert!(!topology.has_perturbed_charges_or_types());
        assert!(!topology.has_perturbed_masses());

        let mut mutant = water_type();
        mutant.atoms[0].b_state = Some(AtomBState {
            type_index: 0,
            charge: 0.0,
            mass: 15.999,
        });
        let id = topology.add_molecule_type(mutant);
        topology.add_block(MoleculeBlock::new(id, 1));

        assert!(topology.has_perturbed_charges_or_types());
        assert!(!topology.has_perturbed_masses());
    }

    #[test]
    fn molecule_type_lookup_round_trips() {
        let mut topology = GlobalTopology::new("test", ForceFieldParams::new(1));
        let id = topology.add_molecule_type(water_type());
        assert_eq!(topology.molecule_type(id).unwrap().name, "water");
        assert_eq!(topology.molecule_types().count(), 1);
    }
}
