use super::error::ExpansionError;
use crate::model::atom::{FreeEnergyState, ParticleKind};
use crate::model::interaction::InteractionKind;
use crate::model::topology::GlobalTopology;

/// Population of the expanded system per particle kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParticleCounts {
    pub atoms: usize,
    pub shells: usize,
    pub virtual_sites: usize,
}

impl ParticleCounts {
    pub fn get(&self, kind: ParticleKind) -> usize {
        match kind {
            ParticleKind::Atom => self.atoms,
            ParticleKind::Shell => self.shells,
            ParticleKind::VirtualSite => self.virtual_sites,
        }
    }

    pub fn total(&self) -> usize {
        self.atoms + self.shells + self.virtual_sites
    }
}

/// Number of expanded entries of one interaction kind, without
/// materializing the expansion: Σ over blocks of copy count × template
/// entries, plus the unscaled intermolecular entries.
///
/// # Errors
///
/// Fails on unresolvable blocks or count overflow.
pub fn interaction_count(
    topology: &GlobalTopology,
    kind: InteractionKind,
) -> Result<usize, ExpansionError> {
    const WHAT: &str = "interaction count";
    let mut total = 0usize;
    for (index, block) in topology.blocks().iter().enumerate() {
        let moltype = topology
            .molecule_type(block.moltype)
            .ok_or(ExpansionError::UnknownMoleculeType { block: index })?;
        let in_block = block
            .count
            .checked_mul(moltype.interactions.get(kind).len())
            .ok_or(ExpansionError::CountOverflow { what: WHAT })?;
        total = total
            .checked_add(in_block)
            .ok_or(ExpansionError::CountOverflow { what: WHAT })?;
    }

    if let Some(intermolecular) = &topology.intermolecular {
        total = total
            .checked_add(intermolecular.get(kind).len())
            .ok_or(ExpansionError::CountOverflow { what: WHAT })?;
    }

    Ok(total)
}

/// Population counts per particle kind across the whole expanded system.
///
/// # Errors
///
/// Fails on unresolvable blocks or count overflow.
pub fn particle_counts(topology: &GlobalTopology) -> Result<ParticleCounts, ExpansionError> {
    const WHAT: &str = "particle count";
    let mut counts = ParticleCounts::default();
    for (index, block) in topology.blocks().iter().enumerate() {
        let moltype = topology
            .molecule_type(block.moltype)
            .ok_or(ExpansionError::UnknownMoleculeType { block: index })?;
        for atom in &moltype.atoms {
            let slot = match atom.particle {
                ParticleKind::Atom => &mut counts.atoms,
                ParticleKind::Shell => &mut counts.shells,
                ParticleKind::VirtualSite => &mut counts.virtual_sites,
            };
            *slot = slot
                .checked_add(block.count)
                .ok_or(ExpansionError::CountOverflow { what: WHAT })?;
        }
    }
    Ok(counts)
}

/// Population counts per force-field atom type for the chosen state, one
/// slot per type in the force field's type table. B-state type indices
/// fall back to A where no B state exists.
///
/// # Errors
///
/// Fails on unresolvable blocks, type indices outside the force field's
/// table, or count overflow.
pub fn atom_type_counts(
    topology: &GlobalTopology,
    state: FreeEnergyState,
) -> Result<Vec<usize>, ExpansionError> {
    const WHAT: &str = "atom type count";
    let mut counts = vec![0usize; topology.params.atom_type_count];
    for (index, block) in topology.blocks().iter().enumerate() {
        let moltype = topology
            .molecule_type(block.moltype)
            .ok_or(ExpansionError::UnknownMoleculeType { block: index })?;
        for (atom_index, atom) in moltype.atoms.iter().enumerate() {
            let type_index = atom.type_in(state);
            let slot =
                counts
                    .get_mut(type_index)
                    .ok_or_else(|| ExpansionError::AtomTypeOutOfRange {
                        molecule: moltype.name.clone(),
                        atom: atom_index,
                        type_index,
                        type_count: topology.params.atom_type_count,
                    })?;
            *slot = slot
                .checked_add(block.count)
                .ok_or(ExpansionError::CountOverflow { what: WHAT })?;
        }
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::{Atom, AtomBState};
    use crate::model::block::MoleculeBlock;
    use crate::model::ids::ParamId;
    use crate::model::interaction::{Interaction, InteractionLists};
    use crate::model::moltype::{MoleculeType, Residue};
    use crate::model::params::{ForceFieldParams, ParamRecord, TermParams};

    fn water_like() -> MoleculeType {
        let mut atoms = vec![
            Atom::new(0, -0.8, 15.999, 0),
            Atom::new(1, 0.4, 1.008, 0),
            Atom::new(1, 0.4, 1.008, 0),
            Atom::new(2, 0.0, 0.0, 0),
        ];
        atoms[3].particle = ParticleKind::VirtualSite;
        let mut moltype = MoleculeType::new("water", atoms, vec![Residue::new("SOL", 1)]);
        moltype.interactions.push(
            InteractionKind::Constraint,
            Interaction::new(ParamId::new(0), vec![0, 1]),
        );
        moltype.interactions.push(
            InteractionKind::Constraint,
            Interaction::new(ParamId::new(0), vec![0, 2]),
        );
        moltype
    }

    fn topology(copies: usize) -> GlobalTopology {
        let mut params = ForceFieldParams::new(3);
        params.push(ParamRecord::shared(TermParams::Constraint { distance: 0.1 }));
        let mut topology = GlobalTopology::new("test", params);
        let id = topology.add_molecule_type(water_like());
        topology.add_block(MoleculeBlock::new(id, copies));
        topology
    }

    #[test]
    fn interaction_counts_scale_with_multiplicity() {
        let topology = topology(7);
        assert_eq!(
            interaction_count(&topology, InteractionKind::Constraint).unwrap(),
            14
        );
        assert_eq!(interaction_count(&topology, InteractionKind::Bond).unwrap(), 0);
    }

    #[test]
    fn intermolecular_entries_count_once() {
        let mut topology = topology(7);
        let mut intermolecular = InteractionLists::new();
        let bond = topology.params.push(ParamRecord::shared(TermParams::Harmonic {
            force_constant: 1.0,
            equilibrium: 0.1,
        }));
        intermolecular.push(InteractionKind::Bond, Interaction::new(bond, vec![0, 4]));
        topology.intermolecular = Some(intermolecular);

        assert_eq!(interaction_count(&topology, InteractionKind::Bond).unwrap(), 1);
        assert_eq!(
            interaction_count(&topology, InteractionKind::Constraint).unwrap(),
            14
        );
    }

    #[test]
    fn particle_counts_separate_kinds() {
        let counts = particle_counts(&topology(5)).unwrap();
        assert_eq!(counts.atoms, 15);
        assert_eq!(counts.shells, 0);
        assert_eq!(counts.virtual_sites, 5);
        assert_eq!(counts.total(), topology(5).atom_count());
        assert_eq!(counts.get(ParticleKind::VirtualSite), 5);
    }

    #[test]
    fn atom_type_counts_follow_the_selected_state() {
        let mut topology = topology(4);
        let mut mutant = water_like();
        mutant.name = "mutant".to_string();
        mutant.atoms[0].b_state = Some(AtomBState {
            type_index: 1,
            charge: -0.8,
            mass: 15.999,
        });
        let id = topology.add_molecule_type(mutant);
        topology.add_block(MoleculeBlock::new(id, 2));

        let a = atom_type_counts(&topology, FreeEnergyState::A).unwrap();
        assert_eq!(a, vec![4 + 2, 8 + 4, 4 + 2]);

        // In the B state the mutant oxygen counts as type 1.
        let b = atom_type_counts(&topology, FreeEnergyState::B).unwrap();
        assert_eq!(b, vec![4, 8 + 4 + 2, 4 + 2]);
    }

    #[test]
    fn out_of_range_type_index_is_reported() {
        let mut params = ForceFieldParams::new(1);
        params.push(ParamRecord::shared(TermParams::Constraint { distance: 0.1 }));
        let mut topology = GlobalTopology::new("test", params);
        let moltype = MoleculeType::new(
            "bad",
            vec![Atom::new(3, 0.0, 1.0, 0)],
            vec![Residue::new("BAD", 1)],
        );
        let id = topology.add_molecule_type(moltype);
        topology.add_block(MoleculeBlock::new(id, 1));

        assert_eq!(
            atom_type_counts(&topology, FreeEnergyState::A).unwrap_err(),
            ExpansionError::AtomTypeOutOfRange {
                molecule: "bad".to_string(),
                atom: 0,
                type_index: 3,
                type_count: 1,
            }
        );
    }
}
