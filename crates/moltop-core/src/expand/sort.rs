use super::error::ExpansionError;
use super::range::AtomRange;
use crate::model::atom::FreeEnergyState;
use crate::model::interaction::{InteractionKind, InteractionLists};
use crate::model::topology::GlobalTopology;

/// How the entries of each expanded interaction list are ordered with
/// respect to alchemical perturbation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FreeEnergyOrdering {
    /// Expansion order: perturbed and unperturbed entries interleave.
    #[default]
    Unsorted,
    /// Per kind, every entry with a charge-perturbed participant trails
    /// every entry without one, contiguously.
    PerturbedLast,
}

/// Per-atom A- and B-state charges of the whole expanded system, captured
/// by one full [`AtomRange`] traversal.
#[derive(Debug, Clone)]
pub(crate) struct ChargeSnapshot {
    a: Vec<f64>,
    b: Vec<f64>,
}

impl ChargeSnapshot {
    pub(crate) fn capture(topology: &GlobalTopology) -> Result<Self, ExpansionError> {
        let mut a = vec![0.0; topology.atom_count()];
        let mut b = vec![0.0; topology.atom_count()];
        for atom in AtomRange::new(topology)? {
            a[atom.global_index] = atom.atom.charge_in(FreeEnergyState::A);
            b[atom.global_index] = atom.atom.charge_in(FreeEnergyState::B);
        }
        Ok(Self { a, b })
    }

    /// Whether the atom's charge differs between states.
    fn differs(&self, atom: usize) -> bool {
        self.a[atom] != self.b[atom]
    }
}

/// Stably partitions each kind's list so entries whose participants all
/// keep their charge precede entries with at least one charge-perturbed
/// participant. Relative order within each partition is preserved.
pub(crate) fn sort_perturbed_last(lists: &mut InteractionLists, snapshot: &ChargeSnapshot) {
    for kind in InteractionKind::ALL {
        let entries = std::mem::take(lists.list_mut(kind));
        let (unperturbed, perturbed): (Vec<_>, Vec<_>) = entries
            .into_iter()
            .partition(|entry| !entry.atoms.iter().any(|&atom| snapshot.differs(atom)));

        let list = lists.list_mut(kind);
        *list = unperturbed;
        list.extend(perturbed);
    }
}
