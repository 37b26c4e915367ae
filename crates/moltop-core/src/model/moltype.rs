use super::atom::{Atom, AtomCapabilities};
use super::interaction::{InteractionKind, InteractionLists};
use std::ops::Range;

/// A residue inside a molecule template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    /// Residue name (e.g. "ALA", "SOL").
    pub name: String,
    /// Residue number as given by the template (e.g. matching an external
    /// structure file). Reused verbatim for large molecules; replaced by a
    /// running counter for small ones during expansion.
    pub number: isize,
}

impl Residue {
    pub fn new(name: &str, number: isize) -> Self {
        Self {
            name: name.to_string(),
            number,
        }
    }
}

/// A molecule template: the atoms, residues, interactions and exclusions of
/// one kind of molecule, with all indices local to the template.
///
/// A [`MoleculeBlock`](super::block::MoleculeBlock) instantiates a template
/// any number of times; the template itself is never mutated by expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeType {
    pub name: String,
    /// Ordered atom records; `Atom::residue_index` refers into `residues`.
    pub atoms: Vec<Atom>,
    /// Ordered residues the atoms belong to.
    pub residues: Vec<Residue>,
    /// Capability flags of the atom data.
    pub capabilities: AtomCapabilities,
    /// Template interaction lists with local atom indices.
    pub interactions: InteractionLists,
    /// Per-atom exclusion sets: `exclusions[i]` holds the local indices
    /// whose nonbonded interaction with atom `i` is skipped. Symmetric.
    pub exclusions: Vec<Vec<usize>>,
}

impl MoleculeType {
    /// Creates a template with no interactions and one empty exclusion set
    /// per atom.
    pub fn new(name: &str, atoms: Vec<Atom>, residues: Vec<Residue>) -> Self {
        let exclusions = vec![Vec::new(); atoms.len()];
        Self {
            name: name.to_string(),
            atoms,
            residues,
            capabilities: AtomCapabilities::full(),
            interactions: InteractionLists::new(),
            exclusions,
        }
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    /// Whether any restraint-kind interaction is present, which obliges the
    /// owning blocks to carry reference-coordinate tables.
    pub fn has_restraints(&self) -> bool {
        InteractionKind::ALL
            .iter()
            .any(|&kind| kind.is_restraint() && !self.interactions.get(kind).is_empty())
    }

    /// The contiguous local atom range of each residue, in residue order.
    ///
    /// Ranges tile `0..atom_count()` exactly; atoms of one residue are
    /// assumed contiguous, as produced by topology construction.
    pub fn residue_atom_ranges(&self) -> Vec<Range<usize>> {
        let mut ranges = Vec::with_capacity(self.residues.len());
        if self.atoms.is_empty() {
            return ranges;
        }

        let mut current = self.atoms[0].residue_index;
        let mut start = 0;
        for (i, atom) in self.atoms.iter().enumerate() {
            if atom.residue_index != current {
                ranges.push(start..i);
                start = i;
                current = atom.residue_index;
            }
        }
        ranges.push(start..self.atoms.len());

        ranges
    }
}
