use super::config::ExpansionConfig;
use super::error::ExpansionError;
use super::exclusions::ExclusionLists;
use super::interactions::expand_interactions;
use super::restraints::{SpecializedRestraints, specialize_restraints};
use super::sort::{ChargeSnapshot, FreeEnergyOrdering, sort_perturbed_last};
use super::validate::validate_topology;
use crate::model::atom::{Atom, AtomCapabilities};
use crate::model::interaction::InteractionLists;
use crate::model::moltype::Residue;
use crate::model::params::ForceFieldParams;
use crate::model::topology::GlobalTopology;
use tracing::{debug, info, instrument};

/// The owned result of one expansion run: everything the output views are
/// projected from, with no storage shared with the source topology.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedTopology {
    /// Globally indexed interaction lists per kind.
    pub interactions: InteractionLists,
    /// Per-entry restraint parameter tables; restraint entries in
    /// `interactions` index these.
    pub restraints: SpecializedRestraints,
    /// Per-atom exclusion lists, including any group extension.
    pub exclusions: ExclusionLists,
    /// Whether perturbed entries trail per kind.
    pub ordering: FreeEnergyOrdering,
}

impl ExpandedTopology {
    /// Runs the whole expansion: validation, interaction replication,
    /// restraint specialization, exclusion building (plus the
    /// intermolecular group extension) and, if configured, the
    /// free-energy sort.
    ///
    /// # Errors
    ///
    /// Any structural-consistency fault aborts the derivation; nothing
    /// partial is returned.
    #[instrument(skip_all, name = "topology_expansion")]
    pub fn build(
        topology: &GlobalTopology,
        config: &ExpansionConfig,
    ) -> Result<Self, ExpansionError> {
        validate_topology(topology)?;
        info!(
            blocks = topology.blocks().len(),
            atoms = topology.atom_count(),
            "Expanding replicated topology."
        );

        let mut interactions = expand_interactions(topology, config)?;
        let restraints = specialize_restraints(topology, &mut interactions)?;

        let mut exclusions = ExclusionLists::build(topology)?;
        if !topology.intermolecular_exclusion_group.is_empty() {
            exclusions.add_mutual_exclusions(&topology.intermolecular_exclusion_group)?;
        }

        let ordering = if config.free_energy_sort {
            let snapshot = ChargeSnapshot::capture(topology)?;
            sort_perturbed_last(&mut interactions, &snapshot);
            FreeEnergyOrdering::PerturbedLast
        } else {
            FreeEnergyOrdering::Unsorted
        };

        debug!(
            entries = interactions.total_len(),
            exclusions = exclusions.total_exclusions(),
            "Expansion complete."
        );

        Ok(Self {
            interactions,
            restraints,
            exclusions,
            ordering,
        })
    }

    /// Projects the expansion into the reduced view, consuming it.
    pub fn into_reduced(self) -> ReducedTopology {
        ReducedTopology {
            interactions: self.interactions,
            restraints: self.restraints,
            exclusions: self.exclusions,
            ordering: self.ordering,
        }
    }
}

/// The per-domain view: expanded interactions (free-energy sorted when
/// configured) and exclusion lists.
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedTopology {
    pub interactions: InteractionLists,
    pub restraints: SpecializedRestraints,
    pub exclusions: ExclusionLists,
    pub ordering: FreeEnergyOrdering,
}

/// The eagerly concatenated global atom array of the full view.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalAtoms {
    /// Every atom of every copy, with `residue_index` rewritten to point
    /// into the global `residues` list.
    pub atoms: Vec<Atom>,
    /// Every residue of every copy; small-molecule residues renumbered by
    /// the shared running counter.
    pub residues: Vec<Residue>,
    /// Capability flags AND-merged over every concatenated molecule type.
    pub capabilities: AtomCapabilities,
}

/// The whole-system aggregate view: an owned copy of the force-field
/// parameter table, the expanded interactions (never free-energy sorted),
/// the concatenated atoms, and the molecule-boundary table.
#[derive(Debug, Clone, PartialEq)]
pub struct FullTopology {
    /// System name, carried over from the topology.
    pub name: String,
    pub params: ForceFieldParams,
    pub interactions: InteractionLists,
    pub restraints: SpecializedRestraints,
    pub atoms: GlobalAtoms,
    /// Cumulative atom starts of every molecule copy: entry `m` is the
    /// first global atom of molecule `m`, the final entry is the total
    /// atom count.
    pub molecule_starts: Vec<usize>,
}

/// Derives the reduced view.
///
/// # Errors
///
/// Propagates every structural-consistency fault of
/// [`ExpandedTopology::build`].
#[instrument(skip_all, name = "reduced_view")]
pub fn reduced_topology(
    topology: &GlobalTopology,
    config: &ExpansionConfig,
) -> Result<ReducedTopology, ExpansionError> {
    Ok(ExpandedTopology::build(topology, config)?.into_reduced())
}

/// Derives the full aggregate view. `free_energy_sort` is ignored: the
/// full view is never sorted.
///
/// # Errors
///
/// Propagates every structural-consistency fault of
/// [`ExpandedTopology::build`].
#[instrument(skip_all, name = "full_view")]
pub fn full_topology(
    topology: &GlobalTopology,
    config: &ExpansionConfig,
) -> Result<FullTopology, ExpansionError> {
    let unsorted = ExpansionConfig {
        free_energy_sort: false,
        ..config.clone()
    };
    let expanded = ExpandedTopology::build(topology, &unsorted)?;
    let atoms = concatenate_atoms(topology)?;
    let molecule_starts = molecule_starts(topology)?;

    info!(
        atoms = atoms.atoms.len(),
        molecules = molecule_starts.len() - 1,
        "Composed full aggregate view."
    );

    Ok(FullTopology {
        name: topology.name.clone(),
        params: topology.params.clone(),
        interactions: expanded.interactions,
        restraints: expanded.restraints,
        atoms,
        molecule_starts,
    })
}

fn concatenate_atoms(topology: &GlobalTopology) -> Result<GlobalAtoms, ExpansionError> {
    let mut atoms = Vec::with_capacity(topology.atom_count());
    let mut residues = Vec::with_capacity(topology.residue_count());
    let mut capabilities: Option<AtomCapabilities> = None;
    let mut counter = topology.max_residue_number_not_renumbered();

    for (index, block) in topology.blocks().iter().enumerate() {
        let moltype = topology
            .molecule_type(block.moltype)
            .ok_or(ExpansionError::UnknownMoleculeType { block: index })?;
        capabilities = Some(match capabilities {
            None => moltype.capabilities,
            Some(merged) => merged.merged_with(moltype.capabilities),
        });

        let renumbered = moltype.residue_count() <= topology.renumber_residue_limit;
        for _ in 0..block.count {
            let residue_base = residues.len();
            for residue in &moltype.residues {
                let number = if renumbered {
                    counter += 1;
                    counter
                } else {
                    residue.number
                };
                residues.push(Residue {
                    name: residue.name.clone(),
                    number,
                });
            }
            for atom in &moltype.atoms {
                let mut record = atom.clone();
                record.residue_index = residue_base + atom.residue_index;
                atoms.push(record);
            }
        }
    }

    Ok(GlobalAtoms {
        atoms,
        residues,
        capabilities: capabilities.unwrap_or_default(),
    })
}

fn molecule_starts(topology: &GlobalTopology) -> Result<Vec<usize>, ExpansionError> {
    let mut starts = Vec::with_capacity(topology.molecule_count() + 1);
    starts.push(0);
    let mut global = 0usize;
    for (index, block) in topology.blocks().iter().enumerate() {
        let moltype = topology
            .molecule_type(block.moltype)
            .ok_or(ExpansionError::UnknownMoleculeType { block: index })?;
        for _ in 0..block.count {
            global += moltype.atom_count();
            starts.push(global);
        }
    }
    Ok(starts)
}
