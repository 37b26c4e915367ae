use super::config::ExpansionConfig;
use super::error::ExpansionError;
use crate::model::interaction::{Interaction, InteractionKind, InteractionLists};
use crate::model::topology::GlobalTopology;
use std::collections::HashSet;

/// Expands every template interaction list into global indices.
///
/// Blocks are visited in order; within a block, copies in order; each
/// copy's entries keep their template order. Every participating index is
/// offset by the copy's global atom base. The intermolecular lists, which
/// already carry global indices, are appended verbatim exactly once at the
/// end, never offset and never filtered.
///
/// With `merge_constraints` set, connectivity-only constraints are folded
/// into the plain constraint list per replica, plain entries first. With a
/// filter present, filterable kinds only keep entries with at least one
/// participating atom in either group.
pub(crate) fn expand_interactions(
    topology: &GlobalTopology,
    config: &ExpansionConfig,
) -> Result<InteractionLists, ExpansionError> {
    let members = config.filter.as_ref().map(|filter| filter.member_set());

    let mut dest = InteractionLists::new();
    let mut base = 0usize;
    for (index, block) in topology.blocks().iter().enumerate() {
        let moltype = topology
            .molecule_type(block.moltype)
            .ok_or(ExpansionError::UnknownMoleculeType { block: index })?;
        let atoms_per_copy = moltype.atom_count();

        for kind in InteractionKind::ALL {
            let connectivity = moltype
                .interactions
                .get(InteractionKind::ConnectivityConstraint);
            let merging = config.merge_constraints && !connectivity.is_empty();

            if merging && kind == InteractionKind::ConnectivityConstraint {
                continue;
            }

            let src = moltype.interactions.get(kind);
            let filter = members
                .as_ref()
                .filter(|_| kind.supports_group_filter());

            if merging && kind == InteractionKind::Constraint {
                // One replica at a time, plain entries before
                // connectivity-only ones, so the merged list still groups
                // by copy.
                for copy in 0..block.count {
                    let offset = base + copy * atoms_per_copy;
                    replicate_into(dest.list_mut(kind), src, offset, None);
                    replicate_into(dest.list_mut(kind), connectivity, offset, None);
                }
            } else {
                for copy in 0..block.count {
                    let offset = base + copy * atoms_per_copy;
                    replicate_into(dest.list_mut(kind), src, offset, filter);
                }
            }
        }

        base += block.count * atoms_per_copy;
    }

    if let Some(intermolecular) = &topology.intermolecular {
        for (kind, entries) in intermolecular.iter() {
            dest.list_mut(kind).extend(entries.iter().cloned());
        }
    }

    Ok(dest)
}

fn replicate_into(
    dest: &mut Vec<Interaction>,
    src: &[Interaction],
    offset: usize,
    filter: Option<&HashSet<usize>>,
) {
    for interaction in src {
        let atoms: Vec<usize> = interaction.atoms.iter().map(|&a| offset + a).collect();
        if let Some(members) = filter {
            if !atoms.iter().any(|a| members.contains(a)) {
                continue;
            }
        }
        dest.push(Interaction::new(interaction.params, atoms));
    }
}
