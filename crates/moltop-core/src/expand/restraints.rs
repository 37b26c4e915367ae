use super::error::ExpansionError;
use crate::model::ids::ParamId;
use crate::model::interaction::{Interaction, InteractionKind, InteractionLists};
use crate::model::params::{ParamRecord, TermParams};
use crate::model::topology::GlobalTopology;
use nalgebra::Point3;

/// Per-entry parameter tables produced by restraint specialization.
///
/// Restraint entries in the expanded lists have their [`ParamId`]s
/// rewritten to index these tables instead of the shared force-field
/// table; every entry owns its slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecializedRestraints {
    pub position: Vec<ParamRecord>,
    pub flat_bottom: Vec<ParamRecord>,
}

/// Gives every expanded restraint entry its own parameter record holding
/// the shared force constants and the reference coordinate of its own
/// molecule copy.
///
/// The A reference comes from the owning block's A table; the B reference
/// comes from the B table when the block has one, else it equals the A
/// reference. Flat-bottom restraints carry no B state.
pub(crate) fn specialize_restraints(
    topology: &GlobalTopology,
    lists: &mut InteractionLists,
) -> Result<SpecializedRestraints, ExpansionError> {
    let mut tables = SpecializedRestraints::default();
    specialize_kind(
        topology,
        InteractionKind::PositionRestraint,
        lists.list_mut(InteractionKind::PositionRestraint),
        &mut tables.position,
    )?;
    specialize_kind(
        topology,
        InteractionKind::FlatBottomRestraint,
        lists.list_mut(InteractionKind::FlatBottomRestraint),
        &mut tables.flat_bottom,
    )?;
    Ok(tables)
}

fn specialize_kind(
    topology: &GlobalTopology,
    kind: InteractionKind,
    entries: &mut [Interaction],
    table: &mut Vec<ParamRecord>,
) -> Result<(), ExpansionError> {
    let mut cursor = 0usize;
    let mut base = 0usize;

    for (index, block) in topology.blocks().iter().enumerate() {
        let moltype = topology
            .molecule_type(block.moltype)
            .ok_or(ExpansionError::UnknownMoleculeType { block: index })?;
        let in_block = block.count * moltype.interactions.get(kind).len();

        if in_block > 0 {
            let refs_a = block.restraint_refs_a.as_ref().ok_or(
                ExpansionError::MissingRestraintCoords { kind, block: index },
            )?;

            for entry_index in cursor..cursor + in_block {
                let entry = &mut entries[entry_index];
                let shared = topology.params.get(entry.params).ok_or_else(|| {
                    ExpansionError::InvalidParamId {
                        kind,
                        location: format!("block {index}"),
                        entry: entry_index,
                        param: entry.params,
                        table_len: topology.params.len(),
                    }
                })?;

                // Copy-major position of the restrained atom within the
                // block, which is exactly the reference-table index.
                let within_block = entry.atoms[0] - base;
                let a_ref = table_entry(refs_a, within_block, index, 'A')?;
                let b_ref = match &block.restraint_refs_b {
                    Some(refs_b) => Some(table_entry(refs_b, within_block, index, 'B')?),
                    None => None,
                };

                let record =
                    specialized_record(kind, index, entry_index, entry.params, shared, a_ref, b_ref)?;
                entry.params = ParamId::new(table.len());
                table.push(record);
            }
            cursor += in_block;
        }

        base += block.count * moltype.atom_count();
    }

    Ok(())
}

fn table_entry(
    refs: &[Point3<f64>],
    within_block: usize,
    block: usize,
    state: char,
) -> Result<Point3<f64>, ExpansionError> {
    refs.get(within_block)
        .copied()
        .ok_or(ExpansionError::RestraintCoordsTooShort {
            block,
            state,
            needed: within_block + 1,
            len: refs.len(),
        })
}

fn specialized_record(
    kind: InteractionKind,
    block: usize,
    entry: usize,
    param: ParamId,
    shared: &ParamRecord,
    a_ref: Point3<f64>,
    b_ref: Option<Point3<f64>>,
) -> Result<ParamRecord, ExpansionError> {
    let mismatch = || ExpansionError::ParamKindMismatch {
        kind,
        location: format!("block {block}"),
        entry,
        param,
    };

    match kind {
        InteractionKind::PositionRestraint => {
            let TermParams::PositionRestraint { force_constant, .. } = shared.a else {
                return Err(mismatch());
            };
            // B-state force constants fall back to A's when the shared
            // record carries no B state.
            let force_constant_b = match &shared.b {
                Some(TermParams::PositionRestraint {
                    force_constant: fc, ..
                }) => *fc,
                Some(_) => return Err(mismatch()),
                None => force_constant,
            };
            Ok(ParamRecord::perturbed(
                TermParams::PositionRestraint {
                    force_constant,
                    reference: a_ref,
                },
                TermParams::PositionRestraint {
                    force_constant: force_constant_b,
                    reference: b_ref.unwrap_or(a_ref),
                },
            ))
        }
        InteractionKind::FlatBottomRestraint => {
            let TermParams::FlatBottomRestraint {
                radius,
                force_constant,
                ..
            } = shared.a
            else {
                return Err(mismatch());
            };
            Ok(ParamRecord::shared(TermParams::FlatBottomRestraint {
                radius,
                force_constant,
                reference: a_ref,
            }))
        }
        _ => Err(mismatch()),
    }
}
