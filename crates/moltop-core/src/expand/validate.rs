use super::error::ExpansionError;
use crate::model::interaction::{Interaction, InteractionKind, InteractionLists};
use crate::model::moltype::MoleculeType;
use crate::model::params::ForceFieldParams;
use crate::model::topology::GlobalTopology;

/// Checks a topology for every structural-consistency fault the expansion
/// passes rely on being absent, so that each view derivation is atomic:
/// after this returns `Ok`, the passes themselves cannot fail halfway
/// through for reasons of malformed input.
///
/// # Errors
///
/// Returns the first fault found: unresolvable or empty blocks, dangling or
/// mismatched parameter references, out-of-range atom/residue/type indices,
/// asymmetric template exclusions, missing or undersized restraint
/// reference tables, or count overflow.
pub fn validate_topology(topology: &GlobalTopology) -> Result<(), ExpansionError> {
    for (_, moltype) in topology.molecule_types() {
        validate_molecule_type(moltype, &topology.params)?;
    }

    for (index, block) in topology.blocks().iter().enumerate() {
        let moltype = topology
            .molecule_type(block.moltype)
            .ok_or(ExpansionError::UnknownMoleculeType { block: index })?;
        if block.count == 0 {
            return Err(ExpansionError::EmptyBlock { block: index });
        }
        if moltype.atom_count() == 0 {
            return Err(ExpansionError::EmptyMoleculeType {
                block: index,
                molecule: moltype.name.clone(),
            });
        }
        validate_restraint_tables(index, block.count, moltype, topology)?;
    }

    let atom_count = checked_atom_count(topology)?;

    if let Some(intermolecular) = &topology.intermolecular {
        validate_intermolecular(intermolecular, &topology.params, atom_count)?;
    }

    for (position, &index) in topology.intermolecular_exclusion_group.iter().enumerate() {
        if index >= atom_count {
            return Err(ExpansionError::ExclusionGroupIndexOutOfRange {
                position,
                index,
                atom_count,
            });
        }
    }

    Ok(())
}

/// Total atom count computed with checked arithmetic, so overflow is
/// reported before any expanded index could be truncated.
pub(crate) fn checked_atom_count(topology: &GlobalTopology) -> Result<usize, ExpansionError> {
    let mut total: usize = 0;
    for (index, block) in topology.blocks().iter().enumerate() {
        let moltype = topology
            .molecule_type(block.moltype)
            .ok_or(ExpansionError::UnknownMoleculeType { block: index })?;
        let in_block = block
            .count
            .checked_mul(moltype.atom_count())
            .ok_or(ExpansionError::CountOverflow { what: "atom count" })?;
        total = total
            .checked_add(in_block)
            .ok_or(ExpansionError::CountOverflow { what: "atom count" })?;
    }
    Ok(total)
}

fn validate_molecule_type(
    moltype: &MoleculeType,
    params: &ForceFieldParams,
) -> Result<(), ExpansionError> {
    let atom_count = moltype.atom_count();
    let residue_count = moltype.residue_count();

    for (index, atom) in moltype.atoms.iter().enumerate() {
        if atom.residue_index >= residue_count {
            return Err(ExpansionError::ResidueIndexOutOfRange {
                molecule: moltype.name.clone(),
                atom: index,
                residue: atom.residue_index,
                residue_count,
            });
        }
        let type_b = atom.b_state.as_ref().map(|b| b.type_index);
        for type_index in [Some(atom.type_index), type_b].into_iter().flatten() {
            if type_index >= params.atom_type_count {
                return Err(ExpansionError::AtomTypeOutOfRange {
                    molecule: moltype.name.clone(),
                    atom: index,
                    type_index,
                    type_count: params.atom_type_count,
                });
            }
        }
    }

    if moltype.exclusions.len() != atom_count {
        return Err(ExpansionError::ExclusionCountMismatch {
            molecule: moltype.name.clone(),
            lists: moltype.exclusions.len(),
            atoms: atom_count,
        });
    }
    for (atom, excluded) in moltype.exclusions.iter().enumerate() {
        for &other in excluded {
            if other >= atom_count {
                return Err(ExpansionError::ExclusionIndexOutOfRange {
                    molecule: moltype.name.clone(),
                    atom,
                    index: other,
                    atom_count,
                });
            }
            if other != atom && !moltype.exclusions[other].contains(&atom) {
                return Err(ExpansionError::AsymmetricExclusions {
                    molecule: moltype.name.clone(),
                    atom,
                    other,
                });
            }
        }
    }

    let location = format!("molecule type '{}'", moltype.name);
    for (kind, entries) in moltype.interactions.iter() {
        for (entry, interaction) in entries.iter().enumerate() {
            validate_entry(kind, entry, interaction, params, &location)?;
            for &index in &interaction.atoms {
                if index >= atom_count {
                    return Err(ExpansionError::LocalIndexOutOfRange {
                        kind,
                        molecule: moltype.name.clone(),
                        entry,
                        index,
                        atom_count,
                    });
                }
            }
        }
    }

    Ok(())
}

fn validate_intermolecular(
    lists: &InteractionLists,
    params: &ForceFieldParams,
    atom_count: usize,
) -> Result<(), ExpansionError> {
    let location = "the intermolecular list".to_string();
    for (kind, entries) in lists.iter() {
        if kind.is_restraint() && !entries.is_empty() {
            return Err(ExpansionError::IntermolecularRestraint { kind });
        }
        for (entry, interaction) in entries.iter().enumerate() {
            validate_entry(kind, entry, interaction, params, &location)?;
            for &index in &interaction.atoms {
                if index >= atom_count {
                    return Err(ExpansionError::IntermolecularIndexOutOfRange {
                        kind,
                        entry,
                        index,
                        atom_count,
                    });
                }
            }
        }
    }
    Ok(())
}

fn validate_entry(
    kind: InteractionKind,
    entry: usize,
    interaction: &Interaction,
    params: &ForceFieldParams,
    location: &str,
) -> Result<(), ExpansionError> {
    if interaction.atoms.len() != kind.arity() {
        return Err(ExpansionError::WrongArity {
            kind,
            location: location.to_string(),
            entry,
            expected: kind.arity(),
            found: interaction.atoms.len(),
        });
    }
    let record = params
        .get(interaction.params)
        .ok_or_else(|| ExpansionError::InvalidParamId {
            kind,
            location: location.to_string(),
            entry,
            param: interaction.params,
            table_len: params.len(),
        })?;
    let forms_match =
        record.a.matches(kind) && record.b.as_ref().is_none_or(|b| b.matches(kind));
    if !forms_match {
        return Err(ExpansionError::ParamKindMismatch {
            kind,
            location: location.to_string(),
            entry,
            param: interaction.params,
        });
    }
    Ok(())
}

fn validate_restraint_tables(
    block_index: usize,
    copies: usize,
    moltype: &MoleculeType,
    topology: &GlobalTopology,
) -> Result<(), ExpansionError> {
    let restrained_kinds: Vec<InteractionKind> = InteractionKind::ALL
        .into_iter()
        .filter(|kind| kind.is_restraint() && !moltype.interactions.get(*kind).is_empty())
        .collect();
    if restrained_kinds.is_empty() {
        return Ok(());
    }

    let needed = copies
        .checked_mul(moltype.atom_count())
        .ok_or(ExpansionError::CountOverflow { what: "atom count" })?;
    let block = &topology.blocks()[block_index];
    let refs_a = block
        .restraint_refs_a
        .as_ref()
        .ok_or(ExpansionError::MissingRestraintCoords {
            kind: restrained_kinds[0],
            block: block_index,
        })?;
    if refs_a.len() < needed {
        return Err(ExpansionError::RestraintCoordsTooShort {
            block: block_index,
            state: 'A',
            needed,
            len: refs_a.len(),
        });
    }
    if let Some(refs_b) = &block.restraint_refs_b {
        if refs_b.len() < needed {
            return Err(ExpansionError::RestraintCoordsTooShort {
                block: block_index,
                state: 'B',
                needed,
                len: refs_b.len(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::block::MoleculeBlock;
    use crate::model::ids::ParamId;
    use crate::model::moltype::Residue;
    use crate::model::params::{ParamRecord, TermParams};
    use nalgebra::Point3;

    fn bond_params() -> ForceFieldParams {
        let mut params = ForceFieldParams::new(2);
        params.push(ParamRecord::shared(TermParams::Harmonic {
            force_constant: 1000.0,
            equilibrium: 0.1,
        }));
        params
    }

    fn diatomic() -> MoleculeType {
        let atoms = vec![Atom::new(0, 0.2, 12.011, 0), Atom::new(1, -0.2, 15.999, 0)];
        let mut moltype = MoleculeType::new("diatomic", atoms, vec![Residue::new("DIA", 1)]);
        moltype.interactions.push(
            InteractionKind::Bond,
            Interaction::new(ParamId::new(0), vec![0, 1]),
        );
        moltype.exclusions = vec![vec![1], vec![0]];
        moltype
    }

    fn valid_topology() -> GlobalTopology {
        let mut topology = GlobalTopology::new("test", bond_params());
        let id = topology.add_molecule_type(diatomic());
        topology.add_block(MoleculeBlock::new(id, 2));
        topology
    }

    #[test]
    fn valid_topology_passes() {
        assert_eq!(validate_topology(&valid_topology()), Ok(()));
    }

    #[test]
    fn zero_copy_block_is_rejected() {
        let mut topology = GlobalTopology::new("test", bond_params());
        let id = topology.add_molecule_type(diatomic());
        topology.add_block(MoleculeBlock::new(id, 0));
        assert_eq!(
            validate_topology(&topology),
            Err(ExpansionError::EmptyBlock { block: 0 })
        );
    }

    #[test]
    fn dangling_param_id_is_rejected() {
        let mut topology = GlobalTopology::new("test", bond_params());
        let mut moltype = diatomic();
        moltype.interactions.push(
            InteractionKind::Bond,
            Interaction::new(ParamId::new(9), vec![0, 1]),
        );
        let id = topology.add_molecule_type(moltype);
        topology.add_block(MoleculeBlock::new(id, 1));
        assert!(matches!(
            validate_topology(&topology),
            Err(ExpansionError::InvalidParamId {
                kind: InteractionKind::Bond,
                entry: 1,
                ..
            })
        ));
    }

    #[test]
    fn param_of_wrong_functional_form_is_rejected() {
        let mut topology = GlobalTopology::new("test", bond_params());
        let mut moltype = diatomic();
        // A bond pointing at a harmonic record is fine; a pair is not.
        moltype.interactions.push(
            InteractionKind::Pair,
            Interaction::new(ParamId::new(0), vec![0, 1]),
        );
        let id = topology.add_molecule_type(moltype);
        topology.add_block(MoleculeBlock::new(id, 1));
        assert!(matches!(
            validate_topology(&topology),
            Err(ExpansionError::ParamKindMismatch {
                kind: InteractionKind::Pair,
                ..
            })
        ));
    }

    #[test]
    fn wrong_arity_is_rejected() {
        let mut topology = GlobalTopology::new("test", bond_params());
        let mut moltype = diatomic();
        moltype.interactions.push(
            InteractionKind::Bond,
            Interaction::new(ParamId::new(0), vec![0]),
        );
        let id = topology.add_molecule_type(moltype);
        topology.add_block(MoleculeBlock::new(id, 1));
        assert!(matches!(
            validate_topology(&topology),
            Err(ExpansionError::WrongArity {
                expected: 2,
                found: 1,
                ..
            })
        ));
    }

    #[test]
    fn asymmetric_exclusions_are_rejected() {
        let mut topology = GlobalTopology::new("test", bond_params());
        let mut moltype = diatomic();
        moltype.exclusions = vec![vec![1], vec![]];
        let id = topology.add_molecule_type(moltype);
        topology.add_block(MoleculeBlock::new(id, 1));
        assert_eq!(
            validate_topology(&topology),
            Err(ExpansionError::AsymmetricExclusions {
                molecule: "diatomic".to_string(),
                atom: 0,
                other: 1,
            })
        );
    }

    #[test]
    fn out_of_range_exclusion_group_member_is_rejected() {
        let mut topology = valid_topology();
        topology.intermolecular_exclusion_group = vec![0, 4];
        assert_eq!(
            validate_topology(&topology),
            Err(ExpansionError::ExclusionGroupIndexOutOfRange {
                position: 1,
                index: 4,
                atom_count: 4,
            })
        );
    }

    #[test]
    fn restraint_block_without_coordinates_is_rejected() {
        let mut topology = GlobalTopology::new("test", bond_params());
        let restraint_param = topology.params.push(ParamRecord::shared(
            TermParams::PositionRestraint {
                force_constant: nalgebra::Vector3::new(1.0, 1.0, 1.0),
                reference: Point3::origin(),
            },
        ));
        let mut moltype = diatomic();
        moltype.interactions.push(
            InteractionKind::PositionRestraint,
            Interaction::new(restraint_param, vec![0]),
        );
        let id = topology.add_molecule_type(moltype);
        topology.add_block(MoleculeBlock::new(id, 2));
        assert_eq!(
            validate_topology(&topology),
            Err(ExpansionError::MissingRestraintCoords {
                kind: InteractionKind::PositionRestraint,
                block: 0,
            })
        );

        // An undersized table is just as inconsistent as a missing one.
        let blocks = vec![
            MoleculeBlock::new(id, 2).with_restraint_refs(vec![Point3::origin(); 3]),
        ];
        let mut short = GlobalTopology::new("test", topology.params.clone());
        let id2 = short.add_molecule_type(topology.molecule_type(id).unwrap().clone());
        for mut block in blocks {
            block.moltype = id2;
            short.add_block(block);
        }
        assert_eq!(
            validate_topology(&short),
            Err(ExpansionError::RestraintCoordsTooShort {
                block: 0,
                state: 'A',
                needed: 4,
                len: 3,
            })
        );
    }

    #[test]
    fn atom_count_overflow_is_reported() {
        let mut topology = GlobalTopology::new("test", bond_params());
        let id = topology.add_molecule_type(diatomic());
        topology.add_block(MoleculeBlock::new(id, usize::MAX / 2 + 1));
        assert_eq!(
            validate_topology(&topology),
            Err(ExpansionError::CountOverflow { what: "atom count" })
        );
    }
}
