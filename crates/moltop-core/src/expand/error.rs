use crate::model::ids::ParamId;
use crate::model::interaction::InteractionKind;
use thiserror::Error;

/// Structural-consistency fault detected while deriving a view.
///
/// Every variant aborts the whole derivation: nothing partial is returned,
/// nothing is retried or defaulted.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExpansionError {
    #[error(
        "Atom range must start at 0 or at the total atom count {atom_count}, got {start}"
    )]
    InvalidRangeStart { start: usize, atom_count: usize },

    #[error("Block {block} references an unknown molecule type")]
    UnknownMoleculeType { block: usize },

    #[error("Block {block} has a copy count of 0")]
    EmptyBlock { block: usize },

    #[error("Block {block} references molecule type '{molecule}' which has no atoms")]
    EmptyMoleculeType { block: usize, molecule: String },

    #[error("Count overflow while computing {what}")]
    CountOverflow { what: &'static str },

    #[error(
        "{kind} entry {entry} of {location} references parameter record {param:?} outside the table of {table_len}"
    )]
    InvalidParamId {
        kind: InteractionKind,
        location: String,
        entry: usize,
        param: ParamId,
        table_len: usize,
    },

    #[error(
        "{kind} entry {entry} of {location} references a parameter record of the wrong functional form"
    )]
    ParamKindMismatch {
        kind: InteractionKind,
        location: String,
        entry: usize,
        param: ParamId,
    },

    #[error(
        "{kind} entry {entry} of {location} has {found} atoms, expected {expected}"
    )]
    WrongArity {
        kind: InteractionKind,
        location: String,
        entry: usize,
        expected: usize,
        found: usize,
    },

    #[error(
        "{kind} entry {entry} of molecule type '{molecule}' references local atom {index} out of {atom_count}"
    )]
    LocalIndexOutOfRange {
        kind: InteractionKind,
        molecule: String,
        entry: usize,
        index: usize,
        atom_count: usize,
    },

    #[error(
        "Intermolecular {kind} entry {entry} references global atom {index} out of {atom_count}"
    )]
    IntermolecularIndexOutOfRange {
        kind: InteractionKind,
        entry: usize,
        index: usize,
        atom_count: usize,
    },

    #[error(
        "Intermolecular exclusion group member {position} is atom {index}, out of {atom_count}"
    )]
    ExclusionGroupIndexOutOfRange {
        position: usize,
        index: usize,
        atom_count: usize,
    },

    #[error(
        "Molecule type '{molecule}' has {lists} exclusion sets for {atoms} atoms"
    )]
    ExclusionCountMismatch {
        molecule: String,
        lists: usize,
        atoms: usize,
    },

    #[error(
        "Molecule type '{molecule}': exclusion of atom {other} by atom {atom} has no mirror entry"
    )]
    AsymmetricExclusions {
        molecule: String,
        atom: usize,
        other: usize,
    },

    #[error(
        "Molecule type '{molecule}': exclusion set of atom {atom} references local atom {index} out of {atom_count}"
    )]
    ExclusionIndexOutOfRange {
        molecule: String,
        atom: usize,
        index: usize,
        atom_count: usize,
    },

    #[error(
        "Molecule type '{molecule}': atom {atom} belongs to residue {residue}, but the template has {residue_count} residues"
    )]
    ResidueIndexOutOfRange {
        molecule: String,
        atom: usize,
        residue: usize,
        residue_count: usize,
    },

    #[error(
        "Molecule type '{molecule}': atom {atom} has force-field type {type_index}, but the force field has {type_count} types"
    )]
    AtomTypeOutOfRange {
        molecule: String,
        atom: usize,
        type_index: usize,
        type_count: usize,
    },

    #[error(
        "The intermolecular list carries {kind} entries, but restraints have no owning block to take reference coordinates from"
    )]
    IntermolecularRestraint { kind: InteractionKind },

    #[error("Block {block} carries {kind} entries but no reference-coordinate table")]
    MissingRestraintCoords { kind: InteractionKind, block: usize },

    #[error(
        "Block {block}: {state}-state reference-coordinate table holds {len} entries, needs at least {needed}"
    )]
    RestraintCoordsTooShort {
        block: usize,
        state: char,
        needed: usize,
        len: usize,
    },
}
