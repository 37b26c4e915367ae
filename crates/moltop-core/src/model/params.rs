use super::ids::ParamId;
use super::interaction::InteractionKind;
use nalgebra::{Point3, Vector3};

/// Parameter values of one interaction term, per functional form.
///
/// Restraint forms carry a reference coordinate; in the shared force-field
/// table that coordinate is a placeholder, and the expansion installs each
/// copy's own reference into a per-entry record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TermParams {
    /// Harmonic potential around an equilibrium value (bonds, angles).
    Harmonic { force_constant: f64, equilibrium: f64 },
    /// Cosine dihedral with a phase offset and multiplicity.
    PeriodicDihedral {
        barrier: f64,
        phase: f64,
        multiplicity: u32,
    },
    /// Lennard-Jones pair coefficients for a special short-range pair.
    LennardJonesPair { c6: f64, c12: f64 },
    /// Fixed-distance constraint.
    Constraint { distance: f64 },
    /// Position restraint: per-axis force constants and a reference point.
    PositionRestraint {
        force_constant: Vector3<f64>,
        reference: Point3<f64>,
    },
    /// Flat-bottom restraint: free within `radius` of the reference,
    /// harmonic outside it.
    FlatBottomRestraint {
        radius: f64,
        force_constant: f64,
        reference: Point3<f64>,
    },
}

impl TermParams {
    /// Whether this functional form is the one expected for `kind`.
    pub fn matches(&self, kind: InteractionKind) -> bool {
        matches!(
            (self, kind),
            (TermParams::Harmonic { .. }, InteractionKind::Bond)
                | (TermParams::Harmonic { .. }, InteractionKind::Angle)
                | (TermParams::PeriodicDihedral { .. }, InteractionKind::ProperDihedral)
                | (TermParams::PeriodicDihedral { .. }, InteractionKind::ImproperDihedral)
                | (TermParams::LennardJonesPair { .. }, InteractionKind::Pair)
                | (TermParams::Constraint { .. }, InteractionKind::Constraint)
                | (TermParams::Constraint { .. }, InteractionKind::ConnectivityConstraint)
                | (TermParams::PositionRestraint { .. }, InteractionKind::PositionRestraint)
                | (TermParams::FlatBottomRestraint { .. }, InteractionKind::FlatBottomRestraint)
        )
    }
}

/// One shared parameter record: A-state values plus an optional B state.
///
/// The B state exists only where an alchemical transformation is physically
/// meaningful for the term; absent means "identical to A".
#[derive(Debug, Clone, PartialEq)]
pub struct ParamRecord {
    pub a: TermParams,
    pub b: Option<TermParams>,
}

impl ParamRecord {
    /// A record whose parameters are the same in both states.
    pub fn shared(a: TermParams) -> Self {
        Self { a, b: None }
    }

    /// A record with distinct A- and B-state parameters.
    pub fn perturbed(a: TermParams, b: TermParams) -> Self {
        Self { a, b: Some(b) }
    }

    /// Whether the B state differs from the A state.
    pub fn is_perturbed(&self) -> bool {
        match &self.b {
            Some(b) => *b != self.a,
            None => false,
        }
    }
}

/// The global ordered table of shared interaction parameter records, plus
/// the size of the force field's atom-type table.
///
/// Template interactions of every molecule type reference records here by
/// [`ParamId`]; ids are assigned densely in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForceFieldParams {
    records: Vec<ParamRecord>,
    /// Number of distinct force-field atom types that atom `type_index`
    /// fields may refer to.
    pub atom_type_count: usize,
}

impl ForceFieldParams {
    pub fn new(atom_type_count: usize) -> Self {
        Self {
            records: Vec::new(),
            atom_type_count,
        }
    }

    /// Appends a record and returns its id.
    pub fn push(&mut self, record: ParamRecord) -> ParamId {
        let id = ParamId::new(self.records.len());
        self.records.push(record);
        id
    }

    pub fn get(&self, id: ParamId) -> Option<&ParamRecord> {
        self.records.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ParamRecord] {
        &self.records
    }
}
