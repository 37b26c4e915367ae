use super::ids::ParamId;
use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The functional kind of a bonded-style interaction.
///
/// Every interaction list, template or expanded, is segregated by kind.
/// The kind fixes the number of participating atoms and decides which
/// expansion special cases apply (constraint merging, restraint parameter
/// specialization, group filtering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InteractionKind {
    Bond,
    Angle,
    ProperDihedral,
    ImproperDihedral,
    /// Special short-range nonbonded pair (e.g. a scaled 1-4 pair).
    Pair,
    Constraint,
    /// Constraint that fixes a distance without generating connectivity.
    ConnectivityConstraint,
    /// Anchors one atom to a fixed reference coordinate.
    PositionRestraint,
    /// Restrains one atom to stay within a region around a reference
    /// coordinate, with zero force inside it.
    FlatBottomRestraint,
}

static KIND_NAMES: Map<&'static str, InteractionKind> = phf_map! {
    "bond" => InteractionKind::Bond,
    "angle" => InteractionKind::Angle,
    "proper-dihedral" => InteractionKind::ProperDihedral,
    "dihedral" => InteractionKind::ProperDihedral,
    "improper-dihedral" => InteractionKind::ImproperDihedral,
    "improper" => InteractionKind::ImproperDihedral,
    "pair" => InteractionKind::Pair,
    "constraint" => InteractionKind::Constraint,
    "connectivity-constraint" => InteractionKind::ConnectivityConstraint,
    "position-restraint" => InteractionKind::PositionRestraint,
    "flat-bottom-restraint" => InteractionKind::FlatBottomRestraint,
};

impl InteractionKind {
    pub const COUNT: usize = 9;

    /// Every kind, in canonical list order.
    pub const ALL: [InteractionKind; Self::COUNT] = [
        InteractionKind::Bond,
        InteractionKind::Angle,
        InteractionKind::ProperDihedral,
        InteractionKind::ImproperDihedral,
        InteractionKind::Pair,
        InteractionKind::Constraint,
        InteractionKind::ConnectivityConstraint,
        InteractionKind::PositionRestraint,
        InteractionKind::FlatBottomRestraint,
    ];

    /// Number of atoms participating in one interaction of this kind.
    pub const fn arity(self) -> usize {
        match self {
            Self::Bond | Self::Pair | Self::Constraint | Self::ConnectivityConstraint => 2,
            Self::Angle => 3,
            Self::ProperDihedral | Self::ImproperDihedral => 4,
            Self::PositionRestraint | Self::FlatBottomRestraint => 1,
        }
    }

    /// Whether this kind uses per-atom reference coordinates and therefore
    /// needs per-entry parameter specialization after expansion.
    pub const fn is_restraint(self) -> bool {
        matches!(self, Self::PositionRestraint | Self::FlatBottomRestraint)
    }

    /// Whether the two-group interaction filter applies to this kind.
    ///
    /// Constraints and restraints are never filtered; dropping them would
    /// change the constrained or restrained degrees of freedom rather than
    /// merely skipping a force term.
    pub const fn supports_group_filter(self) -> bool {
        matches!(
            self,
            Self::Bond | Self::Angle | Self::ProperDihedral | Self::ImproperDihedral | Self::Pair
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Bond => "bond",
            Self::Angle => "angle",
            Self::ProperDihedral => "proper-dihedral",
            Self::ImproperDihedral => "improper-dihedral",
            Self::Pair => "pair",
            Self::Constraint => "constraint",
            Self::ConnectivityConstraint => "connectivity-constraint",
            Self::PositionRestraint => "position-restraint",
            Self::FlatBottomRestraint => "flat-bottom-restraint",
        }
    }

    const fn list_index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
#[error("Invalid interaction kind string")]
pub struct ParseInteractionKindError;

impl FromStr for InteractionKind {
    type Err = ParseInteractionKindError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KIND_NAMES
            .get(s.to_ascii_lowercase().as_str())
            .copied()
            .ok_or(ParseInteractionKindError)
    }
}

/// One interaction: the participating atom indices plus a reference to a
/// shared parameter record.
///
/// Inside a molecule template the indices are local to the template; in an
/// expanded view they are global. The number of indices always equals the
/// owning kind's [`arity`](InteractionKind::arity).
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub params: ParamId,
    pub atoms: Vec<usize>,
}

impl Interaction {
    pub fn new(params: ParamId, atoms: Vec<usize>) -> Self {
        Self { params, atoms }
    }
}

/// Per-kind interaction lists, indexable by [`InteractionKind`].
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionLists {
    lists: [Vec<Interaction>; InteractionKind::COUNT],
}

impl InteractionLists {
    pub fn new() -> Self {
        Self {
            lists: std::array::from_fn(|_| Vec::new()),
        }
    }

    pub fn get(&self, kind: InteractionKind) -> &[Interaction] {
        &self.lists[kind.list_index()]
    }

    pub fn list_mut(&mut self, kind: InteractionKind) -> &mut Vec<Interaction> {
        &mut self.lists[kind.list_index()]
    }

    pub fn push(&mut self, kind: InteractionKind, interaction: Interaction) {
        self.lists[kind.list_index()].push(interaction);
    }

    /// Iterates every kind in canonical order, paired with its entries.
    pub fn iter(&self) -> impl Iterator<Item = (InteractionKind, &[Interaction])> {
        InteractionKind::ALL
            .iter()
            .map(move |&kind| (kind, self.get(kind)))
    }

    /// Total number of entries across all kinds.
    pub fn total_len(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.iter().all(Vec::is_empty)
    }
}

impl Default for InteractionLists {
    fn default() -> Self {
        Self::new()
    }
}
