use std::str::FromStr;
use thiserror::Error;

/// Selects between the two alchemical end states of a topology.
///
/// State `A` is the physical (reference) state; state `B` is the perturbed
/// state used by free-energy transformations. Quantities without an explicit
/// B-state record fall back to their A-state values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FreeEnergyState {
    #[default]
    A,
    B,
}

/// Classifies what a particle in the topology physically is.
///
/// Most particles are real atoms; shells and virtual sites are massless or
/// constructed particles that some force fields carry alongside the atoms.
/// Population counts per kind are reported by
/// [`particle_counts`](crate::expand::counts::particle_counts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParticleKind {
    /// An ordinary atom with mass and (usually) charge.
    #[default]
    Atom,
    /// A polarization shell particle.
    Shell,
    /// A massless interaction site constructed from other atoms.
    VirtualSite,
}

impl ParticleKind {
    pub const COUNT: usize = 3;

    pub const ALL: [ParticleKind; Self::COUNT] =
        [ParticleKind::Atom, ParticleKind::Shell, ParticleKind::VirtualSite];
}

#[derive(Debug, Error)]
#[error("Invalid particle kind string")]
pub struct ParseParticleKindError;

impl FromStr for ParticleKind {
    type Err = ParseParticleKindError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "atom" => Ok(Self::Atom),
            "shell" => Ok(Self::Shell),
            "vsite" | "virtual-site" | "virtual_site" => Ok(Self::VirtualSite),
            _ => Err(ParseParticleKindError),
        }
    }
}

/// The perturbed (B-state) record of an atom.
///
/// Present only where an alchemical transformation is physically meaningful
/// for the atom; everywhere else the A-state values apply to both states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtomBState {
    /// Force-field atom type index in the B state.
    pub type_index: usize,
    /// Partial charge in the B state, in elementary charge units.
    pub charge: f64,
    /// Mass in the B state, in atomic mass units.
    pub mass: f64,
}

/// A single atom record inside a molecule template.
///
/// Atom records are local to their [`MoleculeType`](super::moltype::MoleculeType):
/// the `residue_index` refers to the template's own residue list, and global
/// atom numbering only exists after expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Force-field atom type index (into the force-field's type table).
    pub type_index: usize,
    /// Partial charge in elementary charge units.
    pub charge: f64,
    /// Mass in atomic mass units.
    pub mass: f64,
    /// What this particle physically is.
    pub particle: ParticleKind,
    /// Index of the owning residue within the molecule template.
    pub residue_index: usize,
    /// Perturbed-state record, if this atom takes part in an alchemical
    /// transformation.
    pub b_state: Option<AtomBState>,
}

impl Atom {
    /// Creates an atom record with no B state and an ordinary particle kind.
    pub fn new(type_index: usize, charge: f64, mass: f64, residue_index: usize) -> Self {
        Self {
            type_index,
            charge,
            mass,
            particle: ParticleKind::default(),
            residue_index,
            b_state: None,
        }
    }

    /// The partial charge in the given state (B falls back to A).
    pub fn charge_in(&self, state: FreeEnergyState) -> f64 {
        match (state, &self.b_state) {
            (FreeEnergyState::B, Some(b)) => b.charge,
            _ => self.charge,
        }
    }

    /// The force-field type index in the given state (B falls back to A).
    pub fn type_in(&self, state: FreeEnergyState) -> usize {
        match (state, &self.b_state) {
            (FreeEnergyState::B, Some(b)) => b.type_index,
            _ => self.type_index,
        }
    }

    /// The mass in the given state (B falls back to A).
    pub fn mass_in(&self, state: FreeEnergyState) -> f64 {
        match (state, &self.b_state) {
            (FreeEnergyState::B, Some(b)) => b.mass,
            _ => self.mass,
        }
    }

    /// Whether the partial charge differs between the A and B states.
    pub fn is_charge_perturbed(&self) -> bool {
        self.charge_in(FreeEnergyState::B) != self.charge
    }

    /// Whether the mass differs between the A and B states.
    pub fn is_mass_perturbed(&self) -> bool {
        self.mass_in(FreeEnergyState::B) != self.mass
    }
}

/// Boolean capability flags of one molecule template's atom data.
///
/// When molecule types are concatenated into a global atom array, the flags
/// of the result are the logical AND of the flags of every contributing
/// template: the aggregate only "has" what every part has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AtomCapabilities {
    pub has_mass: bool,
    pub has_type: bool,
    pub has_charge: bool,
    pub has_b_state: bool,
    pub has_metadata: bool,
}

impl AtomCapabilities {
    /// Flags claiming every capability.
    pub const fn full() -> Self {
        Self {
            has_mass: true,
            has_type: true,
            has_charge: true,
            has_b_state: true,
            has_metadata: true,
        }
    }

    /// Field-wise logical AND with another set of flags.
    pub fn merged_with(self, other: Self) -> Self {
        Self {
            has_mass: self.has_mass && other.has_mass,
            has_type: self.has_type && other.has_type,
            has_charge: self.has_charge && other.has_charge,
            has_b_state: self.has_b_state && other.has_b_state,
            has_metadata: self.has_metadata && other.has_metadata,
        }
    }
}
