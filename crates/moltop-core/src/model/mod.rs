//! # Topology Model
//!
//! Immutable input data entities describing a molecular system compactly:
//! a handful of molecule templates, replication blocks that instantiate
//! them, and the shared force-field parameter table they reference.
//!
//! Nothing in this module is globally indexed: atom and residue indices
//! are local to their [`MoleculeType`](moltype::MoleculeType), and nothing
//! here mutates after construction. The [`expand`](crate::expand) module
//! turns these entities into flat, globally indexed views.

pub mod atom;
pub mod block;
pub mod ids;
pub mod interaction;
pub mod moltype;
pub mod params;
pub mod topology;
