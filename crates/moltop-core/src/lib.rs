//! # moltop
//!
//! A library for expanding compact, hierarchically replicated molecular
//! topologies (a few molecule templates plus replication counts) into
//! the fully indexed flat structures simulation and analysis code
//! consumes: global atom listings, global interaction and exclusion
//! lists, and two aggregate views.
//!
//! ## Architectural Philosophy
//!
//! The library keeps a strict two-layer split:
//!
//! - **[`model`]: The Input.** Immutable data entities (molecule
//!   templates, replication blocks, shared force-field parameters)
//!   with all indices local to their template. Built once by an
//!   external construction stage.
//!
//! - **[`expand`]: The Derivations.** Everything computed from the
//!   model: the lazy atom-range traversal, interaction replication with
//!   index offsetting, restraint parameter specialization, exclusion
//!   merging, free-energy ordering, and the reduced/full output views.
//!   Each derivation owns its result outright and aborts atomically on
//!   the first structural inconsistency.
//!
//! Index bookkeeping is the heart of the crate: atom indices are
//! assigned block-major, copy-major, atom-minor, and every derived
//! structure must agree with that numbering exactly, for arbitrarily
//! many replicated copies.

pub mod expand;
pub mod model;
