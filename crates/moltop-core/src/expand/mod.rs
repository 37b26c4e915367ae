//! # Topology Expansion
//!
//! Turns a replicated [`GlobalTopology`](crate::model::topology::GlobalTopology)
//! into flat, globally indexed structures: lazy atom traversal
//! ([`range`]), expanded interaction lists ([`interactions`]), per-copy
//! restraint parameters ([`restraints`]), exclusion lists
//! ([`exclusions`]), the free-energy ordering pass ([`sort`]) and the two
//! consumer-facing views composed from all of these ([`views`]).
//!
//! Every derivation validates the source topology up front ([`validate`])
//! and either returns a fully valid, independently owned result or a
//! single [`ExpansionError`](error::ExpansionError), never partial
//! output. Aggregate counts that do not require materializing anything
//! live in [`counts`].

pub mod config;
pub mod counts;
pub mod error;
pub mod exclusions;
pub mod interactions;
pub mod range;
pub mod restraints;
pub mod sort;
pub mod validate;
pub mod views;
