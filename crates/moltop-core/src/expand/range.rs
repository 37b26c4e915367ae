use super::error::ExpansionError;
use super::validate::checked_atom_count;
use crate::model::atom::Atom;
use crate::model::moltype::MoleculeType;
use crate::model::topology::GlobalTopology;

/// One atom as seen by a global traversal: the template record plus its
/// global position and effective residue identity.
#[derive(Debug, Clone, Copy)]
pub struct GlobalAtom<'a> {
    /// Global atom index, block-major / copy-major / atom-minor from 0.
    pub global_index: usize,
    /// Index of the atom within its molecule copy.
    pub local_index: usize,
    pub atom: &'a Atom,
    pub residue_name: &'a str,
    /// The residue number after the renumbering policy: synthesized from
    /// the running counter for small molecule types, the template number
    /// verbatim otherwise.
    pub residue_number: isize,
    /// The molecule type owning this atom.
    pub molecule_type: &'a MoleculeType,
}

#[derive(Debug, Clone, Copy)]
struct ReplicatedType<'a> {
    moltype: &'a MoleculeType,
    copies: usize,
    renumbered: bool,
}

/// Traversal position: either a concrete atom or the terminal state.
///
/// The cursor is a plain value; advancing computes the next value without
/// touching any shared or heap state, so a range can never be left half
/// torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    At {
        block: usize,
        copy: usize,
        local: usize,
        global: usize,
        /// Highest residue number handed out so far by the renumbering
        /// counter (or its seed, before the first renumbered molecule).
        residue_floor: isize,
    },
    Exhausted,
}

/// Lazy, restartable traversal of every atom in expansion order.
///
/// Yields each atom exactly once with its global index, residue identity
/// and owning molecule type, without materializing the expanded system.
/// Two ranges constructed from the same topology yield identical
/// sequences.
#[derive(Debug)]
pub struct AtomRange<'a> {
    blocks: Vec<ReplicatedType<'a>>,
    cursor: Cursor,
}

impl<'a> AtomRange<'a> {
    /// Starts a traversal at global atom 0.
    ///
    /// # Errors
    ///
    /// Fails if a block references an unknown or empty molecule type, has a
    /// copy count of 0, or the total atom count overflows.
    pub fn new(topology: &'a GlobalTopology) -> Result<Self, ExpansionError> {
        Self::with_start(topology, 0)
    }

    /// Starts a traversal at `start`, which must be 0 or exactly the total
    /// atom count (the latter yields an immediately exhausted range).
    /// Arbitrary midpoint starts are unsupported.
    ///
    /// # Errors
    ///
    /// `InvalidRangeStart` for any other `start`, plus the construction
    /// failures of [`AtomRange::new`].
    pub fn with_start(topology: &'a GlobalTopology, start: usize) -> Result<Self, ExpansionError> {
        let atom_count = checked_atom_count(topology)?;
        if start != 0 && start != atom_count {
            return Err(ExpansionError::InvalidRangeStart { start, atom_count });
        }

        let mut blocks = Vec::with_capacity(topology.blocks().len());
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
            blocks.push(ReplicatedType {
                moltype,
                copies: block.count,
                renumbered: moltype.residue_count() <= topology.renumber_residue_limit,
            });
        }

        let cursor = if start == atom_count {
            Cursor::Exhausted
        } else {
            Cursor::At {
                block: 0,
                copy: 0,
                local: 0,
                global: 0,
                residue_floor: topology.max_residue_number_not_renumbered(),
            }
        };

        Ok(Self { blocks, cursor })
    }

    /// The cursor value following the current one. Pure: reads `self`, no
    /// mutation.
    fn advanced(&self) -> Cursor {
        let Cursor::At {
            mut block,
            mut copy,
            local,
            global,
            mut residue_floor,
        } = self.cursor
        else {
            return Cursor::Exhausted;
        };

        let mut local = local + 1;
        let global = global + 1;
        loop {
            let current = &self.blocks[block];
            if local < current.moltype.atom_count() {
                return Cursor::At {
                    block,
                    copy,
                    local,
                    global,
                    residue_floor,
                };
            }
            // One molecule copy finished; renumbered types advance the
            // counter by their residue count.
            if current.renumbered {
                residue_floor += current.moltype.residue_count() as isize;
            }
            copy += 1;
            local = 0;
            if copy >= current.copies {
                block += 1;
                copy = 0;
                if block >= self.blocks.len() {
                    return Cursor::Exhausted;
                }
            }
        }
    }
}

impl<'a> Iterator for AtomRange<'a> {
    type Item = GlobalAtom<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let Cursor::At {
            block,
            local,
            global,
            residue_floor,
            ..
        } = self.cursor
        else {
            return None;
        };

        let moltype = self.blocks[block].moltype;
        let atom = &moltype.atoms[local];
        let residue = &moltype.residues[atom.residue_index];
        let residue_number = if self.blocks[block].renumbered {
            residue_floor + 1 + atom.residue_index as isize
        } else {
            residue.number
        };

        let item = GlobalAtom {
            global_index: global,
            local_index: local,
            atom,
            residue_name: &residue.name,
            residue_number,
            molecule_type: moltype,
        };
        self.cursor = self.advanced();
        Some(item)
    }
}
