use super::error::ExpansionError;
use crate::model::topology::GlobalTopology;

/// Global nonbonded exclusion lists: one sorted list of excluded partners
/// per global atom.
///
/// The representation is sparse (a list of lists), so a large excluded
/// group never forces a dense per-pair structure; total storage stays
/// proportional to the number of exclusions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExclusionLists {
    lists: Vec<Vec<usize>>,
}

impl ExclusionLists {
    /// Replicates every molecule copy's template exclusion sets with the
    /// copy's global atom offset applied.
    pub(crate) fn build(topology: &GlobalTopology) -> Result<Self, ExpansionError> {
        let mut lists = Vec::with_capacity(topology.atom_count());
        for (index, block) in topology.blocks().iter().enumerate() {
            let moltype = topology
                .molecule_type(block.moltype)
                .ok_or(ExpansionError::UnknownMoleculeType { block: index })?;
            for _ in 0..block.count {
                let base = lists.len();
                for excluded in &moltype.exclusions {
                    let mut entries: Vec<usize> =
                        excluded.iter().map(|&local| base + local).collect();
                    entries.sort_unstable();
                    entries.dedup();
                    lists.push(entries);
                }
            }
        }
        Ok(Self { lists })
    }

    /// Number of atoms covered.
    pub fn atom_count(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// The sorted excluded partners of `atom`, or `None` out of range.
    pub fn excluded(&self, atom: usize) -> Option<&[usize]> {
        self.lists.get(atom).map(Vec::as_slice)
    }

    /// Whether `i` excludes `j`.
    pub fn contains(&self, i: usize, j: usize) -> bool {
        self.lists
            .get(i)
            .is_some_and(|list| list.binary_search(&j).is_ok())
    }

    /// Total number of stored (ordered) exclusion entries.
    pub fn total_exclusions(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    /// Makes every pair of distinct atoms in `group` mutually excluded,
    /// merging into the existing lists without duplicating entries.
    ///
    /// Membership order and contiguity are irrelevant; duplicated group
    /// members are collapsed. Self-pairs are not added.
    ///
    /// # Errors
    ///
    /// Fails if a group member is outside the covered atom range.
    pub fn add_mutual_exclusions(&mut self, group: &[usize]) -> Result<(), ExpansionError> {
        for (position, &index) in group.iter().enumerate() {
            if index >= self.lists.len() {
                return Err(ExpansionError::ExclusionGroupIndexOutOfRange {
                    position,
                    index,
                    atom_count: self.lists.len(),
                });
            }
        }

        let mut members = group.to_vec();
        members.sort_unstable();
        members.dedup();

        for &member in &members {
            let list = &mut self.lists[member];
            list.extend(members.iter().copied().filter(|&other| other != member));
            list.sort_unstable();
            list.dedup();
        }

        Ok(())
    }
}
