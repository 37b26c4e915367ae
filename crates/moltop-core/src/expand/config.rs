use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A named group of globally indexed atoms, as used by the interaction
/// filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomGroup {
    pub name: String,
    pub atoms: Vec<usize>,
}

impl AtomGroup {
    pub fn new(name: &str, atoms: Vec<usize>) -> Self {
        Self {
            name: name.to_string(),
            atoms,
        }
    }
}

/// Selective expansion filter over two named atom groups.
///
/// When present, bonded and pairwise interactions are only emitted if at
/// least one participating atom belongs to either group. Kinds outside
/// [`supports_group_filter`](crate::model::interaction::InteractionKind::supports_group_filter)
/// are never filtered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionFilter {
    pub first: AtomGroup,
    pub second: AtomGroup,
}

impl InteractionFilter {
    /// The union of both groups as a membership set.
    pub(crate) fn member_set(&self) -> HashSet<usize> {
        self.first
            .atoms
            .iter()
            .chain(self.second.atoms.iter())
            .copied()
            .collect()
    }
}

/// All expansion options in one explicit value, passed to the view-builder
/// entry points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Fold connectivity-only constraints into the plain constraint list,
    /// per replica.
    pub merge_constraints: bool,
    /// Stably move interactions with alchemically perturbed participants to
    /// the end of each kind's list (reduced view only).
    pub free_energy_sort: bool,
    /// Optional two-group selective filter; `None` expands everything.
    pub filter: Option<InteractionFilter>,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            merge_constraints: true,
            free_energy_sort: false,
            filter: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_merges_and_does_not_sort_or_filter() {
        let config = ExpansionConfig::default();
        assert!(config.merge_constraints);
        assert!(!config.free_energy_sort);
        assert!(config.filter.is_none());
    }

    #[test]
    fn member_set_is_the_union_of_both_groups() {
        let filter = InteractionFilter {
            first: AtomGroup::new("probe", vec![2, 5]),
            second: AtomGroup::new("target", vec![5, 9]),
        };
        let members = filter.member_set();
        assert_eq!(members.len(), 3);
        assert!(members.contains(&2));
        assert!(members.contains(&5));
        assert!(members.contains(&9));
    }

    #[test]
    fn config_deserializes_from_toml() {
        let text = r#"
            merge_constraints = false
            free_energy_sort = true

            [filter]
            first = { name = "probe", atoms = [0, 1] }
            second = { name = "target", atoms = [7] }
        "#;
        let config: ExpansionConfig = toml::from_str(text).unwrap();
        assert!(!config.merge_constraints);
        assert!(config.free_energy_sort);
        let filter = config.filter.unwrap();
        assert_eq!(filter.first.name, "probe");
        assert_eq!(filter.second.atoms, vec![7]);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: ExpansionConfig = toml::from_str("free_energy_sort = true").unwrap();
        assert!(config.merge_constraints);
        assert!(config.free_energy_sort);
        assert!(config.filter.is_none());
    }
}
