//! Count results and group keys.
//!
//! [`Relation::count`](crate::Relation::count) returns a plain total when no
//! group columns are set, and a per-group tally otherwise; [`Count`] carries
//! both shapes.

use std::collections::HashMap;

/// Key identifying one group in a grouped count.
///
/// A single group column keys by that column's value; several group columns
/// key by the sequence of values in the order the columns were added. An
/// absent field keys as the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// The value of the single group column.
    Value(String),
    /// The values of every group column, in insertion order.
    Values(Vec<String>),
}

impl From<&str> for GroupKey {
    fn from(value: &str) -> Self {
        GroupKey::Value(value.to_string())
    }
}

impl From<Vec<String>> for GroupKey {
    fn from(values: Vec<String>) -> Self {
        GroupKey::Values(values)
    }
}

/// The result of counting a relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Count {
    /// Row count of the filtered set (no group columns).
    Total(usize),
    /// Row count per distinct group key.
    Grouped(HashMap<GroupKey, usize>),
}

impl Count {
    /// Returns the plain total, if this is an ungrouped count.
    pub fn total(&self) -> Option<usize> {
        match self {
            Count::Total(n) => Some(*n),
            Count::Grouped(_) => None,
        }
    }

    /// Returns the per-group tallies, if this is a grouped count.
    pub fn groups(&self) -> Option<&HashMap<GroupKey, usize>> {
        match self {
            Count::Total(_) => None,
            Count::Grouped(groups) => Some(groups),
        }
    }
}

impl PartialEq<usize> for Count {
    fn eq(&self, other: &usize) -> bool {
        self.total() == Some(*other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_accessors() {
        let count = Count::Total(3);
        assert_eq!(count.total(), Some(3));
        assert!(count.groups().is_none());
        assert_eq!(count, 3usize);
    }

    #[test]
    fn grouped_accessors() {
        let mut groups = HashMap::new();
        groups.insert(GroupKey::from("30"), 2);
        groups.insert(GroupKey::from("25"), 1);
        let count = Count::Grouped(groups);

        assert!(count.total().is_none());
        assert_eq!(count.groups().unwrap()[&GroupKey::from("30")], 2);
        assert_ne!(count, 3usize);
    }

    #[test]
    fn composite_keys_are_ordered() {
        let a = GroupKey::from(vec!["30".to_string(), "tokyo".to_string()]);
        let b = GroupKey::from(vec!["tokyo".to_string(), "30".to_string()]);
        assert_ne!(a, b);
    }
}
