// In-memory keyed relations — the substrate every pipeline stage operates on.
//
// A Relation<K, V> is a logically unordered multiset of (key, value) rows.
// Nothing downstream may depend on row order, and key uniqueness is never
// assumed: the same key can appear on any number of rows. Joins and grouped
// aggregation are the only primitives that inspect keys.

pub mod join;

pub use join::{inner_join, join, JoinType};

use std::collections::HashMap;
use std::hash::Hash;

/// A keyed multiset of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation<K, V> {
    rows: Vec<(K, V)>,
}

impl<K, V> Default for Relation<K, V> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<K, V> Relation<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<(K, V)>) -> Self {
        Self { rows }
    }

    pub fn push(&mut self, key: K, value: V) {
        self.rows.push((key, value));
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (K, V)> {
        self.rows.iter()
    }

    pub fn rows(&self) -> &[(K, V)] {
        &self.rows
    }

    /// Concatenate two relations. This is multiset union: duplicate rows are
    /// kept, matching how supplemental gender labels are folded in and later
    /// summed rather than deduplicated.
    pub fn union(mut self, other: Relation<K, V>) -> Relation<K, V> {
        self.rows.extend(other.rows);
        self
    }

    /// Drop the keys and return just the values.
    pub fn values(self) -> Vec<V> {
        self.rows.into_iter().map(|(_, v)| v).collect()
    }
}

impl<K: Eq + Hash, V> Relation<K, V> {
    /// Group values under their key. Per-key value order is unspecified.
    pub fn group_by_key(self) -> HashMap<K, Vec<V>> {
        let mut groups: HashMap<K, Vec<V>> = HashMap::new();
        for (k, v) in self.rows {
            groups.entry(k).or_default().push(v);
        }
        groups
    }
}

impl<K, V> FromIterator<(K, V)> for Relation<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<K, V> IntoIterator for Relation<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_keeps_duplicates() {
        let a = Relation::from_rows(vec![("u1", "1 0"), ("u2", "0 1")]);
        let b = Relation::from_rows(vec![("u1", "1 0")]);
        let merged = a.union(b);
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_group_by_key_collects_all_values() {
        let rel = Relation::from_rows(vec![("p1", "u1"), ("p1", "u2"), ("p2", "u3")]);
        let groups = rel.group_by_key();
        assert_eq!(groups["p1"].len(), 2);
        assert_eq!(groups["p2"], vec!["u3"]);
    }
}
