// Equijoins over keyed relations.
//
// Both join modes return (Option<A>, Option<B>) value pairs. Inner joins
// always produce (Some, Some); full-outer joins leave the missing side as
// None. Absence is structural: the joiner never coerces a missing side to a
// default value — each consumer decides what absence means for it (0 for
// counts, the smoothing floor for term frequency).
//
// Keys are not required to be unique. A key with multiple rows on one side
// produces the cross product of the matching rows on the other side.

use std::collections::HashMap;
use std::hash::Hash;

use super::Relation;

/// Which rows survive the join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// Keys present on both sides only.
    Inner,
    /// Every key present on either side, with None marking the missing side.
    FullOuter,
}

/// Equijoin two relations on their key.
pub fn join<K, A, B>(
    left: &Relation<K, A>,
    right: &Relation<K, B>,
    join_type: JoinType,
) -> Relation<K, (Option<A>, Option<B>)>
where
    K: Eq + Hash + Clone,
    A: Clone,
    B: Clone,
{
    let mut left_groups: HashMap<&K, Vec<&A>> = HashMap::new();
    for (k, a) in left.iter() {
        left_groups.entry(k).or_default().push(a);
    }
    let mut right_groups: HashMap<&K, Vec<&B>> = HashMap::new();
    for (k, b) in right.iter() {
        right_groups.entry(k).or_default().push(b);
    }

    let mut out = Relation::new();

    for (key, left_values) in &left_groups {
        match right_groups.get(*key) {
            Some(right_values) => {
                for a in left_values {
                    for b in right_values {
                        out.push((*key).clone(), (Some((*a).clone()), Some((*b).clone())));
                    }
                }
            }
            None => {
                if join_type == JoinType::FullOuter {
                    for a in left_values {
                        out.push((*key).clone(), (Some((*a).clone()), None));
                    }
                }
            }
        }
    }

    if join_type == JoinType::FullOuter {
        for (key, right_values) in &right_groups {
            if left_groups.contains_key(*key) {
                continue;
            }
            for b in right_values {
                out.push((*key).clone(), (None, Some((*b).clone())));
            }
        }
    }

    out
}

/// Inner join unwrapped to plain value pairs.
///
/// Both sides of an inner-join row are always present, so this spares
/// callers the Option handling that full-outer consumers need.
pub fn inner_join<K, A, B>(left: &Relation<K, A>, right: &Relation<K, B>) -> Relation<K, (A, B)>
where
    K: Eq + Hash + Clone,
    A: Clone,
    B: Clone,
{
    join(left, right, JoinType::Inner)
        .into_iter()
        .filter_map(|(k, pair)| match pair {
            (Some(a), Some(b)) => Some((k, (a, b))),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_join_drops_unmatched_keys() {
        let left = Relation::from_rows(vec![("p1", "u1"), ("p2", "u2")]);
        let right = Relation::from_rows(vec![("p1", "cat-a")]);
        let joined = join(&left, &right, JoinType::Inner);
        assert_eq!(joined.len(), 1);
        let (key, pair) = &joined.rows()[0];
        assert_eq!(*key, "p1");
        assert_eq!(*pair, (Some("u1"), Some("cat-a")));
    }

    #[test]
    fn test_full_outer_join_marks_missing_sides() {
        let left = Relation::from_rows(vec![("p1", 3u64)]);
        let right = Relation::from_rows(vec![("p2", 5u64)]);
        let joined = join(&left, &right, JoinType::FullOuter);
        assert_eq!(joined.len(), 2);
        for (key, pair) in joined.iter() {
            match *key {
                "p1" => assert_eq!(*pair, (Some(3), None)),
                "p2" => assert_eq!(*pair, (None, Some(5))),
                other => panic!("Unexpected key {other}"),
            }
        }
    }

    #[test]
    fn test_duplicate_keys_produce_cross_product() {
        let left = Relation::from_rows(vec![("p1", "u1"), ("p1", "u2")]);
        let right = Relation::from_rows(vec![("p1", "cat-a"), ("p1", "cat-b"), ("p1", "cat-c")]);
        let joined = join(&left, &right, JoinType::Inner);
        assert_eq!(joined.len(), 6, "2 x 3 matching rows should emit 6 pairs");
    }

    #[test]
    fn test_inner_join_unwraps_pairs() {
        let left = Relation::from_rows(vec![("u1", "1 0")]);
        let right = Relation::from_rows(vec![("u1", "cat-a")]);
        let joined = inner_join(&left, &right);
        assert_eq!(joined.rows(), &[("u1", ("1 0", "cat-a"))]);
    }
}
