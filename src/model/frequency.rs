// Grouped aggregation — counting, probability sums, and the vector combiner.
//
// The vector combiner is the merge step for per-gender partial vectors. It
// must stay associative and commutative with the zero vector as identity:
// partial sums computed over disjoint chunks of rows have to merge to the
// same result no matter how the rows are split or in which order the chunks
// arrive.

use std::collections::HashMap;
use std::hash::Hash;

use crate::relation::{join, JoinType, Relation};

use super::gender::Gender;

/// Count rows per key.
pub fn count_by_key<K, V>(relation: &Relation<K, V>) -> Relation<K, u64>
where
    K: Eq + Hash + Clone,
{
    let mut counts: HashMap<K, u64> = HashMap::new();
    for (key, _) in relation.iter() {
        *counts.entry(key.clone()).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

/// Sum values per key.
pub fn sum_by_key<K>(relation: Relation<K, f64>) -> Relation<K, f64>
where
    K: Eq + Hash,
{
    relation
        .group_by_key()
        .into_iter()
        .map(|(key, values)| (key, values.into_iter().sum()))
        .collect()
}

/// Element-wise sum of all vectors sharing a key.
///
/// Contributing vectors may be shorter than the longest one under a key;
/// missing slots count as 0.
pub fn sum_vectors_by_key<K>(relation: Relation<K, Vec<f64>>) -> Relation<K, Vec<f64>>
where
    K: Eq + Hash,
{
    relation
        .group_by_key()
        .into_iter()
        .map(|(key, vectors)| {
            let mut total = Vec::new();
            for vector in vectors {
                add_assign(&mut total, &vector);
            }
            (key, total)
        })
        .collect()
}

/// total += contribution, element-wise, growing total as needed.
pub fn add_assign(total: &mut Vec<f64>, contribution: &[f64]) {
    if total.len() < contribution.len() {
        total.resize(contribution.len(), 0.0);
    }
    for (slot, value) in total.iter_mut().zip(contribution) {
        *slot += value;
    }
}

/// Purchase count per category for one gender, keyed over every category
/// known to the registry.
///
/// Counting alone only yields categories the gender actually bought from.
/// The full-outer join against the registry widens the key set to all known
/// categories; a category with no purchases for this gender keeps an absent
/// count, and each downstream stage decides what absence means (0 in the
/// IDF sum, the smoothing floor in TF).
pub fn gender_category_counts(
    gender_to_category: &Relation<String, (Gender, String)>,
    gender: Gender,
    category_stats: &Relation<String, u64>,
) -> Relation<String, Option<u64>> {
    let per_category: Relation<String, ()> = gender_to_category
        .iter()
        .filter(|(_, (g, _))| *g == gender)
        .map(|(_, (_, category))| (category.clone(), ()))
        .collect();
    let counted = count_by_key(&per_category);

    join(&counted, category_stats, JoinType::FullOuter)
        .into_iter()
        .map(|(category, (count, _product_count))| (category, count))
        .collect()
}
