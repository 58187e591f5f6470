// Unit tests for the model stages in isolation: category indexing, gender
// decoding, TF-IDF arithmetic, and pair normalization.

use std::collections::HashMap;

use ochre::model::categories::CategoryIndex;
use ochre::model::error::ModelError;
use ochre::model::gender::{decode_flags, parse_probabilities, Gender};
use ochre::model::normalize::{normalize_pair, round_half_up};
use ochre::model::tfidf;
use ochre::relation::Relation;

// ============================================================
// CategoryIndex — stability and density
// ============================================================

#[test]
fn category_indices_are_dense_and_collision_free() {
    let registry: Relation<String, u64> = (0..50)
        .map(|i| (format!("cat-{i}"), i as u64))
        .collect();
    let index = CategoryIndex::from_registry(&registry);
    assert_eq!(index.len(), 50);

    let mut assigned: Vec<usize> = index
        .categories()
        .iter()
        .map(|c| index.index_of(c).unwrap())
        .collect();
    assigned.sort_unstable();
    let expected: Vec<usize> = (0..50).collect();
    assert_eq!(assigned, expected, "Indices must be a dense 0..N-1 range");
}

#[test]
fn category_index_is_first_seen_deterministic() {
    let registry: Relation<String, u64> = ["books", "games", "garden"]
        .iter()
        .map(|c| (c.to_string(), 1u64))
        .collect();
    let a = CategoryIndex::from_registry(&registry);
    let b = CategoryIndex::from_registry(&registry);
    for category in a.categories() {
        assert_eq!(a.index_of(category).unwrap(), b.index_of(category).unwrap());
    }
}

#[test]
fn unknown_category_is_an_error_not_a_slot() {
    let registry: Relation<String, u64> =
        [("books".to_string(), 1u64)].into_iter().collect();
    let index = CategoryIndex::from_registry(&registry);
    assert!(matches!(
        index.index_of("toys"),
        Err(ModelError::UnknownCategory(_))
    ));
}

// ============================================================
// Gender decoding
// ============================================================

#[test]
fn gender_flag_decoding_table() {
    assert_eq!(decode_flags("1 0").unwrap(), Gender::Male);
    assert_eq!(decode_flags("0 1").unwrap(), Gender::Female);
    assert_eq!(decode_flags("0 0").unwrap(), Gender::Unknown);
    // Both flags set: the male flag is checked first and wins
    assert_eq!(decode_flags("1 1").unwrap(), Gender::Male);
}

#[test]
fn gender_flag_decoding_rejects_short_records() {
    assert!(matches!(
        decode_flags(""),
        Err(ModelError::MalformedRecord { .. })
    ));
    assert!(matches!(
        decode_flags("1"),
        Err(ModelError::MalformedRecord { .. })
    ));
}

#[test]
fn probability_vector_positions_are_fixed() {
    let p = parse_probabilities("0.7 0.2 0.1").unwrap();
    assert_eq!(p[Gender::Male.position()], 0.7);
    assert_eq!(p[Gender::Female.position()], 0.2);
    assert_eq!(p[Gender::Unknown.position()], 0.1);
}

#[test]
fn probability_vector_rejects_wrong_arity() {
    assert!(parse_probabilities("0.7 0.3").is_err());
    assert!(parse_probabilities("0.7 0.1 0.1 0.1").is_err());
    assert!(parse_probabilities("a b c").is_err());
}

// ============================================================
// TF-IDF arithmetic
// ============================================================

fn counts(rows: &[(&str, Option<u64>)]) -> Relation<String, Option<u64>> {
    rows.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[test]
fn tf_floor_is_exactly_half_for_absent_counts() {
    let freq = counts(&[("a", None), ("b", None)]);
    let max: Relation<String, u64> = [("a", 5u64), ("b", 100)]
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect();
    for (_, tf) in tfidf::term_frequency(&freq, &max).into_iter() {
        assert_eq!(tf, 0.5, "Zero purchases must floor TF at exactly 0.5");
    }
}

#[test]
fn tf_tops_out_at_one_for_the_dominant_gender() {
    let freq = counts(&[("a", Some(7))]);
    let max: Relation<String, u64> = [("a", 7u64)]
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect();
    let tf: HashMap<_, _> = tfidf::term_frequency(&freq, &max).into_iter().collect();
    assert!((tf["a"] - 1.0).abs() < 1e-12);
}

#[test]
fn idf_is_zero_when_every_row_hits_the_category() {
    let male = counts(&[("a", Some(3))]);
    let female = counts(&[("a", Some(1))]);
    let idf: HashMap<_, _> = tfidf::inverse_document_frequency(&male, &female, 4)
        .into_iter()
        .collect();
    assert!((idf["a"]).abs() < 1e-12);
}

#[test]
fn idf_divides_by_zero_into_positive_infinity() {
    // Both counts absent: the sum is 0 and log10(nrow/0) is +inf. The
    // value is preserved, not patched — callers flag it.
    let male = counts(&[("a", None)]);
    let female = counts(&[("a", None)]);
    let idf: HashMap<_, _> = tfidf::inverse_document_frequency(&male, &female, 4)
        .into_iter()
        .collect();
    assert!(idf["a"].is_infinite());
    assert!(idf["a"] > 0.0);
}

#[test]
fn max_counts_prefers_larger_then_present_side() {
    let male = counts(&[("a", Some(3)), ("b", None), ("c", Some(2))]);
    let female = counts(&[("a", Some(5)), ("b", Some(1)), ("c", None)]);
    let max: HashMap<_, _> = tfidf::max_counts(&male, &female).into_iter().collect();
    assert_eq!(max["a"], 5);
    assert_eq!(max["b"], 1);
    assert_eq!(max["c"], 2);
}

// ============================================================
// Normalization
// ============================================================

#[test]
fn round_half_up_matches_half_away_from_zero() {
    assert_eq!(round_half_up(0.125, 2), 0.13);
    assert_eq!(round_half_up(0.375, 2), 0.38);
    assert_eq!(round_half_up(-0.125, 2), -0.13);
    assert_eq!(round_half_up(1.0, 2), 1.0);
}

#[test]
fn normalized_pairs_sum_to_one_within_rounding() {
    let pairs = [
        [0.09370, 0.12494],
        [1.0, 1.0],
        [0.001, 0.999],
        [5.0, 0.0],
        [0.3333, 0.6667],
    ];
    for pair in pairs {
        let norm = normalize_pair(pair);
        let sum = norm[0] + norm[1];
        assert!(
            (sum - 1.0).abs() <= 0.01,
            "Normalized {pair:?} sums to {sum}, expected ~1.00"
        );
    }
}

#[test]
fn zero_denominator_normalization_is_nan_not_a_panic() {
    let norm = normalize_pair([0.0, 0.0]);
    assert!(norm[0].is_nan() && norm[1].is_nan());
}

#[test]
fn normalization_preserves_proportions() {
    let norm = normalize_pair([1.0, 3.0]);
    assert_eq!(norm, [0.25, 0.75]);
}
