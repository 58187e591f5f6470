// Gender-vs-category TF-IDF weighting.
//
// Term frequency is double-smoothed: a gender's share of a category's
// purchases is scaled into [0.5, 1.0], so a category with no observed
// purchases for a gender still contributes the 0.5 floor rather than a zero
// feature. Document frequency is the combined purchase count across both
// genders, log-scaled against the total number of gender-labeled rows.
//
// That total (nrow) is the single cross-cutting aggregate in the pipeline.
// It is materialized once, before any IDF computation, and threaded through
// as a plain parameter.

use tracing::warn;

use crate::relation::{join, JoinType, Relation};

/// Per-category larger of the two gender counts.
///
/// One absent side takes the present side. Both sides absent means no max
/// can be computed and the category is dropped. The builder removes such
/// categories before this stage, so a hit on that arm is an anomaly worth
/// logging.
pub fn max_counts(
    male: &Relation<String, Option<u64>>,
    female: &Relation<String, Option<u64>>,
) -> Relation<String, u64> {
    join(male, female, JoinType::FullOuter)
        .into_iter()
        .filter_map(|(category, (m, f))| {
            match (m.flatten(), f.flatten()) {
                (Some(male), Some(female)) => Some((category, male.max(female))),
                (Some(male), None) => Some((category, male)),
                (None, Some(female)) => Some((category, female)),
                (None, None) => {
                    warn!(category = %category, "No count on either side, dropping category");
                    None
                }
            }
        })
        .collect()
}

/// log10(nrow / combined count) per category. An absent count contributes 0
/// to the sum.
///
/// A combined count of 0 divides by zero; IEEE f64 arithmetic turns that
/// into +infinity, which is preserved (and logged by the builder) rather
/// than patched to a finite value.
pub fn inverse_document_frequency(
    male: &Relation<String, Option<u64>>,
    female: &Relation<String, Option<u64>>,
    nrow: u64,
) -> Relation<String, f64> {
    join(male, female, JoinType::FullOuter)
        .into_iter()
        .map(|(category, (m, f))| {
            let combined = (m.flatten().unwrap_or(0) + f.flatten().unwrap_or(0)) as f64;
            (category, (nrow as f64 / combined).log10())
        })
        .collect()
}

/// Smoothed term frequency: 0.5 * (count / max) + 0.5 when the gender has a
/// count for the category, the bare 0.5 floor when it does not.
pub fn term_frequency(
    counts: &Relation<String, Option<u64>>,
    max_counts: &Relation<String, u64>,
) -> Relation<String, f64> {
    join(counts, max_counts, JoinType::FullOuter)
        .into_iter()
        .map(|(category, (count, max))| {
            let tf = match (count.flatten(), max) {
                (Some(count), Some(max)) => 0.5 * (count as f64 / max as f64) + 0.5,
                (None, _) => 0.5,
                (Some(count), None) => {
                    // max_counts is derived from the same key universe, so a
                    // count without a max is an upstream anomaly.
                    warn!(category = %category, count, "Count present without a max, flooring TF");
                    0.5
                }
            };
            (category, tf)
        })
        .collect()
}

/// TF × IDF per category. Both inputs share a key universe; a one-sided row
/// is an upstream anomaly and is dropped with a warning.
pub fn tf_idf(tf: &Relation<String, f64>, idf: &Relation<String, f64>) -> Relation<String, f64> {
    join(tf, idf, JoinType::FullOuter)
        .into_iter()
        .filter_map(|(category, pair)| match pair {
            (Some(tf), Some(idf)) => Some((category, tf * idf)),
            _ => {
                warn!(category = %category, "TF/IDF row missing a side, dropping");
                None
            }
        })
        .collect()
}

/// Pair the male and female TF-IDF weights per category. A missing side
/// contributes 0.
pub fn pair_genders(
    male: &Relation<String, f64>,
    female: &Relation<String, f64>,
) -> Relation<String, [f64; 2]> {
    join(male, female, JoinType::FullOuter)
        .into_iter()
        .map(|(category, (m, f))| (category, [m.unwrap_or(0.0), f.unwrap_or(0.0)]))
        .collect()
}
