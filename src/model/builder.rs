// Model construction facade — wires the join topology and runs a strategy.
//
// Both strategies share the front half of the pipeline:
//
//   (P,U) ⋈ (P,C) -> user→category      (one row per purchase-category pair)
//   (U,G) ⋈ (U,C) -> gender rows
//
// The TF-IDF strategy then weights each category with smoothed TF × IDF and
// emits one row per category with a normalized (male, female) pair. The
// frequency strategy fans per-user gender probabilities across purchased
// categories and folds them into one dense N-length vector per gender, N
// fixed by the CategoryIndex.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::relation::{inner_join, Relation};

use super::categories::CategoryIndex;
use super::error::ModelError;
use super::frequency::{gender_category_counts, sum_by_key, sum_vectors_by_key};
use super::gender::{decode_flags, parse_probabilities, Gender};
use super::normalize::normalize_pair;
use super::tfidf;

/// Which feature-construction strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    TfIdf,
    Frequency,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::TfIdf => "tfidf",
            Strategy::Frequency => "frequency",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The parsed input relations a build consumes.
#[derive(Debug, Clone, Default)]
pub struct ModelInputs {
    /// productId → userId, one row per purchase.
    pub product_to_user: Relation<String, String>,
    /// userId → gender code (two-flag string, or a probability vector on the
    /// frequency path).
    pub user_to_gender: Relation<String, String>,
    /// productId → categoryId.
    pub product_to_category: Relation<String, String>,
    /// categoryId → global product count; the indexing universe.
    pub category_stats: Relation<String, u64>,
    /// Externally classified labels, frequency strategy only. Supplements
    /// the primary log, never overrides it.
    pub classified_user_to_gender: Option<Relation<String, String>>,
}

/// One row of the TF-IDF output table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub category: String,
    pub male: f64,
    pub female: f64,
}

/// One row of the frequency output table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenderVector {
    pub gender: Gender,
    pub weights: Vec<f64>,
}

/// The model table, in whichever shape the strategy produces.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ModelTable {
    PerCategory(Vec<CategoryWeights>),
    PerGender(Vec<GenderVector>),
}

/// Build metadata and drop accounting.
#[derive(Debug, Clone, Serialize)]
pub struct ModelReport {
    pub strategy: Strategy,
    /// Categories known to the registry — the dense vector length N.
    pub category_count: usize,
    /// Rows in the primary user-gender log; the IDF document count.
    pub gender_rows: u64,
    /// Rows dropped for referencing an unregistered category.
    pub unknown_category_rows: u64,
    /// Categories dropped because neither gender had a purchase count.
    pub uncounted_categories: u64,
    /// Categories whose normalization divided by zero (NaN weights kept).
    pub undefined_weight_categories: u64,
    pub built_at: DateTime<Utc>,
}

/// A finished model: the output table plus its build report.
#[derive(Debug, Clone, Serialize)]
pub struct ModelOutput {
    pub table: ModelTable,
    /// Registry categories in slot order — slot i of every dense vector
    /// belongs to categories[i].
    pub categories: Vec<String>,
    pub report: ModelReport,
}

/// Build a model with the given strategy.
pub fn build(strategy: Strategy, inputs: &ModelInputs) -> Result<ModelOutput, ModelError> {
    match strategy {
        Strategy::TfIdf => build_tfidf_model(
            &inputs.product_to_user,
            &inputs.user_to_gender,
            &inputs.product_to_category,
            &inputs.category_stats,
        ),
        Strategy::Frequency => build_frequency_model(
            &inputs.product_to_user,
            &inputs.user_to_gender,
            inputs.classified_user_to_gender.as_ref(),
            &inputs.product_to_category,
            &inputs.category_stats,
        ),
    }
}

/// TF-IDF strategy: per-category normalized (male, female) weight pairs.
pub fn build_tfidf_model(
    product_to_user: &Relation<String, String>,
    user_to_gender: &Relation<String, String>,
    product_to_category: &Relation<String, String>,
    category_stats: &Relation<String, u64>,
) -> Result<ModelOutput, ModelError> {
    // The category ordering is fixed before any vector work starts.
    let categories = CategoryIndex::from_registry(category_stats);

    // Decode the two-flag gender strings up front; a malformed row aborts
    // the build rather than silently skewing counts.
    let user_to_gender_letter: Relation<String, Gender> = user_to_gender
        .iter()
        .map(|(user, code)| Ok((user.clone(), decode_flags(code)?)))
        .collect::<Result<_, ModelError>>()?;

    // (P,U) ⋈ (P,C) -> (U,C): one row per purchase-category pairing. A user
    // buying twice from a category keeps both rows — that is the frequency
    // signal.
    let user_to_category: Relation<String, String> =
        inner_join(product_to_user, product_to_category)
            .values()
            .into_iter()
            .collect();

    // (U,G) ⋈ (U,C): user-keyed (gender, category) purchase rows.
    let gender_to_category: Relation<String, (Gender, String)> =
        inner_join(&user_to_gender_letter, &user_to_category);

    // The one cross-cutting scalar: total gender-labeled rows. Materialized
    // here, before any IDF consumes it.
    let nrow = user_to_gender.len() as u64;
    debug!(nrow, purchases = gender_to_category.len(), "Joined purchase rows");

    let male_counts = gender_category_counts(&gender_to_category, Gender::Male, category_stats);
    let female_counts = gender_category_counts(&gender_to_category, Gender::Female, category_stats);
    debug!(
        male = male_counts.len(),
        female = female_counts.len(),
        "Counted purchases per gender and category"
    );

    // Categories with no purchases for either gender have no max and no
    // meaningful document frequency; drop them here, visibly.
    let (male_counts, female_counts, uncounted_categories) =
        drop_uncounted_categories(male_counts, female_counts);

    let max_mf = tfidf::max_counts(&male_counts, &female_counts);
    debug!(rows = max_mf.len(), "Computed per-category max counts");

    let idf = tfidf::inverse_document_frequency(&male_counts, &female_counts, nrow);
    let infinite = idf.iter().filter(|(_, value)| value.is_infinite()).count();
    if infinite > 0 {
        warn!(count = infinite, "IDF divided by a zero combined count");
    }
    debug!(rows = idf.len(), "Computed IDF");

    let tf_male = tfidf::term_frequency(&male_counts, &max_mf);
    let tf_female = tfidf::term_frequency(&female_counts, &max_mf);
    debug!(
        male = tf_male.len(),
        female = tf_female.len(),
        "Computed smoothed TF"
    );

    let tfidf_male = tfidf::tf_idf(&tf_male, &idf);
    let tfidf_female = tfidf::tf_idf(&tf_female, &idf);

    let paired = tfidf::pair_genders(&tfidf_male, &tfidf_female);

    let mut undefined_weight_categories = 0u64;
    let mut rows: Vec<CategoryWeights> = paired
        .into_iter()
        .map(|(category, pair)| {
            if pair[0] + pair[1] == 0.0 {
                undefined_weight_categories += 1;
                warn!(category = %category, "Normalization denominator is zero; weights are undefined");
            }
            let norm = normalize_pair(pair);
            CategoryWeights {
                category,
                male: norm[0],
                female: norm[1],
            }
        })
        .collect();
    rows.sort_by(|a, b| a.category.cmp(&b.category));

    info!(categories = rows.len(), nrow, "Built TF-IDF gender model");

    Ok(ModelOutput {
        table: ModelTable::PerCategory(rows),
        categories: categories.categories().to_vec(),
        report: ModelReport {
            strategy: Strategy::TfIdf,
            category_count: categories.len(),
            gender_rows: nrow,
            unknown_category_rows: 0,
            uncounted_categories,
            undefined_weight_categories,
            built_at: Utc::now(),
        },
    })
}

/// Frequency strategy: dense per-gender probability-mass vectors.
pub fn build_frequency_model(
    product_to_user: &Relation<String, String>,
    user_to_gender: &Relation<String, String>,
    classified_user_to_gender: Option<&Relation<String, String>>,
    product_to_category: &Relation<String, String>,
    category_stats: &Relation<String, u64>,
) -> Result<ModelOutput, ModelError> {
    let categories = CategoryIndex::from_registry(category_stats);

    let user_to_category: Relation<String, String> =
        inner_join(product_to_user, product_to_category)
            .values()
            .into_iter()
            .collect();

    let nrow = user_to_gender.len() as u64;

    // Classified labels supplement the primary log; duplicate user rows are
    // kept and their probability mass sums.
    let all_users_to_gender = match classified_user_to_gender {
        Some(classified) => user_to_gender.clone().union(classified.clone()),
        None => user_to_gender.clone(),
    };

    // (U,G) ⋈ (U,C) -> (probability string, category) rows.
    let gender_to_category = inner_join(&all_users_to_gender, &user_to_category);
    debug!(rows = gender_to_category.len(), "Joined gender probabilities with purchases");

    // Fan each row out into one (gender, category) → probability row per
    // gender slot.
    let mut fanned: Relation<(Gender, String), f64> = Relation::new();
    for (_user, (probabilities, category)) in gender_to_category.iter() {
        let slots = parse_probabilities(probabilities)?;
        for gender in Gender::ALL {
            fanned.push((gender, category.clone()), slots[gender.position()]);
        }
    }
    debug!(rows = fanned.len(), "Fanned gender probabilities");

    // Total probability mass per (gender, category).
    let summed = sum_by_key(fanned);

    // One sparse one-hot vector per summed row, folded per gender below.
    let mut unknown_category_rows = 0u64;
    let mut sparse: Relation<Gender, Vec<f64>> = Relation::new();
    for ((gender, category), mass) in summed {
        match categories.index_of(&category) {
            Ok(index) => {
                let mut vector = vec![0.0; categories.len()];
                vector[index] = mass;
                sparse.push(gender, vector);
            }
            Err(error) => {
                unknown_category_rows += 1;
                warn!(gender = %gender, "{error}, dropping row");
            }
        }
    }
    if unknown_category_rows > 0 {
        warn!(
            count = unknown_category_rows,
            "Dropped rows referencing unregistered categories"
        );
    }

    let mut vectors: Vec<GenderVector> = sum_vectors_by_key(sparse)
        .into_iter()
        .map(|(gender, weights)| GenderVector { gender, weights })
        .collect();
    vectors.sort_by_key(|v| v.gender.position());

    info!(
        genders = vectors.len(),
        categories = categories.len(),
        "Built frequency gender model"
    );

    Ok(ModelOutput {
        table: ModelTable::PerGender(vectors),
        categories: categories.categories().to_vec(),
        report: ModelReport {
            strategy: Strategy::Frequency,
            category_count: categories.len(),
            gender_rows: nrow,
            unknown_category_rows,
            uncounted_categories: 0,
            undefined_weight_categories: 0,
            built_at: Utc::now(),
        },
    })
}

/// Remove categories with an absent count on both sides, returning the
/// filtered relations and how many categories were dropped.
fn drop_uncounted_categories(
    male: Relation<String, Option<u64>>,
    female: Relation<String, Option<u64>>,
) -> (
    Relation<String, Option<u64>>,
    Relation<String, Option<u64>>,
    u64,
) {
    use std::collections::HashSet;

    let counted: HashSet<String> = male
        .iter()
        .chain(female.iter())
        .filter(|(_, count)| count.is_some())
        .map(|(category, _)| category.clone())
        .collect();
    let universe: HashSet<String> = male
        .iter()
        .chain(female.iter())
        .map(|(category, _)| category.clone())
        .collect();
    let dropped = (universe.len() - counted.len()) as u64;
    if dropped > 0 {
        warn!(
            count = dropped,
            "Dropping categories with no purchases for either gender"
        );
    }

    let male = male
        .into_iter()
        .filter(|(category, _)| counted.contains(category))
        .collect();
    let female = female
        .into_iter()
        .filter(|(category, _)| counted.contains(category))
        .collect();
    (male, female, dropped)
}
