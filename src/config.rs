use std::env;
use std::path::PathBuf;

use anyhow::Result;

use crate::model::builder::Strategy;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// input file path can be overridden individually; otherwise it resolves
/// under OCHRE_DATA_DIR.
pub struct Config {
    pub data_dir: PathBuf,
    pub user_product_file: PathBuf,
    pub user_gender_file: PathBuf,
    pub product_category_file: PathBuf,
    pub category_file: PathBuf,
    /// Externally classified gender labels — frequency-strategy supplement.
    pub classified_user_file: Option<PathBuf>,
    /// Strategy used when the CLI does not pass one explicitly.
    pub default_strategy: Strategy,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let data_dir =
            PathBuf::from(env::var("OCHRE_DATA_DIR").unwrap_or_else(|_| "./data".to_string()));

        let default_strategy = match env::var("OCHRE_STRATEGY").as_deref() {
            Ok("frequency") => Strategy::Frequency,
            // "tfidf" or unset both default to TF-IDF
            _ => Strategy::TfIdf,
        };

        let file = |var: &str, name: &str| {
            env::var(var)
                .map(PathBuf::from)
                .unwrap_or_else(|_| data_dir.join(name))
        };

        let user_product_file = file("OCHRE_USER_PRODUCT_FILE", "user_products.tsv");
        let user_gender_file = file("OCHRE_USER_GENDER_FILE", "user_genders.tsv");
        let product_category_file = file("OCHRE_PRODUCT_CATEGORY_FILE", "product_categories.tsv");
        let category_file = file("OCHRE_CATEGORY_FILE", "categories.tsv");
        let classified_user_file = env::var("OCHRE_CLASSIFIED_USER_FILE")
            .map(PathBuf::from)
            .ok();

        Ok(Self {
            data_dir,
            user_product_file,
            user_gender_file,
            product_category_file,
            category_file,
            classified_user_file,
            default_strategy,
        })
    }

    /// Check that every input file a build needs actually exists.
    /// Call this before ingest so the user gets one clear message instead
    /// of a mid-build read failure.
    pub fn require_inputs(&self, strategy: Strategy) -> Result<()> {
        let mut required = vec![
            &self.user_product_file,
            &self.user_gender_file,
            &self.product_category_file,
            &self.category_file,
        ];
        if strategy == Strategy::Frequency {
            if let Some(classified) = &self.classified_user_file {
                required.push(classified);
            }
        }
        for path in required {
            if !path.exists() {
                anyhow::bail!(
                    "Input file not found: {}\n\
                     Set OCHRE_DATA_DIR (or the per-file OCHRE_*_FILE variables) in your .env file.",
                    path.display()
                );
            }
        }
        Ok(())
    }
}
