// Raw log ingestion — turns line-based input files into typed relations.
//
// Every input is a two-column file: a key token, whitespace, and the rest
// of the line as the value. Gender codes contain internal spaces ("1 0",
// "0.8 0.1 0.1"), so only the first split counts. Lines that do not split,
// or whose numeric column does not parse, are logged, counted, and skipped
// at this boundary — the model core never sees them.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use crate::config::Config;
use crate::model::builder::ModelInputs;
use crate::relation::Relation;

/// productId → userId, from "userId <ws> productId" purchase lines.
/// Note the column swap: purchases are logged per user, joins are keyed by
/// product.
pub fn product_to_user(path: &Path) -> Result<Relation<String, String>> {
    let (rows, skipped) = parse_two_column(path)?;
    report_skipped(path, skipped);
    Ok(rows
        .into_iter()
        .map(|(user, product)| (product, user))
        .collect())
}

/// userId → gender code. The code is the rest of the line: two flags in the
/// raw log, three probabilities in the classified log.
pub fn user_to_gender(path: &Path) -> Result<Relation<String, String>> {
    let (rows, skipped) = parse_two_column(path)?;
    report_skipped(path, skipped);
    Ok(rows.into_iter().collect())
}

/// productId → categoryId.
pub fn product_to_category(path: &Path) -> Result<Relation<String, String>> {
    let (rows, skipped) = parse_two_column(path)?;
    report_skipped(path, skipped);
    Ok(rows.into_iter().collect())
}

/// categoryId → global product count.
pub fn category_stats(path: &Path) -> Result<Relation<String, u64>> {
    let (rows, mut skipped) = parse_two_column(path)?;
    let mut relation = Relation::new();
    for (category, count) in rows {
        match count.parse::<u64>() {
            Ok(count) => relation.push(category, count),
            Err(_) => {
                skipped += 1;
                debug!(category, count, "Skipping category with unparsable product count");
            }
        }
    }
    report_skipped(path, skipped);
    Ok(relation)
}

/// Read every relation a build needs, with a progress bar across the files.
pub fn load_inputs(config: &Config, include_classified: bool) -> Result<ModelInputs> {
    let classified_path = if include_classified {
        config.classified_user_file.as_deref()
    } else {
        None
    };

    let total = 4 + classified_path.is_some() as u64;
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Ingest [{bar:30}] {pos}/{len}")
            .unwrap(),
    );

    let purchases = product_to_user(&config.user_product_file)?;
    pb.inc(1);
    let genders = user_to_gender(&config.user_gender_file)?;
    pb.inc(1);
    let categories = product_to_category(&config.product_category_file)?;
    pb.inc(1);
    let stats = category_stats(&config.category_file)?;
    pb.inc(1);
    let classified = match classified_path {
        Some(path) => {
            let relation = user_to_gender(path)?;
            pb.inc(1);
            Some(relation)
        }
        None => None,
    };
    pb.finish_and_clear();

    debug!(
        purchases = purchases.len(),
        genders = genders.len(),
        product_categories = categories.len(),
        registry = stats.len(),
        "Loaded input relations"
    );

    Ok(ModelInputs {
        product_to_user: purchases,
        user_to_gender: genders,
        product_to_category: categories,
        category_stats: stats,
        classified_user_to_gender: classified,
    })
}

/// Split each nonblank line at its first whitespace run. Returns the parsed
/// rows and how many lines failed to split.
fn parse_two_column(path: &Path) -> Result<(Vec<(String, String)>, u64)> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let mut rows = Vec::new();
    let mut skipped = 0u64;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.split_once(char::is_whitespace) {
            Some((key, value)) if !value.trim().is_empty() => {
                rows.push((key.to_string(), value.trim().to_string()));
            }
            _ => {
                skipped += 1;
                debug!(line, "Skipping malformed line");
            }
        }
    }
    Ok((rows, skipped))
}

fn report_skipped(path: &Path, skipped: u64) {
    if skipped > 0 {
        warn!(file = %path.display(), skipped, "Skipped malformed input lines");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("ochre-ingest-{name}"));
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_product_to_user_swaps_columns() {
        let path = write_temp("purchases.tsv", "u1\tp1\nu2\tp1\n");
        let relation = product_to_user(&path).unwrap();
        assert_eq!(relation.len(), 2);
        for (product, user) in relation.iter() {
            assert_eq!(product, "p1");
            assert!(user.starts_with('u'));
        }
    }

    #[test]
    fn test_user_to_gender_keeps_multi_token_code() {
        let path = write_temp("genders.tsv", "u1\t1 0\nu2\t0.8 0.1 0.1\n");
        let relation = user_to_gender(&path).unwrap();
        let rows: std::collections::HashMap<_, _> = relation.into_iter().collect();
        assert_eq!(rows["u1"], "1 0");
        assert_eq!(rows["u2"], "0.8 0.1 0.1");
    }

    #[test]
    fn test_category_stats_skips_unparsable_counts() {
        let path = write_temp("categories.tsv", "books\t10\ngames\tmany\n\ngarden\t3\n");
        let relation = category_stats(&path).unwrap();
        let rows: std::collections::HashMap<_, _> = relation.into_iter().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows["books"], 10);
        assert_eq!(rows["garden"], 3);
    }

    #[test]
    fn test_single_column_lines_are_skipped() {
        let path = write_temp("broken.tsv", "justakey\nu1\tp1\n");
        let relation = product_to_user(&path).unwrap();
        assert_eq!(relation.len(), 1);
    }
}
