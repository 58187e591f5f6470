// Colored terminal output for model tables and build reports.
//
// This module handles all terminal-specific formatting: colors, tables,
// weight bars. The main.rs display path delegates here after a build.

use colored::Colorize;

use crate::model::builder::{CategoryWeights, GenderVector, ModelOutput, ModelReport, ModelTable};

/// Display a finished model in the terminal.
pub fn display_model(output: &ModelOutput) {
    match &output.table {
        ModelTable::PerCategory(rows) => display_category_table(rows),
        ModelTable::PerGender(vectors) => display_gender_vectors(vectors, &output.categories),
    }
    display_report(&output.report);
}

/// Per-category normalized weight pairs (TF-IDF strategy).
fn display_category_table(rows: &[CategoryWeights]) {
    if rows.is_empty() {
        println!("No categories in the model. Check the category registry input.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Gender Model ({} categories) ===", rows.len()).bold()
    );
    println!();
    println!(
        "  {:<28} {:>6}  {:>6}",
        "Category".dimmed(),
        "Male".dimmed(),
        "Female".dimmed(),
    );
    println!("  {}", "-".repeat(44).dimmed());

    for row in rows {
        println!(
            "  {:<28} {}  {}",
            row.category,
            format_weight(row.male),
            format_weight(row.female),
        );
    }
}

/// Dense per-gender weight vectors (frequency strategy), one bar per slot.
fn display_gender_vectors(vectors: &[GenderVector], categories: &[String]) {
    if vectors.is_empty() {
        println!("No gender rows in the model. Check the gender log input.");
        return;
    }

    println!(
        "\n{}",
        format!(
            "=== Gender Model ({} genders, {} categories) ===",
            vectors.len(),
            categories.len()
        )
        .bold()
    );

    let bar_width: usize = 20;

    for vector in vectors {
        let total: f64 = vector.weights.iter().sum();
        let max = vector.weights.iter().cloned().fold(0.0f64, f64::max);

        println!(
            "\n  {} (total mass {:.2})",
            vector.gender.to_string().bold(),
            total
        );

        for (slot, weight) in vector.weights.iter().enumerate() {
            let label = categories.get(slot).map(String::as_str).unwrap_or("?");
            let filled = if max > 0.0 {
                ((weight / max) * bar_width as f64).round() as usize
            } else {
                0
            };
            let empty = bar_width.saturating_sub(filled);
            let bar = format!("[{}{}]", "=".repeat(filled), " ".repeat(empty));

            let colored_bar = if max > 0.0 && weight / max >= 0.5 {
                bar.bright_green()
            } else if max > 0.0 && weight / max >= 0.2 {
                bar.bright_yellow()
            } else {
                bar.dimmed()
            };

            println!("    {:<24} {} {:.3}", label, colored_bar, weight);
        }
    }
}

/// Build summary: counts, drops, timestamp.
fn display_report(report: &ModelReport) {
    println!();
    println!("  Strategy: {}", report.strategy);
    println!("  Gender rows: {}", report.gender_rows);
    println!("  Categories: {}", report.category_count);
    if report.unknown_category_rows > 0 {
        println!(
            "  {} {} rows dropped (unregistered categories)",
            "!".bright_red(),
            report.unknown_category_rows
        );
    }
    if report.uncounted_categories > 0 {
        println!(
            "  {} {} categories dropped (no purchases for either gender)",
            "~".yellow(),
            report.uncounted_categories
        );
    }
    if report.undefined_weight_categories > 0 {
        println!(
            "  {} {} categories with undefined weights (zero denominator)",
            "~".yellow(),
            report.undefined_weight_categories
        );
    }
    println!(
        "  Built at: {}",
        report.built_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
}

/// Format a normalized weight, dimming undefined (NaN) entries and
/// highlighting the dominant side.
fn format_weight(weight: f64) -> String {
    if weight.is_nan() {
        return format!("{:>6}", "n/a").dimmed().to_string();
    }
    let text = format!("{weight:>6.2}");
    if weight >= 0.6 {
        text.bright_green().to_string()
    } else if weight <= 0.4 {
        text.bright_blue().to_string()
    } else {
        text.normal().to_string()
    }
}
