use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use ochre::config::Config;
use ochre::ingest;
use ochre::model::builder::{self, Strategy};
use ochre::output;

/// Ochre: gender propensity modeling from retail purchase logs.
///
/// Builds per-gender feature vectors over product categories, ready to
/// feed a downstream gender classifier.
#[derive(Parser)]
#[command(name = "ochre", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the gender model from the configured input logs
    Build {
        /// Feature strategy: tfidf or frequency (default from OCHRE_STRATEGY)
        #[arg(long)]
        strategy: Option<String>,

        /// Emit the model as JSON instead of the terminal table
        #[arg(long)]
        json: bool,
    },

    /// Show row counts for the configured input files
    Inspect,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ochre=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build { strategy, json } => {
            let config = Config::load()?;
            let strategy = match strategy.as_deref() {
                Some("tfidf") => Strategy::TfIdf,
                Some("frequency") => Strategy::Frequency,
                Some(other) => {
                    anyhow::bail!("Unknown strategy '{other}' (expected tfidf or frequency)")
                }
                None => config.default_strategy,
            };
            config.require_inputs(strategy)?;

            info!(%strategy, "Building gender model");
            let inputs = ingest::load_inputs(&config, strategy == Strategy::Frequency)?;
            let model = builder::build(strategy, &inputs)?;

            if json {
                println!("{}", output::to_json(&model)?);
            } else {
                output::terminal::display_model(&model);
            }
        }

        Commands::Inspect => {
            let config = Config::load()?;
            inspect(&config)?;
        }
    }

    Ok(())
}

/// Print row counts for each configured input file.
fn inspect(config: &Config) -> Result<()> {
    println!("\n{}", "=== Input Files ===".bold());
    println!("  Data dir: {}", config.data_dir.display());
    println!();

    let mut files = vec![
        ("user products", config.user_product_file.clone()),
        ("user genders", config.user_gender_file.clone()),
        ("product categories", config.product_category_file.clone()),
        ("category registry", config.category_file.clone()),
    ];
    if let Some(classified) = &config.classified_user_file {
        files.push(("classified users", classified.clone()));
    }

    for (label, path) in files {
        if path.exists() {
            let lines = std::fs::read_to_string(&path)?
                .lines()
                .filter(|l| !l.trim().is_empty())
                .count();
            println!("  {:<20} {:>8} rows  {}", label, lines, path.display());
        } else {
            println!(
                "  {:<20} {:>8}  {}",
                label,
                "missing".bright_red(),
                path.display()
            );
        }
    }

    println!(
        "\n  Default strategy: {}",
        config.default_strategy.to_string().bold()
    );
    Ok(())
}
