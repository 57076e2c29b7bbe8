#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Runs the retail network analytics for one category of a catalog.
//!
//! ```text
//! retail_map --catalog config/catalog.toml categories
//! retail_map --catalog config/catalog.toml report "MR DIY + MR TOY"
//! retail_map --catalog config/catalog.toml insights "Fast Fashion"
//! ```
//!
//! Log verbosity is controlled with `RUST_LOG`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use retail_map_analytics::{AnalyticsInput, AnalyticsSession};
use retail_map_loader::Catalog;

#[derive(Parser)]
#[command(
    name = "retail_map",
    about = "Retail network analytics for store, DC, and district data"
)]
struct Cli {
    /// Path to the category catalog.
    #[arg(long, default_value = "config/catalog.toml")]
    catalog: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured categories
    Categories,
    /// Print the full analytics report for a category as JSON
    Report {
        /// Category name, exactly as in the catalog
        category: String,
        /// Print on a single line instead of pretty-printing
        #[arg(long)]
        compact: bool,
    },
    /// Print only the insight sentences for a category
    Insights {
        /// Category name, exactly as in the catalog
        category: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let catalog = Catalog::load(&cli.catalog)?;
    log::debug!("Loaded catalog from {}", cli.catalog.display());

    match cli.command {
        Commands::Categories => {
            for category in &catalog.categories {
                let dc = if category.dc_file.is_some() { " (DC)" } else { "" };
                println!(
                    "{}{dc}: {} store file(s)",
                    category.name,
                    category.store_files.len()
                );
            }
        }
        Commands::Report { category, compact } => {
            let data = catalog.load_category(&category)?;
            let mut session = AnalyticsSession::new(catalog.analytics.clone());
            let report = session.run(&AnalyticsInput {
                stores: &data.stores,
                facilities: &data.facilities,
                districts: &data.districts,
            });

            let json = if compact {
                serde_json::to_string(&report)?
            } else {
                serde_json::to_string_pretty(&report)?
            };
            println!("{json}");
        }
        Commands::Insights { category } => {
            let data = catalog.load_category(&category)?;
            let mut session = AnalyticsSession::new(catalog.analytics.clone());
            let report = session.run(&AnalyticsInput {
                stores: &data.stores,
                facilities: &data.facilities,
                districts: &data.districts,
            });

            if report.insights.is_empty() {
                println!("No insights for {category}.");
            }
            for insight in &report.insights {
                println!("- {insight}");
            }
        }
    }

    Ok(())
}
