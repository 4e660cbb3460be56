use std::path::PathBuf;

use clap::Parser;

use crate::data::filter::Predicate;
use crate::data::model::columns;

// ---------------------------------------------------------------------------
// Command-line configuration
// ---------------------------------------------------------------------------

/// Interactive explorer for short-term rental listings
#[derive(Parser, Debug, Clone)]
#[command(name = "listing-lens", version)]
pub struct Config {
    /// Dataset to load at startup (.csv, .json or .parquet)
    #[arg(long, default_value = "listings.csv")]
    pub data: PathBuf,

    /// Number of most frequent neighbourhoods shown in the linked bar chart
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..))]
    pub top_k: u32,

    /// Tick plots only show listings priced at or below this amount
    #[arg(long, default_value = "3000")]
    pub max_price: f64,

    /// Tick plots only show listings earning strictly less than this
    #[arg(long, default_value = "200000")]
    pub max_revenue: f64,

    /// Tick plots only show listings rated strictly above this score
    #[arg(long, default_value = "3")]
    pub min_score: f64,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info", env = "LISTING_LENS_LOG")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: PathBuf::from("listings.csv"),
            top_k: 10,
            max_price: 3000.0,
            max_revenue: 200_000.0,
            min_score: 3.0,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Threshold predicates applied before the coordinated tick plots.
    pub fn tick_prefilter(&self) -> Vec<Predicate> {
        vec![
            Predicate::AtMost {
                field: columns::PRICE.to_string(),
                limit: self.max_price,
            },
            Predicate::LessThan {
                field: columns::ESTIMATED_REVENUE.to_string(),
                limit: self.max_revenue,
            },
            Predicate::GreaterThan {
                field: columns::REVIEW_SCORE.to_string(),
                limit: self.min_score,
            },
        ]
    }
}
