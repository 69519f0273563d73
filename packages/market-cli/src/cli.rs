//! Command-line arguments.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use market_analyzer::{PriceBasis, SearchQuery};

#[derive(Parser)]
#[command(name = "market-analyzer")]
#[command(about = "Find and compare product prices in the Lithuanian market", version)]
pub struct Cli {
    /// TOML file with `[config] openai_api_key`, used when OPENAI_API_KEY is unset
    #[arg(long, global = true)]
    pub secrets: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Guided search: discover, curate, analyze (default)
    Interactive,

    /// Discover candidate URLs for a product
    Discover {
        #[command(flatten)]
        query: QueryArgs,

        /// Print the URLs as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract and compare prices from URLs
    Analyze {
        #[command(flatten)]
        query: QueryArgs,

        /// URL to analyze (repeatable). Discovers URLs when omitted.
        #[arg(long = "url")]
        urls: Vec<String>,

        /// Print the product records as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Clone)]
pub struct QueryArgs {
    /// Product category or group, e.g. "Vitamins"
    #[arg(long)]
    pub category: String,

    /// Product name, e.g. "Vitamin D"
    #[arg(long)]
    pub product: String,

    /// Technical specification
    #[arg(long, default_value = "")]
    pub spec: String,

    /// Price basis: none, unit, kg, liter or package
    #[arg(long, default_value = "none")]
    pub basis: PriceBasis,

    /// Unit type for the unit basis, e.g. "pill"
    #[arg(long)]
    pub unit: Option<String>,
}

impl QueryArgs {
    pub fn to_query(&self) -> Result<SearchQuery> {
        Ok(SearchQuery::new(&self.category, &self.product, &self.spec)?
            .with_price_basis(self.basis, self.unit.clone()))
    }
}
