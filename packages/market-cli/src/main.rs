//! Lithuanian Market Product Analyzer
//!
//! Interactive by default; `discover` and `analyze` run one step and exit.

mod cli;
mod interactive;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use market_analyzer::{AppConfig, OpenAIResearch, ResearchService, ResultsView, Session};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands, QueryArgs};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (stderr, so results on stdout stay clean)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,market_analyzer=info,openai_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.secrets.as_deref()).context("Failed to load configuration")?;
    info!(
        api_key = %config.api_key.masked(),
        discovery_model = %config.discovery_model,
        extraction_model = %config.extraction_model,
        country = %config.market.country,
        city = %config.market.city,
        "Configuration loaded"
    );

    let research = OpenAIResearch::from_config(&config).context("Failed to create OpenAI client")?;
    let mut session = Session::new(research, config.market.clone());

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => interactive::run(&mut session).await,
        Commands::Discover { query, json } => discover(&mut session, &query, json).await,
        Commands::Analyze { query, urls, json } => analyze(&mut session, &query, urls, json).await,
    }
}

async fn discover<S: ResearchService>(
    session: &mut Session<S>,
    args: &QueryArgs,
    json: bool,
) -> Result<()> {
    let query = args.to_query()?;
    let outcome = session.discover(&query).await;

    if json {
        println!("{}", serde_json::json!({ "urls": outcome.urls }));
    } else {
        output::print_discovery(&outcome, query.product_name());
        for (i, url) in outcome.urls.iter().enumerate() {
            println!("{:>3}. {}", i + 1, url);
        }
    }

    match outcome.error {
        Some(error) => anyhow::bail!(error),
        None => Ok(()),
    }
}

async fn analyze<S: ResearchService>(
    session: &mut Session<S>,
    args: &QueryArgs,
    urls: Vec<String>,
    json: bool,
) -> Result<()> {
    let query = args.to_query()?;

    let urls = if urls.is_empty() {
        let outcome = session.discover(&query).await;
        if let Some(error) = outcome.error {
            anyhow::bail!(error);
        }
        outcome.urls
    } else {
        for url in &urls {
            session
                .curation_mut()
                .add(url)
                .with_context(|| format!("Cannot analyze {}", url))?;
        }
        session.curation().active_urls()
    };

    let report = session
        .run_analysis_with_progress(&query, &urls, |p| {
            if !json {
                eprintln!(
                    "{}",
                    format!("[{}/{}] Analyzing URL: {}", p.index, p.total, p.url).dimmed()
                );
            }
        })
        .await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report.products)?);
        for warning in &report.warnings {
            eprintln!("{}", warning);
        }
    } else {
        output::print_report(&report, &ResultsView::build(&report.products, &query));
    }

    Ok(())
}
