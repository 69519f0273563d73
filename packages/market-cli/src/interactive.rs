//! Guided terminal session.

use std::fs;

use anyhow::{Context, Result};
use colored::Colorize;
use console::Term;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Select};
use market_analyzer::{
    history_views, AnalysisReport, PriceBasis, ResearchService, ResultsView, SearchQuery, Session,
};

use crate::output;

const DEFAULT_EXPORT_PATH: &str = "market-history.json";

/// Run the interactive loop until the user exits.
pub async fn run<S: ResearchService>(session: &mut Session<S>) -> Result<()> {
    let term = Term::stdout();
    let theme = ColorfulTheme::default();

    print_banner(&term)?;

    let mut query: Option<SearchQuery> = None;
    let mut last_report: Option<AnalysisReport> = None;

    loop {
        println!();
        let options = [
            "🔎 New search (discover URLs)",
            "📋 Review URLs",
            "➕ Add URL",
            "🗑  Remove URL",
            "💶 Analyze product prices",
            "🕘 Search history",
            "💾 Export JSON",
            "🛑 Exit",
        ];

        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(if query.is_none() { 0 } else { 4 })
            .interact_on(&term)?;

        match selection {
            0 => {
                let q = prompt_query(&theme)?;
                discover(session, &q).await;
                query = Some(q);
            }
            1 => review_urls(session, &theme)?,
            2 => add_url(session, &theme)?,
            3 => remove_url(session, &theme)?,
            4 => match &query {
                Some(q) => last_report = Some(analyze(session, q).await),
                None => println!("{}", "Start a new search first.".yellow()),
            },
            5 => output::print_history(&history_views(session.history())),
            6 => export(session, last_report.as_ref(), &theme)?,
            7 => {
                println!("{}", "👋 Goodbye!".bright_blue());
                break;
            }
            _ => unreachable!(),
        }
    }

    Ok(())
}

fn print_banner(term: &Term) -> Result<()> {
    term.clear_screen()?;
    println!(
        "{}",
        "╔════════════════════════════════════════╗".bright_cyan()
    );
    println!(
        "{}",
        "║  Lithuanian Market Product Analyzer    ║".bright_cyan()
    );
    println!(
        "{}",
        "╚════════════════════════════════════════╝".bright_cyan()
    );
    Ok(())
}

fn prompt_query(theme: &ColorfulTheme) -> Result<SearchQuery> {
    loop {
        let category: String = Input::with_theme(theme)
            .with_prompt("Product category or group (e.g. Smartphones, Vitamins)")
            .interact_text()?;
        let product: String = Input::with_theme(theme)
            .with_prompt("Product name (e.g. iPhone, Vitamin D)")
            .interact_text()?;
        let spec: String = Input::with_theme(theme)
            .with_prompt("Technical specification")
            .allow_empty(true)
            .interact_text()?;

        let descriptions: Vec<&str> = PriceBasis::ALL.iter().map(|b| b.description()).collect();
        let basis = PriceBasis::ALL[Select::with_theme(theme)
            .with_prompt("How should prices be compared?")
            .items(&descriptions)
            .default(0)
            .interact()?];

        let unit = if basis == PriceBasis::Unit {
            let unit: String = Input::with_theme(theme)
                .with_prompt("Unit type (e.g. tablet, pill, piece; empty for 'unit')")
                .allow_empty(true)
                .interact_text()?;
            Some(unit)
        } else {
            None
        };

        match SearchQuery::new(category, product, spec) {
            Ok(query) => {
                if !basis.is_none() {
                    println!(
                        "{}",
                        format!("Products will be evaluated based on {}", basis.description())
                            .dimmed()
                    );
                }
                return Ok(query.with_price_basis(basis, unit));
            }
            Err(e) => println!("{}", e.to_string().yellow()),
        }
    }
}

async fn discover<S: ResearchService>(session: &mut Session<S>, query: &SearchQuery) {
    println!(
        "{}",
        format!(
            "Discovering relevant URLs for {} in {} category...",
            query.product_name(),
            query.category()
        )
        .dimmed()
    );

    let outcome = session.discover(query).await;
    output::print_discovery(&outcome, query.product_name());
    output::print_curation(session.curation());
}

fn review_urls<S: ResearchService>(session: &mut Session<S>, theme: &ColorfulTheme) -> Result<()> {
    if session.curation().is_empty() {
        output::print_curation(session.curation());
        return Ok(());
    }

    let (urls, included): (Vec<String>, Vec<bool>) = session
        .curation()
        .entries()
        .iter()
        .map(|e| (e.url.clone(), e.included))
        .unzip();

    let chosen = MultiSelect::with_theme(theme)
        .with_prompt("Include (space toggles, enter confirms)")
        .items(&urls)
        .defaults(&included)
        .interact()?;

    for (i, url) in urls.iter().enumerate() {
        session.curation_mut().set_included(url, chosen.contains(&i));
    }

    output::print_curation(session.curation());
    Ok(())
}

fn add_url<S: ResearchService>(session: &mut Session<S>, theme: &ColorfulTheme) -> Result<()> {
    let url: String = Input::with_theme(theme)
        .with_prompt("Add new URL (e.g. https://example.lt/product)")
        .interact_text()?;

    match session.curation_mut().add(&url) {
        Ok(true) => println!("{}", format!("Added {} to the list", url.trim()).bright_green()),
        Ok(false) => println!("{}", format!("{} is already in the list", url.trim()).dimmed()),
        Err(e) => println!("{}", e.to_string().yellow()),
    }
    Ok(())
}

fn remove_url<S: ResearchService>(session: &mut Session<S>, theme: &ColorfulTheme) -> Result<()> {
    let urls: Vec<String> = session
        .curation()
        .entries()
        .iter()
        .map(|e| e.url.clone())
        .collect();
    if urls.is_empty() {
        output::print_curation(session.curation());
        return Ok(());
    }

    let index = Select::with_theme(theme)
        .with_prompt("Remove which URL?")
        .items(&urls)
        .interact()?;
    session.curation_mut().remove(&urls[index]);
    output::print_curation(session.curation());
    Ok(())
}

async fn analyze<S: ResearchService>(session: &mut Session<S>, query: &SearchQuery) -> AnalysisReport {
    let urls = session.curation().active_urls();
    println!(
        "{}",
        format!(
            "Analyzing prices for {} from {} URLs...",
            query.product_name(),
            urls.len()
        )
        .dimmed()
    );

    let report = session
        .run_analysis_with_progress(query, &urls, |p| {
            println!(
                "{}",
                format!("[{}/{}] Analyzing URL: {}", p.index, p.total, p.url).dimmed()
            );
        })
        .await;

    output::print_report(&report, &ResultsView::build(&report.products, query));
    report
}

fn export<S: ResearchService>(
    session: &Session<S>,
    last_report: Option<&AnalysisReport>,
    theme: &ColorfulTheme,
) -> Result<()> {
    let choices = ["Whole search history", "Latest results only"];
    let which = Select::with_theme(theme)
        .with_prompt("What should be exported?")
        .items(&choices)
        .default(0)
        .interact()?;

    let json = match (which, last_report) {
        (0, _) => session
            .history()
            .to_json_pretty()
            .context("Failed to serialize history")?,
        (_, Some(report)) => serde_json::to_string_pretty(&report.products)
            .context("Failed to serialize results")?,
        (_, None) => {
            println!("{}", "No results yet.".yellow());
            return Ok(());
        }
    };

    let to_file = Confirm::with_theme(theme)
        .with_prompt("Write to a file? (no prints it here)")
        .default(true)
        .interact()?;

    if !to_file {
        println!("{}", json);
        return Ok(());
    }

    let path: String = Input::with_theme(theme)
        .with_prompt("File path")
        .default(DEFAULT_EXPORT_PATH.to_string())
        .interact_text()?;
    match save_export(&path, &json) {
        Ok(()) => println!("{}", format!("✅ Saved to {}", path).bright_green()),
        Err(e) => println!("{}", format!("{:#}", e).yellow()),
    }
    Ok(())
}

/// Write exported JSON. Failures are reported, never fatal to the session.
fn save_export(path: &str, json: &str) -> Result<()> {
    fs::write(path, json).with_context(|| format!("Failed to write {}", path))
}
