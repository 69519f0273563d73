//! Colored terminal rendering of the analyzer's views.

use colored::Colorize;
use market_analyzer::{
    render::NO_PROPERTIES, AnalysisOutcome, AnalysisReport, CurationStore, DiscoveryOutcome,
    HistoryEntryView, ProductView, ResultsView, UrlOrigin,
};

pub fn print_discovery(outcome: &DiscoveryOutcome, product_name: &str) {
    if let Some(error) = &outcome.error {
        println!("{}", error.bright_red());
    }
    if outcome.is_empty() {
        println!(
            "{}",
            "Could not discover any relevant URLs. Try modifying your search criteria.".yellow()
        );
    } else {
        println!(
            "{}",
            format!("Found {} relevant URLs for {}", outcome.urls.len(), product_name)
                .bright_green()
        );
    }
}

pub fn print_curation(store: &CurationStore) {
    if store.is_empty() {
        println!("{}", "No URLs yet. Discover or add some first.".dimmed());
        return;
    }

    println!("{}", "Candidate URLs".bold());
    for (i, entry) in store.entries().iter().enumerate() {
        let mark = if entry.included {
            "✓".bright_green()
        } else {
            "✗".bright_red()
        };
        let origin = match entry.origin {
            UrlOrigin::Discovered => "".normal(),
            UrlOrigin::Manual => " (added)".dimmed(),
        };
        println!("  {} {:>2}. {}{}", mark, i + 1, entry.url, origin);
    }
}

pub fn print_report(report: &AnalysisReport, view: &ResultsView) {
    for warning in &report.warnings {
        println!("{} {}", "⚠".yellow(), warning.to_string().yellow());
    }

    match report.outcome {
        AnalysisOutcome::NoUrls => {
            println!("{}", "No URLs selected. Please select at least one URL.".yellow())
        }
        AnalysisOutcome::NoResults => {
            println!("{}", "No products found matching your specifications.".bright_red())
        }
        AnalysisOutcome::Found => print_results(view),
    }
}

pub fn print_results(view: &ResultsView) {
    println!();
    println!("{}", view.title.bold().bright_cyan());
    for product in &view.products {
        println!();
        print_product(product);
    }
}

fn print_product(product: &ProductView) {
    println!("{}", product.headline.bold());
    field("Provider", &product.provider);
    field("Website", &product.website);
    if let Some(link) = &product.link {
        field("Product Link", link);
    }
    field("SKU/ID", &product.sku);
    field("Price", &product.price);
    if let Some(per) = &product.per_basis {
        field(&per.label, &per.display());
    }

    println!("    {}", "Product Properties".underline());
    if product.properties.is_empty() {
        println!("      {}", NO_PROPERTIES.dimmed());
    }
    for (key, value) in &product.properties {
        println!("      {}: {}", key.bold(), value);
    }

    println!("    {}", "Technical Evaluation".underline());
    println!("      {}", product.evaluation);
}

fn field(label: &str, value: &str) {
    println!("    {} {}", format!("{}:", label).bright_yellow(), value);
}

pub fn print_history(views: &[HistoryEntryView]) {
    if views.is_empty() {
        println!(
            "{}",
            "No search history yet. Search for products to see your history here.".dimmed()
        );
        return;
    }

    for view in views {
        println!();
        println!("{}", view.title.bold().bright_cyan());
        field("Category", &view.category);
        field("Product", &view.product_name);
        field("Search Query", &view.tech_spec);
        if let Some(calc) = &view.price_calculation {
            field("Price Calculation", calc);
        }
        field("Results", &view.summary);
        for product in &view.results.products {
            println!("      {}", product.headline);
            println!(
                "        Provider: {} | {}",
                product.provider,
                product.link.as_deref().unwrap_or("#").dimmed()
            );
        }
    }
}
