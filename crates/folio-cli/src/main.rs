//! folio: search the Google Books catalog from the command line.

mod config;

use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use folio_client::GoogleBooksClient;
use folio_core::config::{load_catalog_config, CatalogConfig};
use folio_core::controller::{SearchController, TracingReporter};
use folio_core::models::Volume;
use folio_core::paging::PageCursor;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::config::{Command, Config};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Config::parse();

    let file_config = load_catalog_config(cli.config.clone())
        .map_err(|e| anyhow::anyhow!(e.user_message()))?
        .unwrap_or_default();

    match cli.command {
        Command::Search {
            ref query,
            pages,
            page_size,
        } => {
            handle_search(&cli, &file_config, query, pages, page_size).await?;
        }
    }

    Ok(())
}

async fn handle_search(
    cli: &Config,
    file_config: &CatalogConfig,
    query: &str,
    pages: u32,
    page_size: Option<u32>,
) -> Result<()> {
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| file_config.base_url.clone())
        .unwrap_or_else(|| GoogleBooksClient::DEFAULT_BASE_URL.to_string());

    let mut search_config = file_config.search_config();
    if let Some(size) = page_size {
        search_config.page_size = size;
    }

    let client = GoogleBooksClient::with_config(&base_url, &file_config.http_config())
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    let controller = SearchController::with_reporter(client, search_config, TracingReporter);

    controller
        .dispatch_search(query)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    for _ in 1..pages {
        if !controller.can_load_more() {
            break;
        }
        controller
            .load_more()
            .await
            .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    }

    print_results(query, &controller.results(), controller.cursor());
    Ok(())
}

fn print_results(query: &str, results: &[Volume], cursor: PageCursor) {
    if results.is_empty() {
        println!("No results for '{query}'.");
        return;
    }

    let total = cursor.total_items.unwrap_or(results.len() as u32);
    println!(
        "🔍 Results for '{query}' ({shown} of {total}):",
        shown = results.len()
    );
    println!();

    for (index, volume) in results.iter().enumerate() {
        println!("{:3}. {}", index + 1, volume.title);
        if !volume.authors.is_empty() {
            println!("     by {}", volume.authors.join(", "));
        }
        if let Some(rating) = volume.average_rating {
            println!("     {} ({rating:.1})", rating_stars(rating));
        }
        if let Some(cover) = &volume.cover_url {
            println!("     cover: {cover}");
        }
        if let Some(description) = &volume.description {
            println!("     {}", truncate_text(description, 120));
        }
        println!();
    }

    if let Some(hint) = more_results_hint(cursor) {
        println!("{hint}");
    }
}

/// Footer hint naming how many matches are still unfetched; absent once
/// the cursor has passed the last item (or before any page committed).
fn more_results_hint(cursor: PageCursor) -> Option<String> {
    let unfetched = cursor.remaining().filter(|n| *n > 0)?;
    Some(format!(
        "{unfetched} more results available; rerun with --pages to fetch them."
    ))
}

/// Renders a 0-5 rating as a five-star bar.
fn rating_stars(rating: f64) -> String {
    let filled = rating.round().clamp(0.0, 5.0) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Truncates to `max_chars` characters, appending an ellipsis when cut.
fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}
