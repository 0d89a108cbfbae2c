use std::sync::Arc;

use console::Term;
use starport::{AggregateOptions, MAX_PAGE_SIZE, aggregate_all};

use crate::commands::shared::{
    OutputFormat, RepoRow, build_client, display_rate, print_json, print_table,
};
use crate::config::Config;
use crate::progress::ProgressReporter;

/// Resolve aggregation options: CLI flags, then config, then defaults.
pub(crate) fn aggregate_options(
    per_page: Option<u32>,
    page_cap: Option<u32>,
    config: &Config,
) -> AggregateOptions {
    AggregateOptions::default()
        .with_page_size(
            per_page
                .or(config.pagination.per_page)
                .unwrap_or(MAX_PAGE_SIZE),
        )
        .with_page_cap(page_cap.unwrap_or(config.pagination.page_cap))
}

pub(crate) async fn handle_all(
    user: String,
    per_page: Option<u32>,
    page_cap: Option<u32>,
    output: OutputFormat,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = aggregate_options(per_page, page_cap, config);
    let client = build_client(config)?;

    let reporter = Arc::new(ProgressReporter::new());
    let callback = reporter.as_callback();
    let result = aggregate_all(&client, &user, &options, Some(&callback)).await;
    reporter.finish();
    let result = result?;

    match output {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Table => {
            let is_tty = Term::stdout().is_term();
            if result.items.is_empty() {
                println!("No starred repositories");
            } else {
                print_table(RepoRow::from_items(&result.items, 1));
            }
            println!(
                "{} repositories from {} pages",
                result.items.len(),
                result.pages_fetched
            );
            if result.truncated {
                println!(
                    "Stopped at the page cap ({}); raise --page-cap to fetch the rest",
                    options.page_cap
                );
            }
            display_rate(&result.rate, is_tty);
        }
    }

    Ok(())
}
