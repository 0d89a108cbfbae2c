use console::Term;
use serde::Serialize;
use starport::{DEFAULT_PAGE_SIZE, PageCursor, PageRequest, StarredPage, fetch_starred_page};

use crate::commands::shared::{
    OutputFormat, RepoRow, build_client, display_rate, print_json, print_table,
};
use crate::config::Config;

/// JSON shape for a single page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PageOutput<'a> {
    #[serde(flatten)]
    page: &'a StarredPage,
    page_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    showing: Option<Showing>,
}

#[derive(Debug, Serialize)]
struct Showing {
    from: u64,
    to: u64,
}

pub(crate) async fn handle_page(
    user: String,
    page: u32,
    per_page: Option<u32>,
    output: OutputFormat,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let page_size = per_page
        .or(config.pagination.per_page)
        .unwrap_or(DEFAULT_PAGE_SIZE);
    let request = PageRequest::new(user)
        .with_page(page)
        .with_page_size(page_size)
        .validate()?;

    let client = build_client(config)?;
    let result = fetch_starred_page(&client, &request).await?;
    let range = request.display_range(result.items.len());

    match output {
        OutputFormat::Json => {
            print_json(&PageOutput {
                page: &result,
                page_number: request.page,
                showing: range.map(|(from, to)| Showing { from, to }),
            })?;
        }
        OutputFormat::Table => {
            let is_tty = Term::stdout().is_term();
            match range {
                Some((from, to)) => {
                    print_table(RepoRow::from_items(&result.items, from));
                    println!("Showing {}–{}", from, to);
                }
                None => println!("No starred repositories on page {}", request.page),
            }
            if let Some(pointers) = describe_cursor(&result.cursor) {
                println!("{}", pointers);
            }
            display_rate(&result.rate, is_tty);
        }
    }

    Ok(())
}

/// `Pages: first 1 · prev 2 · next 4 · last 9`, skipping absent pointers.
fn describe_cursor(cursor: &PageCursor) -> Option<String> {
    if cursor.is_empty() {
        return None;
    }

    let parts: Vec<String> = [
        ("first", cursor.first),
        ("prev", cursor.prev),
        ("next", cursor.next),
        ("last", cursor.last),
    ]
    .into_iter()
    .filter_map(|(name, page)| page.map(|p| format!("{} {}", name, p)))
    .collect();

    Some(format!("Pages: {}", parts.join(" · ")))
}
