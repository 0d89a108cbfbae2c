use std::sync::Arc;

use clap::ValueEnum;
use serde::Serialize;
use starport::http::ReqwestTransport;
use starport::{GitHubClient, RateSnapshot, RepoItem};

use crate::config::Config;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Display as a formatted table (default)
    #[default]
    Table,
    /// Display as JSON
    Json,
}

/// Build a GitHub client from configuration.
pub(crate) fn build_client(config: &Config) -> Result<GitHubClient, Box<dyn std::error::Error>> {
    let transport = ReqwestTransport::with_timeout(config.timeout())?;
    let token = config.github_token();
    let mut client = GitHubClient::with_transport(Arc::new(transport), token.as_deref());
    if let Some(api_url) = &config.github.api_url {
        client = client.with_api_base(api_url.as_str());
    }

    if !client.has_token() {
        tracing::debug!("No GitHub token configured; using unauthenticated requests");
    }

    Ok(client)
}

/// One table row per starred repository.
#[derive(Debug, Clone, Serialize, tabled::Tabled)]
pub(crate) struct RepoRow {
    #[tabled(rename = "#")]
    pub position: u64,
    #[tabled(rename = "Repository")]
    pub full_name: String,
    #[tabled(rename = "Stars")]
    pub stars: u64,
    #[tabled(rename = "Language")]
    pub language: String,
    #[tabled(rename = "Description")]
    pub description: String,
}

const DESCRIPTION_WIDTH: usize = 60;

impl RepoRow {
    /// Build rows numbered from `first_position`.
    pub(crate) fn from_items(items: &[RepoItem], first_position: u64) -> Vec<Self> {
        items
            .iter()
            .zip(first_position..)
            .map(|(item, position)| Self {
                position,
                full_name: item.full_name.clone(),
                stars: item.star_count,
                language: item.primary_language.clone().unwrap_or_default(),
                description: truncate(
                    item.description.as_deref().unwrap_or_default(),
                    DESCRIPTION_WIDTH,
                ),
            })
            .collect()
    }
}

pub(crate) fn print_table<T: tabled::Tabled>(rows: Vec<T>) {
    let mut table = tabled::Table::new(rows);
    table.with(tabled::settings::Style::rounded());
    println!("{}", table);
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Single-line description of a rate snapshot, or `None` if nothing was reported.
pub(crate) fn describe_rate(rate: &RateSnapshot, now: chrono::DateTime<chrono::Utc>) -> Option<String> {
    let remaining = rate.remaining?;
    let mut line = match rate.limit {
        Some(limit) => format!("Rate limit: {}/{} remaining", remaining, limit),
        None => format!("Rate limit: {} remaining", remaining),
    };

    if let Some(reset_at) = rate.reset_at() {
        let until = reset_at.signed_duration_since(now);
        if until.num_seconds() > 0 {
            line.push_str(&format!(" (resets in {})", format_duration(until)));
        } else {
            line.push_str(" (resets now)");
        }
    }

    Some(line)
}

/// Print rate info on a TTY, log it otherwise.
pub(crate) fn display_rate(rate: &RateSnapshot, is_tty: bool) {
    if is_tty {
        if let Some(line) = describe_rate(rate, chrono::Utc::now()) {
            println!("{}", line);
        }
    } else {
        tracing::info!(
            limit = ?rate.limit,
            remaining = ?rate.remaining,
            reset = ?rate.reset_at(),
            "Rate limit after request"
        );
    }
}

fn format_duration(duration: chrono::Duration) -> String {
    let total_secs = duration.num_seconds();
    if total_secs < 60 {
        format!("{}s", total_secs)
    } else if total_secs < 3600 {
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        if secs > 0 {
            format!("{}m {}s", mins, secs)
        } else {
            format!("{}m", mins)
        }
    } else {
        let hours = total_secs / 3600;
        let mins = (total_secs % 3600) / 60;
        if mins > 0 {
            format!("{}h {}m", hours, mins)
        } else {
            format!("{}h", hours)
        }
    }
}

fn truncate(text: &str, width: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(width).collect();
    if chars.next().is_some() {
        format!("{}…", head.trim_end())
    } else {
        head
    }
}
