use std::path::PathBuf;
use std::sync::Arc;

use starport::{ExportOptions, ExportReport, ExportRequest, FileSink, JsonStyle, export_stars};

use crate::commands::all::aggregate_options;
use crate::commands::shared::{OutputFormat, build_client, print_json, print_table};
use crate::config::Config;
use crate::progress::ProgressReporter;

/// Export command arguments, after clap parsing.
#[derive(Debug, Clone)]
pub(crate) struct ExportArgs {
    pub user: String,
    pub format: Option<String>,
    pub dir: Option<PathBuf>,
    pub compact: bool,
    pub per_page: Option<u32>,
    pub page_cap: Option<u32>,
}

#[derive(Debug, tabled::Tabled)]
struct ExportRow {
    #[tabled(rename = "Format")]
    format: String,
    #[tabled(rename = "Repos")]
    count: usize,
    #[tabled(rename = "Pages")]
    pages: u32,
    #[tabled(rename = "Complete")]
    complete: String,
    #[tabled(rename = "Bytes")]
    bytes: usize,
    #[tabled(rename = "Location")]
    location: String,
}

impl From<&ExportReport> for ExportRow {
    fn from(report: &ExportReport) -> Self {
        Self {
            format: report.format.to_string(),
            count: report.count,
            pages: report.pages_fetched,
            complete: if report.truncated { "no (page cap)" } else { "yes" }.to_string(),
            bytes: report.bytes,
            location: report.location.clone(),
        }
    }
}

fn build_request(args: &ExportArgs, config: &Config) -> starport::Result<ExportRequest> {
    match args.format.as_deref() {
        Some(format) => ExportRequest::parse(args.user.as_str(), Some(format)),
        None => Ok(ExportRequest::new(args.user.as_str(), config.export.format)),
    }
}

fn build_options(args: &ExportArgs, config: &Config) -> ExportOptions {
    ExportOptions {
        aggregate: aggregate_options(args.per_page, args.page_cap, config),
        json_style: if args.compact {
            JsonStyle::Compact
        } else {
            config.json_style()
        },
    }
}

pub(crate) async fn handle_export(
    args: ExportArgs,
    output: OutputFormat,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = build_request(&args, config)?;
    let options = build_options(&args, config);
    let sink = FileSink::new(args.dir.clone().unwrap_or_else(|| config.export_dir()));
    let client = build_client(config)?;

    let reporter = Arc::new(ProgressReporter::new());
    let callback = reporter.as_callback();
    let report = export_stars(&client, &request, &options, &sink, Some(&callback)).await;
    reporter.finish();
    let report = report?;

    match output {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            print_table(vec![ExportRow::from(&report)]);
            if report.truncated {
                println!(
                    "Stopped at the page cap ({}); the export is incomplete",
                    options.aggregate.page_cap
                );
            }
        }
    }

    Ok(())
}
