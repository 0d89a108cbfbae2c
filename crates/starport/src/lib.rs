//! Starport - list and export a GitHub account's starred repositories.
//!
//! The library fetches single pages of a user's stars, walks the `Link`
//! header chain to collect all of them under a page cap, and exports the
//! result as JSON or CSV.
//!
//! # Example
//!
//! ```ignore
//! use starport::{ExportFormat, ExportOptions, ExportRequest, FileSink, GitHubClient, export_stars};
//!
//! let client = GitHubClient::new(Some(&token))?;
//! let request = ExportRequest::new("octocat", ExportFormat::Csv);
//! let sink = FileSink::new("exports");
//!
//! let report = export_stars(&client, &request, &ExportOptions::default(), &sink, None).await?;
//! println!("wrote {} items to {}", report.count, report.location);
//! ```

pub mod aggregate;
pub mod error;
pub mod export;
pub mod github;
pub mod http;
pub mod progress;
pub mod request;

pub use aggregate::{
    AggregateOptions, AggregationResult, DEFAULT_PAGE_CAP, PageFetcher, aggregate_all,
    fetch_starred_page,
};
pub use error::{Result, StarsError, short_error_message};
pub use export::{
    ExportFormat, ExportOptions, ExportReport, ExportSink, FileSink, JsonStyle, MemorySink,
    PersistedExport, export_stars,
};
pub use github::{GitHubClient, PageCursor, RateSnapshot, RepoItem, RepoOwner, StarredPage};
pub use progress::{ProgressCallback, StarsProgress};
pub use request::{DEFAULT_PAGE_SIZE, ExportRequest, MAX_PAGE_SIZE, PageRequest};
