//! Exporting a subject's starred repositories to a file.
//!
//! [`export_stars`] aggregates every page first, then serializes, then hands
//! the payload to an [`ExportSink`]. A failure at any stage leaves the
//! destination untouched.

mod format;
mod sink;

pub use format::{CSV_HEADER, ExportFormat, JsonStyle, serialize, to_csv, to_json};
pub use sink::{ExportSink, FileSink, MemorySink, PersistedExport};

use serde::Serialize;

use crate::aggregate::{AggregateOptions, PageFetcher, aggregate_all};
use crate::error::Result;
use crate::progress::{ProgressCallback, StarsProgress, emit};
use crate::request::ExportRequest;

/// Options for [`export_stars`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    pub aggregate: AggregateOptions,
    pub json_style: JsonStyle,
}

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReport {
    pub ok: bool,
    /// Number of items written.
    pub count: usize,
    pub location: String,
    pub format: ExportFormat,
    pub bytes: usize,
    pub pages_fetched: u32,
    pub truncated: bool,
}

/// Aggregate all of a subject's stars and persist them in the requested format.
pub async fn export_stars<F, S>(
    fetcher: &F,
    request: &ExportRequest,
    options: &ExportOptions,
    sink: &S,
    on_progress: Option<&ProgressCallback>,
) -> Result<ExportReport>
where
    F: PageFetcher + ?Sized,
    S: ExportSink + ?Sized,
{
    let request = request.validate()?;

    let result = aggregate_all(fetcher, &request.subject, &options.aggregate, on_progress).await?;

    emit(
        on_progress,
        StarsProgress::Serializing {
            format: request.format.to_string(),
            count: result.items.len(),
        },
    );
    let payload = serialize(&result.items, request.format, options.json_style)?;

    let persisted = sink.persist(&payload, &request.format.file_name()).await?;

    emit(
        on_progress,
        StarsProgress::Persisted {
            location: persisted.location.clone(),
            bytes: persisted.bytes_written,
        },
    );

    tracing::info!(
        subject = %request.subject,
        format = %request.format,
        count = result.items.len(),
        pages = result.pages_fetched,
        truncated = result.truncated,
        location = %persisted.location,
        "Export complete"
    );

    Ok(ExportReport {
        ok: true,
        count: result.items.len(),
        location: persisted.location,
        format: request.format,
        bytes: persisted.bytes_written,
        pages_fetched: result.pages_fetched,
        truncated: result.truncated,
    })
}
