use starport::StarsProgress;

/// Logging reporter using tracing for structured output.
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, event: StarsProgress) {
        match event {
            StarsProgress::FetchingPages {
                subject,
                page_size,
                page_cap,
            } => {
                tracing::info!(subject = %subject, page_size, page_cap, "Fetching starred repositories");
            }

            StarsProgress::FetchedPage {
                page,
                count,
                total_so_far,
                last_page,
            } => {
                tracing::debug!(page, count, total_so_far, last_page = ?last_page, "Fetched page");
            }

            StarsProgress::FetchComplete { total, pages } => {
                tracing::info!(total, pages, "Fetch complete");
            }

            StarsProgress::Serializing { format, count } => {
                tracing::debug!(format = %format, count, "Serializing export");
            }

            StarsProgress::Persisted { location, bytes } => {
                tracing::info!(location = %location, bytes, "Export written");
            }

            // The library already warns with the subject attached
            StarsProgress::Truncated { .. } => {}

            _ => {}
        }
    }
}

impl Default for LoggingReporter {
    fn default() -> Self {
        Self::new()
    }
}
