//! Progress events emitted while aggregating and exporting.
//!
//! The library never renders anything; front ends pass a
//! [`ProgressCallback`] and decide how to display events.

/// Progress events emitted during aggregation and export.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StarsProgress {
    /// Starting to walk a subject's starred pages.
    FetchingPages {
        /// The account whose stars are being enumerated.
        subject: String,
        /// Items requested per page.
        page_size: u32,
        /// Hard ceiling on page requests.
        page_cap: u32,
    },

    /// Fetched a page of starred repositories.
    FetchedPage {
        /// Page number (1-indexed).
        page: u32,
        /// Number of repos on this page.
        count: usize,
        /// Running total of repos fetched so far.
        total_so_far: usize,
        /// Last page advertised by the server (if known).
        last_page: Option<u32>,
    },

    /// Stopped because the page cap was reached while `next` was still set.
    Truncated {
        /// Pages fetched before stopping.
        pages_fetched: u32,
        /// The configured cap.
        page_cap: u32,
    },

    /// Finished fetching.
    FetchComplete {
        /// Total number of repositories collected.
        total: usize,
        /// Pages fetched.
        pages: u32,
    },

    /// Serializing collected items.
    Serializing {
        /// Output format name.
        format: String,
        /// Number of items being written.
        count: usize,
    },

    /// Export artifact written.
    Persisted {
        /// Where the artifact ended up.
        location: String,
        /// Bytes written.
        bytes: usize,
    },
}

/// Callback for progress updates.
pub type ProgressCallback = Box<dyn Fn(StarsProgress) + Send + Sync>;

/// Emit a progress event if a callback is provided.
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, event: StarsProgress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_emit_with_callback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);

        let callback: ProgressCallback = Box::new(move |event| {
            seen_clone.lock().unwrap().push(event);
        });

        emit(Some(&callback), StarsProgress::FetchComplete { total: 10, pages: 1 });
        emit(
            Some(&callback),
            StarsProgress::Truncated {
                pages_fetched: 5,
                page_cap: 5,
            },
        );

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], StarsProgress::FetchComplete { total: 10, pages: 1 });
    }

    #[test]
    fn test_emit_without_callback() {
        emit(None, StarsProgress::FetchComplete { total: 10, pages: 1 });
    }
}
