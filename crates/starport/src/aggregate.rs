//! Sequential aggregation over `Link`-paginated starred pages.
//!
//! Each request's page number comes from the previous response's `next`
//! pointer, so pages are fetched strictly one after another. The loop ends
//! when a response has no `next` pointer, or after `page_cap` requests.
//!
//! Items are kept in page order, then in-page order. Nothing is
//! de-duplicated: if the starred list changes between requests the same
//! repository can appear twice, and that is passed through as-is.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{Result, StarsError, short_error_message};
use crate::github::{RateSnapshot, RepoItem, StarredPage};
use crate::progress::{ProgressCallback, StarsProgress, emit};
use crate::request::{MAX_PAGE_SIZE, PageRequest, validate_page_size, validate_subject};

/// Default ceiling on page requests for one aggregation.
pub const DEFAULT_PAGE_CAP: u32 = 100;

/// Source of single starred pages.
///
/// Implemented by [`crate::github::GitHubClient`]; tests substitute scripted
/// fetchers.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page of `subject`'s starred repositories.
    async fn fetch_page(&self, subject: &str, page: u32, page_size: u32) -> Result<StarredPage>;
}

/// Options for [`aggregate_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Items requested per page.
    pub page_size: u32,
    /// Maximum number of page requests. Counts requests, not items.
    pub page_cap: u32,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
            page_cap: DEFAULT_PAGE_CAP,
        }
    }
}

impl AggregateOptions {
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_page_cap(mut self, page_cap: u32) -> Self {
        self.page_cap = page_cap;
        self
    }

    fn validate(&self) -> Result<()> {
        validate_page_size(self.page_size)?;
        if self.page_cap == 0 {
            return Err(StarsError::invalid_input("page cap must be at least 1"));
        }
        Ok(())
    }
}

/// Every starred repository collected across pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    /// Items in page order, then in-page order. May contain duplicates.
    pub items: Vec<RepoItem>,
    /// Number of page requests that succeeded.
    pub pages_fetched: u32,
    /// Whether the page cap stopped the loop while `next` was still set.
    pub truncated: bool,
    /// Rate limit state from the last page fetched.
    pub rate: RateSnapshot,
}

/// Validate a single-page request and fetch that page.
pub async fn fetch_starred_page<F>(fetcher: &F, request: &PageRequest) -> Result<StarredPage>
where
    F: PageFetcher + ?Sized,
{
    let request = request.validate()?;
    fetcher
        .fetch_page(&request.subject, request.page, request.page_size)
        .await
}

/// Collect every starred repository of `subject` by following `next` pointers.
///
/// Stops at the first failed page and returns that error; items from earlier
/// pages are dropped.
pub async fn aggregate_all<F>(
    fetcher: &F,
    subject: &str,
    options: &AggregateOptions,
    on_progress: Option<&ProgressCallback>,
) -> Result<AggregationResult>
where
    F: PageFetcher + ?Sized,
{
    let subject = validate_subject(subject)?;
    options.validate()?;

    emit(
        on_progress,
        StarsProgress::FetchingPages {
            subject: subject.clone(),
            page_size: options.page_size,
            page_cap: options.page_cap,
        },
    );

    let mut items: Vec<RepoItem> = Vec::new();
    let mut rate: RateSnapshot;
    let mut page = 1u32;
    let mut pages_fetched = 0u32;

    let truncated = loop {
        let fetched = match fetcher.fetch_page(&subject, page, options.page_size).await {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::warn!(
                    subject = %subject,
                    page,
                    collected = items.len(),
                    error = %short_error_message(&e),
                    "Aggregation stopped on failed page"
                );
                return Err(e);
            }
        };

        pages_fetched += 1;
        rate = fetched.rate;
        let count = fetched.items.len();
        items.extend(fetched.items);

        emit(
            on_progress,
            StarsProgress::FetchedPage {
                page,
                count,
                total_so_far: items.len(),
                last_page: fetched.cursor.last,
            },
        );

        match fetched.cursor.next {
            None => break false,
            Some(_) if pages_fetched >= options.page_cap => break true,
            Some(next) => page = next,
        }
    };

    if truncated {
        tracing::warn!(
            subject = %subject,
            pages_fetched,
            page_cap = options.page_cap,
            "Page cap reached before the last page"
        );
        emit(
            on_progress,
            StarsProgress::Truncated {
                pages_fetched,
                page_cap: options.page_cap,
            },
        );
    }

    emit(
        on_progress,
        StarsProgress::FetchComplete {
            total: items.len(),
            pages: pages_fetched,
        },
    );

    Ok(AggregationResult {
        items,
        pages_fetched,
        truncated,
        rate,
    })
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted page fetchers shared by unit tests.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::github::{PageCursor, RepoOwner};

    pub(crate) fn item(id: u64) -> RepoItem {
        RepoItem {
            id,
            full_name: format!("owner/repo-{id}"),
            url: format!("https://github.com/owner/repo-{id}"),
            description: None,
            star_count: id * 10,
            primary_language: Some("Rust".to_string()),
            owner: RepoOwner {
                login: "owner".to_string(),
                avatar_url: "https://avatars.githubusercontent.com/u/1".to_string(),
                profile_url: "https://github.com/owner".to_string(),
            },
        }
    }

    /// Fetcher answering from a fixed map of page number to result.
    #[derive(Default)]
    pub(crate) struct ScriptedFetcher {
        pages: HashMap<u32, std::result::Result<StarredPage, (u16, String)>>,
        calls: Mutex<Vec<(String, u32, u32)>>,
    }

    impl ScriptedFetcher {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        /// A linear chain of `n` pages with `per_page` items each.
        pub(crate) fn chain(n: u32, per_page: u64) -> Self {
            let mut fetcher = Self::new();
            for page in 1..=n {
                let ids = ((u64::from(page) - 1) * per_page + 1)..=(u64::from(page) * per_page);
                let next = (page < n).then_some(page + 1);
                fetcher = fetcher.page(page, ids.map(item).collect(), next);
            }
            fetcher
        }

        pub(crate) fn page(mut self, page: u32, items: Vec<RepoItem>, next: Option<u32>) -> Self {
            self.pages.insert(
                page,
                Ok(StarredPage {
                    items,
                    cursor: PageCursor {
                        next,
                        ..Default::default()
                    },
                    rate: RateSnapshot {
                        limit: Some(60),
                        remaining: Some(60 - u64::from(page)),
                        reset_epoch_seconds: Some(1_700_000_000),
                    },
                }),
            );
            self
        }

        pub(crate) fn failing(mut self, page: u32, status: u16, body: &str) -> Self {
            self.pages.insert(page, Err((status, body.to_string())));
            self
        }

        pub(crate) fn calls(&self) -> Vec<(String, u32, u32)> {
            self.calls.lock().unwrap().clone()
        }

        pub(crate) fn pages_requested(&self) -> Vec<u32> {
            self.calls().into_iter().map(|(_, page, _)| page).collect()
        }
    }

    #[async_trait]
    impl PageFetcher for ScriptedFetcher {
        async fn fetch_page(
            &self,
            subject: &str,
            page: u32,
            page_size: u32,
        ) -> Result<StarredPage> {
            self.calls
                .lock()
                .unwrap()
                .push((subject.to_string(), page, page_size));
            match self.pages.get(&page) {
                Some(Ok(p)) => Ok(p.clone()),
                Some(Err((status, body))) => Err(StarsError::remote(*status, body.clone())),
                None => Err(StarsError::remote(404, format!("no page {page}"))),
            }
        }
    }

    /// Fetcher whose every page points at the next one, forever.
    #[derive(Default)]
    pub(crate) struct EndlessFetcher {
        pub(crate) calls: Mutex<u32>,
    }

    #[async_trait]
    impl PageFetcher for EndlessFetcher {
        async fn fetch_page(&self, _subject: &str, page: u32, _page_size: u32) -> Result<StarredPage> {
            *self.calls.lock().unwrap() += 1;
            Ok(StarredPage {
                items: vec![item(u64::from(page))],
                cursor: PageCursor {
                    next: Some(page + 1),
                    ..Default::default()
                },
                rate: RateSnapshot::default(),
            })
        }
    }
}
