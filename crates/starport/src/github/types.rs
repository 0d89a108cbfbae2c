//! GitHub API data types.
//!
//! `RawRepo`/`RawOwner` mirror the wire schema of the starred endpoint and are
//! only ever read by the normalizer. Everything else in the crate works with
//! [`RepoItem`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Owner object as returned by the API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawOwner {
    #[serde(deserialize_with = "null_as_default")]
    pub login: String,
    #[serde(deserialize_with = "null_as_default")]
    pub avatar_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub html_url: String,
}

/// Repository record as returned by `GET /users/{user}/starred`.
///
/// Every field defaults when missing or `null`, so schema drift on one record
/// degrades that record rather than failing the page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRepo {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub html_url: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub stargazers_count: u64,
    pub language: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub owner: RawOwner,
}

/// Owner of a starred repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoOwner {
    pub login: String,
    pub avatar_url: String,
    pub profile_url: String,
}

/// A starred repository in its normalized shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoItem {
    /// Platform ID, stable across pages.
    pub id: u64,
    /// `owner/name`.
    pub full_name: String,
    /// Browser URL of the repository.
    pub url: String,
    pub description: Option<String>,
    pub star_count: u64,
    pub primary_language: Option<String>,
    pub owner: RepoOwner,
}

/// Named page pointers advertised by a `Link` header.
///
/// Any pointer may be absent. Aggregation stops when `next` is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<u32>,
}

impl PageCursor {
    /// Returns the total number of pages if known.
    pub fn total_pages(&self) -> Option<u32> {
        self.last
    }

    /// Whether no pointer is set.
    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.prev.is_none() && self.next.is_none() && self.last.is_none()
    }
}

/// Rate limit state reported by the most recent response.
///
/// Advisory only: nothing in the crate gates on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSnapshot {
    pub limit: Option<u64>,
    pub remaining: Option<u64>,
    pub reset_epoch_seconds: Option<i64>,
}

impl RateSnapshot {
    /// Get the reset time as a DateTime.
    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        self.reset_epoch_seconds
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

/// One page of starred repositories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StarredPage {
    pub items: Vec<RepoItem>,
    pub cursor: PageCursor,
    pub rate: RateSnapshot,
}
