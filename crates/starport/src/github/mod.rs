//! GitHub REST client for listing a user's starred repositories.
//!
//! # Module Structure
//!
//! - [`types`] - Wire types and their normalized form
//! - [`client`] - Page fetching and rate-limit header parsing
//! - [`link`] - `Link` header parsing into a [`PageCursor`]
//! - [`convert`] - Normalization from the wire shape

mod client;
mod convert;
mod link;
mod types;

pub use client::{API_VERSION, DEFAULT_API_BASE, GitHubClient, parse_rate_headers};
pub use convert::normalize;
pub use link::parse_link_header;
pub use types::{PageCursor, RateSnapshot, RawOwner, RawRepo, RepoItem, RepoOwner, StarredPage};
