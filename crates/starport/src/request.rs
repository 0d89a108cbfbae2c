//! Inbound request types and their validation.
//!
//! Validation runs before any network call; failures are
//! [`StarsError::InvalidInput`].

use serde::{Deserialize, Serialize};

use crate::error::{Result, StarsError};
use crate::export::ExportFormat;

/// Largest page size the API accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size used for single-page display requests.
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// Trim `subject` and reject it if nothing is left.
pub fn validate_subject(subject: &str) -> Result<String> {
    let trimmed = subject.trim();
    if trimmed.is_empty() {
        return Err(StarsError::invalid_input("username must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// Reject page sizes outside `1..=MAX_PAGE_SIZE`.
pub fn validate_page_size(page_size: u32) -> Result<u32> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(StarsError::invalid_input(format!(
            "page size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"
        )));
    }
    Ok(page_size)
}

/// Request for a single page of starred repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub subject: String,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl PageRequest {
    /// Request the first page with the default page size.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            page: default_page(),
            page_size: default_page_size(),
        }
    }

    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Validate and return the normalized request (subject trimmed).
    pub fn validate(&self) -> Result<Self> {
        if self.page == 0 {
            return Err(StarsError::invalid_input("page must be at least 1"));
        }
        Ok(Self {
            subject: validate_subject(&self.subject)?,
            page: self.page,
            page_size: validate_page_size(self.page_size)?,
        })
    }

    /// 1-based bounds of the items shown for this page, for "showing X–Y".
    ///
    /// Returns `None` for an empty page.
    pub fn display_range(&self, item_count: usize) -> Option<(u64, u64)> {
        if item_count == 0 {
            return None;
        }
        let offset = u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size);
        Some((offset + 1, offset + item_count as u64))
    }
}

/// Request to export every starred repository of a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub subject: String,
    #[serde(default)]
    pub format: ExportFormat,
}

impl ExportRequest {
    pub fn new(subject: impl Into<String>, format: ExportFormat) -> Self {
        Self {
            subject: subject.into(),
            format,
        }
    }

    /// Build a request from an untyped format string (`"json"` / `"csv"`).
    ///
    /// `None` selects the default format.
    pub fn parse(subject: impl Into<String>, format: Option<&str>) -> Result<Self> {
        let format = match format {
            Some(raw) => raw.parse::<ExportFormat>()?,
            None => ExportFormat::default(),
        };
        Ok(Self::new(subject, format))
    }

    /// Validate and return the normalized request (subject trimmed).
    pub fn validate(&self) -> Result<Self> {
        Ok(Self {
            subject: validate_subject(&self.subject)?,
            format: self.format,
        })
    }
}
