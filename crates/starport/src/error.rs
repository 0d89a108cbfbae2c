use thiserror::Error;

/// Errors produced while fetching, aggregating, or exporting starred repositories.
#[derive(Debug, Error)]
pub enum StarsError {
    /// Local validation failed before any request was made.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The remote API answered with a non-success status.
    #[error("Remote error ({status}): {body}")]
    Remote { status: u16, body: String },

    /// Transport-level failure (DNS, timeout, connection reset).
    #[error("Network error: {message}")]
    Network { message: String },

    /// A success response whose body was not the expected JSON.
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// Rendering items to JSON or CSV failed.
    #[error("Serialize error: {message}")]
    Serialize { message: String },

    /// Writing the export artifact failed.
    #[error("Export to {location} failed: {message}")]
    Export { location: String, message: String },
}

impl StarsError {
    /// Create an invalid input error.
    #[inline]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a remote error from a status code and the raw response body.
    #[inline]
    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        Self::Remote {
            status,
            body: body.into(),
        }
    }

    /// Create a network error.
    #[inline]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a decode error.
    #[inline]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a serialize error.
    #[inline]
    pub fn serialize(message: impl Into<String>) -> Self {
        Self::Serialize {
            message: message.into(),
        }
    }

    /// Create an export error.
    #[inline]
    pub fn export(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Export {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Whether the upstream API rejected the request.
    #[inline]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// HTTP status of a remote error, if this is one.
    #[inline]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Extract a short error message suitable for display.
///
/// Takes the first line of the rendered error, so a multi-line response body
/// does not flood a progress line or a log field.
#[inline]
pub fn short_error_message(e: &impl std::error::Error) -> String {
    let full = e.to_string();
    full.lines().next().unwrap_or(&full).to_string()
}

/// Result type for starport operations.
pub type Result<T> = std::result::Result<T, StarsError>;
