//! Error types for Docsieve

use thiserror::Error;

/// Broad failure category of a [`DocsError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad or missing arguments; no remote call was made
    Input,
    /// Library name could not be resolved to an identifier
    Resolution,
    /// The documentation query failed
    Fetch,
    /// The service or the extractors produced nothing
    EmptyResult,
}

/// Errors that can occur while fetching and filtering documentation
///
/// `Display` gives a one-line summary; [`DocsError::report`] renders the
/// full self-contained report shown to callers.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Neither a library ID nor a library name was given
    #[error("Missing required parameter: library-id or library")]
    MissingLibrary,

    /// Library ID does not look like /org/project[/version]
    #[error("Invalid library ID format: {0}")]
    InvalidLibraryId(String),

    /// The resolve call itself failed
    #[error("Failed to resolve library name {name}: {message}")]
    ResolveFailed {
        /// Requested library name
        name: String,
        /// Transport error text
        message: String,
    },

    /// The resolve response carried no library ID
    #[error("Could not find library: {0}")]
    LibraryNotFound(String),

    /// The resolved library does not resemble the requested name
    #[error("'{name}' resolved to an unexpected library: {title} ({id})")]
    LibraryMismatch {
        /// Requested library name
        name: String,
        /// Resolved library ID
        id: String,
        /// Resolved library title
        title: String,
    },

    /// The service rejected the call for exceeding its quota
    #[error("Context7 rate limit exceeded")]
    RateLimited {
        /// Whether an API key was configured
        has_api_key: bool,
    },

    /// The service rejected the credentials
    #[error("Authentication failed with Context7")]
    AuthFailed {
        /// Whether an API key was configured
        has_api_key: bool,
    },

    /// Every attempt failed with an infrastructure error
    #[error("MCP call failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Attempts made
        attempts: usize,
        /// Error text of the final attempt
        last_error: String,
    },

    /// The query failed with an error that is neither fatal nor retryable
    #[error("Failed to fetch documentation: {0}")]
    FetchFailed(String),

    /// The service returned no documentation text
    #[error("No documentation found for {library_id}")]
    EmptyResults {
        /// Queried library ID
        library_id: String,
        /// Queried topic
        topic: String,
    },

    /// Neither the requested content types nor `all` produced output
    #[error("No content found for requested types: {requested}")]
    NothingExtracted {
        /// Content types as requested
        requested: String,
        /// Queried library ID
        library_id: String,
        /// Queried topic
        topic: String,
    },
}

impl DocsError {
    /// Category of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            DocsError::MissingLibrary | DocsError::InvalidLibraryId(_) => ErrorCategory::Input,
            DocsError::ResolveFailed { .. }
            | DocsError::LibraryNotFound(_)
            | DocsError::LibraryMismatch { .. } => ErrorCategory::Resolution,
            DocsError::RateLimited { .. }
            | DocsError::AuthFailed { .. }
            | DocsError::RetriesExhausted { .. }
            | DocsError::FetchFailed(_) => ErrorCategory::Fetch,
            DocsError::EmptyResults { .. } | DocsError::NothingExtracted { .. } => {
                ErrorCategory::EmptyResult
            }
        }
    }

    /// True for outcomes that are reported but are not failures
    pub fn is_informational(&self) -> bool {
        matches!(self, DocsError::NothingExtracted { .. })
    }

    /// Process exit status for this outcome
    pub fn exit_code(&self) -> i32 {
        if self.is_informational() {
            0
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            DocsError::MissingLibrary.to_string(),
            "Missing required parameter: library-id or library"
        );
        assert_eq!(
            DocsError::InvalidLibraryId("reactjs/react.dev".to_string()).to_string(),
            "Invalid library ID format: reactjs/react.dev"
        );
        assert_eq!(
            DocsError::RetriesExhausted {
                attempts: 3,
                last_error: "Request timeout".to_string()
            }
            .to_string(),
            "MCP call failed after 3 attempts: Request timeout"
        );
    }

    #[test]
    fn test_categories() {
        assert_eq!(DocsError::MissingLibrary.category(), ErrorCategory::Input);
        assert_eq!(
            DocsError::LibraryNotFound("reakt".to_string()).category(),
            ErrorCategory::Resolution
        );
        assert_eq!(
            DocsError::RateLimited { has_api_key: false }.category(),
            ErrorCategory::Fetch
        );
        assert_eq!(
            DocsError::EmptyResults {
                library_id: "/a/b".to_string(),
                topic: String::new()
            }
            .category(),
            ErrorCategory::EmptyResult
        );
    }

    #[test]
    fn test_exit_codes() {
        let nothing = DocsError::NothingExtracted {
            requested: "setup".to_string(),
            library_id: "/a/b".to_string(),
            topic: "hooks".to_string(),
        };
        assert_eq!(nothing.exit_code(), 0);
        assert_eq!(DocsError::FetchFailed("boom".to_string()).exit_code(), 1);
        assert_eq!(DocsError::MissingLibrary.exit_code(), 1);
    }
}
