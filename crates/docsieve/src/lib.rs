//! Docsieve - token-efficient library documentation from Context7
//!
//! This crate fetches library documentation from the Context7 MCP server
//! and keeps only the content categories a caller asks for: code examples,
//! API reference, setup commands, concepts, migration notes,
//! troubleshooting, best practices or important notes.
//!
//! ## Pipeline
//!
//! 1. A library name is resolved to an identifier (one call), or an exact
//!    identifier is validated locally (no call).
//! 2. [`DocsClient::query_docs`] fetches the raw text, retrying transient
//!    network failures on a fixed [`RetrySchedule`].
//! 3. [`filter_by_type`] routes the text through the extractors in
//!    [`extract`] and labels each section.
//! 4. If nothing matched, the flow falls back to unfiltered text.
//!
//! ## Example
//!
//! ```no_run
//! use docsieve::{Config, DocsClient, DocsQuery, ExtractionRequest};
//!
//! # async fn run() -> Result<(), docsieve::DocsError> {
//! let config = Config::default();
//! let client = DocsClient::from_config(&config);
//! let query = DocsQuery::by_name("react", "useState")
//!     .with_request(ExtractionRequest::new("examples,api-ref", 5));
//! let output = client.fetch_docs(&query).await?;
//! println!("{}", output.text);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
mod error;
pub mod extract;
mod flow;
pub mod library;
mod report;
pub mod retry;
pub mod router;
pub mod transport;
mod types;

pub use client::{DocsClient, QUERY_TOOL, RESOLVE_TOOL};
pub use config::{ApiKey, Config, KeySource};
pub use error::{DocsError, ErrorCategory};
pub use flow::{
    estimate_tokens, truncate_raw, DocsOutput, DocsQuery, Fallback, LibrarySelector, TokenStats,
};
pub use library::{repair_shell_path, LibraryId, Resolution};
pub use report::{API_KEY_MISSING, CALL_BUDGET, DASHBOARD_URL};
pub use retry::{FailureKind, FetchAttempt, RetrySchedule};
pub use router::{filter_by_type, EmptyRoute, Routed};
pub use transport::{HttpTransport, Session, Transport, TransportError, DEFAULT_ENDPOINT};
pub use types::{
    ContentItem, ContentType, ExtractionRequest, LegacyMode, ToolResult, DEFAULT_MAX_ITEMS,
};

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = concat!("docsieve/", env!("CARGO_PKG_VERSION"));
