//! Question-level flow: select library, query, route, fall back

use crate::client::DocsClient;
use crate::error::DocsError;
use crate::library::{repair_shell_path, LibraryId};
use crate::router::{filter_by_type, Routed};
use crate::transport::Transport;
use crate::types::ExtractionRequest;
use tracing::info;

/// Characters of raw text kept when nothing else can be shown
pub const TRUNCATE_CHARS: usize = 1500;

const TRUNCATION_NOTICE: &str = "\n\n[Content truncated - no matching content types found]\nTry --content-type all for unfiltered output";

/// How the caller named the library
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibrarySelector {
    /// Exact identifier; skips resolution
    Id(String),
    /// Human name; costs one resolve call
    Name(String),
}

/// One documentation question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsQuery {
    /// Library to query
    pub library: Option<LibrarySelector>,
    /// Topic to focus on; may be empty
    pub topic: String,
    /// What to extract from the response
    pub request: ExtractionRequest,
}

impl DocsQuery {
    /// Query a library by exact identifier
    pub fn by_id(id: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            library: Some(LibrarySelector::Id(id.into())),
            topic: topic.into(),
            request: ExtractionRequest::default(),
        }
    }

    /// Query a library by name
    pub fn by_name(name: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            library: Some(LibrarySelector::Name(name.into())),
            topic: topic.into(),
            request: ExtractionRequest::default(),
        }
    }

    /// Set the extraction request
    pub fn with_request(mut self, request: ExtractionRequest) -> Self {
        self.request = request;
        self
    }
}

/// Which fallback, if any, produced the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Output is what was requested
    None,
    /// Requested types were empty; output is unfiltered
    All,
    /// Output is the head of the raw text plus a notice
    Truncated,
}

/// Rough token accounting for raw and filtered text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenStats {
    /// Whitespace-separated words in the raw response
    pub raw_words: usize,
    /// Estimated tokens in the raw response
    pub raw_tokens: usize,
    /// Whitespace-separated words in the output
    pub output_words: usize,
    /// Estimated tokens in the output
    pub output_tokens: usize,
}

impl TokenStats {
    /// Measure `raw` against `output`
    pub fn measure(raw: &str, output: &str) -> Self {
        let raw_words = raw.split_whitespace().count();
        let output_words = output.split_whitespace().count();
        Self {
            raw_words,
            raw_tokens: estimate_tokens(raw_words),
            output_words,
            output_tokens: estimate_tokens(output_words),
        }
    }

    /// Percentage of raw tokens not in the output, floored
    pub fn savings_percent(&self) -> i64 {
        if self.raw_tokens == 0 {
            return 0;
        }
        let saved = self.raw_tokens as i64 - self.output_tokens as i64;
        (saved * 100).div_euclid(self.raw_tokens as i64)
    }
}

/// About 1.3 tokens per word
pub fn estimate_tokens(words: usize) -> usize {
    (words as f64 * 1.3) as usize
}

/// Answer to one question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsOutput {
    /// Text to show the caller
    pub text: String,
    /// Content types that produced `text`, e.g. `all (fallback from setup)`
    pub content_types: String,
    /// Library that was queried
    pub library_id: LibraryId,
    /// Fallback taken, if any
    pub fallback: Fallback,
    /// Token accounting
    pub stats: TokenStats,
}

/// Head of `raw` with a notice pointing at `--content-type all`
pub fn truncate_raw(raw: &str) -> String {
    let mut text: String = raw.chars().take(TRUNCATE_CHARS).collect();
    text.push_str(TRUNCATION_NOTICE);
    text
}

impl<T: Transport> DocsClient<T> {
    /// Answer `query`: at most one resolve call plus the retried query
    pub async fn fetch_docs(&self, query: &DocsQuery) -> Result<DocsOutput, DocsError> {
        let library_id = match &query.library {
            None => return Err(DocsError::MissingLibrary),
            Some(LibrarySelector::Name(name)) => {
                self.resolve_library(name, &query.topic).await?.id
            }
            Some(LibrarySelector::Id(id)) => {
                let id = LibraryId::parse(&repair_shell_path(id))?;
                info!("Using provided library ID: {} (saves 1 API call)", id);
                id
            }
        };

        info!("Fetching documentation...");
        let raw = self.query_docs(&library_id, &query.topic).await?;
        if raw.is_empty() {
            return Err(DocsError::EmptyResults {
                library_id: library_id.to_string(),
                topic: query.topic.clone(),
            });
        }

        let request = &query.request;
        let raw_words = raw.split_whitespace().count();
        info!(
            "Raw response: ~{} words (~{} tokens)",
            raw_words,
            estimate_tokens(raw_words)
        );
        info!("Content type: {}", request.content_types());
        info!("Max items per type: {}", request.max_items());

        let mut fallback = Fallback::None;
        let mut content_types = request.content_types().to_string();
        let mut routed = filter_by_type(&raw, request);

        if routed.is_empty() {
            info!(
                "No content found for '{}', auto-retrying with 'all'...",
                request.content_types()
            );
            routed = filter_by_type(&raw, &ExtractionRequest::all(request.max_items()));
            if !matches!(&routed, Routed::Content(text) if !text.trim().is_empty()) {
                return Err(DocsError::NothingExtracted {
                    requested: request.content_types().to_string(),
                    library_id: library_id.to_string(),
                    topic: query.topic.clone(),
                });
            }
            info!("Fallback to 'all' succeeded");
            fallback = Fallback::All;
            content_types = format!("all (fallback from {})", request.content_types());
        }

        let mut text = routed.to_string();
        if text.trim().is_empty() {
            text = truncate_raw(&raw);
            fallback = Fallback::Truncated;
        }

        let stats = TokenStats::measure(&raw, &text);
        info!(
            "Filtered output: ~{} words (~{} tokens)",
            stats.output_words, stats.output_tokens
        );
        info!("Token savings: {}%", stats.savings_percent());
        info!("Content types requested: {}", content_types);

        Ok(DocsOutput {
            text,
            content_types,
            library_id,
            fallback,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;

    const DOC: &str = "### Using state

```jsx
const [count, setCount] = useState(0);
```

State lets a component remember information like user input between renders, and it triggers a re-render whenever it changes value.
";

    const RESOLVE_REPLY: &str =
        "1. Next.js\n- Context7-compatible library ID: /vercel/next.js\n";

    #[tokio::test]
    async fn test_missing_library() {
        let transport = MockTransport::new();
        let client = DocsClient::new(transport.clone());
        let query = DocsQuery {
            library: None,
            topic: "hooks".to_string(),
            request: ExtractionRequest::default(),
        };
        assert!(matches!(
            client.fetch_docs(&query).await,
            Err(DocsError::MissingLibrary)
        ));
        assert_eq!(transport.connects(), 0);
    }

    #[tokio::test]
    async fn test_invalid_id_makes_no_calls() {
        let transport = MockTransport::new().text(DOC);
        let client = DocsClient::new(transport.clone());
        let err = client
            .fetch_docs(&DocsQuery::by_id("reactjs/react.dev", "hooks"))
            .await
            .unwrap_err();
        assert!(matches!(err, DocsError::InvalidLibraryId(_)));
        assert_eq!(transport.connects(), 0);
    }

    #[tokio::test]
    async fn test_shell_mangled_id_is_repaired() {
        let transport = MockTransport::new().text(DOC);
        let client = DocsClient::new(transport.clone());
        let output = client
            .fetch_docs(&DocsQuery::by_id("C:/Program Files/Git/vercel/next.js", "routing"))
            .await
            .unwrap();
        assert_eq!(output.library_id.as_str(), "/vercel/next.js");
        assert_eq!(transport.calls()[0].1["libraryId"], "/vercel/next.js");
    }

    #[tokio::test]
    async fn test_by_name_uses_two_calls() {
        let transport = MockTransport::new().text(RESOLVE_REPLY).text(DOC);
        let client = DocsClient::new(transport.clone());
        let output = client
            .fetch_docs(&DocsQuery::by_name("nextjs", "routing"))
            .await
            .unwrap();

        assert_eq!(output.library_id.as_str(), "/vercel/next.js");
        assert_eq!(output.fallback, Fallback::None);
        assert_eq!(output.content_types, "examples");
        assert!(output
            .text
            .starts_with("## Code Examples\n\n### Example 1\n```jsx\nconst [count, setCount]"));
        let tools: Vec<_> = transport.calls().into_iter().map(|(tool, _)| tool).collect();
        assert_eq!(tools, vec!["resolve-library-id", "query-docs"]);
        assert_eq!(transport.closes(), 2);
    }

    #[tokio::test]
    async fn test_empty_response() {
        let client = DocsClient::new(MockTransport::new().text(""));
        let err = client
            .fetch_docs(&DocsQuery::by_id("/vercel/next.js", "routing"))
            .await
            .unwrap_err();
        match err {
            DocsError::EmptyResults { library_id, topic } => {
                assert_eq!(library_id, "/vercel/next.js");
                assert_eq!(topic, "routing");
            }
            other => panic!("expected EmptyResults, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_falls_back_to_all() {
        let client = DocsClient::new(MockTransport::new().text(DOC));
        let query = DocsQuery::by_id("/reactjs/react.dev", "state")
            .with_request(ExtractionRequest::new("setup,migration", 5));
        let output = client.fetch_docs(&query).await.unwrap();

        assert_eq!(output.text, DOC);
        assert_eq!(output.fallback, Fallback::All);
        assert_eq!(output.content_types, "all (fallback from setup,migration)");
    }

    #[tokio::test]
    async fn test_nothing_extracted_is_informational() {
        let client = DocsClient::new(MockTransport::new().text("  \n\n"));
        let query = DocsQuery::by_id("/reactjs/react.dev", "state")
            .with_request(ExtractionRequest::new("examples", 5));
        let err = client.fetch_docs(&query).await.unwrap_err();

        assert!(matches!(err, DocsError::NothingExtracted { ref requested, .. } if requested == "examples"));
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn test_truncate_raw() {
        let raw = "é".repeat(2000);
        let text = truncate_raw(&raw);
        assert!(text.starts_with(&"é".repeat(TRUNCATE_CHARS)));
        assert!(text.ends_with(
            "[Content truncated - no matching content types found]\nTry --content-type all for unfiltered output"
        ));
        assert_eq!(text.chars().filter(|c| *c == 'é').count(), TRUNCATE_CHARS);
    }

    #[test]
    fn test_token_stats() {
        let stats = TokenStats::measure("a b c d e f g h i j", "a b c d e");
        assert_eq!(stats.raw_words, 10);
        assert_eq!(stats.raw_tokens, 13);
        assert_eq!(stats.output_tokens, 6);
        assert_eq!(stats.savings_percent(), 53);
        assert_eq!(TokenStats::default().savings_percent(), 0);
    }
}
